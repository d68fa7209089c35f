#![forbid(unsafe_code)]
#![allow(dead_code)]

use async_trait::async_trait;
use config::Config;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use views::domain::{IdentityEntry, ViewDocument};
use views::{Error, ViewsPlatform};

/// In-memory stand-in for the platform, recording every write.
#[derive(Default)]
pub struct FakePlatform {
    pub views: Vec<ViewDocument>,
    pub history: Vec<IdentityEntry>,
    pub inventory: Vec<IdentityEntry>,
    /// Ids whose delete fails with a 500.
    pub failing_deletes: HashSet<String>,
    /// View names whose create fails with a 409.
    pub failing_creates: HashSet<String>,
    pub created: Mutex<Vec<ViewDocument>>,
    pub deleted: Mutex<Vec<String>>,
    pub history_calls: AtomicUsize,
    pub inventory_calls: AtomicUsize,
}

impl FakePlatform {
    pub fn created(&self) -> Vec<ViewDocument> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ViewsPlatform for FakePlatform {
    async fn list_views(&self) -> Result<Vec<ViewDocument>, Error> {
        Ok(self.views.clone())
    }

    async fn create_view(&self, view: &ViewDocument) -> Result<(), Error> {
        if self.failing_creates.contains(&view.name) {
            return Err(Error::UnexpectedStatus {
                action: "create view",
                status: 409,
                body: "name already exists".into(),
            });
        }
        self.created.lock().unwrap().push(view.clone());
        Ok(())
    }

    async fn delete_view(&self, id: &str) -> Result<(), Error> {
        if self.failing_deletes.contains(id) {
            return Err(Error::UnexpectedStatus {
                action: "delete view",
                status: 500,
                body: String::new(),
            });
        }
        self.deleted.lock().unwrap().push(id.to_owned());
        Ok(())
    }

    async fn discovery_history(&self) -> Result<Vec<IdentityEntry>, Error> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.history.clone())
    }

    async fn inventory(&self) -> Result<Vec<IdentityEntry>, Error> {
        self.inventory_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inventory.clone())
    }
}

pub fn config_in(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.root = root.to_owned();
    config
}

pub fn view(name: &str, id: &str, positions: serde_json::Value) -> ViewDocument {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "id": id,
        "userId": "1",
        "username": "admin",
        "savedAt": 1_700_000_000,
        "favorite": false,
        "layout": { "zoom": 1 },
        "positions": positions,
    }))
    .unwrap()
}
