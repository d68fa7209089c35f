#![forbid(unsafe_code)]

mod common;

use common::{FakePlatform, config_in, view};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tempfile::tempdir;
use views::domain::{IdentityEntry, Stage, StagedView, ViewDocument};
use views::storage::write_view;
use views::{BackupFolder, BackupWriter, Error, PresetSelector, Restorer, Scope, Selector};

/// Answers every prompt with a fixed name.
struct Renaming(&'static str);

impl Selector for Renaming {
    fn select_file(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates.first().cloned()
    }
    fn select_folder(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates.first().cloned()
    }
    fn confirm(&self, _: &str) -> bool {
        false
    }
    fn prompt(&self, _: &str, _: &str) -> String {
        self.0.to_owned()
    }
}

fn replaced_router() -> FakePlatform {
    FakePlatform {
        views: vec![view("Core Topology", "7", json!({ "SN123": { "x": 10 } }))],
        history: vec![IdentityEntry::new("SN123", "router1")],
        inventory: vec![IdentityEntry::new("SN999", "router1")],
        ..FakePlatform::default()
    }
}

#[tokio::test]
async fn backup_then_restore_all_maps_to_new_serials() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let platform = replaced_router();
    let selector = PresetSelector::unattended();

    let folder = BackupWriter::new(&config, &platform, &selector)
        .run("2024-03-01 14:05:09", true)
        .await
        .unwrap();
    let report = Restorer::new(&config, &platform, &selector)
        .restore(Scope::All, true)
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.succeeded, vec!["Core Topology".to_string()]);

    let created = platform.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "Core Topology");
    assert_eq!(created[0].position_keys().collect::<Vec<_>>(), vec!["SN999"]);
    assert_eq!(created[0].id(), None);
    assert!(!created[0].fields.contains_key("savedAt"));

    let persisted = folder
        .stage_dir(Stage::NewSerial)
        .join("Core Topology_NEW_SN.json");
    assert!(persisted.is_file());
    // the hostname copy from the backup was reused
    assert_eq!(platform.history_calls.load(Ordering::SeqCst), 1);
    assert_eq!(platform.inventory_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restore_all_keeps_going_past_a_broken_file() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.backup.precompute_hostname = false;
    let platform = FakePlatform {
        views: vec![
            view("A", "1", json!({ "SN1": {} })),
            view("B", "2", json!({ "SN2": {} })),
            view("C", "3", json!({ "SN3": {} })),
        ],
        history: vec![
            IdentityEntry::new("SN1", "a"),
            IdentityEntry::new("SN2", "b"),
            IdentityEntry::new("SN3", "c"),
        ],
        inventory: vec![
            IdentityEntry::new("NEW1", "a"),
            IdentityEntry::new("NEW2", "b"),
            IdentityEntry::new("NEW3", "c"),
        ],
        ..FakePlatform::default()
    };
    let selector = PresetSelector::unattended();

    let folder = BackupWriter::new(&config, &platform, &selector)
        .run("2024-03-01 14:05:09", true)
        .await
        .unwrap();
    fs::write(folder.stage_dir(Stage::Original).join("B.json"), "{ truncated").unwrap();

    let report = Restorer::new(&config, &platform, &selector)
        .restore(Scope::All, true)
        .await
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].item.ends_with("B.json"));
    let created: Vec<_> = platform.created().into_iter().map(|v| v.name).collect();
    assert_eq!(created, vec!["A", "C"]);
    // mappings are fetched once for the whole batch
    assert_eq!(platform.history_calls.load(Ordering::SeqCst), 1);
    assert_eq!(platform.inventory_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn views_named_like_stage_files_survive_a_round_trip() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let platform = FakePlatform {
        views: vec![
            view("Core", "1", json!({ "SN1": {} })),
            view("Edge_HOSTNAME", "2", json!({ "SN2": {} })),
            view("Lab_NEW_SN", "3", json!({ "SN3": {} })),
        ],
        history: vec![
            IdentityEntry::new("SN1", "a"),
            IdentityEntry::new("SN2", "b"),
            IdentityEntry::new("SN3", "c"),
        ],
        inventory: vec![
            IdentityEntry::new("NEW1", "a"),
            IdentityEntry::new("NEW2", "b"),
            IdentityEntry::new("NEW3", "c"),
        ],
        ..FakePlatform::default()
    };
    let selector = PresetSelector::unattended();

    let folder = BackupWriter::new(&config, &platform, &selector)
        .run("2024-03-01 14:05:09", true)
        .await
        .unwrap();
    let report = Restorer::new(&config, &platform, &selector)
        .restore(Scope::All, true)
        .await
        .unwrap();

    assert!(report.is_success());
    let created: Vec<_> = platform
        .created()
        .into_iter()
        .map(|v| {
            let keys: Vec<String> = v.position_keys().map(String::from).collect();
            (v.name, keys)
        })
        .collect();
    assert_eq!(
        created,
        vec![
            ("Core".to_string(), vec!["NEW1".to_string()]),
            ("Edge_HOSTNAME".to_string(), vec!["NEW2".to_string()]),
            ("Lab_NEW_SN".to_string(), vec!["NEW3".to_string()]),
        ]
    );
    let new_serial = folder.stage_dir(Stage::NewSerial);
    assert!(new_serial.join("Edge_HOSTNAME_NEW_SN.json").is_file());
    assert!(new_serial.join("Lab_NEW_SN_NEW_SN.json").is_file());
    assert_eq!(platform.history_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restore_all_records_files_that_are_not_views() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let platform = replaced_router();
    let selector = PresetSelector::unattended();

    let folder = BackupWriter::new(&config, &platform, &selector)
        .run("2024-03-01 14:05:09", true)
        .await
        .unwrap();
    fs::write(folder.stage_dir(Stage::Original).join("README"), "notes").unwrap();

    let report = Restorer::new(&config, &platform, &selector)
        .restore(Scope::All, true)
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec!["Core Topology".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].item.ends_with("README"));
}

#[tokio::test]
async fn restore_all_records_rejected_creates() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let mut platform = replaced_router();
    platform.views.push(view("Duplicate", "8", json!({})));
    platform.failing_creates.insert("Duplicate".into());
    let selector = PresetSelector::unattended();

    BackupWriter::new(&config, &platform, &selector)
        .run("2024-03-01 14:05:09", true)
        .await
        .unwrap();
    let report = Restorer::new(&config, &platform, &selector)
        .restore(Scope::All, true)
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec!["Core Topology".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].reason.contains("409"));
}

#[tokio::test]
async fn restore_all_uses_the_selected_folder() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let platform = replaced_router();
    let selector = PresetSelector::unattended();
    let writer = BackupWriter::new(&config, &platform, &selector);

    let first = writer.run("2024-01-01 00:00:00", true).await.unwrap();
    let latest = writer.run("2024-02-01 00:00:00", true).await.unwrap();

    let restorer = Restorer::new(&config, &platform, &selector);
    restorer.restore(Scope::All, true).await.unwrap();
    assert!(latest.stage_dir(Stage::NewSerial).is_dir());
    assert!(!first.stage_dir(Stage::NewSerial).exists());

    let pinned = PresetSelector::unattended()
        .with_folder(Some(first.stage_dir(Stage::Original)));
    Restorer::new(&config, &platform, &pinned)
        .restore(Scope::All, true)
        .await
        .unwrap();
    assert!(first.stage_dir(Stage::NewSerial).is_dir());
}

#[tokio::test]
async fn single_new_serial_file_is_uploaded_as_is() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let platform = replaced_router();
    let document = ViewDocument::new("Ready").with_field("layout", json!({}));
    let path = write_view(
        dir.path(),
        &StagedView::new(Stage::NewSerial, "Ready", document),
    )
    .unwrap();

    let report = Restorer::new(&config, &platform, &Renaming("Ready again"))
        .restore(Scope::Single, false)
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(platform.created()[0].name, "Ready again");
    assert_eq!(platform.history_calls.load(Ordering::SeqCst), 0);
    assert_eq!(platform.inventory_calls.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert!(path.is_file());
}

#[tokio::test]
async fn single_file_outside_a_backup_is_converted_next_to_itself() {
    let dir = tempdir().unwrap();
    let loose = dir.path().join("loose");
    let config = config_in(dir.path());
    let platform = replaced_router();
    let document = ViewDocument::new("Core Topology")
        .with_positions(serde_json::from_value(json!({ "SN123": {} })).unwrap());
    let path = write_view(
        &loose,
        &StagedView::new(Stage::Original, "Core Topology", document),
    )
    .unwrap();

    let selector = PresetSelector::unattended().with_file(Some(path));
    let report = Restorer::new(&config, &platform, &selector)
        .restore(Scope::Single, true)
        .await
        .unwrap();

    assert!(report.is_success());
    assert!(loose.join("Core Topology_HOSTNAME.json").is_file());
    assert!(loose.join("Core Topology_NEW_SN.json").is_file());
    assert_eq!(
        platform.created()[0].position_keys().collect::<Vec<_>>(),
        vec!["SN999"]
    );
}

#[tokio::test]
async fn nothing_to_restore_is_reported() {
    let dir = tempdir().unwrap();
    let config = config_in(&dir.path().join("never-created"));
    let platform = FakePlatform::default();
    let selector = PresetSelector::unattended();
    let restorer = Restorer::new(&config, &platform, &selector);

    assert!(matches!(
        restorer.restore(Scope::Single, true).await,
        Err(Error::NothingToRestore)
    ));
    assert!(matches!(
        restorer.restore(Scope::All, true).await,
        Err(Error::NothingToRestore)
    ));

    let empty = BackupFolder::new(dir.path().join("empty"), &config.storage);
    let config = config_in(dir.path());
    empty.create(Stage::Original).unwrap();
    let restorer = Restorer::new(&config, &platform, &selector);
    assert!(matches!(
        restorer.restore(Scope::All, true).await,
        Err(Error::NothingToRestore)
    ));
    assert!(platform.created().is_empty());
}

#[tokio::test]
async fn delete_all_continues_past_failures() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let mut platform = FakePlatform {
        views: vec![
            view("A", "1", json!({})),
            view("B", "2", json!({})),
            view("C", "3", json!({})),
            ViewDocument::new("No id"),
        ],
        ..FakePlatform::default()
    };
    platform.failing_deletes.insert("2".into());
    let selector = PresetSelector::default();

    let report = Restorer::new(&config, &platform, &selector)
        .delete_all(true)
        .await
        .unwrap();

    assert_eq!(platform.deleted(), vec!["1", "3"]);
    assert_eq!(report.succeeded, vec!["A", "C"]);
    let failed: Vec<_> = report.failures.iter().map(|f| f.item.as_str()).collect();
    assert_eq!(failed, vec!["B", "No id"]);
}

#[tokio::test]
async fn declined_deletion_deletes_nothing() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let platform = FakePlatform {
        views: vec![view("A", "1", json!({}))],
        ..FakePlatform::default()
    };
    let selector = PresetSelector::default();

    let result = Restorer::new(&config, &platform, &selector)
        .delete_all(false)
        .await;

    assert!(matches!(result, Err(Error::Declined)));
    assert!(platform.deleted().is_empty());
}
