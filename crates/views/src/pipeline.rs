#![forbid(unsafe_code)]

use crate::domain::{Direction, Stage, StagedView};
use crate::error::Error;
use crate::mapper::IdentityMapper;
use crate::platform::ViewsPlatform;
use crate::rewrite::rewrite;
use config::UnmatchedPolicy;
use tracing::debug;

/// Moves views forward, Original -> Hostname -> NewSerial.
pub struct StagePipeline<'a> {
    mapper: IdentityMapper<'a>,
    policy: UnmatchedPolicy,
}

impl<'a> StagePipeline<'a> {
    pub fn new(platform: &'a dyn ViewsPlatform, policy: UnmatchedPolicy) -> Self {
        Self {
            mapper: IdentityMapper::new(platform),
            policy,
        }
    }

    /// The view one stage further, or `None` once it is [`Stage::NewSerial`].
    pub async fn advance(&mut self, view: &StagedView) -> Result<Option<StagedView>, Error> {
        let direction = match view.stage {
            Stage::Original => Direction::SerialToHostname,
            Stage::Hostname => Direction::HostnameToSerial,
            Stage::NewSerial => return Ok(None),
        };
        let mapping = self.mapper.mapping(direction).await?;
        let rewritten = rewrite(view, mapping, self.policy)?;
        debug!(
            view = %view.document.name,
            from = %view.stage,
            to = %rewritten.view.stage,
            unmatched = rewritten.unmatched.len(),
            "view advanced"
        );
        Ok(Some(rewritten.view))
    }

    /// Advance `view` until it reaches [`Stage::NewSerial`], handing every
    /// produced artifact to `persist` before going on.
    pub async fn drive<F>(
        &mut self,
        mut view: StagedView,
        mut persist: F,
    ) -> Result<StagedView, Error>
    where
        F: FnMut(&StagedView) -> Result<(), Error>,
    {
        while let Some(next) = self.advance(&view).await? {
            persist(&next)?;
            view = next;
        }
        Ok(view)
    }
}
