//! Versioned snapshot of the running life.
use serde::{Deserialize, Serialize};

use crate::session::LifeSession;

/// Bumped whenever the session layout changes incompatibly.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub(crate) struct SaveDocumentRef<'a> {
    pub version: u32,
    pub session: &'a LifeSession,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveDocument {
    pub version: u32,
    pub session: LifeSession,
}

impl<'a> SaveDocumentRef<'a> {
    pub(crate) const fn new(session: &'a LifeSession) -> Self {
        Self {
            version: SAVE_VERSION,
            session,
        }
    }
}

impl SaveDocument {
    /// The session, if the document was written by this save version.
    pub(crate) fn into_current(self) -> Option<LifeSession> {
        if self.version == SAVE_VERSION {
            Some(self.session)
        } else {
            log::warn!(
                "ignoring save written by version {} (expected {SAVE_VERSION})",
                self.version
            );
            None
        }
    }
}
