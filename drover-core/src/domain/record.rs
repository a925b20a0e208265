//! Record domain type

use serde::{Deserialize, Serialize};

/// One input unit of a batch: an identifier plus opaque credential material.
///
/// Records are immutable once loaded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub identifier: String,
    pub secret: String,
}

impl Record {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

// Secrets never reach logs through `{:?}`.
impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
