//! Proxy domain type

use serde::{Deserialize, Serialize};

/// A proxy endpoint together with its stable slot index in the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyHandle {
    pub slot: usize,
    pub endpoint: String,
}

impl std::fmt::Display for ProxyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint)
    }
}
