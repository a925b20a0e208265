//! Proxy DTOs

use serde::{Deserialize, Serialize};

use crate::domain::proxy::ProxyHandle;

/// Response to a proxy list upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProxiesResponse {
    pub count: usize,
}

/// Current proxy pool contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyList {
    pub proxies: Vec<ProxyHandle>,
}
