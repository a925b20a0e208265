//! Proxy pool endpoints

use crate::DroverClient;
use crate::error::Result;
use drover_core::domain::proxy::ProxyHandle;
use drover_core::dto::proxy::{LoadProxiesResponse, ProxyList};

impl DroverClient {
    /// Replace the server's proxy pool
    ///
    /// # Arguments
    /// * `raw` - Newline-separated proxy endpoints
    ///
    /// # Returns
    /// Number of proxies now in the pool
    pub async fn load_proxies(&self, raw: String) -> Result<usize> {
        let url = format!("{}/proxies", self.base_url);
        let response = self.client.post(&url).body(raw).send().await?;

        let loaded: LoadProxiesResponse = self.handle_response(response).await?;
        Ok(loaded.count)
    }

    /// List the proxies currently in the pool
    pub async fn list_proxies(&self) -> Result<Vec<ProxyHandle>> {
        let url = format!("{}/proxies", self.base_url);
        let response = self.client.get(&url).send().await?;

        let list: ProxyList = self.handle_response(response).await?;
        Ok(list.proxies)
    }
}
