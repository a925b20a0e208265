//! Proxy pool
//!
//! Holds the proxy endpoints workers are bound to. The list is replaced as a
//! whole on every upload and persisted so it survives restarts; reads always
//! hand out copies.

use drover_core::domain::proxy::ProxyHandle;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};

/// Read-mostly pool of proxy endpoints
pub struct ProxyPool {
    proxies: RwLock<Vec<String>>,
    storage: PathBuf,
}

impl ProxyPool {
    /// Creates an empty pool persisted at `storage`
    ///
    /// Nothing is read from disk until the first [`ProxyPool::list`].
    pub fn new(storage: impl Into<PathBuf>) -> Self {
        Self {
            proxies: RwLock::new(Vec::new()),
            storage: storage.into(),
        }
    }

    /// Replaces the pool with the entries of `raw` and persists them
    ///
    /// Entries are newline delimited; blank lines and `#` comments are ignored.
    pub fn load(&self, raw: &str) -> Result<usize> {
        let entries = parse_entries(raw);
        if entries.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        if let Some(parent) = self.storage.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.storage, entries.join("\n"))?;

        let count = entries.len();
        *self.write_lock() = entries;

        info!("Loaded {} proxies", count);
        Ok(count)
    }

    /// Returns a snapshot of the pool in load order
    ///
    /// An empty pool is lazily refilled from storage when a persisted list exists.
    pub fn list(&self) -> Vec<ProxyHandle> {
        self.reload_if_empty();

        self.read_lock()
            .iter()
            .enumerate()
            .map(|(slot, endpoint)| ProxyHandle {
                slot,
                endpoint: endpoint.clone(),
            })
            .collect()
    }

    /// Deterministically assigns the proxy for `slot` (`slot mod count`)
    pub fn assign(&self, slot: usize) -> Result<ProxyHandle> {
        self.reload_if_empty();

        let proxies = self.read_lock();
        if proxies.is_empty() {
            return Err(EngineError::NoProxies);
        }

        let index = slot % proxies.len();
        Ok(ProxyHandle {
            slot: index,
            endpoint: proxies[index].clone(),
        })
    }

    /// Picks any proxy at random
    pub fn random(&self) -> Result<ProxyHandle> {
        let proxies = self.list();
        proxies
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(EngineError::NoProxies)
    }

    /// Number of proxies currently available
    pub fn len(&self) -> usize {
        self.reload_if_empty();
        self.read_lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reload_if_empty(&self) {
        if !self.read_lock().is_empty() || !self.storage.exists() {
            return;
        }

        match std::fs::read_to_string(&self.storage) {
            Ok(content) => {
                let entries = parse_entries(&content);
                debug!(
                    "Reloaded {} proxies from {}",
                    entries.len(),
                    self.storage.display()
                );
                let mut proxies = self.write_lock();
                if proxies.is_empty() {
                    *proxies = entries;
                }
            }
            Err(e) => warn!(
                "Failed to reload proxies from {}: {}",
                self.storage.display(),
                e
            ),
        }
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, Vec<String>> {
        self.proxies.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.proxies.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_entries(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
