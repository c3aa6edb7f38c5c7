use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::models::Anken;
use crate::services::sheet::{SheetClient, SheetError};

const SHEET_KEY: &str = "anken_sheet";

/// Cached listing store in front of the sheet client.
///
/// Holds a single snapshot with a fixed TTL. `try_get_with` coalesces
/// concurrent refreshes into one in-flight fetch; readers of a still
/// valid snapshot are never blocked by it.
pub struct AnkenStore {
    sheet: Arc<SheetClient>,
    cache: Cache<&'static str, Arc<Vec<Anken>>>,
}

impl AnkenStore {
    pub fn new(sheet: Arc<SheetClient>, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { sheet, cache }
    }

    /// Current listing snapshot, refetching on cache miss or expiry
    pub async fn get(&self) -> Result<Arc<Vec<Anken>>, SheetError> {
        self.cache
            .try_get_with(SHEET_KEY, async {
                let ankens = self.sheet.fetch_anken().await?;
                info!(count = ankens.len(), "listing sheet refreshed");
                Ok(Arc::new(ankens))
            })
            .await
            .map_err(|e: Arc<SheetError>| (*e).clone())
    }

    /// Drop the cached snapshot so the next `get` refetches
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
        info!("listing cache cleared");
    }
}
