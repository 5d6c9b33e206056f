use lumen_cache::CacheStats;
use lumen_prefetch::PrefetchStats;
use serde::{Deserialize, Serialize};

/// Combined statistics of a viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerStats {
    pub cache: CacheStats,
    pub prefetch: PrefetchStats,
    /// Index of the current item
    pub position: usize,
    pub item_count: usize,
}
