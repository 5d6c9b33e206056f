//! Process-wide default cache registry

use lumen_cache::CacheRegistry;
use lumen_config::CacheConfig;
use lumen_core::DecodedImage;
use once_cell::sync::Lazy;

static DEFAULT_REGISTRY: Lazy<CacheRegistry<DecodedImage>> =
    Lazy::new(|| CacheRegistry::new(CacheConfig::default()));

/// Registry shared by viewers that opt into it with
/// [`ViewerBuilder::registry`](crate::ViewerBuilder::registry)
///
/// The cache inside is built with default settings on first use.
pub fn default_registry() -> &'static CacheRegistry<DecodedImage> {
    &DEFAULT_REGISTRY
}
