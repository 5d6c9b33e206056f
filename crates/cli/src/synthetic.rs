//! Synthetic decoder for simulations
//!
//! Source sizes are derived from the item key so a run is reproducible; the
//! only randomness is the seeded failure draw.

use std::time::Duration;

use async_trait::async_trait;
use lumen_core::{DecodedImage, Error, Result, TargetSize};
use lumen_prefetch::{Decoder, LoadStrategy};
use parking_lot::Mutex;

/// Source sizes cycle through this many megabyte steps
const SIZE_CYCLE: u64 = 24;

pub struct SyntheticDecoder {
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<fastrand::Rng>,
}

impl SyntheticDecoder {
    pub fn new(latency: Duration, failure_rate: f64, seed: u64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

/// Trailing number of a key such as `item-0042`
fn item_number(key: &str) -> u64 {
    key.rsplit(|c: char| !c.is_ascii_digit())
        .next()
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Encoded size of an item; spans every strategy band
pub fn source_size_mb(key: &str) -> f64 {
    (item_number(key) * 7 % SIZE_CYCLE) as f64 + 0.5
}

/// Native resolution of an item, 4:3
pub fn native_size(key: &str) -> TargetSize {
    let width = 640 + (item_number(key) % 8) as u32 * 320;
    TargetSize::new(width, width * 3 / 4)
}

#[async_trait]
impl Decoder for SyntheticDecoder {
    async fn decode(
        &self,
        path: &str,
        target: Option<TargetSize>,
        strategy: LoadStrategy,
    ) -> Result<DecodedImage> {
        tokio::time::sleep(self.latency).await;

        if self.rng.lock().f64() < self.failure_rate {
            return Err(Error::decode(path, strategy.as_str(), "synthetic failure"));
        }

        let native = native_size(path);
        let size = match target {
            Some(target) => TargetSize::new(
                target.width.min(native.width),
                target.height.min(native.height),
            ),
            None => native,
        };
        let len = size.width as usize * size.height as usize * 4;
        Ok(DecodedImage::new(size.width, size.height, vec![0u8; len]))
    }

    async fn source_size_mb(&self, path: &str) -> Result<f64> {
        Ok(source_size_mb(path))
    }
}
