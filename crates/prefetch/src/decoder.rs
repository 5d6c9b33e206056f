//! Decode collaborator interface

use crate::strategy::LoadStrategy;
use async_trait::async_trait;
use lumen_core::{DecodedImage, Error, Result, TargetSize, BYTES_PER_MB};

/// Turns an item path into pixels
///
/// Implementations may fail or return partial images; they must not mutate
/// caller state on failure. Timeouts are the implementation's concern.
#[async_trait]
pub trait Decoder: Send + Sync {
    /// Decode `path`, optionally bounded by `target`
    async fn decode(
        &self,
        path: &str,
        target: Option<TargetSize>,
        strategy: LoadStrategy,
    ) -> Result<DecodedImage>;

    /// Size of the encoded source in megabytes
    ///
    /// Defaults to the file size on disk.
    async fn source_size_mb(&self, path: &str) -> Result<f64> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io(path, "read metadata", e))?;
        Ok(metadata.len() as f64 / BYTES_PER_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct SolidDecoder;

    #[async_trait]
    impl Decoder for SolidDecoder {
        async fn decode(
            &self,
            _path: &str,
            target: Option<TargetSize>,
            _strategy: LoadStrategy,
        ) -> Result<DecodedImage> {
            let size = target.unwrap_or(TargetSize::new(4, 4));
            let len = (size.width * size.height * 4) as usize;
            Ok(DecodedImage::new(size.width, size.height, vec![0u8; len]))
        }
    }

    #[tokio::test]
    async fn default_size_probe_reads_file_metadata() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![7u8; 512 * 1024]).unwrap();
        file.flush().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let size = SolidDecoder.source_size_mb(&path).await.unwrap();
        assert!((size - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = SolidDecoder
            .source_size_mb("/definitely/not/here.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
