use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// The trained model exported next to the similarity matrix.
///
/// Recommendations are served from the precomputed matrix, so the model is
/// never run; it is only checked to exist and fingerprinted so operators can
/// tell which training run produced the deployed artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    pub path: PathBuf,
    pub size: u64,
    /// Lower-case hex SHA-256 of the file contents
    pub sha256: String,
}

impl ModelArtifact {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).with_context(|| format!("failed to open {path:?}"))?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        let mut size = 0u64;
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            size += n as u64;
        }

        Ok(Self {
            path,
            size,
            sha256: format!("{:x}", hasher.finalize()),
        })
    }

    /// First 12 hex digits of the digest, for log lines
    pub fn short_digest(&self) -> &str {
        &self.sha256[..self.sha256.len().min(12)]
    }
}
