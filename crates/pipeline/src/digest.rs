// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use md5::{Digest, Md5};
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const CHUNK: usize = 64 * 1024;

/// MD5 of a constraint file as lowercase hex, identical to what `md5sum` prints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub async fn of_file(path: &Path) -> std::io::Result<Self> {
        let mut file = File::open(path).await?;
        let mut hasher = Md5::new();
        let mut buf = vec![0u8; CHUNK];
        loop {
            let read = file.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }
        Ok(Self::from_digest(hasher.finalize().into()))
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self::from_digest(Md5::digest(bytes).into())
    }

    pub fn from_digest(digest: [u8; 16]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            CacheKey::of_bytes(b"").as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            CacheKey::of_bytes(b"The quick brown fox jumps over the lazy dog").as_str(),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }

    #[tokio::test]
    async fn test_file_digest_matches_bytes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("main.r1cs");
        // spans several read chunks
        let content: Vec<u8> = (0..(CHUNK * 3 + 17)).map(|i| (i % 251) as u8).collect();
        tokio::fs::write(&path, &content).await.unwrap();

        let key = CacheKey::of_file(&path).await.unwrap();
        assert_eq!(key, CacheKey::of_bytes(&content));
        assert_eq!(key.as_str().len(), 32);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp = tempdir().unwrap();
        assert!(CacheKey::of_file(&temp.path().join("nope.r1cs")).await.is_err());
    }
}
