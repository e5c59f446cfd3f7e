// src/storage/local.rs

//! Filesystem persistence for fetched problems.
//!
//! One file per problem, named `{id}.{slug}.json`, so whether an item was
//! already crawled is a plain filesystem lookup with no separate index of
//! written files. Writes go to a temp file first and are renamed into place,
//! so a crashed run never leaves a half-written file for the next run to trip
//! over.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{ProblemDetail, ProblemIndex};

/// Store rooted at the output directory.
#[derive(Debug, Clone)]
pub struct ProblemStore {
    root_dir: PathBuf,
}

impl ProblemStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Deterministic file name for a problem.
    pub fn file_name(id: u64, slug: &str) -> String {
        format!("{id}.{slug}.json")
    }

    /// Full path for a problem file.
    pub fn path(&self, id: u64, slug: &str) -> PathBuf {
        self.root_dir.join(Self::file_name(id, slug))
    }

    /// Whether the problem file is already on disk.
    pub fn exists(&self, id: u64, slug: &str) -> bool {
        self.path(id, slug).exists()
    }

    /// True iff the problem needs (re)fetching.
    pub fn should_fetch(&self, id: u64, slug: &str, update: bool) -> bool {
        update || !self.exists(id, slug)
    }

    /// Write a fetched problem. Either the whole serialized payload lands on
    /// disk or the prior file (if any) is left untouched.
    pub async fn write(&self, id: u64, slug: &str, detail: &ProblemDetail) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let path = self.path(id, slug);
        let bytes = serde_json::to_vec_pretty(detail)?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Read back a previously written problem file.
    pub async fn read(&self, id: u64, slug: &str) -> Result<ProblemDetail> {
        let bytes = tokio::fs::read(self.path(id, slug)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load a previously saved metadata snapshot instead of hitting the live
    /// listing endpoint.
    pub async fn load_index(path: impl AsRef<Path>) -> Result<ProblemIndex> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
