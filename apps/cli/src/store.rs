//! JSON snapshot of every portfolio, loaded at startup and written back after
//! each command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use stockfolio_core::portfolio::{InMemoryPortfolioRepository, Portfolio};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    version: u32,
    portfolios: Vec<Portfolio>,
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot into a repository. A missing file is an empty store.
    pub fn load(&self) -> anyhow::Result<InMemoryPortfolioRepository> {
        if !self.path.exists() {
            tracing::debug!("No snapshot at {}, starting empty", self.path.display());
            return Ok(InMemoryPortfolioRepository::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        if snapshot.version > SNAPSHOT_VERSION {
            anyhow::bail!(
                "{} was written by a newer version (snapshot v{})",
                self.path.display(),
                snapshot.version
            );
        }

        tracing::debug!(
            "Loaded {} portfolios from {}",
            snapshot.portfolios.len(),
            self.path.display()
        );
        Ok(InMemoryPortfolioRepository::from_portfolios(
            snapshot.portfolios,
        ))
    }

    /// Writes the repository out, replacing the previous snapshot atomically.
    pub fn save(&self, repository: &InMemoryPortfolioRepository) -> anyhow::Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            portfolios: repository.snapshot()?,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
