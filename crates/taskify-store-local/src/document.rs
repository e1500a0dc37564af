//! The on-disk shape of a local store: one JSON document holding every task.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskify_core::task::Task;

use crate::{Error, Result};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub version: u32,
  /// Every owner's tasks, in insertion order.
  pub tasks:   Vec<Task>,
}

impl Default for Document {
  fn default() -> Self {
    Self {
      version: FORMAT_VERSION,
      tasks:   Vec::new(),
    }
  }
}

impl Document {
  /// Read the document at `path`; a missing file is an empty document.
  pub async fn load(path: &Path) -> Result<Self> {
    match tokio::fs::read(path).await {
      Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
      Err(source) => Err(io(path, source)),
    }
  }

  /// Replace the document at `path` atomically (write a sibling, then rename).
  pub async fn save(&self, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(self)?;
    let staging = staging_path(path);
    tokio::fs::write(&staging, bytes)
      .await
      .map_err(|e| io(&staging, e))?;
    tokio::fs::rename(&staging, path)
      .await
      .map_err(|e| io(path, e))
  }
}

fn staging_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}

fn io(path: &Path, source: std::io::Error) -> Error {
  Error::Io {
    path: path.to_path_buf(),
    source,
  }
}
