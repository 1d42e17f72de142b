//! Device identity for cloud sync.
//!
//! Remote rows are keyed by an opaque per-device id of the form
//! `ember-<uuid>`, minted once on first use and kept as a plain text file
//! in the data directory. There are no accounts; the id is the only
//! credential-shaped thing the sync layer knows about.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

const DEVICE_ID_FILE: &str = "device_id.txt";
const DEVICE_ID_PREFIX: &str = "ember-";

#[derive(Debug, Error)]
pub enum DeviceIdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid device id format: {0}")]
    InvalidFormat(String),
}

/// Opaque per-device identity, stable across launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accept an externally supplied id (tests and tooling). Rejects
    /// strings without the expected prefix.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DeviceIdError> {
        let raw = raw.into();
        if !raw.starts_with(DEVICE_ID_PREFIX) {
            return Err(DeviceIdError::InvalidFormat(raw));
        }
        Ok(Self(raw))
    }

    /// Read the stored id from `dir`, or mint and persist a fresh one.
    pub fn load_or_create(dir: &Path) -> Result<Self, DeviceIdError> {
        let path = dir.join(DEVICE_ID_FILE);
        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            return Self::parse(raw.trim());
        }

        fs::create_dir_all(dir)?;
        let id = format!("{DEVICE_ID_PREFIX}{}", Uuid::new_v4());
        fs::write(&path, format!("{id}\n"))?;
        Ok(Self(id))
    }

    /// Id under the default data directory.
    pub fn load_or_create_default() -> Result<Self, DeviceIdError> {
        let dir = crate::store::data_dir().map_err(std::io::Error::other)?;
        Self::load_or_create(&dir)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
