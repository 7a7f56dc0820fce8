//! Durable device settings.
//!
//! The registration layer keeps a handful of values across process restarts:
//! the push token it registered with, the platform variant it belongs to,
//! the identity the server assigned back, the tag subscriptions, and the
//! last-modified watermark of the most recent geofence sync. The
//! reconciliation engine never reads these; they are the registration
//! layer's persistence surface, kept next to the geofence snapshot because
//! both share the same install lifetime.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::atomic::write_atomic;

/// Everything the registration layer persists, as one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Push token from the platform notification service.
    pub device_token: Option<String>,
    /// Platform variant this installation registers against.
    pub variant_uuid: Option<Uuid>,
    pub variant_secret: Option<String>,
    /// Human-chosen alias sent at registration.
    pub device_alias: Option<String>,
    /// Identity assigned by the server on successful registration.
    pub server_device_id: Option<String>,
    /// Currently subscribed tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// `last_modified` watermark from the most recent geofence response,
    /// echoed back on the next delta fetch.
    pub geofences_last_modified: Option<i64>,
}

impl DeviceSettings {
    /// Forget everything. Equivalent to a fresh install.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// File-backed home for [`DeviceSettings`], same atomic-write discipline as
/// the geofence snapshot store.
#[derive(Clone, Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings document; a missing file yields defaults.
    pub fn load(&self) -> Result<DeviceSettings> {
        if !self.path.exists() {
            return Ok(DeviceSettings::default());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("read device settings {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parse device settings {}", self.path.display()))
    }

    pub fn save(&self, settings: &DeviceSettings) -> Result<()> {
        let json = serde_json::to_vec(settings).context("serialize device settings")?;
        write_atomic(&self.path, &json)
            .with_context(|| format!("save device settings {}", self.path.display()))?;
        debug!(path = %self.path.display(), "saved device settings");
        Ok(())
    }

    /// Remove the settings file entirely. The next `load` sees defaults.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove device settings {}", self.path.display()))?;
        }
        Ok(())
    }
}
