use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use crate::reveal::RevealSchedule;

/// Cadence of the scan progress simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub tick_interval_ms: u64,
    pub progress_step: u8,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            progress_step: 20,
        }
    }
}

impl ScanSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.progress_step == 0 || self.progress_step > 100 {
            bail!(
                "progress_step must be within 1..=100, got {}",
                self.progress_step
            );
        }
        Ok(())
    }
}

/// Offsets of the staggered result sections, relative to the start of REVEALING.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub base_delay_ms: u64,
    pub stagger_ms: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            stagger_ms: 200,
        }
    }
}

impl RevealSettings {
    pub fn schedule(&self) -> RevealSchedule {
        RevealSchedule::staggered(
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.stagger_ms),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub scan: ScanSettings,
    pub reveal: RevealSettings,
}

impl UserSettings {
    pub fn validate(&self) -> Result<()> {
        self.scan.validate()
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring malformed settings in {}: {}",
                    path.display(),
                    err
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> UserSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_scan(&self, settings: ScanSettings) -> Result<()> {
        settings.validate()?;
        self.update(|data| data.scan = settings)
    }

    pub fn update_reveal(&self, settings: RevealSettings) -> Result<()> {
        self.update(|data| data.reveal = settings)
    }

    fn update(&self, apply: impl FnOnce(&mut UserSettings)) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        apply(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        let settings = store.current();
        assert_eq!(settings.scan.tick_interval_ms, 500);
        assert_eq!(settings.scan.progress_step, 20);
        assert_eq!(settings.reveal.base_delay_ms, 100);
        assert_eq!(settings.reveal.stagger_ms, 200);
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        store
            .update_scan(ScanSettings {
                tick_interval_ms: 250,
                progress_step: 25,
            })
            .unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.current().scan.tick_interval_ms, 250);
        assert_eq!(reloaded.current().scan.progress_step, 25);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "scan": { "progress_step": 10 } }"#).unwrap();

        let store = SettingsStore::new(path).unwrap();
        let settings = store.current();
        assert_eq!(settings.scan.progress_step, 10);
        assert_eq!(settings.scan.tick_interval_ms, 500);
        assert_eq!(settings.reveal, RevealSettings::default());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.current(), UserSettings::default());
    }

    #[test]
    fn test_rejects_invalid_scan_settings() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        assert!(store
            .update_scan(ScanSettings {
                tick_interval_ms: 0,
                progress_step: 20,
            })
            .is_err());
        assert!(store
            .update_scan(ScanSettings {
                tick_interval_ms: 500,
                progress_step: 0,
            })
            .is_err());
        assert_eq!(store.current().scan, ScanSettings::default());
    }
}
