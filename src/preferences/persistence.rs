//! Profile persistence — YAML load/save/reset and the storage seam used by the store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::profile::PreferenceProfile;
use crate::error::StorageError;

/// Default path for the preference profile.
pub fn default_profile_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".prepwise");
    path.push("preferences.yaml");
    path
}

/// Load a profile from a YAML file. Returns a new profile if the file doesn't exist.
pub fn load_profile(path: &Path) -> Result<PreferenceProfile, StorageError> {
    if !path.exists() {
        return Ok(PreferenceProfile::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    let mut profile: PreferenceProfile =
        serde_yaml::from_str(&content).map_err(|e| StorageError::format(path, e))?;
    profile.normalize();
    Ok(profile)
}

/// Save a profile to a YAML file, creating parent directories as needed.
pub fn save_profile(path: &Path, profile: &PreferenceProfile) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let yaml = serde_yaml::to_string(profile).map_err(|e| StorageError::format(path, e))?;
    std::fs::write(path, yaml).map_err(|e| StorageError::io(path, e))
}

/// Reset the profile by removing the file and returning a fresh profile.
pub fn reset_profile(path: &Path) -> Result<PreferenceProfile, StorageError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| StorageError::io(path, e))?;
    }
    Ok(PreferenceProfile::new())
}

/// Where a [`PreferenceStore`](super::PreferenceStore) keeps its snapshots.
pub trait ProfileStorage: Send + Sync {
    /// The persisted profile, or an empty one when nothing has been saved.
    fn load(&self) -> Result<PreferenceProfile, StorageError>;

    fn save(&self, profile: &PreferenceProfile) -> Result<(), StorageError>;

    /// Forget the persisted profile.
    fn discard(&self) -> Result<(), StorageError>;
}

impl<T: ProfileStorage + ?Sized> ProfileStorage for Arc<T> {
    fn load(&self) -> Result<PreferenceProfile, StorageError> {
        (**self).load()
    }

    fn save(&self, profile: &PreferenceProfile) -> Result<(), StorageError> {
        (**self).save(profile)
    }

    fn discard(&self) -> Result<(), StorageError> {
        (**self).discard()
    }
}

/// YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlFileStorage {
    path: PathBuf,
}

impl YamlFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for YamlFileStorage {
    fn default() -> Self {
        Self::new(default_profile_path())
    }
}

impl ProfileStorage for YamlFileStorage {
    fn load(&self) -> Result<PreferenceProfile, StorageError> {
        load_profile(&self.path)
    }

    fn save(&self, profile: &PreferenceProfile) -> Result<(), StorageError> {
        save_profile(&self.path, profile)
    }

    fn discard(&self) -> Result<(), StorageError> {
        reset_profile(&self.path).map(|_| ())
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Option<PreferenceProfile>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `profile` already persisted.
    pub fn with_profile(profile: PreferenceProfile) -> Self {
        Self {
            saved: Mutex::new(Some(profile)),
        }
    }

    /// The last saved snapshot, if any.
    pub fn snapshot(&self) -> Option<PreferenceProfile> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProfileStorage for MemoryStorage {
    fn load(&self) -> Result<PreferenceProfile, StorageError> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, profile: &PreferenceProfile) -> Result<(), StorageError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(profile.clone());
        Ok(())
    }

    fn discard(&self) -> Result<(), StorageError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
