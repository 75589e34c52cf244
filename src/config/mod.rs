// Persisted platform profiles
use crate::error::{CliError, Result};
use crate::models::Profile;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name used when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "camunda_cli_config.json";

/// Ordered collection of profiles; insertion order is display order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<Profile>,
}

// Older files store an empty profile list as `null`
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Profile>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Profile>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.platforms.get(index)
    }

    pub fn push(&mut self, profile: Profile) {
        self.platforms.push(profile);
    }

    /// Overwrite the profile at `index`. Returns false when out of range.
    pub fn replace(&mut self, index: usize, profile: Profile) -> bool {
        match self.platforms.get_mut(index) {
            Some(slot) => {
                *slot = profile;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Profile> {
        if index < self.platforms.len() {
            Some(self.platforms.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.platforms.iter()
    }
}

/// JSON file backing the document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file is an empty document; an unreadable
    /// or malformed file is an error.
    pub fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            tracing::debug!(
                "Config file not found at {}, starting empty",
                self.path.display()
            );
            return Ok(Document::default());
        }

        tracing::debug!("Loading config from: {}", self.path.display());
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| CliError::Config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| CliError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Write the document, replacing the file via a temporary sibling
    pub fn save(&self, document: &Document) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    CliError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let tmp_path = self.tmp_path();
        write_private(&tmp_path, json.as_bytes())
            .map_err(|e| CliError::Config(format!("Failed to write config file: {}", e)))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CliError::Config(format!("Failed to replace config file: {}", e))
        })?;

        tracing::info!(
            "Saved {} profile(s) to: {}",
            document.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // A leftover temp file keeps its old mode on open
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            client_id: format!("{}-id", name),
            client_secret: format!("{}-secret", name),
            oauth_url: "https://login.example/oauth/token".to_string(),
            base_url: "https://api.example/cloud".to_string(),
            audience: "api.example".to_string(),
        }
    }

    fn store(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join(CONFIG_FILE_NAME))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "{ not json").unwrap();
        match store.load() {
            Err(CliError::Config(message)) => {
                assert!(message.starts_with("Failed to parse config file"))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_null_platforms_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), r#"{"platforms": null}"#).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut doc = Document::default();
        for name in ["zeta", "alpha", "mid"] {
            doc.push(profile(name));
        }
        store.save(&doc).unwrap();
        assert_eq!(store.load().unwrap(), doc);

        doc.remove(1);
        doc.replace(0, profile("zeta2"));
        store.save(&doc).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, doc);
        let names: Vec<_> = loaded.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["zeta2", "mid"]);
    }

    #[test]
    fn test_saved_json_shape() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut doc = Document::default();
        doc.push(profile("dev"));
        store.save(&doc).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let first = &value["platforms"][0];
        assert_eq!(first["name"], "dev");
        assert_eq!(first["client_id"], "dev-id");
        assert_eq!(first["client_secret"], "dev-secret");
        assert_eq!(first["oauth_url"], "https://login.example/oauth/token");
        assert_eq!(first["base_url"], "https://api.example/cloud");
        assert_eq!(first["audience"], "api.example");
        assert!(!dir.path().join(format!("{}.tmp", CONFIG_FILE_NAME)).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&Document::default()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_remove_shifts_following_profiles() {
        let mut doc = Document::default();
        for name in ["a", "b", "c", "d"] {
            doc.push(profile(name));
        }
        let removed = doc.remove(1).unwrap();
        assert_eq!(removed.name, "b");
        let names: Vec<_> = doc.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "c", "d"]);
        assert!(doc.remove(3).is_none());
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut doc = Document::default();
        assert!(!doc.replace(0, profile("x")));
        assert!(doc.is_empty());
    }
}
