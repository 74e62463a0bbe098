use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::session::{Language, QuizConfig, QUESTION_COUNT_CHOICES};

/// Preferences remembered between runs: the last quiz set up on the home
/// screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "StoredConfig")]
pub struct Config {
    pub source_language: Language,
    pub target_language: Language,
    pub question_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: Language::En,
            target_language: Language::Fr,
            question_count: QUESTION_COUNT_CHOICES[0],
        }
    }
}

/// On-disk form; any field may be missing.
#[derive(Deserialize)]
struct StoredConfig {
    source_language: Option<Language>,
    target_language: Option<Language>,
    question_count: Option<usize>,
}

impl From<StoredConfig> for Config {
    fn from(stored: StoredConfig) -> Self {
        let defaults = Config::default();
        let source_language = stored.source_language.unwrap_or(defaults.source_language);
        Self {
            source_language,
            target_language: stored
                .target_language
                .unwrap_or_else(|| source_language.other()),
            question_count: stored.question_count.unwrap_or(defaults.question_count),
        }
    }
}

impl From<&Config> for QuizConfig {
    fn from(cfg: &Config) -> Self {
        QuizConfig::new(cfg.source_language, cfg.target_language, cfg.question_count)
    }
}

impl From<&QuizConfig> for Config {
    fn from(qc: &QuizConfig) -> Self {
        Self {
            source_language: qc.source_language,
            target_language: qc.target_language,
            question_count: qc.question_count,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) if cfg.question_count > 0 => return cfg,
                Ok(_) => debug!(path = %self.path.display(), "ignoring config with no questions"),
                Err(e) => debug!(path = %self.path.display(), error = %e, "ignoring unreadable config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            source_language: Language::Fr,
            target_language: Language::En,
            question_count: 10,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_or_broken_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"[1, 2").unwrap();
        assert_eq!(store.load(), Config::default());

        fs::write(&path, br#"{"question_count": 0}"#).unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"source_language": "FR"}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.source_language, Language::Fr);
        assert_eq!(cfg.target_language, Language::En);
        assert_eq!(cfg.question_count, 5);

        fs::write(&path, br#"{"question_count": 10}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.source_language, Language::En);
        assert_eq!(cfg.target_language, Language::Fr);
        assert_eq!(cfg.question_count, 10);
    }

    #[test]
    fn explicit_target_is_kept() {
        let cfg: Config =
            serde_json::from_str(r#"{"source_language": "FR", "target_language": "FR"}"#).unwrap();
        assert_eq!(cfg.target_language, Language::Fr);
    }

    #[test]
    fn converts_to_quiz_config() {
        let cfg = Config {
            source_language: Language::Fr,
            target_language: Language::En,
            question_count: 10,
        };
        let qc = QuizConfig::from(&cfg);
        assert_eq!(qc.question_count, 10);
        assert_eq!(Config::from(&qc), cfg);
    }
}
