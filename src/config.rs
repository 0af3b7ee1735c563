use crate::store::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

/// Startup settings, read once from the environment.
///
/// - SLCD_WORKSPACE: workspace directory opened before the first request.
/// - SLCD_STORAGE_KEY: key the record is stored under.
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: Option<PathBuf>,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(ws) = lookup("SLCD_WORKSPACE").filter(|s| !s.trim().is_empty()) {
            cfg.workspace = Some(PathBuf::from(ws));
        }
        if let Some(key) = lookup("SLCD_STORAGE_KEY").filter(|s| !s.trim().is_empty()) {
            cfg.storage_key = key.trim().to_string();
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let cfg = Config::from_lookup(|_| None);
        assert!(cfg.workspace.is_none());
        assert_eq!(cfg.storage_key, "slc_state_v1");
    }

    #[test]
    fn blank_values_are_ignored() {
        let cfg = Config::from_lookup(|k| match k {
            "SLCD_WORKSPACE" => Some("/tmp/slc".to_string()),
            "SLCD_STORAGE_KEY" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.workspace, Some(PathBuf::from("/tmp/slc")));
        assert_eq!(cfg.storage_key, "slc_state_v1");
    }
}
