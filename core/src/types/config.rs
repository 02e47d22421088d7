use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};


/// How imported documents are checked against the tree invariants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Reject duplicate ids; strip unknown, unavailable and orphaned track references.
    #[default]
    Repair,
    /// Accept the document as-is.
    Trust,
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Name of the root node in a fresh session. Default: "Root".
    #[serde(default = "default_root_name")]
    pub root_name: String,
    #[serde(default)]
    pub import_policy: ImportPolicy,
    /// Pretty-print exported JSON. Default: true.
    #[serde(default = "default_pretty_export")]
    pub pretty_export: bool,
    /// Emit regenerated `x`/`y`/`width`/`height` on exported nodes. Default: false.
    #[serde(default)]
    pub export_layout: bool,
}

fn default_root_name() -> String {
    "Root".into()
}

fn default_pretty_export() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root_name: default_root_name(),
            import_policy: ImportPolicy::default(),
            pretty_export: default_pretty_export(),
            export_layout: false,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Absent keys take their defaults.
    pub fn from_yaml(input: &str) -> Result<Settings> {
        if input.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    /// Load settings from a file. A missing file yields the defaults; any
    /// other read failure is an error.
    pub fn from_file(path: &Path) -> Result<Settings> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(source) => Err(TreeError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let s = Settings::from_yaml("import_policy: trust\nexport_layout: true\n").unwrap();
        assert_eq!(s.import_policy, ImportPolicy::Trust);
        assert!(s.export_layout);
        assert!(s.pretty_export);
        assert_eq!(s.root_name, "Root");
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = Settings::from_yaml("import_policy: [nope").unwrap_err();
        assert!(matches!(err, TreeError::Config(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let s = Settings::from_file(Path::new("/nonexistent/tracktree/config.yaml")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn unreadable_config_is_an_error() {
        // A directory exists but cannot be read as a file.
        let dir = std::env::temp_dir();
        let err = Settings::from_file(&dir).unwrap_err();
        assert!(matches!(err, TreeError::ConfigRead { ref path, .. } if path == &dir));
    }
}
