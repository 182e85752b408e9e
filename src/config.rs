use crate::alerts::{AgeThresholds, DEFAULT_AGE_CRIT_SECS, DEFAULT_AGE_WARN_SECS};
use crate::filter::Selection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Optional on-disk defaults. Command-line flags always win.
///
/// Example lvmcheck.toml:
/// ```toml
/// [lvm]
/// command = "/bin/sudo /sbin/lvm"
///
/// [snapshots]
/// age_warn_secs = 86400
/// age_crit_secs = 604800
///
/// [metrics]
/// scheme = "db01.vg_usage"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lvm: LvmConfig,

    #[serde(default)]
    pub snapshots: SnapshotConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LvmConfig {
    /// Command used instead of `lvm`, e.g. "/bin/sudo /sbin/lvm"
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Warn when a snapshot is older than this many seconds
    pub age_warn_secs: u64,
    /// Critical when a snapshot is older than this many seconds
    pub age_crit_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Metric name prefix. Unset = "<hostname>.vg_usage"
    #[serde(default)]
    pub scheme: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self { age_warn_secs: DEFAULT_AGE_WARN_SECS, age_crit_secs: DEFAULT_AGE_CRIT_SECS }
    }
}

// ── Resolved per-run settings ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SnapAgeSettings {
    pub selection:  Selection,
    pub thresholds: AgeThresholds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageSettings {
    pub scheme:       String,
    pub vg_selection: Selection,
    pub lv_selection: Selection,
}

// ── Load ─────────────────────────────────────────────────────────────

impl Config {
    /// Load from `explicit`, or from the default location if it exists.
    /// A missing default file means built-in defaults; a missing explicit
    /// file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None    => match Config::config_path() {
                Some(p) => p,
                None    => return Ok(Config::default()),
            },
        };

        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound && explicit.is_none() => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", path.display()));
            }
        };

        Config::load_from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn load_from_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lvmcheck").join("lvmcheck.toml"))
    }

    pub fn thresholds(&self) -> AgeThresholds {
        AgeThresholds {
            warn_secs: self.snapshots.age_warn_secs,
            crit_secs: self.snapshots.age_crit_secs,
        }
    }

    pub fn scheme(&self) -> String {
        self.metrics.scheme.clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_scheme)
    }
}

pub fn default_scheme() -> String {
    let host = nix::unistd::gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    format!("{}.vg_usage", host)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[lvm]
command = "/bin/sudo /sbin/lvm"

[snapshots]
age_warn_secs = 3600
age_crit_secs = 7200

[metrics]
scheme = "db01.vg_usage"
"#;

    #[test]
    fn loads_every_section() {
        let cfg = Config::load_from_str(FULL).unwrap();
        assert_eq!(cfg.lvm.command.as_deref(), Some("/bin/sudo /sbin/lvm"));
        assert_eq!(cfg.thresholds(), AgeThresholds { warn_secs: 3600, crit_secs: 7200 });
        assert_eq!(cfg.scheme(), "db01.vg_usage");
    }

    #[test]
    fn empty_file_means_defaults() {
        let cfg = Config::load_from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.thresholds(), AgeThresholds { warn_secs: 86_400, crit_secs: 604_800 });
        assert!(cfg.scheme().ends_with(".vg_usage"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = Config::load_from_str("[snapshots]\nage_warn_secs = 60\n").unwrap();
        assert_eq!(cfg.snapshots.age_warn_secs, 60);
        assert_eq!(cfg.snapshots.age_crit_secs, DEFAULT_AGE_CRIT_SECS);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::load_from_str("[snapshots]\nage_warn_secs = \"soon\"\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/lvmcheck.toml"))).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn blank_scheme_falls_back_to_hostname() {
        let cfg = Config::load_from_str("[metrics]\nscheme = \"\"\n").unwrap();
        assert_eq!(cfg.scheme(), default_scheme());
    }
}
