//! Runtime configuration read from the environment. CLI flags override these.
//!
//! | Variable                 | Meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `CHART_STUDIO_BASE_URL`  | API host (default `https://build.avax.network`) |
//! | `CHART_STUDIO_TEMPLATES` | template list file                        |
//! | `CHART_STUDIO_FONT`      | TTF used for chart text                   |
//! | `CHART_STUDIO_OUT_DIR`   | directory for exported files              |

use crate::api::DEFAULT_BASE_URL;
use crate::templates::JsonFileRepository;
use std::env;
use std::path::PathBuf;

pub const ENV_BASE_URL: &str = "CHART_STUDIO_BASE_URL";
pub const ENV_TEMPLATES: &str = "CHART_STUDIO_TEMPLATES";
pub const ENV_FONT: &str = "CHART_STUDIO_FONT";
pub const ENV_OUT_DIR: &str = "CHART_STUDIO_OUT_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    pub base_url: String,
    pub templates_path: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub out_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            templates_path: JsonFileRepository::default_path(),
            font_path: None,
            out_dir: PathBuf::from("."),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl StudioConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty)
    }

    /// Build from an arbitrary lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            cfg.base_url = url;
        }
        if let Some(p) = lookup(ENV_TEMPLATES) {
            cfg.templates_path = Some(PathBuf::from(p));
        }
        cfg.font_path = lookup(ENV_FONT).map(PathBuf::from);
        if let Some(p) = lookup(ENV_OUT_DIR) {
            cfg.out_dir = PathBuf::from(p);
        }
        cfg
    }

    /// Template repository at the configured path, or the working directory as a last resort.
    pub fn template_repository(&self) -> JsonFileRepository {
        let path = self.templates_path.clone().unwrap_or_else(|| {
            log::warn!("no data directory found; keeping templates in the working directory");
            PathBuf::from(format!("{}.json", crate::templates::TEMPLATE_STORAGE_KEY))
        });
        JsonFileRepository::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let cfg = StudioConfig::from_lookup(|k| match k {
            ENV_BASE_URL => Some("http://localhost:3000".into()),
            ENV_OUT_DIR => Some("/tmp/out".into()),
            _ => None,
        });
        assert_eq!(cfg.base_url, "http://localhost:3000");
        assert_eq!(cfg.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.font_path, None);
    }
}
