//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <path>` or `$XDG_CONFIG_HOME/gofpat/gofpat.toml`
//! 3. Environment variables: `GOFPAT_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{IconCatalog, IconSize, ImageSession};

/// Icon dimensions as written in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconSizeSetting {
    pub width: i32,
    pub height: i32,
}

impl From<IconSizeSetting> for IconSize {
    fn from(s: IconSizeSetting) -> Self {
        IconSize {
            width: s.width,
            height: s.height,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub image_first_id: Option<u64>,
    pub gallery_size: Option<usize>,
    pub dialog_x_increment: Option<i32>,
    pub icons: BTreeMap<String, IconSizeSetting>,
}

/// Unified configuration for gofpat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// First id handed out by an image session (default: 1)
    pub image_first_id: u64,
    /// Number of proxies the gallery scenario creates (default: 1)
    pub gallery_size: usize,
    /// Horizontal spacing for custom dialogs (default: 100)
    pub dialog_x_increment: i32,
    /// Icon dimensions layered over the built-in catalog
    pub icons: BTreeMap<String, IconSizeSetting>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_first_id: 1,
            gallery_size: 1,
            dialog_x_increment: 100,
            icons: BTreeMap::new(),
        }
    }
}

/// Get the XDG config directory for gofpat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gofpat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("gofpat.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_path` - Explicit config file; must exist when given.
    ///   Without it the global config is used if present.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_path, None)
    }

    /// Same as [`Settings::load`], but reads `GOFPAT_*` overrides from `env`
    /// instead of the process environment when `env` is `Some`.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_path {
            Some(path) => {
                let path = expand_path(path);
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(&path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current, env)?;
        current.validate()?;
        Ok(current)
    }

    /// Merge overlay config onto self.
    ///
    /// - Scalars: overlay wins if Some
    /// - Icons: same name replaces, new name adds
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut icons = self.icons.clone();
        icons.extend(overlay.icons.iter().map(|(k, v)| (k.clone(), *v)));
        Self {
            image_first_id: overlay.image_first_id.unwrap_or(self.image_first_id),
            gallery_size: overlay.gallery_size.unwrap_or(self.gallery_size),
            dialog_x_increment: overlay
                .dialog_x_increment
                .unwrap_or(self.dialog_x_increment),
            icons,
        }
    }

    /// Apply GOFPAT_* environment variables as explicit overrides.
    ///
    /// `source` replaces the process environment; tests use it to stay hermetic.
    fn apply_env_overrides(
        mut settings: Self,
        source: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("GOFPAT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(source),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<u64>("image_first_id") {
            settings.image_first_id = val;
        }
        if let Ok(val) = config.get::<usize>("gallery_size") {
            settings.gallery_size = val;
        }
        if let Ok(val) = config.get::<i32>("dialog_x_increment") {
            settings.dialog_x_increment = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.image_first_id == 0 {
            return Err(ApplicationError::Config {
                message: "image_first_id must be at least 1".to_string(),
            });
        }
        if let Some((name, _)) = self
            .icons
            .iter()
            .find(|(_, s)| s.width < 0 || s.height < 0)
        {
            return Err(ApplicationError::Config {
                message: format!("icon '{}' has negative dimensions", name),
            });
        }
        Ok(())
    }

    /// Built-in icon catalog with the configured entries layered on top.
    pub fn icon_catalog(&self) -> IconCatalog {
        IconCatalog::default().merge(
            self.icons
                .iter()
                .map(|(name, size)| (name.as_str(), IconSize::from(*size))),
        )
    }

    /// Fresh image session honouring `image_first_id`.
    pub fn image_session(&self) -> ImageSession {
        ImageSession::starting_at(self.image_first_id)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# gofpat configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/gofpat/gofpat.toml  (or --config <path>)
#   Env:  GOFPAT_* environment variables (explicit overrides)

# First id handed out to image proxies
# image_first_id = 1

# Number of proxies created by `gofpat proxy`
# gallery_size = 1

# Horizontal spacing of icons in `gofpat flyweight <KEYS>...`
# dialog_x_increment = 100

# Icon dimensions, merged over the built-in go/stop/select/undo table.
# Unknown icons without an entry are 0x0.
# [icons.redo]
# width = 30
# height = 30
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
