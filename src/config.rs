use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parse::OptionSchema;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// User overlay location, expanded with shellexpand.
const USER_CONFIG_PATH: &str = "~/.config/shexplain/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub programs: Vec<ProgramSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Prefix shown before the interactive prompt.
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub color: ColorMode,
    /// Level for the file logger (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            icon: default_icon(),
            color: ColorMode::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_icon() -> String {
    "💡".into()
}

fn default_log_level() -> String {
    "warn".into()
}

/// When to emit ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}

/// Knowledge about one program: what it does and which options it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgramSpec {
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub options: Vec<OptionSchema>,
    #[serde(default)]
    pub subcommands: Vec<SubcommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubcommandSpec {
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub options: Vec<OptionSchema>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    knowledge: KnowledgeOverlay,
    #[serde(default)]
    programs: Vec<ProgramSpec>,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    icon: Option<String>,
    color: Option<ColorMode>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct KnowledgeOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    remove: Vec<String>,
}

// ── Merge logic ──

/// Merge user program entries into the default list.
/// In replace mode: user entries replace the defaults entirely.
/// In merge mode: remove by name first, then entries with a known name
/// replace that program and new names are appended.
fn merge_programs(
    base: &mut Vec<ProgramSpec>,
    add: Vec<ProgramSpec>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
        return;
    }
    base.retain(|p| !remove.contains(&p.name));
    for program in add {
        match base.iter_mut().find(|p| p.name == program.name) {
            Some(existing) => *existing = program,
            None => base.push(program),
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the overlay from `path`, or from ~/.config/shexplain/config.toml
    ///
    /// An explicit `path` must exist and parse. The default overlay is optional;
    /// a broken one is reported and skipped.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = Self::default_config();
        match path {
            Some(path) => {
                let path = expand(path)?;
                let content = std::fs::read_to_string(&path).map_err(|source| {
                    Error::ConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                config.apply_overlay(parse_overlay(&path, &content)?);
            }
            None => {
                if let Some(overlay) = Self::load_user_overlay() {
                    config.apply_overlay(overlay);
                }
            }
        }
        Ok(config)
    }

    /// Try to load the user overlay from its default location.
    fn load_user_overlay() -> Option<ConfigOverlay> {
        let path = expand(USER_CONFIG_PATH).ok()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match parse_overlay(&path, &content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                warn!("{e}");
                eprintln!("shexplain: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        let s = overlay.settings;
        if let Some(v) = s.icon {
            self.settings.icon = v;
        }
        if let Some(v) = s.color {
            self.settings.color = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }

        let k = overlay.knowledge;
        merge_programs(&mut self.programs, overlay.programs, &k.remove, k.replace);
    }

    /// Render the merged configuration as TOML (for `--dump-config`).
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

fn expand(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn parse_overlay(path: &Path, content: &str) -> Result<ConfigOverlay> {
    toml::from_str(content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
