//! Mod registry.
//!
//! Each mod is a directory under `mods/` holding a `mod.toml` manifest. Mods
//! may contribute setting categories; those show up in the options menu's
//! Mods tab and persist through `[mod_settings]` in the configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::Configuration;

pub const MANIFEST_FILE: &str = "mod.toml";

#[derive(Debug, thiserror::Error)]
pub enum ModError {
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid manifest {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("mod '{mod_id}': setting '{setting}' has no options")]
    NoOptions { mod_id: String, setting: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModSettingOption {
    pub display_name: String,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModSetting {
    pub identifier: String,
    pub display_name: String,
    pub options: Vec<ModSettingOption>,
    pub current_value: u32,
    pub default_value: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModSettingCategory {
    /// May be empty for a mod's uncategorized settings.
    pub display_name: String,
    pub settings: Vec<ModSetting>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mod {
    pub id: String,
    pub display_name: String,
    pub active: bool,
    pub setting_categories: Vec<ModSettingCategory>,
}

/// Position of one setting inside the registry's active mods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModSettingRef {
    pub mod_index: usize,
    pub category: usize,
    pub setting: usize,
}

// ── Manifest schema ──

#[derive(Deserialize, Debug)]
struct TomlManifest {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    categories: Vec<TomlCategory>,
}

#[derive(Deserialize, Debug)]
struct TomlCategory {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    settings: Vec<TomlSetting>,
}

#[derive(Deserialize, Debug)]
struct TomlSetting {
    identifier: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    default: u32,
    options: Vec<TomlOption>,
}

#[derive(Deserialize, Debug)]
struct TomlOption {
    name: String,
    value: u32,
}

fn default_active() -> bool { true }

impl Mod {
    /// Parse a manifest. `id` is the mod's directory name.
    pub fn from_manifest(id: &str, text: &str, path: &Path) -> Result<Mod, ModError> {
        let manifest: TomlManifest =
            toml::from_str(text).map_err(|source| ModError::Parse { path: path.to_path_buf(), source })?;

        let mut setting_categories = Vec::with_capacity(manifest.categories.len());
        for category in manifest.categories {
            let mut settings = Vec::with_capacity(category.settings.len());
            for setting in category.settings {
                if setting.options.is_empty() {
                    return Err(ModError::NoOptions { mod_id: id.to_string(), setting: setting.identifier });
                }
                settings.push(ModSetting {
                    display_name: setting.display_name.unwrap_or_else(|| setting.identifier.clone()),
                    identifier: setting.identifier,
                    options: setting
                        .options
                        .into_iter()
                        .map(|o| ModSettingOption { display_name: o.name, value: o.value })
                        .collect(),
                    current_value: setting.default,
                    default_value: setting.default,
                });
            }
            if !settings.is_empty() {
                setting_categories.push(ModSettingCategory { display_name: category.display_name, settings });
            }
        }

        Ok(Mod {
            id: id.to_string(),
            display_name: manifest.display_name.unwrap_or_else(|| id.to_string()),
            active: manifest.active,
            setting_categories,
        })
    }
}

// ── Registry ──

#[derive(Clone, Debug, Default)]
pub struct ModRegistry {
    /// Active mods in load order.
    active: Vec<Mod>,
}

impl ModRegistry {
    pub fn new(mods: Vec<Mod>) -> Self {
        ModRegistry { active: mods.into_iter().filter(|m| m.active).collect() }
    }

    /// Load every `*/mod.toml` below `dir`, in directory-name order. Broken
    /// manifests are logged and skipped; a missing directory means no mods.
    pub fn load_from_dir(dir: &Path) -> Self {
        let Ok(read_dir) = std::fs::read_dir(dir) else {
            log::debug!("no mods directory at {}", dir.display());
            return ModRegistry::default();
        };

        let mut mod_dirs: Vec<PathBuf> = read_dir
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.join(MANIFEST_FILE).is_file())
            .collect();
        mod_dirs.sort();

        let mut mods = Vec::new();
        for mod_dir in mod_dirs {
            match load_manifest(&mod_dir) {
                Ok(m) => {
                    log::debug!("loaded mod '{}' ({} categories)", m.id, m.setting_categories.len());
                    mods.push(m);
                }
                Err(e) => log::warn!("skipping mod: {e}"),
            }
        }
        Self::new(mods)
    }

    pub fn active_mods(&self) -> &[Mod] {
        &self.active
    }

    pub fn setting(&self, r: ModSettingRef) -> Option<&ModSetting> {
        self.active
            .get(r.mod_index)?
            .setting_categories
            .get(r.category)?
            .settings
            .get(r.setting)
    }

    pub fn setting_mut(&mut self, r: ModSettingRef) -> Option<&mut ModSetting> {
        self.active
            .get_mut(r.mod_index)?
            .setting_categories
            .get_mut(r.category)?
            .settings
            .get_mut(r.setting)
    }

    pub fn copy_settings_to_config(&self, config: &mut Configuration) {
        for m in &self.active {
            for category in &m.setting_categories {
                for setting in &category.settings {
                    config
                        .mod_settings
                        .entry(m.id.clone())
                        .or_default()
                        .insert(setting.identifier.clone(), setting.current_value);
                }
            }
        }
    }

    pub fn load_settings_from_config(&mut self, config: &Configuration) {
        for m in &mut self.active {
            let Some(values) = config.mod_settings.get(&m.id) else {
                continue;
            };
            for category in &mut m.setting_categories {
                for setting in &mut category.settings {
                    if let Some(&value) = values.get(&setting.identifier) {
                        setting.current_value = value;
                    }
                }
            }
        }
    }
}

fn load_manifest(mod_dir: &Path) -> Result<Mod, ModError> {
    let path = mod_dir.join(MANIFEST_FILE);
    let text = std::fs::read_to_string(&path).map_err(|source| ModError::Read { path: path.clone(), source })?;
    let id = mod_dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    Mod::from_manifest(&id, &text, &path)
}
