//! Configuration management utilities.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::extensions::{DEFAULT_EXTENSIONS, ExtensionSet};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".togglehs/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub extensions: Extensions,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub ignore: Ignore,
    #[serde(default)]
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Extensions {
    #[serde(default)]
    order: Option<Vec<String>>,
}

impl Extensions {
    /// Declared extension order, falling back to the built-in C/C++/Objective-C family.
    pub fn order(&self) -> Vec<String> {
        self.order.clone().unwrap_or_else(|| {
            DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "Search::default_respect_gitignore")]
    pub respect_gitignore: bool,
}

impl Search {
    fn default_respect_gitignore() -> bool {
        true
    }
}

impl Default for Search {
    fn default() -> Self {
        Self {
            show_hidden: false,
            respect_gitignore: Self::default_respect_gitignore(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ignore {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub globs: Vec<String>,
}

impl Default for Ignore {
    fn default() -> Self {
        Self {
            paths: vec![".git/".into(), "node_modules/".into()],
            globs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EditorSettings {
    /// Program and leading arguments; the companion path is appended.
    #[serde(default)]
    pub command: Option<String>,
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    extensions: Option<String>,
    editor: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            extensions: env::var("TOGGLEHS_EXTENSIONS").ok(),
            editor: env::var("TOGGLEHS_EDITOR").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(extensions: Option<&str>, editor: Option<&str>) -> Self {
        Self {
            extensions: extensions.map(str::to_owned),
            editor: editor.map(str::to_owned),
        }
    }
}

impl Config {
    /// Load configuration for the project rooted at `root`.
    ///
    /// Layers, lowest first: built-in defaults, the user config, `<root>/.togglehs/config.toml`,
    /// then environment overrides.
    pub fn load(root: &Path) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = Some(workspace_config_path(root));
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            extensions: Extensions {
                order: other.extensions.order.or(self.extensions.order),
            },
            search: merge_search(self.search, other.search),
            ignore: merge_ignore(self.ignore, other.ignore),
            editor: EditorSettings {
                command: other.editor.command.or(self.editor.command),
            },
        }
    }

    /// Validated extension set for this configuration.
    pub fn extension_set(&self) -> Result<ExtensionSet> {
        ExtensionSet::new(self.extensions.order()).context("invalid [extensions] order")
    }
}

fn merge_search(base: Search, overlay: Search) -> Search {
    Search {
        show_hidden: overlay.show_hidden || base.show_hidden,
        respect_gitignore: if overlay.respect_gitignore != Search::default_respect_gitignore() {
            overlay.respect_gitignore
        } else {
            base.respect_gitignore
        },
    }
}

fn merge_ignore(base: Ignore, overlay: Ignore) -> Ignore {
    let mut paths: BTreeSet<String> = base.paths.into_iter().collect();
    paths.extend(overlay.paths);

    let mut globs: BTreeSet<String> = base.globs.into_iter().collect();
    globs.extend(overlay.globs);

    Ignore {
        paths: paths.into_iter().collect(),
        globs: globs.into_iter().collect(),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("togglehs/config.toml"))
}

fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_WORKSPACE_CONFIG_PATH)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(extensions) = env.extensions {
        let order: Vec<String> = extensions
            .split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_owned)
            .collect();
        config.extensions.order = Some(order);
    }
    if let Some(editor) = env.editor.filter(|cmd| !cmd.trim().is_empty()) {
        config.editor.command = Some(editor);
    }
    config
}
