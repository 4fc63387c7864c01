//! Layered configuration for mdbridge.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults ([`Settings::default`]).
//! 2. A config file: either the one passed explicitly, or any of
//!    `config.toml`, `config.yaml` and `config.json` found in the platform
//!    config directory (e.g. `~/.config/mdbridge/` on Linux).
//! 3. Environment variables prefixed with `MDBRIDGE_`, with `__` separating
//!    nested keys (`MDBRIDGE_CATALOG__MAX_LEVELS=3`).
//!
//! ```toml
//! [catalog]
//! file_name = "main.db"
//! max_levels = 3
//!
//! [scan]
//! extensions = ["mdb", "accdb", "mde"]
//!
//! [toolchain]
//! sqlite3 = "/opt/sqlite/bin/sqlite3"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use mdbridge_catalog::{DEFAULT_AUTHORS_FILE_NAME, DEFAULT_CATALOG_FILE_NAME, DEFAULT_MAX_LEVELS, LocateOptions};
use mdbridge_library::request::DEFAULT_PICKER_TITLE;
use mdbridge_library::scan::DEFAULT_EXTENSIONS;
use mdbridge_library::{DiscoverySettings, ExtensionFilter};
use mdbridge_toolchain::ToolNames;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "MDBRIDGE_";
const CONFIG_FILE_NAMES: [&str; 3] = ["config.toml", "config.yaml", "config.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub scan: ScanSettings,
    pub toolchain: ToolchainSettings,
    pub picker: PickerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub file_name: String,
    pub authors_file_name: String,
    pub max_levels: usize,
    pub fallback: Option<PathBuf>,
}
impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_CATALOG_FILE_NAME.to_string(),
            authors_file_name: DEFAULT_AUTHORS_FILE_NAME.to_string(),
            max_levels: DEFAULT_MAX_LEVELS,
            fallback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub extensions: Vec<String>,
}
impl Default for ScanSettings {
    fn default() -> Self {
        Self { extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    pub shell: String,
    pub mdb_schema: String,
    pub mdb_tables: String,
    pub mdb_export: String,
    pub sqlite3: String,
}
impl Default for ToolchainSettings {
    fn default() -> Self {
        let names = ToolNames::default();
        Self {
            shell: names.shell,
            mdb_schema: names.mdb_schema,
            mdb_tables: names.mdb_tables,
            mdb_export: names.mdb_export,
            sqlite3: names.sqlite3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    pub title: String,
}
impl Default for PickerSettings {
    fn default() -> Self {
        Self { title: DEFAULT_PICKER_TITLE.to_string() }
    }
}

impl Settings {
    /// Load and validate settings from every source.
    ///
    /// When `explicit` is given it replaces the config directory lookup and
    /// must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        let settings: Self =
            Self::figment(explicit).extract().map_err(|err| ErrorKind::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// The provider stack used by [`load`](Self::load), before extraction.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        match explicit {
            Some(path) => figment = merge_file(figment, path),
            None => {
                if let Some(dirs) = ProjectDirs::from("", "", "mdbridge") {
                    for name in CONFIG_FILE_NAMES {
                        let path = dirs.config_dir().join(name);
                        if path.is_file() {
                            tracing::debug!(path = %path.display(), "Loading config file");
                            figment = merge_file(figment, &path);
                        }
                    }
                }
            },
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn validate(&self) -> Result<()> {
        if self.catalog.max_levels == 0 {
            exn::bail!(ErrorKind::Invalid("catalog.max_levels", "must search at least one level"));
        }
        if self.catalog.file_name.is_empty() {
            exn::bail!(ErrorKind::Invalid("catalog.file_name", "must not be empty"));
        }
        if self.catalog.authors_file_name.is_empty() {
            exn::bail!(ErrorKind::Invalid("catalog.authors_file_name", "must not be empty"));
        }
        if self.scan.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            exn::bail!(ErrorKind::Invalid("scan.extensions", "must contain at least one extension"));
        }
        let tools = [
            ("toolchain.shell", &self.toolchain.shell),
            ("toolchain.mdb_schema", &self.toolchain.mdb_schema),
            ("toolchain.mdb_tables", &self.toolchain.mdb_tables),
            ("toolchain.mdb_export", &self.toolchain.mdb_export),
            ("toolchain.sqlite3", &self.toolchain.sqlite3),
        ];
        if let Some((key, _)) = tools.into_iter().find(|(_, name)| name.is_empty()) {
            exn::bail!(ErrorKind::Invalid(key, "must name an executable"));
        }
        Ok(())
    }

    pub fn locate_options(&self) -> LocateOptions {
        LocateOptions {
            file_name: self.catalog.file_name.clone(),
            authors_file_name: self.catalog.authors_file_name.clone(),
            max_levels: self.catalog.max_levels,
            fallback: self.catalog.fallback.clone(),
        }
    }

    pub fn discovery(&self) -> DiscoverySettings {
        DiscoverySettings {
            title: self.picker.title.clone(),
            locate: self.locate_options(),
            extensions: ExtensionFilter::new(&self.scan.extensions),
        }
    }

    pub fn tool_names(&self) -> ToolNames {
        ToolNames {
            shell: self.toolchain.shell.clone(),
            mdb_schema: self.toolchain.mdb_schema.clone(),
            mdb_tables: self.toolchain.mdb_tables.clone(),
            mdb_export: self.toolchain.mdb_export.clone(),
            sqlite3: self.toolchain.sqlite3.clone(),
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}
