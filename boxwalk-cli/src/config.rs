// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration file loading

use boxwalk_core::{
    page::DEFAULT_PAGE_SIZE, BwError, BwResult, FieldSet, ListOptions, Pagination, WalkOptions,
    WalkOrder,
};
use boxwalk_providers::{TokenSource, BOX_API_URL, DEFAULT_TOKEN_ENV};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub walk: WalkConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub access_token: Option<String>,
    pub access_token_file: Option<PathBuf>,
    pub access_token_env: String,
    pub as_user: Option<String>,
    pub api_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            access_token_file: None,
            access_token_env: DEFAULT_TOKEN_ENV.to_string(),
            as_user: None,
            api_url: BOX_API_URL.to_string(),
        }
    }
}

impl AuthConfig {
    /// Inline token first, then token file, then environment
    pub fn token_source(&self) -> TokenSource {
        if let Some(ref token) = self.access_token {
            TokenSource::inline(token.clone())
        } else if let Some(ref path) = self.access_token_file {
            TokenSource::File(path.clone())
        } else {
            TokenSource::Env(self.access_token_env.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    pub root_folder_id: String,
    pub page_size: u32,
    pub fields: Vec<String>,
    pub order: WalkOrder,
    pub pagination: Pagination,
    pub max_depth: Option<usize>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            root_folder_id: "0".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            fields: Vec::new(),
            order: WalkOrder::default(),
            pagination: Pagination::default(),
            max_depth: None,
        }
    }
}

impl WalkConfig {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            list: ListOptions {
                page_size: self.page_size,
                fields: FieldSet::from_names(&self.fields),
                pagination: self.pagination,
            },
            order: self.order,
            max_depth: self.max_depth,
        }
    }
}

/// Default config file location for this platform
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "boxwalk", "boxwalk")
        .map(|d| d.config_dir().join(CONFIG_FILE))
}

impl AppConfig {
    /// Load `path`, or the default location when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> BwResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> BwResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BwError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::parse(&text)
            .map_err(|e| BwError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
