//! Console configuration: server location, workspace, and user-facing strings.
//!
//! Values come from defaults, then `console.toml`, then `CONSOLE_*` environment
//! variables. The resulting [`ConsoleConfig`] is handed to every controller and
//! to the HTTP client at construction time.

use std::{fs, io, path::Path};

use serde::Deserialize;
use shared::{
    domain::{BaselineId, ProductFilter},
    protocol::ImportOptions,
};
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_CONFIG_FILE: &str = "console.toml";

/// User-facing strings used by the controllers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub create_product_before_baseline: String,
    pub single_file_restriction: String,
    pub baseline_name_required: String,
    pub baseline_product_required: String,
    pub command_queue_full: String,
    pub backend_disconnected: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            create_product_before_baseline: "You must create a product before creating a baseline"
                .into(),
            single_file_restriction: "Only one file can be imported at a time".into(),
            baseline_name_required: "A baseline name is required".into(),
            baseline_product_required: "Select a product to snapshot".into(),
            command_queue_full: "Too many pending requests; please retry".into(),
            backend_disconnected: "Background worker stopped; restart the console".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub server_url: String,
    pub context_path: String,
    pub workspace_id: String,
    pub messages: Messages,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            context_path: String::new(),
            workspace_id: "default".into(),
            messages: Messages::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    server_url: Option<String>,
    context_path: Option<String>,
    workspace_id: Option<String>,
    messages: Option<Messages>,
}

/// Loads `path` (missing file means defaults) and applies `CONSOLE_*` overrides.
pub fn load_settings(path: &Path) -> Result<ConsoleConfig, ClientError> {
    let mut config = ConsoleConfig::from_file(path)?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

impl ConsoleConfig {
    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ClientError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&raw).map_err(|err| match err {
            ClientError::Config(message) => {
                ClientError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, ClientError> {
        let file: FileSettings =
            toml::from_str(raw).map_err(|err| ClientError::Config(err.to_string()))?;
        let mut config = Self::default();
        if let Some(v) = file.server_url {
            config.server_url = v;
        }
        if let Some(v) = file.context_path {
            config.context_path = v;
        }
        if let Some(v) = file.workspace_id {
            config.workspace_id = v;
        }
        if let Some(v) = file.messages {
            config.messages = v;
        }
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CONSOLE_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = lookup("CONSOLE_CONTEXT_PATH") {
            self.context_path = v;
        }
        if let Some(v) = lookup("CONSOLE_WORKSPACE_ID") {
            self.workspace_id = v;
        }
    }

    /// `{server}{context}/api/workspaces/{workspace}/{segments...}` with each
    /// segment percent-encoded.
    fn workspace_endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.server_url)?;
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ClientError::Config(format!("server url '{}' cannot be a base", self.server_url))
            })?;
            path.pop_if_empty();
            path.extend(self.context_path.split('/').filter(|s| !s.is_empty()));
            path.extend(["api", "workspaces", self.workspace_id.as_str()]);
            path.extend(segments);
        }
        Ok(url)
    }

    pub fn products_url(&self) -> Result<Url, ClientError> {
        self.workspace_endpoint(&["products"])
    }

    pub fn baselines_url(&self, filter: &ProductFilter) -> Result<Url, ClientError> {
        match filter.product_id() {
            Some(product_id) => {
                self.workspace_endpoint(&["products", product_id.as_str(), "baselines"])
            }
            None => self.workspace_endpoint(&["product-baselines"]),
        }
    }

    pub fn baseline_url(&self, baseline_id: BaselineId) -> Result<Url, ClientError> {
        self.workspace_endpoint(&["product-baselines", &baseline_id.to_string()])
    }

    pub fn baseline_duplicate_url(&self, baseline_id: BaselineId) -> Result<Url, ClientError> {
        self.workspace_endpoint(&["product-baselines", &baseline_id.to_string(), "duplicate"])
    }

    pub fn part_import_url(&self, options: &ImportOptions) -> Result<Url, ClientError> {
        let mut url = self.workspace_endpoint(&["parts", "import"])?;
        url.query_pairs_mut().extend_pairs(options.query_pairs());
        Ok(url)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
