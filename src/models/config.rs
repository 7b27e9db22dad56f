//! Configuration model loaded from external sources.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::forms::validators::default_date_of_birth_cutoff;
use crate::models::endpoints::{Endpoint, EndpointMap};

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Key material for the flash-message cookies.
    pub secret: String,
    pub templates_dir: String,
    /// Base URL of the student REST backend, e.g. `https://localhost:7162`.
    pub rest_base: String,
    /// Base URL serving `assets/img` uploads.
    pub asset_base: String,
    /// Per-entity overrides of the endpoints derived from `rest_base`.
    #[serde(default)]
    pub endpoints: HashMap<String, Endpoint>,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
/// Business-rule parameters for the student form.
pub struct ValidationConfig {
    /// Birth dates strictly after this day are rejected.
    #[serde(default = "default_date_of_birth_cutoff")]
    pub date_of_birth_cutoff: NaiveDate,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            date_of_birth_cutoff: default_date_of_birth_cutoff(),
        }
    }
}

impl ServerConfig {
    /// Layers `{config_dir}/default`, the optional `{config_dir}/{app_env}`
    /// profile and `APP_*` environment variables, later sources winning.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `APP_VALIDATION__DATE_OF_BIRTH_CUTOFF`.
    pub fn load(config_dir: &Path, app_env: &str) -> Result<Self, ConfigError> {
        let default = config_dir.join("default");
        let profile = config_dir.join(app_env);

        Config::builder()
            .add_source(File::with_name(&default.to_string_lossy()))
            .add_source(File::with_name(&profile.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Endpoint map derived from `rest_base` with configured overrides applied.
    pub fn endpoint_map(&self) -> EndpointMap {
        self.endpoints.iter().fold(
            EndpointMap::from_rest_base(&self.rest_base, &self.asset_base),
            |map, (entity, endpoint)| map.with_entity(entity.clone(), endpoint.clone()),
        )
    }
}
