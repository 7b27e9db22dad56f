//! Static mapping from logical entity names to backend URLs.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::student::STUDENT_ENTITY;

/// Backend URLs serving one entity.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Endpoint {
    pub get: String,
    pub save: String,
}

/// Entity name to [`Endpoint`] lookup plus the image asset base.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointMap {
    entities: HashMap<String, Endpoint>,
    asset_base: String,
}

impl EndpointMap {
    pub fn new(asset_base: impl Into<String>) -> Self {
        Self {
            entities: HashMap::new(),
            asset_base: asset_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Default map: `student` served at `{rest_base}/api/Student` for both reads and saves.
    pub fn from_rest_base(rest_base: &str, asset_base: &str) -> Self {
        let url = format!("{}/api/Student", rest_base.trim_end_matches('/'));
        Self::new(asset_base).with_entity(
            STUDENT_ENTITY,
            Endpoint {
                get: url.clone(),
                save: url,
            },
        )
    }

    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>, endpoint: Endpoint) -> Self {
        self.entities.insert(entity.into(), endpoint);
        self
    }

    pub fn resolve(&self, entity: &str) -> Option<&Endpoint> {
        self.entities.get(entity)
    }

    /// Upload target for an asset file name, `{asset_base}/assets/img/{file_name}`.
    pub fn image_url(&self, file_name: &str) -> String {
        format!("{}/assets/img/{file_name}", self.asset_base)
    }
}
