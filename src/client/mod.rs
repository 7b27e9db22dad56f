//! Generic entity client speaking the backend's response envelope.
//!
//! [`EntityClient`] resolves an entity name against the [`EndpointMap`] and
//! performs exactly one round trip per call through a [`Transport`]. Nothing
//! is retried.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::dto::response::ResponseDto;
use crate::models::endpoints::{Endpoint, EndpointMap};
use crate::widgets::image_uploader::ImageFile;

pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The entity name has no entry in the endpoint map.
    #[error("no endpoint configured for entity `{0}`")]
    UnknownEndpoint(String),

    /// The request failed below the envelope level.
    #[error("{name}: {message}")]
    Transport { name: String, message: String },
}

impl ClientError {
    pub fn transport(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Short error kind shown as the notification title.
    pub fn name(&self) -> &str {
        match self {
            Self::UnknownEndpoint(_) => "ConfigurationError",
            Self::Transport { name, .. } => name,
        }
    }

    /// Human readable description shown as the notification body.
    pub fn message(&self) -> String {
        match self {
            Self::UnknownEndpoint(_) => self.to_string(),
            Self::Transport { message, .. } => message.clone(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::transport("JsonError", err.to_string())
    }
}

/// Raw HTTP exchange used by [`EntityClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, ClientError>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ClientError>;

    /// Posts `file` as the `image` part of a multipart body, returning the raw reply.
    async fn post_multipart(&self, url: &str, file: &ImageFile) -> Result<String, ClientError>;
}

pub struct EntityClient<T> {
    transport: T,
    endpoints: EndpointMap,
}

impl<T: Transport> EntityClient<T> {
    pub fn new(transport: T, endpoints: EndpointMap) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    fn resolve(&self, entity: &str) -> Result<&Endpoint, ClientError> {
        self.endpoints.resolve(entity).ok_or_else(|| {
            log::error!("No endpoint configured for entity `{entity}`");
            ClientError::UnknownEndpoint(entity.to_string())
        })
    }

    /// `GET`s every record of `entity`.
    pub async fn fetch_all<E>(&self, entity: &str) -> Result<ResponseDto<Vec<E>>, ClientError>
    where
        E: DeserializeOwned,
    {
        let endpoint = self.resolve(entity)?;
        log::debug!("GET {} ({entity})", endpoint.get);
        let body = self.transport.get_json(&endpoint.get).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `POST`s `payload` to the save endpoint of `entity`.
    pub async fn save<E, P>(&self, payload: &P, entity: &str) -> Result<ResponseDto<E>, ClientError>
    where
        E: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let endpoint = self.resolve(entity)?;
        let body = serde_json::to_value(payload)?;
        log::debug!("POST {} ({entity})", endpoint.save);
        let reply = self.transport.post_json(&endpoint.save, &body).await?;
        Ok(serde_json::from_value(reply)?)
    }

    /// Uploads `file` under its asset name.
    pub async fn upload_image(&self, file: &ImageFile) -> Result<String, ClientError> {
        let url = self.endpoints.image_url(&file.asset_name());
        log::debug!("POST {url} (image upload)");
        self.transport.post_multipart(&url, file).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::test::{Request, TestTransport};
    use crate::domain::student::{STUDENT_ENTITY, StudentDto};

    fn endpoints() -> EndpointMap {
        EndpointMap::new("http://assets.test")
            .with_entity(
                STUDENT_ENTITY,
                Endpoint {
                    get: "http://api.test/api/Student/list".into(),
                    save: "http://api.test/api/Student/save".into(),
                },
            )
            .with_entity(
                "course",
                Endpoint {
                    get: "http://api.test/api/Course".into(),
                    save: "http://api.test/api/Course".into(),
                },
            )
    }

    #[actix_web::test]
    async fn fetch_all_uses_registered_get_url() {
        let transport = TestTransport::new();
        transport.respond(json!({
            "succeeded": true,
            "responseMessage": "",
            "errors": [],
            "data": [{ "id": "1", "firstName": "Ada" }]
        }));
        let client = EntityClient::new(transport.clone(), endpoints());

        let response = client
            .fetch_all::<StudentDto>(STUDENT_ENTITY)
            .await
            .unwrap();

        assert!(response.succeeded);
        assert_eq!(response.data.unwrap().len(), 1);
        assert_eq!(
            transport.requests(),
            vec![Request::Get {
                url: "http://api.test/api/Student/list".into()
            }]
        );
    }

    #[actix_web::test]
    async fn save_posts_payload_to_registered_save_url() {
        let transport = TestTransport::new();
        transport.respond(json!({ "succeeded": true, "data": { "id": "9" } }));
        let client = EntityClient::new(transport.clone(), endpoints());
        let payload = json!({ "firstName": "Ada" });

        let response = client
            .save::<StudentDto, _>(&payload, "course")
            .await
            .unwrap();

        assert_eq!(response.data.and_then(|s| s.id).unwrap().as_str(), "9");
        assert_eq!(
            transport.requests(),
            vec![Request::Post {
                url: "http://api.test/api/Course".into(),
                body: payload,
            }]
        );
    }

    #[actix_web::test]
    async fn unknown_entity_fails_without_a_request() {
        let transport = TestTransport::new();
        let client = EntityClient::new(transport.clone(), endpoints());

        let result = client.fetch_all::<StudentDto>("course").await;

        assert_eq!(result, Err(ClientError::UnknownEndpoint("course".into())));
        assert!(transport.requests().is_empty());
    }

    #[actix_web::test]
    async fn malformed_envelope_is_a_transport_error() {
        let transport = TestTransport::new();
        transport.respond(json!({ "data": [] }));
        let client = EntityClient::new(transport, endpoints());

        let error = client
            .fetch_all::<StudentDto>(STUDENT_ENTITY)
            .await
            .unwrap_err();

        assert_eq!(error.name(), "JsonError");
    }

    #[actix_web::test]
    async fn upload_targets_timestamped_asset_name() {
        let transport = TestTransport::new();
        let client = EntityClient::new(transport.clone(), endpoints());
        let file = ImageFile {
            name: "me.jpg".into(),
            content_type: "image/jpeg".into(),
            last_modified: 42,
            bytes: vec![1, 2, 3],
        };

        client.upload_image(&file).await.unwrap();

        assert_eq!(
            transport.requests(),
            vec![Request::Upload {
                url: "http://assets.test/assets/img/42me.jpg".into(),
                file_name: "me.jpg".into(),
            }]
        );
    }
}
