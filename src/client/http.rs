//! Production [`Transport`] built on `reqwest`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::client::{ClientError, Transport};
use crate::widgets::image_uploader::ImageFile;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let name = if err.is_status() {
            "HttpErrorResponse"
        } else if err.is_timeout() {
            "TimeoutError"
        } else if err.is_connect() {
            "ConnectionError"
        } else if err.is_decode() {
            "JsonError"
        } else {
            "HttpError"
        };
        let message = match (err.status(), err.url()) {
            (Some(status), Some(url)) => format!("Http failure response for {url}: {status}"),
            _ => err.to_string(),
        };
        ClientError::transport(name, message)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> Result<Value, ClientError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_multipart(&self, url: &str, file: &ImageFile) -> Result<String, ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
