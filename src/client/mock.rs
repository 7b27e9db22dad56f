//! Mock transport for isolating the entity client in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::client::{ClientError, Transport};
use crate::widgets::image_uploader::ImageFile;

mock! {
    pub Backend {}

    #[async_trait]
    impl Transport for Backend {
        async fn get_json(&self, url: &str) -> Result<Value, ClientError>;
        async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ClientError>;
        async fn post_multipart(&self, url: &str, file: &ImageFile) -> Result<String, ClientError>;
    }
}
