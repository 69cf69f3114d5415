//! Output resources: where the service writes generated content.

use serde::{Deserialize, Serialize};

/// AWS S3 bucket used as an output location.
///
/// The credentials need read, write and list permissions; delete allows
/// overwriting existing files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bucket_name: String,
    pub access_key: String,
    pub secret_key: String,
}

impl S3Output {
    pub fn new(
        bucket_name: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            bucket_name: bucket_name.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}
