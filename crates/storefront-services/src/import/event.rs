//! Bucket event notification payloads.

use serde::Deserialize;

/// Object-created notification as delivered by the bucket.
///
/// Test events sent when a notification is first configured carry no `Records`.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    /// Form-encoded key, see [`storefront_storage::keys::decode_event_key`].
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl S3Event {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Event with one record per raw key, as the bucket would send it.
    pub fn for_keys<'a>(bucket: &str, keys: impl IntoIterator<Item = &'a str>) -> Self {
        S3Event {
            records: keys
                .into_iter()
                .map(|key| S3EventRecord {
                    event_name: Some("ObjectCreated:Put".to_string()),
                    s3: S3Entity {
                        bucket: S3Bucket {
                            name: bucket.to_string(),
                        },
                        object: S3Object {
                            key: key.to_string(),
                            size: None,
                        },
                    },
                })
                .collect(),
        }
    }
}
