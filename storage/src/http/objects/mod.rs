use std::collections::HashMap;

use time::OffsetDateTime;

pub mod delete;
pub mod download;
pub mod get;
pub mod upload;

/// Object metadata as returned by the JSON API.
///
/// Numeric fields arrive as JSON strings. Only the fields the client reads are kept.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    /// Download URL of the data.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub media_link: String,
    /// Changes whenever the data is overwritten.
    #[serde(default, deserialize_with = "crate::http::from_str")]
    #[serde(skip_serializing_if = "crate::http::is_i64_zero")]
    pub generation: i64,
    /// Changes whenever the metadata of a generation is updated.
    #[serde(default, deserialize_with = "crate::http::from_str")]
    #[serde(skip_serializing_if = "crate::http::is_i64_zero")]
    pub metageneration: i64,
    /// Length of the data in bytes.
    #[serde(default, deserialize_with = "crate::http::from_str")]
    #[serde(skip_serializing_if = "crate::http::is_i64_zero")]
    pub size: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
    /// Served as `application/octet-stream` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    /// Base64 of the big-endian CRC32C.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc32c: Option<String>,
    /// Base64 of the MD5 digest. Absent for composite objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<OffsetDateTime>,
    /// Set only for noncurrent generations.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_deleted: Option<OffsetDateTime>,
}
