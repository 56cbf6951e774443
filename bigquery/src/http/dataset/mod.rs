use std::collections::HashMap;

use crate::http::error::Error;
use crate::http::types::{EncryptionConfiguration, RoutineReference, TableReference};

pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod insert;
pub mod list;
pub(crate) mod patch;
pub(crate) mod update;

#[derive(Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    pub project_id: String,
}

impl ProjectReference {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.project_id.is_empty() {
            return Err(Error::InvalidArgument("project_id must not be empty".to_string()));
        }
        // domain-scoped projects look like `example.com:my-project`
        let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':');
        if !self.project_id.chars().all(valid) {
            return Err(Error::InvalidArgument(format!("invalid project_id: {}", self.project_id)));
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    /// Letters, digits and underscores, without the project.
    pub dataset_id: String,
    pub project_id: String,
}

impl DatasetReference {
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
        }
    }

    pub fn project(&self) -> ProjectReference {
        ProjectReference::new(self.project_id.as_str())
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        self.project().validate()?;
        if self.dataset_id.is_empty() {
            return Err(Error::InvalidArgument("dataset_id must not be empty".to_string()));
        }
        if !self.dataset_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidArgument(format!("invalid dataset_id: {}", self.dataset_id)));
        }
        Ok(())
    }
}

/// A resource-manager tag bound to the dataset.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GcpTag {
    /// Namespaced key such as `12345/environment`.
    pub tag_key: String,
    pub tag_value: String,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageBillingModel {
    #[default]
    StorageBillingModelUnspecified,
    Logical,
    Physical,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    #[default]
    Views,
    TargetTypeUnspecified,
}

/// Source of a linked dataset. Its reference holds a project number, not a project id.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDatasetSource {
    pub source_dataset: DatasetReference,
}

/// Grants resources of `target_types` in another dataset access to this one.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAccessEntry {
    pub dataset: DatasetReference,
    pub target_types: Vec<TargetType>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpecialGroup {
    #[default]
    ProjectOwners,
    ProjectReaders,
    ProjectWriters,
    AllAuthenticatedUsers,
}

/// One entry of the dataset ACL. Exactly one grantee field is set.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    /// IAM role or one of the legacy `OWNER`, `WRITER`, `READER` names.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_by_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_group: Option<SpecialGroup>,
    /// Any other IAM member, e.g. `allUsers`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_member: Option<String>,
    /// An authorized view in another dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<TableReference>,
    /// An authorized routine in another dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine: Option<RoutineReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetAccessEntry>,
}

/// The dataset resource.
///
/// Output-only and unset fields are omitted from request bodies, so a `Dataset` with only
/// a few fields populated can be used for a patch.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// `bigquery#dataset`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Version token of the resource. When set, update and patch send it as `If-Match`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
    /// `projectId:datasetId`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    pub dataset_reference: DatasetReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifetime of new tables. At least one hour; a patch with `Some(0)` clears it.
    #[serde(deserialize_with = "crate::http::from_str_option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_table_expiration_ms: Option<i64>,
    #[serde(deserialize_with = "crate::http::from_str_option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_partition_expiration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// Dataset ACL. Left untouched by a patch when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access: Vec<Access>,
    /// Milliseconds since the epoch.
    #[serde(deserialize_with = "crate::http::from_str")]
    #[serde(default, skip_serializing_if = "crate::http::is_i64_zero")]
    pub creation_time: i64,
    /// Milliseconds since the epoch.
    #[serde(deserialize_with = "crate::http::from_str")]
    #[serde(default, skip_serializing_if = "crate::http::is_i64_zero")]
    pub last_modified_time: i64,
    /// Fixed at creation, e.g. `US` or `asia-northeast1`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_encryption_configuration: Option<EncryptionConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfies_pzs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_dataset_source: Option<LinkedDatasetSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_case_insensitive: Option<bool>,
    /// `und:ci` for case-insensitive tables, empty for the case-sensitive default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_collation: Option<String>,
    /// 48 to 168.
    #[serde(deserialize_with = "crate::http::from_str_option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_travel_hours: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<GcpTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_billing_model: Option<StorageBillingModel>,
}

impl Dataset {
    pub fn reference(&self) -> &DatasetReference {
        &self.dataset_reference
    }
}

#[derive(Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetView {
    /// Same as `Full`.
    #[default]
    DatasetViewUnspecified,
    /// Everything but the ACL.
    Metadata,
    /// Only the ACL.
    Acl,
    Full,
}

/// Which part of the dataset an update or patch replaces.
#[derive(Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateMode {
    /// Same as `UpdateFull`.
    #[default]
    UpdateModeUnspecified,
    UpdateMetadata,
    UpdateAcl,
    UpdateFull,
}

#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetDatasetOptions {
    /// Specifies the view that determines which dataset information is returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_view: Option<DatasetView>,
    /// The version of the access policy schema to fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_policy_version: Option<i32>,
}

/// Initial properties of a dataset created by `create` or `get_or_create`.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CreateDatasetOptions {
    pub friendly_name: Option<String>,
    pub description: Option<String>,
    /// The geographic location of the dataset. The service default (US) is used when omitted.
    pub location: Option<String>,
    pub labels: Option<HashMap<String, String>>,
    pub default_table_expiration_ms: Option<i64>,
    pub default_collation: Option<String>,
}

impl CreateDatasetOptions {
    pub(crate) fn to_dataset(&self, reference: &DatasetReference) -> Dataset {
        Dataset {
            dataset_reference: reference.clone(),
            friendly_name: self.friendly_name.clone(),
            description: self.description.clone(),
            location: self.location.clone().unwrap_or_default(),
            labels: self.labels.clone(),
            default_table_expiration_ms: self.default_table_expiration_ms,
            default_collation: self.default_collation.clone(),
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDatasetOptions {
    /// If true, delete all the tables in the dataset.
    /// If false and the dataset contains tables, the request will fail.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub delete_contents: bool,
}

#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatasetOptions {
    /// Specifies the fields of dataset that update/patch operation is targeting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mode: Option<UpdateMode>,
    /// The version of the provided access policy schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_policy_version: Option<i32>,
}

pub type PatchDatasetOptions = UpdateDatasetOptions;
