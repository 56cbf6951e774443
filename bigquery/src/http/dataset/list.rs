use std::collections::HashMap;

use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::dataset::{DatasetReference, ProjectReference};

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDatasetsOptions {
    /// Page size. The iterator keeps requesting pages until the last one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    /// Includes hidden datasets.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
    /// Label filter such as `labels.department:receiving labels.active`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
}

/// The subset of a dataset returned by a list call.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DatasetOverview {
    #[serde(default)]
    pub kind: String,
    /// `projectId:datasetId`
    #[serde(default)]
    pub id: String,
    pub dataset_reference: DatasetReference,
    pub labels: Option<HashMap<String, String>>,
    pub friendly_name: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDatasetsResponse {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub etag: String,
    /// Omitted by the service when the project has no datasets.
    #[serde(default)]
    pub datasets: Vec<DatasetOverview>,
    /// Absent on the last page.
    pub next_page_token: Option<String>,
}

pub fn build(
    base_url: &str,
    client: &Client,
    project: &ProjectReference,
    options: Option<&ListDatasetsOptions>,
    page_token: Option<&str>,
) -> RequestBuilder {
    let url = format!("{}/projects/{}/datasets", base_url, project.project_id);
    let mut builder = client.get(url);
    if let Some(options) = options {
        builder = builder.query(options);
    }
    match page_token {
        Some(token) => builder.query(&[("pageToken", token)]),
        None => builder,
    }
}
