use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::dataset::{Dataset, PatchDatasetOptions};

pub fn build(base_url: &str, client: &Client, data: &Dataset, options: Option<&PatchDatasetOptions>) -> RequestBuilder {
    let url = format!(
        "{}/projects/{}/datasets/{}",
        base_url, data.dataset_reference.project_id, data.dataset_reference.dataset_id
    );
    let mut builder = client.patch(url);
    if let Some(options) = options {
        builder = builder.query(options);
    }
    if !data.etag.is_empty() {
        builder = builder.header(reqwest::header::IF_MATCH, data.etag.as_str())
    }
    builder.json(data)
}
