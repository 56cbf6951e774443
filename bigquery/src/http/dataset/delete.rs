use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::dataset::{DatasetReference, DeleteDatasetOptions};

pub fn build(
    base_url: &str,
    client: &Client,
    reference: &DatasetReference,
    options: Option<&DeleteDatasetOptions>,
) -> RequestBuilder {
    let url = format!(
        "{}/projects/{}/datasets/{}",
        base_url, reference.project_id, reference.dataset_id
    );
    let builder = client.delete(url);
    match options {
        Some(options) => builder.query(options),
        None => builder,
    }
}
