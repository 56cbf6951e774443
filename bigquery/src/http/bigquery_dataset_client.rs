use std::collections::VecDeque;
use std::sync::Arc;

use crate::http::bigquery_client::BigqueryClient;
use crate::http::dataset;
use crate::http::dataset::list::{DatasetOverview, ListDatasetsOptions, ListDatasetsResponse};
use crate::http::dataset::{
    CreateDatasetOptions, Dataset, DatasetReference, DeleteDatasetOptions, GetDatasetOptions, PatchDatasetOptions,
    ProjectReference, UpdateDatasetOptions,
};
use crate::http::error::Error;

#[derive(Clone)]
pub struct BigqueryDatasetClient {
    inner: Arc<BigqueryClient>,
}

impl BigqueryDatasetClient {
    pub fn new(inner: Arc<BigqueryClient>) -> Self {
        Self { inner }
    }

    /// Retrieves a dataset.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get(&self, reference: &DatasetReference, options: Option<&GetDatasetOptions>) -> Result<Dataset, Error> {
        reference.validate()?;
        let builder = dataset::get::build(self.inner.endpoint(), self.inner.http(), reference, options);
        self.inner.send(builder).await
    }

    /// Lists the datasets within the specified project.
    /// Pages are fetched lazily as the returned iterator is advanced.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub fn list(
        &self,
        project: &ProjectReference,
        options: Option<&ListDatasetsOptions>,
    ) -> Result<DatasetIterator, Error> {
        project.validate()?;
        Ok(DatasetIterator {
            client: self.inner.clone(),
            project: project.clone(),
            options: options.cloned(),
            chunk: VecDeque::new(),
            page_token: None,
            exhausted: false,
        })
    }

    /// Lists every dataset within the specified project, following page tokens to the end.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_all(
        &self,
        project: &ProjectReference,
        options: Option<&ListDatasetsOptions>,
    ) -> Result<Vec<DatasetOverview>, Error> {
        let mut iter = self.list(project, options)?;
        let mut datasets = vec![];
        while let Some(page) = iter.next_page().await? {
            datasets.extend(page);
        }
        Ok(datasets)
    }

    /// Creates the specified dataset.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create(
        &self,
        reference: &DatasetReference,
        options: Option<&CreateDatasetOptions>,
    ) -> Result<Dataset, Error> {
        reference.validate()?;
        let metadata = match options {
            Some(options) => options.to_dataset(reference),
            None => Dataset {
                dataset_reference: reference.clone(),
                ..Default::default()
            },
        };
        let builder = dataset::insert::build(self.inner.endpoint(), self.inner.http(), &metadata);
        self.inner.send(builder).await
    }

    /// Attempts to fetch the specified dataset, creating it if it doesn't exist.
    /// Only a not-found failure of the fetch leads to creation; every other error is returned as is.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_or_create(
        &self,
        reference: &DatasetReference,
        get_options: Option<&GetDatasetOptions>,
        create_options: Option<&CreateDatasetOptions>,
    ) -> Result<Dataset, Error> {
        match self.get(reference, get_options).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "dataset {}:{} not found, creating",
                    reference.project_id,
                    reference.dataset_id
                );
                self.create(reference, create_options).await
            }
            result => result,
        }
    }

    /// Deletes the specified dataset.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete(&self, reference: &DatasetReference, options: Option<&DeleteDatasetOptions>) -> Result<(), Error> {
        reference.validate()?;
        let builder = dataset::delete::build(self.inner.endpoint(), self.inner.http(), reference, options);
        self.inner.send_get_empty(builder).await
    }

    /// Updates the specified dataset to match the given resource. All updatable fields are replaced.
    ///
    /// If the resource contains an etag, it is used for optimistic concurrency validation.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn update(
        &self,
        reference: &DatasetReference,
        resource: &Dataset,
        options: Option<&UpdateDatasetOptions>,
    ) -> Result<Dataset, Error> {
        reference.validate()?;
        let metadata = with_reference(resource, reference);
        let builder = dataset::update::build(self.inner.endpoint(), self.inner.http(), &metadata, options);
        self.inner.send(builder).await
    }

    /// Patches the specified dataset with the fields present in the given resource.
    ///
    /// If the resource contains an etag, it is used for optimistic concurrency validation.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn patch(
        &self,
        reference: &DatasetReference,
        resource: &Dataset,
        options: Option<&PatchDatasetOptions>,
    ) -> Result<Dataset, Error> {
        reference.validate()?;
        let metadata = with_reference(resource, reference);
        let builder = dataset::patch::build(self.inner.endpoint(), self.inner.http(), &metadata, options);
        self.inner.send(builder).await
    }
}

fn with_reference(resource: &Dataset, reference: &DatasetReference) -> Dataset {
    let mut metadata = resource.clone();
    metadata.dataset_reference = reference.clone();
    metadata
}

/// Iterates the datasets of a project, requesting the next page only when the current one is drained.
pub struct DatasetIterator {
    client: Arc<BigqueryClient>,
    project: ProjectReference,
    options: Option<ListDatasetsOptions>,
    chunk: VecDeque<DatasetOverview>,
    page_token: Option<String>,
    exhausted: bool,
}

impl DatasetIterator {
    pub async fn next(&mut self) -> Result<Option<DatasetOverview>, Error> {
        loop {
            if let Some(v) = self.chunk.pop_front() {
                return Ok(Some(v));
            }
            match self.fetch().await? {
                Some(page) => self.chunk = VecDeque::from(page),
                None => return Ok(None),
            }
        }
    }

    /// Returns the rest of the current page, or the next page when the current one is drained.
    pub async fn next_page(&mut self) -> Result<Option<Vec<DatasetOverview>>, Error> {
        if !self.chunk.is_empty() {
            return Ok(Some(self.chunk.drain(..).collect()));
        }
        self.fetch().await
    }

    async fn fetch(&mut self) -> Result<Option<Vec<DatasetOverview>>, Error> {
        if self.exhausted {
            return Ok(None);
        }
        let builder = dataset::list::build(
            self.client.endpoint(),
            self.client.http(),
            &self.project,
            self.options.as_ref(),
            self.page_token.as_deref(),
        );
        let response: ListDatasetsResponse = self.client.send(builder).await?;
        self.page_token = response.next_page_token;
        self.exhausted = self.page_token.is_none();
        Ok(Some(response.datasets))
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::sync::Arc;

    use serial_test::serial;

    use crate::http::bigquery_client::test::{create_client, Replay};
    use crate::http::bigquery_dataset_client::BigqueryDatasetClient;
    use crate::http::dataset::list::ListDatasetsOptions;
    use crate::http::dataset::{
        CreateDatasetOptions, Dataset, DatasetReference, DatasetView, DeleteDatasetOptions, GetDatasetOptions,
        ProjectReference,
    };
    use crate::http::error::Error;

    const DATASET: &str = r#"{
        "kind": "bigquery#dataset",
        "etag": "etag-1",
        "id": "proj:ds",
        "datasetReference": {"datasetId": "ds", "projectId": "proj"},
        "creationTime": "1700000000000",
        "lastModifiedTime": "1700000000000",
        "location": "US"
    }"#;

    const NOT_FOUND: &str = r#"{"error":{"code":404,"message":"Not found: Dataset proj:ds"}}"#;

    fn client(replay: &Replay) -> BigqueryDatasetClient {
        BigqueryDatasetClient::new(Arc::new(create_client(replay)))
    }

    #[tokio::test]
    #[serial]
    async fn test_get() {
        let replay = Replay::default();
        replay.respond(200, DATASET);
        let client = client(&replay);
        let reference = DatasetReference::new("proj", "ds");
        let ds = client
            .get(
                &reference,
                Some(&GetDatasetOptions {
                    dataset_view: Some(DatasetView::Metadata),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert_eq!(ds.etag, "etag-1");
        assert_eq!(ds.reference(), &reference);

        let recorded = replay.recorded();
        assert_eq!(recorded[0].method, "GET");
        assert_eq!(recorded[0].url.path(), "/bigquery/v2/projects/proj/datasets/ds");
        assert_eq!(recorded[0].query("datasetView").as_deref(), Some("METADATA"));
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_reference_is_rejected_without_request() {
        let replay = Replay::default();
        let client = client(&replay);
        let err = client.get(&DatasetReference::new("proj", ""), None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(client.list(&ProjectReference::new(""), None).is_err());
        assert!(replay.recorded().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_get_or_create_creates_when_missing() {
        let replay = Replay::default();
        replay.respond(404, NOT_FOUND).respond(200, DATASET);
        let client = client(&replay);
        let reference = DatasetReference::new("proj", "ds");
        let ds = client
            .get_or_create(
                &reference,
                None,
                Some(&CreateDatasetOptions {
                    location: Some("US".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert_eq!(ds.id, "proj:ds");

        let recorded = replay.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].method, "POST");
        assert_eq!(recorded[1].url.path(), "/bigquery/v2/projects/proj/datasets");
        let body = recorded[1].body.as_ref().unwrap();
        assert_eq!(body["datasetReference"]["datasetId"], "ds");
        assert_eq!(body["location"], "US");
    }

    #[tokio::test]
    #[serial]
    async fn test_get_or_create_returns_existing() {
        let replay = Replay::default();
        replay.respond(200, DATASET);
        let client = client(&replay);
        let ds = client
            .get_or_create(&DatasetReference::new("proj", "ds"), None, None)
            .await
            .unwrap();
        assert_eq!(ds.etag, "etag-1");
        assert_eq!(replay.recorded().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_get_or_create_propagates_other_errors() {
        let replay = Replay::default();
        replay.respond(403, r#"{"error":{"code":403,"message":"Access Denied"}}"#);
        let client = client(&replay);
        let err = client
            .get_or_create(&DatasetReference::new("proj", "ds"), None, None)
            .await
            .unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(replay.recorded().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_update_and_patch_send_etag() {
        let replay = Replay::default();
        replay.respond(200, DATASET).respond(200, DATASET).respond(200, DATASET);
        let client = client(&replay);
        let reference = DatasetReference::new("proj", "ds");

        let mut labels = HashMap::new();
        labels.insert("key".to_string(), "value".to_string());
        let resource = Dataset {
            etag: "etag-1".to_string(),
            // overwritten by the target reference
            dataset_reference: DatasetReference::new("other", "other"),
            labels: Some(labels),
            ..Default::default()
        };
        client.update(&reference, &resource, None).await.unwrap();
        client.patch(&reference, &resource, None).await.unwrap();

        let without_etag = Dataset {
            description: Some("updated".to_string()),
            ..Default::default()
        };
        client.patch(&reference, &without_etag, None).await.unwrap();

        let recorded = replay.recorded();
        assert_eq!(recorded[0].method, "PUT");
        assert_eq!(recorded[1].method, "PATCH");
        for r in &recorded[0..2] {
            assert_eq!(r.url.path(), "/bigquery/v2/projects/proj/datasets/ds");
            assert_eq!(r.headers[reqwest::header::IF_MATCH], "etag-1");
            let body = r.body.as_ref().unwrap();
            assert_eq!(body["datasetReference"]["projectId"], "proj");
            assert_eq!(body["labels"]["key"], "value");
        }
        assert!(recorded[2].headers.get(reqwest::header::IF_MATCH).is_none());
        let body = recorded[2].body.as_ref().unwrap().as_object().unwrap();
        assert_eq!(body["description"], "updated");
        assert!(!body.contains_key("labels"));
    }

    #[tokio::test]
    #[serial]
    async fn test_stale_etag() {
        let replay = Replay::default();
        replay.respond(412, r#"{"error":{"code":412,"message":"Precondition check failed."}}"#);
        let client = client(&replay);
        let resource = Dataset {
            etag: "stale".to_string(),
            ..Default::default()
        };
        let err = client
            .update(&DatasetReference::new("proj", "ds"), &resource, None)
            .await
            .unwrap_err();
        assert!(err.is_precondition_failed());
    }

    #[tokio::test]
    #[serial]
    async fn test_delete() {
        let replay = Replay::default();
        replay.respond(204, "");
        let client = client(&replay);
        client
            .delete(
                &DatasetReference::new("proj", "ds"),
                Some(&DeleteDatasetOptions { delete_contents: true }),
            )
            .await
            .unwrap();
        let recorded = replay.recorded();
        assert_eq!(recorded[0].method, "DELETE");
        assert_eq!(recorded[0].query("deleteContents").as_deref(), Some("true"));
    }

    #[tokio::test]
    #[serial]
    async fn test_delete_rejects_dataset_id_with_query() {
        let replay = Replay::default();
        let client = client(&replay);
        let err = client
            .delete(
                &DatasetReference::new("proj", "ds?deleteContents=true"),
                Some(&DeleteDatasetOptions::default()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(replay.recorded().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_list_follows_page_tokens() {
        let replay = Replay::default();
        replay
            .respond(
                200,
                r#"{"kind":"bigquery#datasetList","etag":"e","nextPageToken":"page2","datasets":[
                    {"kind":"bigquery#dataset","id":"proj:a","datasetReference":{"datasetId":"a","projectId":"proj"}},
                    {"kind":"bigquery#dataset","id":"proj:b","datasetReference":{"datasetId":"b","projectId":"proj"}}
                ]}"#,
            )
            .respond(
                200,
                r#"{"kind":"bigquery#datasetList","etag":"e","datasets":[
                    {"kind":"bigquery#dataset","id":"proj:c","datasetReference":{"datasetId":"c","projectId":"proj"}}
                ]}"#,
            );
        let client = client(&replay);
        let options = ListDatasetsOptions {
            max_results: Some(2),
            all: true,
            filter: "".to_string(),
        };
        let mut iter = client.list(&ProjectReference::new("proj"), Some(&options)).unwrap();
        let mut ids = vec![];
        while let Some(ds) = iter.next().await.unwrap() {
            ids.push(ds.dataset_reference.dataset_id);
        }
        assert_eq!(ids, vec!["a", "b", "c"]);

        let recorded = replay.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].query("pageToken"), None);
        assert_eq!(recorded[0].query("maxResults").as_deref(), Some("2"));
        assert_eq!(recorded[0].query("all").as_deref(), Some("true"));
        assert_eq!(recorded[0].query("filter"), None);
        assert_eq!(recorded[1].query("pageToken").as_deref(), Some("page2"));
    }

    #[tokio::test]
    #[serial]
    async fn test_list_all_empty_project() {
        let replay = Replay::default();
        replay.respond(200, r#"{"kind":"bigquery#datasetList","etag":"e"}"#);
        let client = client(&replay);
        let result = client.list_all(&ProjectReference::new("proj"), None).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(replay.recorded().len(), 1);
    }
}
