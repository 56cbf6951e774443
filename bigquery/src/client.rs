use std::fmt::Debug;
use std::sync::Arc;

use token_source::TokenSourceProvider;

use crate::http::bigquery_client::BigqueryClient;
use crate::http::bigquery_dataset_client::BigqueryDatasetClient;
use crate::http::dataset::{DatasetReference, ProjectReference};

#[derive(Debug)]
pub struct ClientConfig {
    http: Option<reqwest_middleware::ClientWithMiddleware>,
    bigquery_endpoint: String,
    token_source_provider: Option<Box<dyn TokenSourceProvider>>,
    project_id: Option<String>,
    debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: None,
            bigquery_endpoint: "https://bigquery.googleapis.com".to_string(),
            token_source_provider: None,
            project_id: None,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn new(token_source_provider: Box<dyn TokenSourceProvider>) -> Self {
        Self {
            token_source_provider: Some(token_source_provider),
            ..Default::default()
        }
    }

    /// Sends requests without an `Authorization` header.
    pub fn anonymous(mut self) -> Self {
        self.token_source_provider = None;
        self
    }

    pub fn with_http_client(mut self, value: reqwest_middleware::ClientWithMiddleware) -> Self {
        self.http = Some(value);
        self
    }

    pub fn with_endpoint(mut self, value: impl Into<String>) -> Self {
        self.bigquery_endpoint = value.into();
        self
    }

    /// Project used by [`Client::project_reference`] and [`Client::dataset_reference`].
    pub fn with_project_id(mut self, value: impl Into<String>) -> Self {
        self.project_id = Some(value.into());
        self
    }

    /// Logs every response body at info level.
    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }
}

#[cfg(feature = "auth")]
pub use google_cloud_auth;

#[cfg(feature = "auth")]
impl ClientConfig {
    /// Builds a config from the default credentials (`GOOGLE_APPLICATION_CREDENTIALS` or the metadata server).
    pub async fn new_with_auth() -> Result<Self, google_cloud_auth::error::Error> {
        let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new(Self::auth_config()).await?;
        Ok(Self::from_token_source(ts))
    }

    pub async fn new_with_credentials(
        credentials: google_cloud_auth::credentials::CredentialsFile,
    ) -> Result<Self, google_cloud_auth::error::Error> {
        let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new_with_credentials(
            Self::auth_config(),
            Box::new(credentials),
        )
        .await?;
        Ok(Self::from_token_source(ts))
    }

    fn from_token_source(ts: google_cloud_auth::token::DefaultTokenSourceProvider) -> Self {
        let project_id = ts.project_id.clone();
        let mut config = Self::new(Box::new(ts));
        config.project_id = project_id;
        config
    }

    fn auth_config() -> google_cloud_auth::project::Config<'static> {
        google_cloud_auth::project::Config::default().with_scopes(&crate::http::bigquery_client::SCOPES)
    }
}

#[derive(Clone)]
pub struct Client {
    dataset_client: BigqueryDatasetClient,
    project_id: Option<String>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let ts = match config.token_source_provider {
            Some(tsp) => Some(tsp.token_source()),
            None => {
                tracing::trace!("Use anonymous access due to lack of token");
                None
            }
        };
        let http = config
            .http
            .unwrap_or_else(|| reqwest_middleware::ClientBuilder::new(reqwest::Client::default()).build());
        let client = Arc::new(BigqueryClient::new(
            ts,
            config.bigquery_endpoint.as_str(),
            http,
            config.debug,
        ));
        Self {
            dataset_client: BigqueryDatasetClient::new(client),
            project_id: config.project_id,
        }
    }

    pub fn dataset(&self) -> &BigqueryDatasetClient {
        &self.dataset_client
    }

    /// The default project of this client, if one was configured or discovered from credentials.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Reference to the default project. The project id is empty when none is configured,
    /// in which case operations reject the reference.
    pub fn project_reference(&self) -> ProjectReference {
        ProjectReference::new(self.project_id.clone().unwrap_or_default())
    }

    /// Reference to a dataset within the default project.
    pub fn dataset_reference(&self, dataset_id: impl Into<String>) -> DatasetReference {
        DatasetReference::new(self.project_id.clone().unwrap_or_default(), dataset_id)
    }
}
