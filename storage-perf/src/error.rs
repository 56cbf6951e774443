#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] gcloud_storage_object::http::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    /// The service returned no data for a range inside the object.
    #[error("download of {object} stopped at byte {offset} of {size}")]
    UnexpectedEof { object: String, offset: u64, size: u64 },
}
