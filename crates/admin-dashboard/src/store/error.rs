use page_controller::FetchError;

/// Errors returned by a [`TableStore`](super::TableStore) and its client.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("{table} row {id} not found")]
    NotFound { table: &'static str, id: u32 },
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// How a list endpoint failure looks to a list controller.
impl From<StoreError> for FetchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::StoreClosed | StoreError::StoreDropped => {
                FetchError::Transport(e.to_string())
            }
            StoreError::NotFound { .. } => FetchError::Server {
                status: 404,
                message: e.to_string(),
            },
            StoreError::UnsupportedFilter(_) => FetchError::Server {
                status: 400,
                message: e.to_string(),
            },
            StoreError::Serialization(_) => FetchError::Server {
                status: 500,
                message: e.to_string(),
            },
        }
    }
}
