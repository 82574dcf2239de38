use super::StoreError;
use crate::model::Record;
use page_controller::FetchRequest;
use tokio::sync::oneshot;

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests a [`TableStore`](super::TableStore) understands.
#[derive(Debug)]
pub enum StoreRequest<R: Record> {
    Create {
        params: R::Create,
        respond_to: Response<R>,
    },
    Get {
        id: u32,
        respond_to: Response<Option<R>>,
    },
    Update {
        id: u32,
        update: R::Update,
        respond_to: Response<R>,
    },
    Delete {
        id: u32,
        respond_to: Response<()>,
    },
    /// One page of rows, answered with the JSON body a REST list endpoint would send.
    List {
        request: FetchRequest,
        respond_to: Response<String>,
    },
}
