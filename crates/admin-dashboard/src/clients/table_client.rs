//! # Table Client
//!
//! The handle the rest of the dashboard uses to reach a [`TableStore`](crate::store::TableStore).
//! It offers the CRUD calls an edit form needs and implements [`DataSource`] so a
//! list controller can page through the table.
//!
//! An optional latency is applied before each list call to mimic the network.
//! The wait and the call both stop as soon as the controller cancels the request.

use super::wire::parse_list_body;
use crate::model::Record;
use crate::store::{StoreError, StoreRequest};
use async_trait::async_trait;
use page_controller::{CancellationToken, DataSource, FetchError, FetchRequest, FetchResponse};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

pub struct TableClient<R: Record> {
    sender: mpsc::Sender<StoreRequest<R>>,
    latency: Option<Duration>,
}

impl<R: Record> Clone for TableClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            latency: self.latency,
        }
    }
}

impl<R: Record> TableClient<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self {
            sender,
            latency: None,
        }
    }

    /// Delays every list call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest<R>,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    #[instrument(skip(self), fields(table = R::TABLE))]
    pub async fn create(&self, params: R::Create) -> Result<R, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Create { params, respond_to })
            .await
    }

    #[instrument(skip(self), fields(table = R::TABLE))]
    pub async fn get(&self, id: u32) -> Result<Option<R>, StoreError> {
        self.request(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    #[instrument(skip(self), fields(table = R::TABLE))]
    pub async fn update(&self, id: u32, update: R::Update) -> Result<R, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self), fields(table = R::TABLE))]
    pub async fn delete(&self, id: u32) -> Result<(), StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }

    /// Raw JSON body for one page.
    #[instrument(skip(self, request), fields(table = R::TABLE, page = request.page_number))]
    pub async fn list(&self, request: FetchRequest) -> Result<String, StoreError> {
        self.request(|respond_to| StoreRequest::List {
            request,
            respond_to,
        })
        .await
    }
}

#[async_trait]
impl<R: Record> DataSource<R> for TableClient<R> {
    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> Result<FetchResponse<R>, FetchError> {
        let call = async {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let body = self.list(request).await.map_err(FetchError::from)?;
            Ok::<_, FetchError>(parse_list_body(&body))
        };
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = call => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};

    fn list_request() -> FetchRequest {
        FetchRequest {
            page_number: 1,
            page_size: 20,
            filters: Vec::new(),
            sorting: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_parses_store_body() {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<User>>(4);
        let client = TableClient::new(sender);

        let responder = tokio::spawn(async move {
            match receiver.recv().await {
                Some(StoreRequest::List {
                    request,
                    respond_to,
                }) => {
                    assert_eq!(request.page_number, 1);
                    let user = User {
                        id: 1,
                        name: "Ada".into(),
                        email: "ada@example.com".into(),
                        role: Role::Admin,
                        active: true,
                        organization_id: "org-1".into(),
                        created_at: 1,
                    };
                    let body = serde_json::to_string(&FetchResponse::new(vec![user], 1)).unwrap();
                    respond_to.send(Ok(body)).unwrap();
                }
                _ => panic!("Expected List request"),
            }
        });

        let response = client
            .fetch(list_request(), CancellationToken::new())
            .await
            .unwrap();
        responder.await.unwrap();

        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.rows[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_unreadable_body_is_zero_rows_not_an_error() {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<User>>(4);
        let client = TableClient::new(sender);

        let responder = tokio::spawn(async move {
            if let Some(StoreRequest::List { respond_to, .. }) = receiver.recv().await {
                respond_to.send(Ok("<html>502</html>".into())).unwrap();
            }
        });

        let response = client
            .fetch(list_request(), CancellationToken::new())
            .await
            .unwrap();
        responder.await.unwrap();

        assert!(response.rows.is_empty());
        assert_eq!(response.total_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_latency_skips_the_store() {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<User>>(4);
        let client = TableClient::new(sender).with_latency(Duration::from_secs(1));
        let cancel = CancellationToken::new();

        let call = {
            let client = client.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { client.fetch(list_request(), cancel).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        assert_eq!(call.await.unwrap(), Err(FetchError::Cancelled));
        drop(client);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_store_is_a_transport_error() {
        let (sender, receiver) = mpsc::channel::<StoreRequest<User>>(4);
        drop(receiver);
        let client = TableClient::new(sender);

        let result = client.fetch(list_request(), CancellationToken::new()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
