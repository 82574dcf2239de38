//! # Table Store
//!
//! An in-memory stand-in for the back office REST API. One [`TableStore`] actor
//! owns the rows of one table and answers CRUD requests plus paged list queries.
//!
//! The actor processes its messages sequentially, so the row map needs no lock.
//! List answers are serialized JSON bodies, the same shape a real list endpoint
//! sends, which the [`TableClient`] parses on the way back.

pub mod error;
pub mod message;
pub mod query;

pub use error::StoreError;
pub use message::{Response, StoreRequest};

use crate::clients::TableClient;
use crate::model::Record;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the rows of one table.
///
/// ```rust
/// use admin_dashboard::model::{User, UserCreate, Role};
/// use admin_dashboard::store::TableStore;
///
/// #[tokio::main]
/// async fn main() {
///     let (store, client) = TableStore::<User>::new(16);
///     tokio::spawn(store.run());
///
///     let user = client
///         .create(UserCreate {
///             name: "Ada".into(),
///             email: "ada@example.com".into(),
///             role: Role::Admin,
///             organization_id: "org-1".into(),
///         })
///         .await
///         .unwrap();
///     assert_eq!(client.get(user.id).await.unwrap(), Some(user));
/// }
/// ```
pub struct TableStore<R: Record> {
    receiver: mpsc::Receiver<StoreRequest<R>>,
    rows: BTreeMap<u32, R>,
    next_id: u32,
    clock: u64,
}

impl<R: Record> TableStore<R> {
    /// Creates the store and a client for it. `buffer_size` bounds the request queue.
    pub fn new(buffer_size: usize) -> (Self, TableClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            rows: BTreeMap::new(),
            next_id: 1,
            clock: 0,
        };
        (store, TableClient::new(sender))
    }

    /// Serves requests until every client is dropped.
    pub async fn run(mut self) {
        let table = R::TABLE;
        info!(table, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { params, respond_to } => {
                    debug!(table, ?params, "Create");
                    let id = self.next_id;
                    self.next_id += 1;
                    self.clock += 1;
                    let row = R::from_create(id, self.clock, params);
                    self.rows.insert(row.id(), row.clone());
                    info!(table, id = row.id(), size = self.rows.len(), "Created");
                    let _ = respond_to.send(Ok(row));
                }
                StoreRequest::Get { id, respond_to } => {
                    let row = self.rows.get(&id).cloned();
                    debug!(table, id, found = row.is_some(), "Get");
                    let _ = respond_to.send(Ok(row));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(table, id, ?update, "Update");
                    match self.rows.get_mut(&id) {
                        Some(row) => {
                            row.apply_update(update);
                            info!(table, id, "Updated");
                            let _ = respond_to.send(Ok(row.clone()));
                        }
                        None => {
                            warn!(table, id, "Not found");
                            let _ = respond_to.send(Err(StoreError::NotFound { table, id }));
                        }
                    }
                }
                StoreRequest::Delete { id, respond_to } => {
                    if self.rows.remove(&id).is_some() {
                        info!(table, id, size = self.rows.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(table, id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound { table, id }));
                    }
                }
                StoreRequest::List {
                    request,
                    respond_to,
                } => {
                    let body = query::run_list(self.rows.values(), &request)
                        .and_then(|page| {
                            debug!(
                                table,
                                page = request.page_number,
                                rows = page.rows.len(),
                                total = page.total_count,
                                "List"
                            );
                            serde_json::to_string(&page).map_err(StoreError::from)
                        });
                    if let Err(e) = &body {
                        warn!(table, error = %e, "List failed");
                    }
                    let _ = respond_to.send(body);
                }
            }
        }

        info!(table, rows = self.rows.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User, UserCreate};

    fn params(name: &str) -> UserCreate {
        UserCreate {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: Role::Staff,
            organization_id: "org-1".into(),
        }
    }

    #[tokio::test]
    async fn test_rows_are_keyed_by_their_own_id() {
        let (store, client) = TableStore::<User>::new(8);
        tokio::spawn(store.run());

        let ada = client.create(params("Ada")).await.unwrap();
        let grace = client.create(params("Grace")).await.unwrap();
        assert_eq!((ada.id, grace.id), (1, 2));
        assert!(grace.created_at > ada.created_at);

        assert_eq!(client.get(grace.id).await.unwrap(), Some(grace.clone()));
        client.delete(ada.id).await.unwrap();
        assert_eq!(client.get(ada.id).await.unwrap(), None);
        assert_eq!(client.get(grace.id).await.unwrap(), Some(grace));
    }
}
