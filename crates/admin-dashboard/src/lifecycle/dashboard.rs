use super::seed;
use crate::clients::TableClient;
use crate::context::{AppContext, TenantContext};
use crate::model::{Order, Product, Record, SubCategory, User};
use crate::notifier::ToastLog;
use crate::pages::ListPage;
use crate::settings::Settings;
use crate::store::{StoreError, TableStore};
use page_controller::{ControllerConfig, GridHandle, PageController};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Owns the table stores, the session and every open list.
pub struct Dashboard {
    pub products: TableClient<Product>,
    pub sub_categories: TableClient<SubCategory>,
    pub users: TableClient<User>,
    pub orders: TableClient<Order>,
    pub toasts: ToastLog,
    context: AppContext,
    controller_config: ControllerConfig,
    shutdown: CancellationToken,
    stores: Vec<JoinHandle<()>>,
    lists: Vec<OpenList>,
}

/// Tasks backing one open list.
struct OpenList {
    controller: JoinHandle<()>,
    tenant_watch: JoinHandle<()>,
}

fn start_store<R: Record>(
    buffer: usize,
    latency: Duration,
    handles: &mut Vec<JoinHandle<()>>,
) -> TableClient<R> {
    let (store, client) = TableStore::<R>::new(buffer);
    handles.push(tokio::spawn(store.run()));
    client.with_latency(latency)
}

impl Dashboard {
    /// Starts one store per table. Must be called inside a Tokio runtime.
    pub fn new(settings: &Settings, context: AppContext) -> Self {
        let buffer = settings.store_buffer.max(1);
        let latency = settings.store_latency();
        let mut stores = Vec::with_capacity(4);

        let products = start_store(buffer, latency, &mut stores);
        let sub_categories = start_store(buffer, latency, &mut stores);
        let users = start_store(buffer, latency, &mut stores);
        let orders = start_store(buffer, latency, &mut stores);
        info!(stores = stores.len(), latency_ms = settings.store_latency_ms, "Dashboard started");

        Self {
            products,
            sub_categories,
            users,
            orders,
            toasts: ToastLog::new(),
            context,
            controller_config: settings.controller.clone(),
            shutdown: CancellationToken::new(),
            stores,
            lists: Vec::new(),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Number of lists opened so far.
    pub fn open_lists(&self) -> usize {
        self.lists.len()
    }

    pub async fn seed(&self, products_per_branch: u32) -> Result<(), StoreError> {
        seed::seed_demo_data(self, products_per_branch).await
    }

    /// Opens a list controller for `page` backed by `client`.
    ///
    /// The controller is scoped to the current tenant and reloads from the first
    /// page whenever the session changes.
    pub fn open_list<R: Record>(&mut self, page: ListPage, client: TableClient<R>) -> GridHandle<R> {
        let config = page.controller_config(&self.controller_config);
        let (controller, handle) = PageController::new(client, config);
        let controller = controller
            .with_name(page.name())
            .with_notifier(self.toasts.scoped(page.name()))
            .with_scope(self.context.scope(page));

        self.lists.push(OpenList {
            controller: controller.spawn(),
            tenant_watch: tokio::spawn(watch_tenant(
                page,
                handle.clone(),
                self.context.subscribe(),
                self.shutdown.clone(),
            )),
        });
        info!(%page, "List opened");
        handle
    }

    pub fn open_products(&mut self) -> GridHandle<Product> {
        let client = self.products.clone();
        self.open_list(ListPage::Products, client)
    }

    pub fn open_sub_categories(&mut self) -> GridHandle<SubCategory> {
        let client = self.sub_categories.clone();
        self.open_list(ListPage::SubCategories, client)
    }

    pub fn open_users(&mut self) -> GridHandle<User> {
        let client = self.users.clone();
        self.open_list(ListPage::Users, client)
    }

    pub fn open_orders(&mut self) -> GridHandle<Order> {
        let client = self.orders.clone();
        self.open_list(ListPage::Orders, client)
    }

    /// Disposes every list, then stops the stores once their clients are gone.
    ///
    /// Client clones held outside the dashboard keep their store alive, so drop
    /// them first.
    pub async fn shutdown(self) {
        let Self {
            products,
            sub_categories,
            users,
            orders,
            shutdown,
            stores,
            lists,
            ..
        } = self;

        info!(lists = lists.len(), "Shutting down dashboard");
        shutdown.cancel();
        for list in lists {
            let _ = list.tenant_watch.await;
            let _ = list.controller.await;
        }

        drop(products);
        drop(sub_categories);
        drop(users);
        drop(orders);
        for handle in stores {
            let _ = handle.await;
        }
        info!("Dashboard stopped");
    }
}

/// Reloads `handle` on every session change until shutdown.
async fn watch_tenant<R: Clone + Send + Sync + 'static>(
    page: ListPage,
    handle: GridHandle<R>,
    mut tenant: watch::Receiver<Option<TenantContext>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = handle.dispose().await;
                break;
            }
            changed = tenant.changed() => {
                if changed.is_err() {
                    break;
                }
                debug!(%page, "Tenant changed, reloading");
                if handle.reload().await.is_err() {
                    break;
                }
            }
        }
    }
}
