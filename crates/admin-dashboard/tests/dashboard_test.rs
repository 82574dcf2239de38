use admin_dashboard::context::{AppContext, TenantContext};
use admin_dashboard::lifecycle::Dashboard;
use admin_dashboard::model::{OrderStatus, OrderUpdate, ProductCreate, User};
use admin_dashboard::pages::ListPage;
use admin_dashboard::settings::Settings;
use admin_dashboard::store::TableStore;
use page_controller::{FilterPredicate, Phase};
use std::time::Duration;

fn tenant(branch: Option<&str>) -> TenantContext {
    TenantContext {
        user_name: "ada".into(),
        organization_id: "org-1".into(),
        branch_id: branch.map(str::to_string),
    }
}

async fn dashboard(products_per_branch: u32) -> Dashboard {
    let context = AppContext::in_memory(Some(tenant(Some("north"))));
    let dashboard = Dashboard::new(&Settings::default(), context);
    dashboard
        .seed(products_per_branch)
        .await
        .expect("Failed to seed");
    dashboard
}

#[tokio::test(start_paused = true)]
async fn test_products_list_is_scoped_to_tenant() {
    let mut dashboard = dashboard(10).await;
    let products = dashboard.open_products();

    let state = products.settled().await.unwrap();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.total_count, 10);
    assert!(state
        .rows
        .iter()
        .all(|p| p.organization_id == "org-1" && p.branch_id == "north"));

    // Newest first by default.
    let created: Vec<u64> = state.rows.iter().map(|p| p.created_at).collect();
    let mut sorted = created.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(created, sorted);

    drop(products);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_each_open_list_is_counted_once() {
    let mut dashboard = dashboard(2).await;
    assert_eq!(dashboard.open_lists(), 0);

    let products = dashboard.open_products();
    let orders = dashboard.open_orders();
    assert_eq!(dashboard.open_lists(), 2);
    products.settled().await.unwrap();
    orders.settled().await.unwrap();

    drop(products);
    drop(orders);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_user_filter_cannot_escape_tenant() {
    let mut dashboard = dashboard(5).await;
    let products = dashboard.open_products();
    products.settled().await.unwrap();

    products
        .set_filters(vec![FilterPredicate::eq("organizationId", "org-2")])
        .await
        .unwrap();
    let state = products.settled().await.unwrap();

    assert_eq!(state.total_count, 5);
    assert!(state.rows.iter().all(|p| p.organization_id == "org-1"));

    drop(products);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_branch_switch_reloads_from_first_page() {
    let mut dashboard = dashboard(30).await;
    let products = dashboard.open_products();
    products.settled().await.unwrap();

    products.set_page(1).await.unwrap();
    let state = products.settled().await.unwrap();
    assert_eq!(state.rows.len(), 10);

    dashboard
        .context()
        .switch_branch(Some("south".into()))
        .await
        .unwrap();
    let state = products
        .wait_until(|s| {
            s.request.page_index == 0
                && !s.loading
                && s.rows.iter().all(|p| p.branch_id == "south")
        })
        .await
        .unwrap();
    assert_eq!(state.rows.len(), 20);
    assert_eq!(state.total_count, 30);

    // All branches of the organization.
    dashboard.context().switch_branch(None).await.unwrap();
    let state = products
        .wait_until(|s| !s.loading && s.total_count == 60)
        .await
        .unwrap();
    assert_eq!(state.request.page_index, 0);

    drop(products);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_refresh_after_mutations() {
    let mut dashboard = dashboard(5).await;
    let products = dashboard.open_products();
    products.settled().await.unwrap();

    let created = dashboard
        .products
        .create(ProductCreate {
            title: "Goat Milk".into(),
            price: 3.0,
            quantity: 4,
            sub_category: None,
            organization_id: "org-1".into(),
            branch_id: "north".into(),
        })
        .await
        .unwrap();
    products.refresh().await.unwrap();
    let state = products.settled().await.unwrap();
    assert_eq!(state.total_count, 6);
    assert_eq!(state.rows[0].id, created.id);

    dashboard.products.delete(created.id).await.unwrap();
    products.refresh().await.unwrap();
    let state = products.settled().await.unwrap();
    assert_eq!(state.total_count, 5);
    assert!(state.rows.iter().all(|p| p.id != created.id));

    drop(products);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_search_is_debounced_and_case_insensitive() {
    let mut dashboard = dashboard(10).await;
    let products = dashboard.open_products();
    products.settled().await.unwrap();

    products.set_search_term("MI").await.unwrap();
    products.set_search_term("MILK ").await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let state = products.settled().await.unwrap();

    assert_eq!(state.request.search_term, "MILK");
    // Whole Milk, Oat Milk and their second-round copies.
    assert_eq!(state.total_count, 4);
    assert!(state
        .rows
        .iter()
        .all(|p| p.title.to_lowercase().contains("milk")));

    drop(products);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_orders_filter_by_status_and_search_by_customer_email() {
    let mut dashboard = dashboard(1).await;
    let orders = dashboard.open_orders();
    let state = orders.settled().await.unwrap();
    assert_eq!(state.total_count, 3);

    let first = state.rows[0].id;
    dashboard
        .orders
        .update(
            first,
            OrderUpdate {
                status: Some(OrderStatus::Paid),
            },
        )
        .await
        .unwrap();
    orders
        .set_filters(vec![FilterPredicate::eq("status", "paid")])
        .await
        .unwrap();
    let state = orders.settled().await.unwrap();
    assert_eq!(state.total_count, 1);
    assert_eq!(state.rows[0].id, first);

    orders.set_filters(Vec::new()).await.unwrap();
    orders.set_search_term("GRACE.customer").await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = orders.settled().await.unwrap();
    assert_eq!(state.total_count, 1);
    assert_eq!(state.rows[0].customer.name, "Grace Customer");

    drop(orders);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_logout_empties_every_list() {
    let mut dashboard = dashboard(3).await;
    let products = dashboard.open_products();
    let users = dashboard.open_users();
    assert_eq!(products.settled().await.unwrap().total_count, 3);
    assert_eq!(users.settled().await.unwrap().total_count, 3);

    dashboard.context().logout().await.unwrap();

    let state = products
        .wait_until(|s| !s.loading && s.total_count == 0)
        .await
        .unwrap();
    assert!(state.is_empty());
    assert_eq!(state.phase, Phase::Ready);
    let state = users
        .wait_until(|s| !s.loading && s.total_count == 0)
        .await
        .unwrap();
    assert!(state.is_empty());
    assert!(dashboard.toasts.is_empty());

    drop(products);
    drop(users);
    dashboard.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_store_raises_one_toast() {
    let mut dashboard = dashboard(1).await;

    let (store, client) = TableStore::<User>::new(4);
    let task = tokio::spawn(store.run());
    task.abort();
    let _ = task.await;

    let users = dashboard.open_list(ListPage::Users, client);
    let state = users.settled().await.unwrap();

    assert_eq!(state.phase, Phase::Errored);
    assert!(state.rows.is_empty());
    let toasts = dashboard.toasts.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].page, "users");
    assert!(toasts[0].message.contains("Store closed"));

    drop(users);
    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_session_survives_restart_until_logout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let context = AppContext::hydrate(&path).await.unwrap();
    assert!(context.current().is_none());
    context.login(tenant(Some("north"))).await.unwrap();
    context.switch_branch(Some("south".into())).await.unwrap();
    drop(context);

    let restored = AppContext::hydrate(&path).await.unwrap();
    assert_eq!(restored.current(), Some(tenant(Some("south"))));

    restored.logout().await.unwrap();
    assert!(restored.current().is_none());
    assert!(!path.exists());

    let fresh = AppContext::hydrate(&path).await.unwrap();
    assert!(fresh.current().is_none());
}

#[tokio::test]
async fn test_corrupt_session_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let result = AppContext::hydrate(&path).await;
    assert!(matches!(
        result,
        Err(admin_dashboard::context::ContextError::Parse(_))
    ));
}
