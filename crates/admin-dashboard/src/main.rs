//! Walks through a short back office session: sign in, page the products list,
//! search, switch branch, sign out.

use admin_dashboard::context::{AppContext, TenantContext};
use admin_dashboard::lifecycle::{setup_tracing, Dashboard};
use admin_dashboard::settings::Settings;
use admin_dashboard::DashboardError;
use page_controller::{FilterPredicate, SortDirection};
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    run().await.map_err(|e| e.to_string())
}

async fn run() -> Result<(), DashboardError> {
    let settings = Settings::load()?;
    let context = AppContext::hydrate(&settings.session_path).await?;
    if context.current().is_none() {
        context
            .login(TenantContext {
                user_name: "ada".into(),
                organization_id: "org-1".into(),
                branch_id: Some("north".into()),
            })
            .await?;
    }

    let mut dashboard = Dashboard::new(&settings, context);
    dashboard.seed(settings.seed_products).await?;

    let products = dashboard.open_products();
    let state = products.settled().await?;
    info!(rows = state.rows.len(), total = state.total_count, pages = state.page_count(), "Products loaded");

    async {
        products.set_page(1).await?;
        let state = products.settled().await?;
        info!(page = state.request.page_index, first = ?state.rows.first().map(|p| &p.title), "Second page");

        products.set_sort("price", SortDirection::Asc).await?;
        products
            .set_filters(vec![FilterPredicate::eq("subCategory.title", "Dairy")])
            .await?;
        let state = products.settled().await?;
        info!(rows = state.rows.len(), total = state.total_count, "Dairy by price");

        products.set_search_term("milk").await?;
        let state = products
            .wait_until(|s| s.request.search_term == "milk" && !s.loading)
            .await?;
        info!(rows = state.rows.len(), total = state.total_count, "Searched");
        Ok::<_, DashboardError>(())
    }
    .instrument(tracing::info_span!("products_list"))
    .await?;

    dashboard.context().switch_branch(Some("south".into())).await?;
    let state = products
        .wait_until(|s| s.rows.iter().all(|p| p.branch_id == "south") && !s.loading)
        .await?;
    info!(rows = state.rows.len(), total = state.total_count, "South branch");

    dashboard.context().logout().await?;
    let state = products.wait_until(|s| s.is_empty() && !s.loading).await?;
    info!(total = state.total_count, "Signed out");

    drop(products);
    dashboard.shutdown().await;
    Ok(())
}
