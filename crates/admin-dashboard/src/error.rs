use crate::context::ContextError;
use crate::settings::SettingsError;
use crate::store::StoreError;
use page_controller::GridError;

/// Any failure the dashboard can surface at the top level.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Grid(#[from] GridError),
}
