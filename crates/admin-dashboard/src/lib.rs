//! # Admin Dashboard
//!
//! A back office built on [`page_controller`]: every list screen (products,
//! sub-categories, users, orders) is a [`PageController`](page_controller::PageController)
//! over an in-memory REST stand-in, scoped to the signed-in tenant.
//!
//! - **[model]**: row types and the [`Record`](model::Record) contract.
//! - **[store]**: the table store actor that answers CRUD and list queries.
//! - **[clients]**: [`TableClient`](clients::TableClient), which is also the lists' data source.
//! - **[pages]**: per-screen presets.
//! - **[context]**: the session and the tenant filter scope.
//! - **[settings]**: layered configuration.
//! - **[lifecycle]**: [`Dashboard`](lifecycle::Dashboard), which wires it all together.

pub mod clients;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod notifier;
pub mod pages;
pub mod settings;
pub mod store;

pub use error::DashboardError;
