//! Type-safe clients for the table stores.

pub mod table_client;
pub mod wire;

pub use table_client::TableClient;
pub use wire::parse_list_body;
