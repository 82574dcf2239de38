//! # Row Models
//!
//! The rows each list screen shows. They are plain data: the [`TableStore`](crate::store::TableStore)
//! owns them, and the list controllers only ever see clones.
//!
//! Rows serialize with camelCase keys. Filter fields and sort keys are dot paths
//! into that JSON form (`subCategory.title`, `customer.email`, `createdAt`).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub mod order;
pub mod product;
pub mod sub_category;
pub mod user;

pub use order::{Customer, Order, OrderCreate, OrderStatus, OrderUpdate};
pub use product::{Product, ProductCreate, ProductUpdate, SubCategoryRef};
pub use sub_category::{SubCategory, SubCategoryCreate, SubCategoryUpdate};
pub use user::{Role, User, UserCreate, UserUpdate};

/// Contract every row type implements to live in a [`TableStore`](crate::store::TableStore).
///
/// `created_at` is a logical timestamp handed out by the store, so the default
/// newest-first sort is deterministic.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Payload for a new row.
    type Create: Debug + Send + 'static;
    /// Partial update; `None` fields are left alone.
    type Update: Debug + Send + 'static;

    /// Table name used in logs and errors.
    const TABLE: &'static str;

    fn id(&self) -> u32;

    fn from_create(id: u32, created_at: u64, params: Self::Create) -> Self;

    fn apply_update(&mut self, update: Self::Update);
}
