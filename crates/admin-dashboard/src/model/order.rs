use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: String,
}

/// A customer order placed at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u32,
    /// Human-facing order number, e.g. `ORD-0042`.
    pub number: String,
    pub customer: Customer,
    pub status: OrderStatus,
    pub total: f64,
    pub organization_id: String,
    pub branch_id: String,
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: Customer,
    pub total: f64,
    pub organization_id: String,
    pub branch_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
}

impl Record for Order {
    type Create = OrderCreate;
    type Update = OrderUpdate;

    const TABLE: &'static str = "orders";

    fn id(&self) -> u32 {
        self.id
    }

    fn from_create(id: u32, created_at: u64, params: OrderCreate) -> Self {
        Self {
            id,
            number: format!("ORD-{id:04}"),
            customer: params.customer,
            status: OrderStatus::Pending,
            total: params.total,
            organization_id: params.organization_id,
            branch_id: params.branch_id,
            created_at,
        }
    }

    fn apply_update(&mut self, update: OrderUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}
