//! Demo rows for a fresh dashboard.
//!
//! Two organizations: `org-1` with branches `north` and `south`, and `org-2`
//! with branch `central`. Content is deterministic so demos and tests line up.

use super::Dashboard;
use crate::model::{
    Customer, OrderCreate, ProductCreate, Role, SubCategoryCreate, SubCategoryRef, UserCreate,
};
use crate::store::StoreError;
use tracing::info;

pub const TENANTS: [(&str, &[&str]); 2] = [("org-1", &["north", "south"]), ("org-2", &["central"])];

const SUB_CATEGORIES: [(&str, &str); 4] = [
    ("Dairy", "Food"),
    ("Bakery", "Food"),
    ("Produce", "Food"),
    ("Cleaning", "Household"),
];

/// (title, index into `SUB_CATEGORIES`)
const PRODUCTS: [(&str, usize); 8] = [
    ("Whole Milk", 0),
    ("Oat Milk", 0),
    ("Cheddar", 0),
    ("Sourdough Loaf", 1),
    ("Rye Bread", 1),
    ("Apples", 2),
    ("Bananas", 2),
    ("Dish Soap", 3),
];

const USERS: [(&str, Role); 3] = [
    ("Ada", Role::Admin),
    ("Grace", Role::Manager),
    ("Linus", Role::Staff),
];

/// Populates every table. `products_per_branch` products go to each branch;
/// titles repeat with a numeric suffix once the catalogue runs out.
pub async fn seed_demo_data(
    dashboard: &Dashboard,
    products_per_branch: u32,
) -> Result<(), StoreError> {
    for (organization_id, branches) in TENANTS {
        let mut sub_categories = Vec::with_capacity(SUB_CATEGORIES.len());
        for (title, category) in SUB_CATEGORIES {
            let row = dashboard
                .sub_categories
                .create(SubCategoryCreate {
                    title: title.to_string(),
                    category: category.to_string(),
                    organization_id: organization_id.to_string(),
                })
                .await?;
            sub_categories.push(SubCategoryRef {
                id: row.id,
                title: row.title,
            });
        }

        for (name, role) in USERS {
            dashboard
                .users
                .create(UserCreate {
                    name: name.to_string(),
                    email: format!("{}@{organization_id}.example", name.to_lowercase()),
                    role,
                    organization_id: organization_id.to_string(),
                })
                .await?;
        }

        for branch_id in branches.iter() {
            for i in 0..products_per_branch as usize {
                let (base, sub) = PRODUCTS[i % PRODUCTS.len()];
                let round = i / PRODUCTS.len();
                let title = if round == 0 {
                    base.to_string()
                } else {
                    format!("{base} {}", round + 1)
                };
                dashboard
                    .products
                    .create(ProductCreate {
                        title,
                        price: 1.0 + (i % 17) as f64 * 0.75,
                        quantity: (i * 7 % 40) as u32,
                        sub_category: Some(sub_categories[sub].clone()),
                        organization_id: organization_id.to_string(),
                        branch_id: branch_id.to_string(),
                    })
                    .await?;
            }

            for (n, (name, _)) in USERS.iter().enumerate() {
                dashboard
                    .orders
                    .create(OrderCreate {
                        customer: Customer {
                            name: format!("{name} Customer"),
                            email: format!("{}.customer@mail.example", name.to_lowercase()),
                        },
                        total: 10.0 * (n + 1) as f64,
                        organization_id: organization_id.to_string(),
                        branch_id: branch_id.to_string(),
                    })
                    .await?;
            }
        }
    }

    info!(products_per_branch, "Demo data seeded");
    Ok(())
}
