use super::Record;
use serde::{Deserialize, Serialize};

/// The sub-category a product is filed under, embedded so lists can filter on
/// `subCategory.title` without a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryRef {
    pub id: u32,
    pub title: String,
}

/// A catalogue item sold by one branch of an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
    pub sub_category: Option<SubCategoryRef>,
    pub organization_id: String,
    pub branch_id: String,
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub title: String,
    pub price: f64,
    pub quantity: u32,
    pub sub_category: Option<SubCategoryRef>,
    pub organization_id: String,
    pub branch_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

impl Record for Product {
    type Create = ProductCreate;
    type Update = ProductUpdate;

    const TABLE: &'static str = "products";

    fn id(&self) -> u32 {
        self.id
    }

    fn from_create(id: u32, created_at: u64, params: ProductCreate) -> Self {
        Self {
            id,
            title: params.title,
            price: params.price,
            quantity: params.quantity,
            sub_category: params.sub_category,
            organization_id: params.organization_id,
            branch_id: params.branch_id,
            created_at,
        }
    }

    fn apply_update(&mut self, update: ProductUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_serializes_with_camel_case_paths() {
        let product = Product::from_create(
            3,
            7,
            ProductCreate {
                title: "Gouda".into(),
                price: 4.5,
                quantity: 12,
                sub_category: Some(SubCategoryRef {
                    id: 1,
                    title: "Cheese".into(),
                }),
                organization_id: "org-1".into(),
                branch_id: "north".into(),
            },
        );

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["subCategory"]["title"], "Cheese");
        assert_eq!(json["organizationId"], "org-1");
        assert_eq!(json["createdAt"], 7);
    }

    #[test]
    fn test_partial_update_keeps_untouched_fields() {
        let mut product = Product::from_create(
            1,
            1,
            ProductCreate {
                title: "Milk".into(),
                price: 1.0,
                quantity: 5,
                sub_category: None,
                organization_id: "org-1".into(),
                branch_id: "north".into(),
            },
        );
        product.apply_update(ProductUpdate {
            price: Some(1.25),
            ..Default::default()
        });

        assert_eq!(product.title, "Milk");
        assert_eq!(product.price, 1.25);
        assert_eq!(product.quantity, 5);
    }
}
