use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: u32,
    pub title: String,
    /// Title of the parent category.
    pub category: String,
    pub organization_id: String,
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub struct SubCategoryCreate {
    pub title: String,
    pub category: String,
    pub organization_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct SubCategoryUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
}

impl Record for SubCategory {
    type Create = SubCategoryCreate;
    type Update = SubCategoryUpdate;

    const TABLE: &'static str = "sub_categories";

    fn id(&self) -> u32 {
        self.id
    }

    fn from_create(id: u32, created_at: u64, params: SubCategoryCreate) -> Self {
        Self {
            id,
            title: params.title,
            category: params.category,
            organization_id: params.organization_id,
            created_at,
        }
    }

    fn apply_update(&mut self, update: SubCategoryUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
    }
}
