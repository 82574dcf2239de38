//! # List Pages
//!
//! Each back office list screen is the same controller with different presets:
//! which field the search box matches, how rows are sorted by default, and
//! which tenant fields are forced onto every request.

use page_controller::{ControllerConfig, Sorting};
use std::fmt::{self, Display};

/// A tenant attribute that scopes a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenantField {
    Organization,
    Branch,
}

impl TenantField {
    /// Row field the predicate targets.
    pub fn path(&self) -> &'static str {
        match self {
            TenantField::Organization => "organizationId",
            TenantField::Branch => "branchId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListPage {
    Products,
    SubCategories,
    Users,
    Orders,
}

impl ListPage {
    pub const ALL: [ListPage; 4] = [
        ListPage::Products,
        ListPage::SubCategories,
        ListPage::Users,
        ListPage::Orders,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ListPage::Products => "products",
            ListPage::SubCategories => "sub_categories",
            ListPage::Users => "users",
            ListPage::Orders => "orders",
        }
    }

    pub fn search_field(&self) -> &'static str {
        match self {
            ListPage::Products | ListPage::SubCategories => "title",
            ListPage::Users => "name",
            ListPage::Orders => "customer.email",
        }
    }

    pub fn default_sort(&self) -> Sorting {
        match self {
            ListPage::SubCategories => Sorting::asc("title"),
            _ => Sorting::desc("createdAt"),
        }
    }

    /// Sub-categories and users belong to the organization; products and
    /// orders also belong to a branch.
    pub fn tenant_fields(&self) -> &'static [TenantField] {
        match self {
            ListPage::Products | ListPage::Orders => {
                &[TenantField::Organization, TenantField::Branch]
            }
            ListPage::SubCategories | ListPage::Users => &[TenantField::Organization],
        }
    }

    /// `base` with this page's search field and default sort.
    pub fn controller_config(&self, base: &ControllerConfig) -> ControllerConfig {
        base.clone()
            .with_search_field(self.search_field())
            .with_default_sort(Some(self.default_sort()))
    }
}

impl Display for ListPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_config_keeps_base_tuning() {
        let base = ControllerConfig::default().with_page_size(50);
        let config = ListPage::Orders.controller_config(&base);

        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.search_field, "customer.email");
        assert_eq!(config.default_sort, Some(Sorting::desc("createdAt")));
    }

    #[test]
    fn test_branch_scoped_pages() {
        let scoped: Vec<ListPage> = ListPage::ALL
            .into_iter()
            .filter(|p| p.tenant_fields().contains(&TenantField::Branch))
            .collect();
        assert_eq!(scoped, vec![ListPage::Products, ListPage::Orders]);
    }
}
