//! # Session Context
//!
//! [`AppContext`] holds who is signed in and which organization and branch they
//! work in. It is passed explicitly to whoever needs it; there is no global.
//!
//! The session is persisted as JSON so a restart resumes it (`hydrate`), and
//! every change is broadcast on a `watch` channel. List pages read it through a
//! [`TenantScope`], which turns the current tenant into mandatory filters.
//!
//! ```text
//! login / switch_branch / logout
//!        │
//!        ▼
//!   watch::Sender ──▶ TenantScope (per list)   read on every request
//!                 └─▶ tenant watcher (per list) reload from page 0
//! ```

use crate::pages::{ListPage, TenantField};
use page_controller::{FilterPredicate, FilterScope, Scalar};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{debug, info};

/// The signed-in tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantContext {
    pub user_name: String,
    pub organization_id: String,
    /// `None` means "all branches of the organization".
    #[serde(default)]
    pub branch_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session file is not valid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No active session")]
    NotLoggedIn,
}

pub struct AppContext {
    path: Option<PathBuf>,
    sender: watch::Sender<Option<TenantContext>>,
}

impl AppContext {
    /// A context that is never written to disk.
    pub fn in_memory(tenant: Option<TenantContext>) -> Self {
        let (sender, _) = watch::channel(tenant);
        Self { path: None, sender }
    }

    /// Restores the session saved at `path`. A missing or empty file means
    /// nobody is signed in.
    pub async fn hydrate(path: impl Into<PathBuf>) -> Result<Self, ContextError> {
        let path = path.into();
        let tenant = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(serde_json::from_str::<TenantContext>(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), restored = tenant.is_some(), "Session hydrated");

        let (sender, _) = watch::channel(tenant);
        Ok(Self {
            path: Some(path),
            sender,
        })
    }

    pub fn current(&self) -> Option<TenantContext> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TenantContext>> {
        self.sender.subscribe()
    }

    pub async fn login(&self, tenant: TenantContext) -> Result<(), ContextError> {
        self.persist(&tenant).await?;
        info!(user = %tenant.user_name, organization = %tenant.organization_id, "Logged in");
        self.sender.send_replace(Some(tenant));
        Ok(())
    }

    /// Moves the session to another branch. Returns false if it was already there.
    pub async fn switch_branch(&self, branch_id: Option<String>) -> Result<bool, ContextError> {
        let mut tenant = self.current().ok_or(ContextError::NotLoggedIn)?;
        if tenant.branch_id == branch_id {
            debug!(?branch_id, "Branch unchanged");
            return Ok(false);
        }
        tenant.branch_id = branch_id;
        self.persist(&tenant).await?;
        info!(branch = ?tenant.branch_id, "Branch switched");
        self.sender.send_replace(Some(tenant));
        Ok(true)
    }

    /// Clears the session and deletes the saved file.
    pub async fn logout(&self) -> Result<(), ContextError> {
        self.sender.send_replace(None);
        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Logged out");
        Ok(())
    }

    /// The mandatory filters `page` gets from this session.
    pub fn scope(&self, page: ListPage) -> TenantScope {
        TenantScope {
            fields: page.tenant_fields(),
            tenant: self.subscribe(),
        }
    }

    async fn persist(&self, tenant: &TenantContext) -> Result<(), ContextError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(tenant)?;
            tokio::fs::write(path, json).await?;
        }
        Ok(())
    }
}

/// Mandatory tenant filters, read from the live session on every request.
///
/// Without a session the scope is `organizationId in []`, which matches nothing.
pub struct TenantScope {
    fields: &'static [TenantField],
    tenant: watch::Receiver<Option<TenantContext>>,
}

impl FilterScope for TenantScope {
    fn mandatory(&self) -> Vec<FilterPredicate> {
        let tenant = self.tenant.borrow();
        let Some(tenant) = tenant.as_ref() else {
            return vec![FilterPredicate::is_in(
                TenantField::Organization.path(),
                Vec::<Scalar>::new(),
            )];
        };
        self.fields
            .iter()
            .filter_map(|field| match field {
                TenantField::Organization => Some(FilterPredicate::eq(
                    field.path(),
                    tenant.organization_id.as_str(),
                )),
                TenantField::Branch => tenant
                    .branch_id
                    .as_deref()
                    .map(|branch| FilterPredicate::eq(field.path(), branch)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(branch: Option<&str>) -> TenantContext {
        TenantContext {
            user_name: "ada".into(),
            organization_id: "org-1".into(),
            branch_id: branch.map(str::to_string),
        }
    }

    #[test]
    fn test_scope_follows_page_fields() {
        let context = AppContext::in_memory(Some(tenant(Some("north"))));

        assert_eq!(
            context.scope(ListPage::Orders).mandatory(),
            vec![
                FilterPredicate::eq("organizationId", "org-1"),
                FilterPredicate::eq("branchId", "north"),
            ]
        );
        assert_eq!(
            context.scope(ListPage::Users).mandatory(),
            vec![FilterPredicate::eq("organizationId", "org-1")]
        );
    }

    #[test]
    fn test_all_branches_drops_branch_filter() {
        let context = AppContext::in_memory(Some(tenant(None)));
        assert_eq!(
            context.scope(ListPage::Products).mandatory(),
            vec![FilterPredicate::eq("organizationId", "org-1")]
        );
    }

    #[tokio::test]
    async fn test_scope_sees_changes_without_rebuilding() {
        let context = AppContext::in_memory(Some(tenant(Some("north"))));
        let scope = context.scope(ListPage::Products);

        assert!(context.switch_branch(Some("south".into())).await.unwrap());
        assert!(!context.switch_branch(Some("south".into())).await.unwrap());
        assert!(scope
            .mandatory()
            .contains(&FilterPredicate::eq("branchId", "south")));

        context.logout().await.unwrap();
        assert_eq!(
            scope.mandatory(),
            vec![FilterPredicate::is_in("organizationId", Vec::<Scalar>::new())]
        );
    }

    #[tokio::test]
    async fn test_switch_branch_requires_session() {
        let context = AppContext::in_memory(None);
        let result = context.switch_branch(Some("north".into())).await;
        assert!(matches!(result, Err(ContextError::NotLoggedIn)));
    }
}
