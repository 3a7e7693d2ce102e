//! Directus backend access
//!
//! The dispatcher only sees the [`StaffDirectory`] trait; [`DirectusClient`]
//! is the HTTP implementation used in production.

pub mod client;
pub mod filter;

pub use client::DirectusClient;

use crate::error::BackendError;
use crate::models::{AccessItem, Employee};
use async_trait::async_trait;

/// Lookup of staff records for chat users
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Find the published employee for a Telegram user.
    ///
    /// Looks up by numeric id first and falls back to the username when one is
    /// given. `Ok(None)` means the user is simply not registered.
    async fn resolve_employee(
        &self,
        external_id: i64,
        username: Option<&str>,
    ) -> Result<Option<Employee>, BackendError>;

    /// Ping the backend. Never fails; any problem reads as `false`.
    async fn check_connectivity(&self) -> bool;
}

/// Published access items of an employee, in relation order.
///
/// Purely local: the items were already expanded by the staff query.
pub fn list_accesses(employee: Option<&Employee>) -> Vec<AccessItem> {
    let Some(employee) = employee else {
        return Vec::new();
    };

    employee
        .grants
        .iter()
        .filter_map(|grant| grant.item.as_ref())
        .filter(|item| item.status.is_published())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessGrant, PublicationStatus};

    fn item(name: &str, status: PublicationStatus) -> AccessItem {
        AccessItem {
            name: name.to_string(),
            status,
            ..Default::default()
        }
    }

    fn grant(item: Option<AccessItem>) -> AccessGrant {
        AccessGrant { item }
    }

    #[test]
    fn test_list_accesses_none() {
        assert!(list_accesses(None).is_empty());
    }

    #[test]
    fn test_list_accesses_no_grants() {
        let employee = Employee::default();
        assert!(list_accesses(Some(&employee)).is_empty());
    }

    #[test]
    fn test_list_accesses_filters_and_keeps_order() {
        let employee = Employee {
            grants: vec![
                grant(Some(item("Gitlab", PublicationStatus::Published))),
                grant(None),
                grant(Some(item("Old CRM", PublicationStatus::Archived))),
                grant(Some(item("VPN", PublicationStatus::Published))),
                grant(Some(item("Wiki", PublicationStatus::Draft))),
                grant(Some(item("Mail", PublicationStatus::Published))),
            ],
            ..Default::default()
        };

        let names: Vec<String> = list_accesses(Some(&employee))
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Gitlab", "VPN", "Mail"]);
    }
}
