//! This crate provides the core business logic for the CMS policy importer:
//! - RBAC template loading (policies + permissions JSON document)
//! - Template-identifier to UUID remapping
//! - Idempotent SQL script rendering
//! - Provisioning through the admin HTTP API
//!

mod api;
mod commands;
mod error;
mod remap;
mod sql;
mod template;
mod types;

// Re-exports for a small, focused public API
pub use api::{CmsClient, ConnectionConfig};
pub use commands::{ImportSummary, ProvisionService};
pub use error::{ImportError, ImportResult};
pub use remap::PolicyIdMap;
pub use sql::render_sql;
pub use template::{RbacTemplate, DEFAULT_TEMPLATE_PATH};
pub use types::{Action, FieldList, Permission, PermissionEntry, Policy};
