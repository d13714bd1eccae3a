//! Data model for the RBAC template document.
//!
//! The template carries two ordered lists: `policies` and `permissions`.
//! Policies are keyed by a template-local identifier which is never a real
//! storage identifier; permissions reference policies through that key and
//! the reference is rewritten at emission time.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A policy as declared in the template.
///
/// The `id` field is a template placeholder. It is stripped from API
/// payloads (the instance assigns its own identifier) and replaced with a
/// freshly minted UUID in SQL output. Flag defaults match what the
/// provisioning scripts have always written for role policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(skip_serializing)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub ip_access: Option<String>,
    #[serde(default = "default_true")]
    pub enforce_tfa: bool,
    #[serde(default)]
    pub admin_access: bool,
    #[serde(default = "default_true")]
    pub app_access: bool,
}

fn default_icon() -> String {
    "badge".to_string()
}

fn default_true() -> bool {
    true
}

/// One entry of the template's `permissions` list.
///
/// Comment markers carry no data; they exist to group the surrounding
/// entries in generated output and are never provisioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionEntry {
    Comment { comment: String },
    Rule(Permission),
}

/// A single permission rule binding a collection and an action to a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub collection: String,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldList>,
    /// Policy reference by template identifier.
    pub policy: String,
}

/// CRUD-style action a permission grants on its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Share,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Share => "share",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field constraint of a permission: either an ordered list of field names
/// or a single pre-joined string (both occur in templates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    Many(Vec<String>),
    One(String),
}

impl FieldList {
    /// Flatten to the comma-separated form used by the permissions table.
    pub fn join(&self) -> String {
        match self {
            Self::Many(fields) => fields.join(","),
            Self::One(fields) => fields.clone(),
        }
    }
}
