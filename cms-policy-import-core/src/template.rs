//! RBAC template loading.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ImportResult};
use crate::types::{PermissionEntry, Policy};

/// Where the provisioning scripts have historically kept the template,
/// relative to the repository root.
pub const DEFAULT_TEMPLATE_PATH: &str = "schema/policies/complete-role-policies.json";

/// The parsed template document: two ordered lists, `policies` and
/// `permissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RbacTemplate {
    pub policies: Vec<Policy>,
    pub permissions: Vec<PermissionEntry>,
}

impl RbacTemplate {
    /// Load and parse the template document.
    ///
    /// Both failure modes (unreadable file, malformed document) are fatal
    /// to a provisioning run and carry the offending path.
    pub fn load(path: &Path) -> ImportResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ImportError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;

        let template: Self =
            serde_json::from_str(&raw).map_err(|source| ImportError::TemplateParse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Found {} policies and {} permissions in {}",
            template.policies.len(),
            template.permissions.len(),
            path.display()
        );
        Ok(template)
    }

    /// Display name of the policy with the given template identifier.
    pub fn policy_name(&self, template_id: &str) -> Option<&str> {
        self.policies
            .iter()
            .find(|policy| policy.id == template_id)
            .map(|policy| policy.name.as_str())
    }
}
