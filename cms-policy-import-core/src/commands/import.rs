//! Import logic for the provisioning service

use log::{info, warn};

use crate::error::ImportResult;
use crate::remap::PolicyIdMap;
use crate::template::RbacTemplate;
use crate::types::{PermissionEntry, Policy};

/// End-of-run accounting for a provisioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Policies with a real identifier (created or found by name).
    pub policies_mapped: usize,
    /// Permission rules accepted by the instance.
    pub permissions_created: usize,
    /// Permission rules skipped or rejected.
    pub permissions_failed: usize,
}

impl super::service::ProvisionService {
    /// Provision every policy and permission in the template.
    ///
    /// Policies are processed in template order; each one that is created
    /// or recovered by name lookup enters the run's identifier map. The
    /// permission pass then rewrites each rule's policy reference through
    /// that map and submits the rules one at a time. Per-item failures are
    /// counted and the run continues; only transport-level login failure
    /// aborts (handled in `connect`). Partial failure is tolerated here,
    /// unlike the SQL path's all-or-nothing transaction.
    pub async fn import(&self, template: &RbacTemplate) -> ImportResult<ImportSummary> {
        let mut ids = PolicyIdMap::new();
        let mut summary = ImportSummary::default();

        info!("Creating {} policies", template.policies.len());
        for policy in &template.policies {
            match self.ensure_policy(policy).await {
                Some(real_id) => {
                    info!("Policy {:?} -> {}", policy.name, real_id);
                    ids.insert(policy.id.clone(), real_id);
                }
                None => {
                    warn!(
                        "Policy {:?} could not be created or found; its permissions will be skipped",
                        policy.name
                    );
                }
            }
        }
        summary.policies_mapped = ids.len();

        info!("Creating permissions");
        for entry in &template.permissions {
            let rule = match entry {
                PermissionEntry::Comment { comment } => {
                    info!("{comment}");
                    continue;
                }
                PermissionEntry::Rule(rule) => rule,
            };

            let Some(policy_id) = ids.resolve(&rule.policy) else {
                warn!(
                    "Skipping {}.{}: policy {:?} was not provisioned",
                    rule.collection, rule.action, rule.policy
                );
                summary.permissions_failed += 1;
                continue;
            };

            match self.client.create_permission(rule, policy_id).await {
                Ok(()) => {
                    summary.permissions_created += 1;
                    let policy_name = template.policy_name(&rule.policy).unwrap_or(&rule.policy);
                    info!("Created {}.{} ({})", rule.collection, rule.action, policy_name);
                }
                Err(err) => {
                    summary.permissions_failed += 1;
                    warn!("Failed {}.{}: {}", rule.collection, rule.action, err);
                }
            }
        }

        Ok(summary)
    }

    /// Create a policy, falling back to a name lookup when the instance
    /// refuses the create (a previous run usually left the policy behind).
    /// Returns the real identifier, or `None` when neither path produced
    /// one.
    async fn ensure_policy(&self, policy: &Policy) -> Option<String> {
        match self.client.create_policy(policy).await {
            Ok(id) => Some(id),
            Err(create_err) => {
                if let Ok(Some(id)) = self.client.find_policy_by_name(&policy.name).await {
                    info!("Policy {:?} already exists with id {}", policy.name, id);
                    Some(id)
                } else {
                    warn!("Failed to create policy {:?}: {}", policy.name, create_err);
                    None
                }
            }
        }
    }
}
