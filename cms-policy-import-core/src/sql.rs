//! Idempotent SQL rendering.
//!
//! The whole script runs inside one transaction, so a partial failure rolls
//! back every insert. Each statement carries an `ON CONFLICT ... DO NOTHING`
//! guard, which makes re-running the script against the same database safe.

use log::warn;

use crate::remap::PolicyIdMap;
use crate::template::RbacTemplate;
use crate::types::{FieldList, PermissionEntry};

/// Render the template as a SQL import script.
///
/// Permission rules whose policy reference has no entry in `ids` are
/// dropped: a comment marks the gap in the script and a warning is logged,
/// but no statement with a dangling reference is ever emitted.
pub fn render_sql(template: &RbacTemplate, ids: &PolicyIdMap) -> String {
    let mut out = String::new();

    out.push_str("-- Import Role-Based Access Control Policies\n");
    out.push_str("-- AUTO-GENERATED with real UUIDs\n\n");
    out.push_str("BEGIN;\n\n");

    push_banner(
        &mut out,
        &format!("CREATE {} ROLE POLICIES", template.policies.len()),
    );

    for policy in &template.policies {
        let Some(policy_id) = ids.resolve(&policy.id) else {
            warn!("Skipping policy {:?}: no identifier mapped", policy.name);
            out.push_str(&format!(
                "-- SKIPPED policy {}: no identifier mapped\n\n",
                policy.name
            ));
            continue;
        };

        out.push_str(&format!("-- {} Policy\n", policy.name));
        out.push_str(
            "INSERT INTO directus_policies (id, name, icon, description, ip_access, enforce_tfa, admin_access, app_access)\n",
        );
        out.push_str("VALUES (\n");
        out.push_str(&format!("  '{policy_id}'::uuid,\n"));
        out.push_str(&format!("  {},\n", quote(&policy.name)));
        out.push_str(&format!("  {},\n", quote(&policy.icon)));
        out.push_str(&format!("  {},\n", quote(&policy.description)));
        out.push_str(&format!("  {},\n", opt_text(policy.ip_access.as_deref())));
        out.push_str(&format!("  {},\n", policy.enforce_tfa));
        out.push_str(&format!("  {},\n", policy.admin_access));
        out.push_str(&format!("  {}\n", policy.app_access));
        out.push_str(") ON CONFLICT (id) DO NOTHING;\n\n");
    }

    push_banner(&mut out, "PERMISSIONS");

    for entry in &template.permissions {
        let rule = match entry {
            PermissionEntry::Comment { comment } => {
                out.push_str(&format!("\n-- {comment}\n\n"));
                continue;
            }
            PermissionEntry::Rule(rule) => rule,
        };

        let Some(policy_id) = ids.resolve(&rule.policy) else {
            warn!(
                "Skipping {}.{}: unknown policy {:?}",
                rule.collection, rule.action, rule.policy
            );
            out.push_str(&format!(
                "-- SKIPPED {}.{}: unknown policy '{}'\n\n",
                rule.collection, rule.action, rule.policy
            ));
            continue;
        };

        let policy_name = template.policy_name(&rule.policy).unwrap_or(&rule.policy);
        out.push_str(&format!(
            "-- {}: {} {}\n",
            policy_name,
            rule.action.as_str().to_uppercase(),
            rule.collection
        ));
        out.push_str(
            "INSERT INTO directus_permissions (collection, action, permissions, validation, presets, fields, policy)\n",
        );
        out.push_str("VALUES (\n");
        out.push_str(&format!("  {},\n", quote(&rule.collection)));
        out.push_str(&format!("  {},\n", quote(rule.action.as_str())));
        out.push_str(&format!("  {},\n", opt_json(rule.permissions.as_ref())));
        out.push_str(&format!("  {},\n", opt_json(rule.validation.as_ref())));
        out.push_str(&format!("  {},\n", opt_json(rule.presets.as_ref())));
        out.push_str(&format!("  {},\n", opt_fields(rule.fields.as_ref())));
        out.push_str(&format!("  '{policy_id}'::uuid\n"));
        out.push_str(") ON CONFLICT DO NOTHING;\n\n");
    }

    out.push_str("COMMIT;\n\n");

    push_banner(&mut out, "Import complete!");
    out.push_str("-- Policy UUIDs for linking to roles:\n");
    for policy in &template.policies {
        if let Some(policy_id) = ids.resolve(&policy.id) {
            out.push_str(&format!("-- {}: {}\n", policy.name, policy_id));
        }
    }

    out
}

fn push_banner(out: &mut String, title: &str) {
    let rule = "-- =============================================================================\n";
    out.push_str(rule);
    out.push_str(&format!("-- {title}\n"));
    out.push_str(rule);
    out.push('\n');
}

/// Single-quoted SQL string literal with embedded quotes doubled.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Compact JSON blob as a SQL text literal, or `NULL` when absent.
fn opt_json(value: Option<&serde_json::Value>) -> String {
    value.map_or_else(
        || "NULL".to_string(),
        |value| {
            serde_json::to_string(value).map_or_else(|_| "NULL".to_string(), |json| quote(&json))
        },
    )
}

fn opt_fields(fields: Option<&FieldList>) -> String {
    fields.map_or_else(|| "NULL".to_string(), |fields| quote(&fields.join()))
}

fn opt_text(text: Option<&str>) -> String {
    text.map_or_else(|| "NULL".to_string(), quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_template() -> RbacTemplate {
        serde_json::from_value(json!({
            "policies": [
                {"id": "p_editor", "name": "Editor", "description": "Editor's workspace"},
                {"id": "p_viewer", "name": "Viewer", "description": "Read-only"}
            ],
            "permissions": [
                {"comment": "=== Editor ==="},
                {
                    "collection": "articles",
                    "action": "update",
                    "permissions": {"status": {"_eq": "draft"}},
                    "fields": ["id", "name"],
                    "policy": "p_editor"
                },
                {"collection": "articles", "action": "read", "fields": "*", "policy": "p_viewer"},
                {"collection": "secrets", "action": "read", "policy": "p_ghost"}
            ]
        }))
        .expect("valid template")
    }

    #[test]
    fn test_script_is_wrapped_in_a_transaction() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        let begin = script.find("BEGIN;").expect("has BEGIN");
        let commit = script.find("COMMIT;").expect("has COMMIT");
        let first_insert = script.find("INSERT INTO").expect("has inserts");
        let last_insert = script.rfind("INSERT INTO").expect("has inserts");
        assert!(begin < first_insert);
        assert!(last_insert < commit);
    }

    #[test]
    fn test_every_insert_is_conflict_guarded() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        let inserts = script.matches("INSERT INTO").count();
        let guards = script.matches("ON CONFLICT").count();
        assert_eq!(inserts, 4); // 2 policies + 2 resolvable permissions
        assert_eq!(guards, inserts);
    }

    #[test]
    fn test_statements_use_mapped_identifiers() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        let editor_id = ids.resolve("p_editor").expect("mapped");
        let viewer_id = ids.resolve("p_viewer").expect("mapped");
        assert!(script.contains(&format!("'{editor_id}'::uuid")));
        assert!(script.contains(&format!("'{viewer_id}'::uuid")));
        // Template identifiers never leak into statements.
        assert!(!script.contains("'p_editor'"));
        assert!(!script.contains("'p_viewer'"));
    }

    #[test]
    fn test_comment_marker_emits_no_statement() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        assert!(script.contains("-- === Editor ==="));
        assert_eq!(script.matches("INSERT INTO directus_permissions").count(), 2);
    }

    #[test]
    fn test_unresolved_reference_is_dropped_and_reported() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        assert!(script.contains("-- SKIPPED secrets.read: unknown policy 'p_ghost'"));
        assert!(!script.contains("'secrets',"));
    }

    #[test]
    fn test_quote_escaping() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        assert!(script.contains("'Editor''s workspace'"));
    }

    #[test]
    fn test_json_blob_and_field_list_serialization() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        assert!(script.contains(r#"'{"status":{"_eq":"draft"}}'"#));
        assert!(script.contains("'id,name'"));
        assert!(script.contains("'*'"));
    }

    #[test]
    fn test_trailing_listing_maps_names_to_identifiers() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        let listing = script
            .split("-- Policy UUIDs for linking to roles:")
            .nth(1)
            .expect("has listing");
        let editor_id = ids.resolve("p_editor").expect("mapped");
        assert!(listing.contains(&format!("-- Editor: {editor_id}")));
    }

    #[test]
    fn test_absent_optionals_render_null() {
        let template = sample_template();
        let ids = PolicyIdMap::mint(&template.policies);
        let script = render_sql(&template, &ids);

        // The viewer read rule has no filter/validation/presets.
        let stmt = script
            .split("-- Viewer: READ articles")
            .nth(1)
            .expect("has viewer statement");
        let values = stmt.split(") ON CONFLICT").next().expect("statement body");
        assert_eq!(values.matches("NULL").count(), 3);
    }
}
