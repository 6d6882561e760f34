use pretty_assertions::assert_eq;
use schemacfg_sync::{
    PatchSettings, PolicyMode, RemoteColumn, RemoteSchema, RemoteSchemaConfig, RemoteTable,
    SyncError, read_upstream,
};

fn fetched_json() -> &'static str {
    r#"{
        "schema_change_handling": "ALLOW_COLUMNS",
        "enable_new_by_default": false,
        "schemas": {
            "public": {
                "name_in_destination": "public",
                "enabled": true,
                "tables": {
                    "users": {
                        "name_in_destination": "users",
                        "enabled": true,
                        "sync_mode": "SOFT_DELETE",
                        "enabled_patch_settings": { "allowed": true },
                        "columns": {
                            "id": {
                                "enabled": true,
                                "hashed": false,
                                "enabled_patch_settings": {
                                    "allowed": false,
                                    "reason_code": "SYSTEM_COLUMN",
                                    "reason": "Primary key"
                                }
                            },
                            "email": { "enabled": true, "hashed": true }
                        }
                    },
                    "_fivetran_audit": {
                        "enabled": false,
                        "enabled_patch_settings": { "allowed": false, "reason_code": "SYSTEM_TABLE" }
                    }
                }
            }
        }
    }"#
}

// ── Format conversion ────────────────────────────────────────────

#[test]
fn reads_policy_and_structure() {
    let remote: RemoteSchemaConfig = serde_json::from_str(fetched_json()).unwrap();
    let tree = read_upstream(&remote).unwrap();

    assert_eq!(tree.policy, PolicyMode::AllowColumns);
    assert_eq!(tree.schemas.len(), 1);
    assert_eq!(tree.table_count(), 2);
    assert_eq!(tree.column_count(), 2);

    let public = tree.schema("public").unwrap();
    assert_eq!(public.name, "public");
    assert_eq!(public.enabled, Some(true));
}

#[test]
fn locked_derived_from_patch_settings() {
    let remote: RemoteSchemaConfig = serde_json::from_str(fetched_json()).unwrap();
    let tree = read_upstream(&remote).unwrap();

    assert!(!tree.table("public", "users").unwrap().locked);
    assert!(tree.table("public", "_fivetran_audit").unwrap().locked);
    assert!(tree.column("public", "users", "id").unwrap().locked);
    // No marker at all means patchable.
    assert!(!tree.column("public", "users", "email").unwrap().locked);
}

#[test]
fn column_values_copied_verbatim() {
    let remote: RemoteSchemaConfig = serde_json::from_str(fetched_json()).unwrap();
    let tree = read_upstream(&remote).unwrap();

    let email = tree.column("public", "users", "email").unwrap();
    assert_eq!(email.name, "email");
    assert_eq!(email.enabled, Some(true));
    assert_eq!(email.hashed, Some(true));
}

#[test]
fn derived_flags_start_false() {
    let remote: RemoteSchemaConfig = serde_json::from_str(fetched_json()).unwrap();
    let tree = read_upstream(&remote).unwrap();

    for schema in tree.schemas.values() {
        assert!(!schema.excluded && !schema.handled);
        for table in schema.tables.values() {
            assert!(!table.excluded && !table.handled);
            for column in table.columns.values() {
                assert!(!column.excluded && !column.handled);
            }
        }
    }
}

#[test]
fn missing_enabled_reads_as_unset() {
    let mut remote = RemoteSchemaConfig {
        schema_change_handling: "BLOCK_ALL".into(),
        ..Default::default()
    };
    let mut table = RemoteTable::default();
    table.columns.insert("c1".into(), RemoteColumn::default());
    let mut schema = RemoteSchema::default();
    schema.tables.insert("t1".into(), table);
    remote.schemas.insert("s1".into(), schema);

    let tree = read_upstream(&remote).unwrap();
    assert_eq!(tree.schema("s1").unwrap().enabled, None);
    assert_eq!(tree.table("s1", "t1").unwrap().enabled, None);
    let c1 = tree.column("s1", "t1", "c1").unwrap();
    assert_eq!(c1.enabled, None);
    assert_eq!(c1.hashed, None);
    assert!(!c1.locked);
}

#[test]
fn empty_schemas_read_as_empty_tree() {
    let remote: RemoteSchemaConfig =
        serde_json::from_str(r#"{"schema_change_handling": "ALLOW_ALL"}"#).unwrap();
    let tree = read_upstream(&remote).unwrap();
    assert_eq!(tree.policy, PolicyMode::AllowAll);
    assert!(tree.is_empty());
}

// ── Patch settings ───────────────────────────────────────────────

#[test]
fn patch_settings_lock_rules() {
    assert!(!PatchSettings::is_locked(None));
    assert!(!PatchSettings::is_locked(Some(&PatchSettings::default())));
    assert!(!PatchSettings::is_locked(Some(&PatchSettings {
        allowed: Some(true),
        ..Default::default()
    })));
    assert!(PatchSettings::is_locked(Some(&PatchSettings {
        allowed: Some(false),
        reason_code: Some("SYSTEM_COLUMN".into()),
        reason: None,
    })));
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn unknown_policy_is_an_error() {
    let remote = RemoteSchemaConfig {
        schema_change_handling: "ALLOW_SOME".into(),
        ..Default::default()
    };
    let err = read_upstream(&remote).unwrap_err();
    assert!(matches!(err, SyncError::UnknownPolicy(ref t) if t == "ALLOW_SOME"));
}
