use std::sync::Arc;

use tempfile::TempDir;

use orgstate::{
    resource_types, Binding, FileStorageProvider, MemoryStorageProvider, PersistedState,
    StackTarget, StateError, TrackedTask,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample_target(stack: &str, account: &str, region: &str) -> StackTarget {
    StackTarget {
        logical_account_id: format!("Logical{}", account),
        account_id: account.to_string(),
        region: region.to_string(),
        stack_name: stack.to_string(),
        termination_protection: Some(false),
        last_committed_hash: orgstate::fingerprint::sha256_hex(b"Resources: {}"),
    }
}

fn sample_binding(logical_id: &str) -> Binding {
    Binding {
        logical_id: logical_id.to_string(),
        resource_type: resource_types::ACCOUNT.to_string(),
        physical_id: "444455556666".to_string(),
        last_committed_hash: orgstate::fingerprint::sha256_hex(b"Type: OC::ORG::Account"),
    }
}

#[test]
fn test_full_roundtrip_across_sessions() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");

    // First session: populate and save.
    {
        let provider = FileStorageProvider::new(&state_file);
        let mut state = PersistedState::load(provider, "123123123123").unwrap();

        state.set_target(sample_target("budgets", "111122223333", "eu-west-1"));
        state.set_binding(sample_binding("DevAccount"));
        state.set_tracked_tasks(
            "tasks.yml",
            vec![TrackedTask {
                logical_name: "BudgetAlarms".to_string(),
                physical_id_for_cleanup: "budgets-111122223333-eu-west-1".to_string(),
                task_type: "update-stacks".to_string(),
            }],
        );
        state.put_value("organization.version", "42");
        state.set_previous_template("Organization:\n  MasterAccount: {}\n");

        state.save().unwrap();
    }

    // Second session: everything populated comes back, same identity.
    let provider = FileStorageProvider::new(&state_file);
    let state = PersistedState::load(provider, "123123123123").unwrap();

    let target = state
        .get_target("budgets", "111122223333", "eu-west-1")
        .unwrap();
    assert_eq!(target.logical_account_id, "Logical111122223333");
    assert_eq!(target.termination_protection, Some(false));

    let binding = state
        .get_binding(resource_types::ACCOUNT, "DevAccount")
        .unwrap();
    assert_eq!(binding.physical_id, "444455556666");

    let tracked = state.get_tracked_tasks("tasks.yml");
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].logical_name, "BudgetAlarms");

    assert_eq!(state.get_value("organization.version"), Some("42"));
    assert_eq!(
        state.get_previous_template(),
        "Organization:\n  MasterAccount: {}\n"
    );
}

#[test]
fn test_identity_is_checked_on_every_load() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");

    {
        let provider = FileStorageProvider::new(&state_file);
        let mut state = PersistedState::load(provider, "123123123123").unwrap();
        state.put_template_hash("abc");
        state.save().unwrap();
    }

    // Same identity loads fine, any number of times.
    for _ in 0..2 {
        let provider = FileStorageProvider::new(&state_file);
        assert!(PersistedState::load(provider, "123123123123").is_ok());
    }

    // A different identity always fails, regardless of content.
    let provider = FileStorageProvider::new(&state_file);
    let err = PersistedState::load(provider, "999999999999").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StateError>(),
        Some(StateError::OrganizationMismatch { .. })
    ));
}

#[test]
fn test_dirty_flag_minimality_over_a_run() {
    let provider = Arc::new(MemoryStorageProvider::new());

    let mut state = PersistedState::load(provider.clone(), "123123123123").unwrap();
    state.save().unwrap();
    assert_eq!(provider.write_count(), 0, "clean store must not write");

    state.set_target(sample_target("budgets", "111122223333", "eu-west-1"));
    state.save().unwrap();
    state.save().unwrap();
    assert_eq!(provider.write_count(), 1, "one mutation, one write");

    state.remove_target("budgets", "111122223333", "eu-west-1");
    state.save().unwrap();
    assert_eq!(provider.write_count(), 2);
}

#[test]
fn test_cascade_prune_survives_persistence() {
    let provider = Arc::new(MemoryStorageProvider::new());

    let mut state = PersistedState::load(provider.clone(), "123123123123").unwrap();
    state.set_target(sample_target("budgets", "111122223333", "eu-west-1"));
    state.set_target(sample_target("budgets", "111122223333", "us-east-1"));
    state.remove_target("budgets", "111122223333", "eu-west-1");
    state.save().unwrap();

    let reloaded = PersistedState::load(provider.clone(), "123123123123").unwrap();
    assert_eq!(reloaded.list_stacks(), vec!["budgets".to_string()]);
    assert_eq!(reloaded.enum_targets("budgets").len(), 1);

    let mut state = reloaded;
    state.remove_target("budgets", "111122223333", "us-east-1");
    state.save().unwrap();

    let reloaded = PersistedState::load(provider, "123123123123").unwrap();
    assert!(reloaded.list_stacks().is_empty());
}

#[test]
fn test_loads_minimal_legacy_document() {
    // Documents written before optional sections existed load with those
    // sections empty.
    let provider = MemoryStorageProvider::with_content(
        "{\n  \"masterAccountId\": \"123123123123\",\n  \"stacks\": {}\n}",
    );

    let state = PersistedState::load(provider, "123123123123").unwrap();
    assert!(state.list_stacks().is_empty());
    assert!(state.enum_bindings(resource_types::ACCOUNT).is_empty());
    assert!(state.get_tracked_tasks("tasks.yml").is_empty());
    assert!(state.get_template_hash().is_none());
    assert_eq!(state.get_previous_template(), "");
}

#[test]
fn test_partially_constructed_binding_roundtrips() {
    let provider = Arc::new(MemoryStorageProvider::new());

    let mut state = PersistedState::load(provider.clone(), "123123123123").unwrap();
    state.set_binding_hash(resource_types::ACCOUNT, "acct1", "h1");
    state.save().unwrap();

    let reloaded = PersistedState::load(provider, "123123123123").unwrap();
    let partial = reloaded
        .get_binding(resource_types::ACCOUNT, "acct1")
        .unwrap();
    assert_eq!(partial.last_committed_hash, "h1");
    assert_eq!(partial.physical_id, "");
}

#[test]
fn test_serialized_document_is_the_external_contract() {
    let mut state = PersistedState::create_empty("123123123123");
    state.set_target(sample_target("budgets", "111122223333", "eu-west-1"));
    state.set_binding(sample_binding("DevAccount"));

    let json = state.serialize().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["masterAccountId"], "123123123123");
    assert!(value["stacks"]["budgets"]["111122223333"]["eu-west-1"].is_object());
    assert_eq!(
        value["stacks"]["budgets"]["111122223333"]["eu-west-1"]["stackName"],
        "budgets"
    );
    assert_eq!(
        value["bindings"][resource_types::ACCOUNT]["DevAccount"]["type"],
        resource_types::ACCOUNT
    );
    assert_eq!(
        value["bindings"][resource_types::ACCOUNT]["DevAccount"]["physicalId"],
        "444455556666"
    );
}
