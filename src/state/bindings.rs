use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known organizational resource types used as binding keys.
///
/// The registry itself is keyed by arbitrary type strings; these
/// constants cover the resource kinds the organization model declares.
pub mod resource_types {
    pub const MASTER_ACCOUNT: &str = "OC::ORG::MasterAccount";
    pub const ACCOUNT: &str = "OC::ORG::Account";
    pub const ORGANIZATIONAL_UNIT: &str = "OC::ORG::OrganizationalUnit";
    pub const ORGANIZATION_ROOT: &str = "OC::ORG::OrganizationRoot";
    pub const SERVICE_CONTROL_POLICY: &str = "OC::ORG::ServiceControlPolicy";
    pub const PASSWORD_POLICY: &str = "OC::ORG::PasswordPolicy";
}

/// Resolved identity of one organizational-model resource: which
/// provider resource a declared logical id maps to, and the fingerprint
/// of the definition last applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    #[serde(default)]
    pub logical_id: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Provider-assigned physical id. Empty until provisioning completes;
    /// the hash is often known first (see `set_hash`).
    #[serde(default)]
    pub physical_id: String,
    #[serde(default)]
    pub last_committed_hash: String,
}

/// Organizational bindings keyed resource type -> logical id.
///
/// Unlike stack targets, removing the last binding of a type leaves the
/// emptied type map in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingRegistry {
    bindings: BTreeMap<String, BTreeMap<String, Binding>>,
}

impl BindingRegistry {
    pub(crate) fn get(&self, resource_type: &str, logical_id: &str) -> Option<&Binding> {
        let result = self
            .bindings
            .get(resource_type)
            .and_then(|type_map| type_map.get(logical_id));

        if result.is_none() {
            // Expected during first-time provisioning, hence debug level.
            tracing::debug!("unable to find binding for {}/{}", resource_type, logical_id);
        }

        result
    }

    /// Account lookup with master-account fallback: the organization root
    /// can be declared either as a dedicated master-account resource or
    /// as a regular account, and callers should not have to care which.
    pub(crate) fn get_account(&self, logical_id: &str) -> Option<&Binding> {
        let master = self
            .bindings
            .get(resource_types::MASTER_ACCOUNT)
            .and_then(|type_map| type_map.get(logical_id));

        match master {
            Some(binding) => Some(binding),
            None => self.get(resource_types::ACCOUNT, logical_id),
        }
    }

    /// All bindings under one resource type.
    pub(crate) fn enumerate(&self, resource_type: &str) -> Vec<&Binding> {
        match self.bindings.get(resource_type) {
            Some(type_map) => type_map.values().collect(),
            None => Vec::new(),
        }
    }

    /// Upsert under the (type, logicalId) implied by the binding's fields.
    pub(crate) fn set(&mut self, binding: Binding) {
        self.bindings
            .entry(binding.resource_type.clone())
            .or_default()
            .insert(binding.logical_id.clone(), binding);
    }

    /// Replace the entire type map with this single binding, discarding
    /// stale siblings from prior runs. Used for types modeled as having
    /// at most one binding.
    pub(crate) fn set_unique_for_type(&mut self, binding: Binding) {
        let type_map = self
            .bindings
            .entry(binding.resource_type.clone())
            .or_default();
        type_map.clear();
        type_map.insert(binding.logical_id.clone(), binding);
    }

    /// Record the fingerprint for a binding, creating a minimal entry if
    /// the binding does not exist yet. The hash is often known before
    /// provisioning assigns a physical id.
    pub(crate) fn set_hash(&mut self, resource_type: &str, logical_id: &str, hash: &str) {
        let type_map = self.bindings.entry(resource_type.to_string()).or_default();

        match type_map.get_mut(logical_id) {
            Some(binding) => binding.last_committed_hash = hash.to_string(),
            None => {
                type_map.insert(
                    logical_id.to_string(),
                    Binding {
                        logical_id: logical_id.to_string(),
                        resource_type: resource_type.to_string(),
                        physical_id: String::new(),
                        last_committed_hash: hash.to_string(),
                    },
                );
            }
        }
    }

    /// Record the provider-assigned physical id for a binding, creating a
    /// minimal entry if the binding does not exist yet.
    pub(crate) fn set_physical_id(&mut self, resource_type: &str, logical_id: &str, physical_id: &str) {
        let type_map = self.bindings.entry(resource_type.to_string()).or_default();

        match type_map.get_mut(logical_id) {
            Some(binding) => binding.physical_id = physical_id.to_string(),
            None => {
                type_map.insert(
                    logical_id.to_string(),
                    Binding {
                        logical_id: logical_id.to_string(),
                        resource_type: resource_type.to_string(),
                        physical_id: physical_id.to_string(),
                        last_committed_hash: String::new(),
                    },
                );
            }
        }
    }

    /// Remove a binding by (type, logicalId).
    /// Returns whether an entry was actually removed. The type map is not
    /// pruned when it becomes empty.
    pub(crate) fn remove(&mut self, resource_type: &str, logical_id: &str) -> bool {
        match self.bindings.get_mut(resource_type) {
            Some(type_map) => type_map.remove(logical_id).is_some(),
            None => false,
        }
    }
}
