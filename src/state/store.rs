use anyhow::{Context, Result};

use crate::error::StateError;
use crate::storage::StorageProvider;

use super::bindings::Binding;
use super::document::StateDocument;
use super::targets::StackTarget;
use super::tasks::TrackedTask;

/// Scalar key under which the fingerprint of the last successfully
/// processed organization template is stored.
const TEMPLATE_HASH_KEY: &str = "organization.template.hash";

/// The persisted-state store: single source of truth for what has been
/// deployed where, and with which content fingerprint.
///
/// One orchestrator run owns one instance for its lifetime. All mutation
/// goes through these methods; no caller ever holds a mutable view into
/// the nested maps, which is what makes the dirty flag and the pruning
/// invariants enforceable. After a successful load, queries and
/// mutations are infallible; only `save` touches I/O again.
pub struct PersistedState {
    document: StateDocument,
    provider: Option<Box<dyn StorageProvider>>,
    dirty: bool,
}

impl std::fmt::Debug for PersistedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedState")
            .field("document", &self.document)
            .field("provider", &self.provider.as_ref().map(|_| "<provider>"))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PersistedState {
    /// Load the state document through the given provider.
    ///
    /// Absent or whitespace-only content yields a fresh document owned by
    /// `master_account_id`. Fails with [`StateError::Parse`] when the
    /// content is malformed and [`StateError::OrganizationMismatch`] when
    /// the persisted document belongs to a different organization.
    /// Provider I/O errors propagate unchanged.
    pub fn load(provider: impl StorageProvider + 'static, master_account_id: &str) -> Result<Self> {
        let contents = provider.get()?;

        let mut document = match contents {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str::<StateDocument>(&raw).map_err(StateError::Parse)?
            }
            _ => StateDocument::default(),
        };

        if document.master_account_id.is_empty() {
            // Documents persisted before identities were recorded adopt
            // the session identity on first load.
            document.master_account_id = master_account_id.to_string();
        } else if document.master_account_id != master_account_id {
            return Err(StateError::OrganizationMismatch {
                persisted: document.master_account_id,
                session: master_account_id.to_string(),
            }
            .into());
        }

        tracing::debug!("loaded state document for organization {}", master_account_id);

        Ok(PersistedState {
            document,
            provider: Some(Box::new(provider)),
            dirty: false,
        })
    }

    /// Build a fresh document with all sections empty and no provider
    /// attached.
    ///
    /// The store is dirty from birth: the first save through an explicit
    /// provider writes a baseline document even if nothing was mutated.
    pub fn create_empty(master_account_id: &str) -> Self {
        let document = StateDocument {
            master_account_id: master_account_id.to_string(),
            ..StateDocument::default()
        };

        PersistedState {
            document,
            provider: None,
            dirty: true,
        }
    }

    /// Identity of the organization root account for this session.
    pub fn master_account(&self) -> &str {
        &self.document.master_account_id
    }

    // ---- lifecycle ----

    /// Persist the document through the provider it was loaded from.
    ///
    /// No-op without a provider, and no-op when nothing changed since the
    /// last save. This is the only operation that clears the dirty flag.
    pub fn save(&mut self) -> Result<()> {
        if self.provider.is_none() || !self.dirty {
            return Ok(());
        }

        let json = self.serialize()?;
        if let Some(provider) = &self.provider {
            provider.put(&json)?;
        }
        self.dirty = false;

        tracing::info!(
            "persisted state document for organization {}",
            self.document.master_account_id
        );
        Ok(())
    }

    /// Persist through an explicit provider instead of the one the store
    /// was loaded from. Same batching: a clean store writes nothing.
    pub fn save_to(&mut self, provider: &dyn StorageProvider) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let json = self.serialize()?;
        provider.put(&json)?;
        self.dirty = false;

        tracing::info!(
            "persisted state document for organization {}",
            self.document.master_account_id
        );
        Ok(())
    }

    /// Render the document as stable, human-diffable JSON without
    /// touching the provider.
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.document).context("Failed to serialize state document")
    }

    // ---- stack targets ----

    pub fn get_target(&self, stack_name: &str, account_id: &str, region: &str) -> Option<&StackTarget> {
        self.document.stacks.get(stack_name, account_id, region)
    }

    /// Upsert a deployment target at the path implied by its own fields.
    pub fn set_target(&mut self, target: StackTarget) {
        self.document.stacks.set(target);
        self.dirty = true;
    }

    /// All distinct stack names with at least one live target.
    pub fn list_stacks(&self) -> Vec<String> {
        self.document.stacks.stack_names()
    }

    /// All targets across all accounts and regions for one stack.
    pub fn enum_targets(&self, stack_name: &str) -> Vec<&StackTarget> {
        self.document.stacks.enumerate(stack_name)
    }

    /// Remove a target if present; emptied account and stack maps are
    /// pruned so `list_stacks` stays accurate.
    pub fn remove_target(&mut self, stack_name: &str, account_id: &str, region: &str) {
        if self.document.stacks.remove(stack_name, account_id, region) {
            self.dirty = true;
        }
    }

    // ---- bindings ----

    pub fn get_binding(&self, resource_type: &str, logical_id: &str) -> Option<&Binding> {
        self.document.bindings.get(resource_type, logical_id)
    }

    /// Binding lookup for an account-like logical id, checking the
    /// master-account type first and falling back to the account type.
    pub fn get_account_binding(&self, logical_id: &str) -> Option<&Binding> {
        self.document.bindings.get_account(logical_id)
    }

    /// All bindings under one resource type.
    pub fn enum_bindings(&self, resource_type: &str) -> Vec<&Binding> {
        self.document.bindings.enumerate(resource_type)
    }

    /// Upsert a binding under the (type, logicalId) implied by its fields.
    pub fn set_binding(&mut self, binding: Binding) {
        self.document.bindings.set(binding);
        self.dirty = true;
    }

    /// Replace all bindings of the binding's type with this single entry.
    pub fn set_unique_binding_for_type(&mut self, binding: Binding) {
        self.document.bindings.set_unique_for_type(binding);
        self.dirty = true;
    }

    /// Record a binding's fingerprint, creating a minimal entry when the
    /// binding does not exist yet.
    pub fn set_binding_hash(&mut self, resource_type: &str, logical_id: &str, hash: &str) {
        self.document.bindings.set_hash(resource_type, logical_id, hash);
        self.dirty = true;
    }

    /// Record a binding's provider-assigned physical id, creating a
    /// minimal entry when the binding does not exist yet.
    pub fn set_binding_physical_id(&mut self, resource_type: &str, logical_id: &str, physical_id: &str) {
        self.document.bindings.set_physical_id(resource_type, logical_id, physical_id);
        self.dirty = true;
    }

    /// Remove a binding if present. The emptied type map is left behind.
    pub fn remove_binding(&mut self, binding: &Binding) {
        if self
            .document
            .bindings
            .remove(&binding.resource_type, &binding.logical_id)
        {
            self.dirty = true;
        }
    }

    // ---- tracked tasks ----

    /// Tasks previously declared in the given tasks file; empty if the
    /// file was never tracked.
    pub fn get_tracked_tasks(&self, tasks_file_name: &str) -> &[TrackedTask] {
        self.document.tracked_tasks.get(tasks_file_name)
    }

    /// Replace the tracked list for a tasks file wholesale.
    pub fn set_tracked_tasks(&mut self, tasks_file_name: &str, tasks: Vec<TrackedTask>) {
        self.document.tracked_tasks.set(tasks_file_name, tasks);
        self.dirty = true;
    }

    // ---- scalar values ----

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.document.values.get(key).map(String::as_str)
    }

    pub fn put_value(&mut self, key: &str, value: &str) {
        self.document.values.insert(key.to_string(), value.to_string());
        self.dirty = true;
    }

    /// Fingerprint of the last successfully processed organization
    /// template, if one was recorded.
    pub fn get_template_hash(&self) -> Option<&str> {
        self.get_value(TEMPLATE_HASH_KEY)
    }

    pub fn put_template_hash(&mut self, hash: &str) {
        self.put_value(TEMPLATE_HASH_KEY, hash);
    }

    // ---- previous template ----

    pub fn get_previous_template(&self) -> &str {
        &self.document.previous_template
    }

    pub fn set_previous_template(&mut self, template: &str) {
        self.document.previous_template = template.to_string();
        self.dirty = true;
    }
}
