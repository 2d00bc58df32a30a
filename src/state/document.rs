use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bindings::BindingRegistry;
use super::targets::StackTargetRegistry;
use super::tasks::TrackedTaskRegistry;

/// The on-disk state document: one structured object per organization.
///
/// Field names are an external contract; documents written by earlier
/// versions of the orchestrator load with missing sections treated as
/// empty, which is why every section other than the identity carries a
/// serde default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    /// Identity of the organization root account. Immutable once persisted.
    #[serde(default)]
    pub(crate) master_account_id: String,
    #[serde(default)]
    pub(crate) bindings: BindingRegistry,
    #[serde(default)]
    pub(crate) stacks: StackTargetRegistry,
    #[serde(default)]
    pub(crate) values: BTreeMap<String, String>,
    /// Full text of the last successfully processed organization template.
    #[serde(default)]
    pub(crate) previous_template: String,
    #[serde(default)]
    pub(crate) tracked_tasks: TrackedTaskRegistry,
}
