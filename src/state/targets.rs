use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One deployment destination for one stack: the (account, region) cell a
/// stack template was applied to, and the fingerprint of what was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTarget {
    #[serde(default)]
    pub logical_account_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub stack_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_protection: Option<bool>,
    /// Fingerprint of the template and parameters last applied here.
    #[serde(default)]
    pub last_committed_hash: String,
}

type RegionMap = BTreeMap<String, StackTarget>;
type AccountMap = BTreeMap<String, RegionMap>;

/// Stack deployment targets keyed stack name -> account id -> region.
///
/// Invariant: emptied intermediate maps are pruned eagerly on removal, so
/// `stack_names` only ever reports stacks with at least one live target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackTargetRegistry {
    stacks: BTreeMap<String, AccountMap>,
}

impl StackTargetRegistry {
    pub(crate) fn get(&self, stack_name: &str, account_id: &str, region: &str) -> Option<&StackTarget> {
        self.stacks.get(stack_name)?.get(account_id)?.get(region)
    }

    /// Upsert at the (stack, account, region) path implied by the
    /// target's own fields, creating intermediate maps as needed.
    pub(crate) fn set(&mut self, target: StackTarget) {
        self.stacks
            .entry(target.stack_name.clone())
            .or_default()
            .entry(target.account_id.clone())
            .or_default()
            .insert(target.region.clone(), target);
    }

    /// All distinct stack names currently tracked.
    pub(crate) fn stack_names(&self) -> Vec<String> {
        self.stacks.keys().cloned().collect()
    }

    /// All targets across all accounts and regions for one stack.
    pub(crate) fn enumerate(&self, stack_name: &str) -> Vec<&StackTarget> {
        match self.stacks.get(stack_name) {
            Some(accounts) => accounts
                .values()
                .flat_map(|regions| regions.values())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Remove the leaf entry, then prune the account map if it became
    /// empty, and the stack map if that one did too.
    /// Returns whether an entry was actually removed.
    pub(crate) fn remove(&mut self, stack_name: &str, account_id: &str, region: &str) -> bool {
        let accounts = match self.stacks.get_mut(stack_name) {
            Some(accounts) => accounts,
            None => return false,
        };
        let regions = match accounts.get_mut(account_id) {
            Some(regions) => regions,
            None => return false,
        };

        if regions.remove(region).is_none() {
            return false;
        }

        if regions.is_empty() {
            accounts.remove(account_id);

            if accounts.is_empty() {
                self.stacks.remove(stack_name);
            }
        }

        true
    }
}
