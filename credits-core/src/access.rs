use crate::errors::{LedgerError, LedgerResult};
use crate::types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Owner identity plus the set of delegated verifiers.
///
/// The owner is fixed at initialization and satisfies verifier-gated checks
/// without being a member of the set. Owner-only operations (verifier
/// management, pause control) require exact owner identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Principal,
    verifiers: HashSet<Principal>,
}

impl AccessControl {
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            verifiers: HashSet::new(),
        }
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn is_owner(&self, who: &Principal) -> bool {
        *who == self.owner
    }

    /// True for the owner or any member of the verifier set.
    pub fn is_verifier(&self, who: &Principal) -> bool {
        self.is_owner(who) || self.verifiers.contains(who)
    }

    pub fn require_owner(&self, caller: &Principal) -> LedgerResult<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "{caller} is not the owner"
            )))
        }
    }

    pub fn require_verifier(&self, caller: &Principal) -> LedgerResult<()> {
        if self.is_verifier(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "{caller} is not a verifier"
            )))
        }
    }

    /// Idempotent; returns whether the set changed.
    pub fn add_verifier(&mut self, principal: Principal) -> bool {
        self.verifiers.insert(principal)
    }

    /// Removing a non-member is not an error; returns whether the set changed.
    pub fn remove_verifier(&mut self, principal: &Principal) -> bool {
        self.verifiers.remove(principal)
    }

    pub fn verifier_count(&self) -> usize {
        self.verifiers.len()
    }
}
