//! Role-gated credit ledger service.
//!
//! Composes the authorization layer, pause switch, miner registry, credit
//! log, and balance book behind a single writer lock. Every mutating
//! operation checks the pause flag first, then the caller's authority, then
//! the domain precondition, and only mutates once every check has passed;
//! a failed call leaves the state exactly as it found it.

use crate::access::AccessControl;
use crate::balances::{BalanceBook, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
use crate::config::LedgerConfig;
use crate::credits::CreditBook;
use crate::errors::{LedgerError, LedgerResult};
use crate::height::HeightSource;
use crate::registry::MinerRegistry;
use crate::types::{CreditRecord, MinerInfo, Principal};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Full persisted state of the credit ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub access: AccessControl,
    pub paused: bool,
    pub miners: MinerRegistry,
    pub credits: CreditBook,
    pub balances: BalanceBook,
}

impl LedgerState {
    pub fn new(owner: Principal) -> Self {
        Self {
            access: AccessControl::new(owner),
            paused: false,
            miners: MinerRegistry::new(),
            credits: CreditBook::new(),
            balances: BalanceBook::new(),
        }
    }
}

/// Single-writer credit ledger service.
///
/// The host guarantees serialized execution per operation; exposed as a
/// shared service, the writer lock reproduces that guarantee explicitly.
pub struct CreditLedger {
    state: RwLock<LedgerState>,
    height: Arc<dyn HeightSource>,
}

impl CreditLedger {
    pub fn new(owner: Principal, height: Arc<dyn HeightSource>) -> Self {
        Self::from_state(LedgerState::new(owner), height)
    }

    /// Resumes a ledger from host-persisted state.
    pub fn from_state(state: LedgerState, height: Arc<dyn HeightSource>) -> Self {
        Self {
            state: RwLock::new(state),
            height,
        }
    }

    /// Builds a fresh ledger from deployment configuration, installing the
    /// configured verifiers before the first operation runs.
    pub fn from_config(config: &LedgerConfig, height: Arc<dyn HeightSource>) -> Self {
        let mut state = LedgerState::new(Principal::new(config.owner.clone()));
        for verifier in &config.initial_verifiers {
            state.access.add_verifier(Principal::new(verifier.clone()));
        }
        Self::from_state(state, height)
    }

    /// Clones the current state for host-side persistence.
    pub fn snapshot(&self) -> LedgerResult<LedgerState> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerState>> {
        self.state.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn ensure_active(state: &LedgerState) -> LedgerResult<()> {
        if state.paused {
            Err(LedgerError::ContractPaused)
        } else {
            Ok(())
        }
    }

    // ---- access control ----

    /// Adds a principal to the verifier set. Owner-only; idempotent.
    pub fn add_verifier(&self, caller: &Principal, principal: Principal) -> LedgerResult<bool> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        state.access.require_owner(caller)?;
        state.access.add_verifier(principal.clone());
        info!(verifier = %principal, "verifier added");
        Ok(true)
    }

    /// Removes a principal from the verifier set. Owner-only; removing a
    /// non-member is not an error.
    pub fn remove_verifier(&self, caller: &Principal, principal: &Principal) -> LedgerResult<bool> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        state.access.require_owner(caller)?;
        state.access.remove_verifier(principal);
        info!(verifier = %principal, "verifier removed");
        Ok(true)
    }

    pub fn is_verifier(&self, principal: &Principal) -> LedgerResult<bool> {
        Ok(self.read()?.access.is_verifier(principal))
    }

    // ---- pause switch ----

    pub fn pause_contract(&self, caller: &Principal) -> LedgerResult<bool> {
        let mut state = self.write()?;
        state.access.require_owner(caller)?;
        state.paused = true;
        warn!("contract paused");
        Ok(true)
    }

    pub fn unpause_contract(&self, caller: &Principal) -> LedgerResult<bool> {
        let mut state = self.write()?;
        state.access.require_owner(caller)?;
        state.paused = false;
        info!("contract unpaused");
        Ok(true)
    }

    pub fn is_contract_paused(&self) -> LedgerResult<bool> {
        Ok(self.read()?.paused)
    }

    // ---- miner registry ----

    /// Records a miner's renewable-energy verification. Owner or verifier;
    /// a miner can only ever be verified once.
    pub fn verify_miner(
        &self,
        caller: &Principal,
        miner: &Principal,
        hash_power: u64,
        energy_source: &str,
    ) -> LedgerResult<bool> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        state.access.require_verifier(caller)?;
        let height = self.height.current_height();
        state
            .miners
            .verify(miner.clone(), hash_power, energy_source.to_string(), height)?;
        info!(miner = %miner, hash_power, energy_source, height, "miner verified");
        Ok(true)
    }

    /// Updates a verified miner's declared hash power. Owner or verifier.
    pub fn update_miner_hash_power(
        &self,
        caller: &Principal,
        miner: &Principal,
        hash_power: u64,
    ) -> LedgerResult<bool> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        state.access.require_verifier(caller)?;
        state.miners.update_hash_power(miner, hash_power)?;
        debug!(miner = %miner, hash_power, "miner hash power updated");
        Ok(true)
    }

    pub fn is_verified_miner(&self, miner: &Principal) -> LedgerResult<bool> {
        Ok(self.read()?.miners.is_verified(miner))
    }

    pub fn get_miner_info(&self, miner: &Principal) -> LedgerResult<Option<MinerInfo>> {
        Ok(self.read()?.miners.get(miner).cloned())
    }

    // ---- credit ledger ----

    /// Issues `amount` credits to a verified miner, snapshotting the
    /// miner's current claim into a new sequentially-numbered record.
    /// Returns the record id.
    pub fn issue_credits(
        &self,
        caller: &Principal,
        miner: &Principal,
        amount: u64,
    ) -> LedgerResult<u64> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        state.access.require_verifier(caller)?;
        let claim = match state.miners.get(miner) {
            Some(info) if info.verified => info.clone(),
            _ => return Err(LedgerError::MinerNotVerified(miner.clone())),
        };
        // Mint first: if the balance or supply would overflow, no record is
        // appended and the id counter does not advance.
        state.balances.mint(miner, amount)?;
        let height = self.height.current_height();
        let id = state
            .credits
            .append(miner.clone(), claim.hash_power, claim.energy_source, height);
        info!(credit = id, miner = %miner, amount, height, "credits issued");
        Ok(id)
    }

    /// Redeems `amount` from the caller's balance against a credit record.
    /// Only the recorded recipient may redeem, and only once per record;
    /// the total supply is unchanged.
    pub fn redeem_credits(&self, caller: &Principal, id: u64, amount: u64) -> LedgerResult<bool> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        let record = state.credits.get(id).ok_or(LedgerError::CreditNotFound(id))?;
        if record.miner != *caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not the recipient of credit {id}"
            )));
        }
        if record.redeemed {
            return Err(LedgerError::AlreadyRedeemed(id));
        }
        state.balances.debit(caller, amount)?;
        let height = self.height.current_height();
        // Cannot fail: existence and the redemption lock were checked above
        // under the same write guard.
        state.credits.mark_redeemed(id, caller.clone(), height)?;
        info!(credit = id, miner = %caller, amount, height, "credits redeemed");
        Ok(true)
    }

    pub fn get_credit_info(&self, id: u64) -> LedgerResult<Option<CreditRecord>> {
        Ok(self.read()?.credits.get(id).cloned())
    }

    // ---- fungible balances ----

    /// Moves `amount` from `sender` to `recipient`. The caller must be the
    /// sender; the memo is logged and never interpreted.
    pub fn transfer(
        &self,
        caller: &Principal,
        amount: u64,
        sender: &Principal,
        recipient: &Principal,
        memo: Option<&[u8]>,
    ) -> LedgerResult<bool> {
        let mut state = self.write()?;
        Self::ensure_active(&state)?;
        if caller != sender {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} cannot move {sender}'s balance"
            )));
        }
        state.balances.transfer(sender, recipient, amount)?;
        if let Some(memo) = memo {
            debug!(memo = %hex::encode(memo), "transfer memo");
        }
        info!(from = %sender, to = %recipient, amount, "transfer");
        Ok(true)
    }

    pub fn get_balance(&self, principal: &Principal) -> LedgerResult<u64> {
        Ok(self.read()?.balances.balance(principal))
    }

    pub fn get_total_supply(&self) -> LedgerResult<u64> {
        Ok(self.read()?.balances.total_supply())
    }

    pub fn get_name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn get_symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn get_decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }
}
