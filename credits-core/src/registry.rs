use crate::errors::{LedgerError, LedgerResult};
use crate::types::{MinerInfo, Principal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum byte length of an attested energy source label.
pub const MAX_ENERGY_SOURCE_LEN: usize = 32;

/// Registry of mining operations that passed renewable-energy verification.
///
/// Records are created by verification and never deleted; the only field
/// update after creation is the declared hash power.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerRegistry {
    miners: HashMap<Principal, MinerInfo>,
}

impl MinerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful verification at the given height.
    ///
    /// Verification is one-shot per miner: a record with `verified == true`
    /// can never be verified again, so the attested claim is immutable.
    pub fn verify(
        &mut self,
        miner: Principal,
        hash_power: u64,
        energy_source: String,
        height: u64,
    ) -> LedgerResult<()> {
        if energy_source.len() > MAX_ENERGY_SOURCE_LEN {
            return Err(LedgerError::EnergySourceTooLong);
        }
        if self.miners.get(&miner).map_or(false, |m| m.verified) {
            return Err(LedgerError::AlreadyVerified(miner));
        }
        self.miners.insert(
            miner,
            MinerInfo {
                hash_power,
                energy_source,
                verification_date: height,
                verified: true,
            },
        );
        Ok(())
    }

    /// Updates only the declared hash power of an existing record.
    pub fn update_hash_power(&mut self, miner: &Principal, hash_power: u64) -> LedgerResult<()> {
        match self.miners.get_mut(miner) {
            Some(info) => {
                info.hash_power = hash_power;
                Ok(())
            }
            None => Err(LedgerError::MinerNotFound(miner.clone())),
        }
    }

    pub fn is_verified(&self, miner: &Principal) -> bool {
        self.miners.get(miner).map_or(false, |m| m.verified)
    }

    pub fn get(&self, miner: &Principal) -> Option<&MinerInfo> {
        self.miners.get(miner)
    }

    pub fn len(&self) -> usize {
        self.miners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.miners.is_empty()
    }
}
