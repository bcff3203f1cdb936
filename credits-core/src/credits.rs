use crate::errors::{LedgerError, LedgerResult};
use crate::types::{CreditRecord, Principal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Append-only log of credit issuances, keyed by a strictly increasing id
/// starting at 1. The counter advances only when a record is actually
/// appended, so the success path has no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBook {
    credits: HashMap<u64, CreditRecord>,
    next_id: u64,
}

impl Default for CreditBook {
    fn default() -> Self {
        Self {
            credits: HashMap::new(),
            next_id: 1,
        }
    }
}

impl CreditBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an issuance record and returns its id.
    pub fn append(
        &mut self,
        miner: Principal,
        hash_power: u64,
        energy_source: String,
        height: u64,
    ) -> u64 {
        let id = self.next_id;
        self.credits.insert(
            id,
            CreditRecord {
                miner,
                hash_power,
                energy_source,
                issued_date: height,
                redeemed: false,
                redeemed_by: None,
                redemption_date: None,
            },
        );
        self.next_id += 1;
        id
    }

    /// Marks a record redeemed. One-shot: a record that is already redeemed
    /// stays locked and the call is rejected.
    pub fn mark_redeemed(&mut self, id: u64, by: Principal, height: u64) -> LedgerResult<()> {
        let record = self
            .credits
            .get_mut(&id)
            .ok_or(LedgerError::CreditNotFound(id))?;
        if record.redeemed {
            return Err(LedgerError::AlreadyRedeemed(id));
        }
        record.redeemed = true;
        record.redeemed_by = Some(by);
        record.redemption_date = Some(height);
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&CreditRecord> {
        self.credits.get(&id)
    }

    /// Number of records issued so far.
    pub fn issued_count(&self) -> u64 {
        self.next_id - 1
    }
}
