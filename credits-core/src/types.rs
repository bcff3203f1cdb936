use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity used as the key for authorization, balances, and
/// registry entries. The host substrate is responsible for authenticating
/// the caller; the ledger only compares identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Principal {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Verification record for a renewable-energy mining operation.
///
/// Created on the first successful verification; `verified` is
/// write-once-true and the record is never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerInfo {
    /// Declared hash power, in hashes per second.
    pub hash_power: u64,
    /// Attested renewable energy source label; accepted as opaque.
    pub energy_source: String,
    /// Height at which the miner was verified.
    pub verification_date: u64,
    /// Whether the miner has passed verification.
    pub verified: bool,
}

/// A single credit issuance, keyed by a strictly increasing id.
///
/// `hash_power` and `energy_source` are snapshots of the miner's registry
/// entry at issuance time and do not follow later registry updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRecord {
    /// Miner the credits were issued to.
    pub miner: Principal,
    /// Miner's hash power at issuance time.
    pub hash_power: u64,
    /// Miner's energy source at issuance time.
    pub energy_source: String,
    /// Height at which the credits were issued.
    pub issued_date: u64,
    /// Whether this record has been redeemed. Transitions false to true
    /// exactly once; the first redemption locks the record.
    pub redeemed: bool,
    /// Principal that redeemed the record.
    pub redeemed_by: Option<Principal>,
    /// Height at which the record was redeemed.
    pub redemption_date: Option<u64>,
}
