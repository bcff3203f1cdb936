use crate::types::Principal;
use thiserror::Error;

/// Numeric code the deployed contract API reports for authorization and
/// pause rejections. The two conditions share a code on the wire; the
/// typed variants below keep them distinguishable in-process.
pub const CODE_UNAUTHORIZED: u32 = 100;
/// Numeric code for a balance short of the requested amount.
pub const CODE_INSUFFICIENT_BALANCE: u32 = 101;
// 102 has never been assigned by the contract API. It stays reserved so
// existing clients never see it reused for a different condition.
/// Numeric code for operations against a miner with no verified record.
pub const CODE_MINER_NOT_VERIFIED: u32 = 103;
/// Numeric code for re-verifying an already verified miner.
pub const CODE_ALREADY_VERIFIED: u32 = 104;

/// Ledger errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the authority the operation requires.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The contract-wide pause switch is engaged.
    #[error("contract is paused")]
    ContractPaused,

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("miner not verified: {0}")]
    MinerNotVerified(Principal),

    #[error("no registry record for miner: {0}")]
    MinerNotFound(Principal),

    #[error("miner already verified: {0}")]
    AlreadyVerified(Principal),

    #[error("credit not found: {0}")]
    CreditNotFound(u64),

    #[error("credit already redeemed: {0}")]
    AlreadyRedeemed(u64),

    #[error("energy source label exceeds {limit} bytes", limit = crate::registry::MAX_ENERGY_SOURCE_LEN)]
    EnergySourceTooLong,

    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    #[error("lock poisoned")]
    LockPoisoned,
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Numeric code for the legacy wire surface, or `None` for conditions
    /// that surface never produced (overflow, poisoned lock, oversized
    /// energy source label).
    pub fn code(&self) -> Option<u32> {
        match self {
            LedgerError::Unauthorized(_)
            | LedgerError::ContractPaused
            | LedgerError::CreditNotFound(_)
            | LedgerError::AlreadyRedeemed(_) => Some(CODE_UNAUTHORIZED),
            LedgerError::InsufficientBalance { .. } => Some(CODE_INSUFFICIENT_BALANCE),
            LedgerError::MinerNotVerified(_) | LedgerError::MinerNotFound(_) => {
                Some(CODE_MINER_NOT_VERIFIED)
            }
            LedgerError::AlreadyVerified(_) => Some(CODE_ALREADY_VERIFIED),
            LedgerError::EnergySourceTooLong
            | LedgerError::ArithmeticOverflow(_)
            | LedgerError::LockPoisoned => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_match_contract_api() {
        let unauthorized = LedgerError::Unauthorized("not the owner".to_string());
        assert_eq!(unauthorized.code(), Some(100));
        assert_eq!(LedgerError::ContractPaused.code(), Some(100));
        assert_eq!(
            LedgerError::InsufficientBalance {
                requested: 2,
                available: 1
            }
            .code(),
            Some(101)
        );
        assert_eq!(
            LedgerError::MinerNotVerified(Principal::new("wallet_3")).code(),
            Some(103)
        );
        assert_eq!(
            LedgerError::AlreadyVerified(Principal::new("wallet_2")).code(),
            Some(104)
        );
    }

    #[test]
    fn redemption_lock_shares_the_unauthorized_code() {
        assert_eq!(LedgerError::CreditNotFound(7).code(), Some(100));
        assert_eq!(LedgerError::AlreadyRedeemed(1).code(), Some(100));
    }

    #[test]
    fn host_conditions_have_no_wire_code() {
        assert_eq!(LedgerError::ArithmeticOverflow("total supply").code(), None);
        assert_eq!(LedgerError::LockPoisoned.code(), None);
        assert_eq!(LedgerError::EnergySourceTooLong.code(), None);
    }

    #[test]
    fn code_gap_is_preserved() {
        // No variant maps to 102; the constants around the gap stay put.
        assert_eq!(CODE_INSUFFICIENT_BALANCE, 101);
        assert_eq!(CODE_MINER_NOT_VERIFIED, 103);
    }
}
