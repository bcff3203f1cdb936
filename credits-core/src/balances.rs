use crate::errors::{LedgerError, LedgerResult};
use crate::types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token name reported by the metadata queries.
pub const TOKEN_NAME: &str = "Green Hash Credits";
/// Token symbol reported by the metadata queries.
pub const TOKEN_SYMBOL: &str = "GHC";
/// Token decimals reported by the metadata queries.
pub const TOKEN_DECIMALS: u8 = 6;

/// Fungible balance map plus the running total supply.
///
/// Minting grows balance and supply together; transfers move balance only.
/// Redemption debits the holder without shrinking the supply: the issuance
/// history keeps the supply while the holder gives up the claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBook {
    balances: HashMap<Principal, u64>,
    total_supply: u64,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of a principal; unknown principals hold zero.
    pub fn balance(&self, who: &Principal) -> u64 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Credits a balance and grows the total supply by the same amount.
    /// Both additions are checked before either write lands.
    pub fn mint(&mut self, to: &Principal, amount: u64) -> LedgerResult<()> {
        let new_balance = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("balance credit"))?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("total supply"))?;
        self.balances.insert(to.clone(), new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    /// Debits a balance, leaving the total supply unchanged.
    pub fn debit(&mut self, from: &Principal, amount: u64) -> LedgerResult<()> {
        let available = self.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.balances.insert(from.clone(), available - amount);
        Ok(())
    }

    /// Moves `amount` between balances; the total supply is unchanged.
    pub fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: u64,
    ) -> LedgerResult<()> {
        let from_balance = self.balance(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: from_balance,
            });
        }
        if from == to {
            // Self-transfer is a no-op once the balance check passes.
            return Ok(());
        }
        let new_to = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("balance credit"))?;
        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), new_to);
        Ok(())
    }

    /// Sum of all held balances, widened so it cannot overflow.
    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().map(|&b| u128::from(b)).sum()
    }
}
