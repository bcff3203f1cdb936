// Green Hash Credits Ledger Library
// Core state-transition logic for the renewable-energy mining credit ledger

pub mod access;
pub mod balances;
pub mod config;
pub mod credits;
pub mod errors;
pub mod height;
pub mod ledger;
pub mod registry;
pub mod reward;
pub mod types;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use crate::access::AccessControl;
pub use crate::balances::{BalanceBook, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
pub use crate::config::{ConfigError, LedgerConfig};
pub use crate::credits::CreditBook;
pub use crate::errors::{LedgerError, LedgerResult};
pub use crate::height::{HeightSource, HostHeight};
pub use crate::ledger::{CreditLedger, LedgerState};
pub use crate::registry::MinerRegistry;
pub use crate::reward::calculate_mining_reward;
pub use crate::types::{CreditRecord, MinerInfo, Principal};
