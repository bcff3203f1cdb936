// Green Hash Credits CLI
// Command-line host for the credit ledger: supplies the caller identity and
// the height counter, and persists ledger state between invocations.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use credits_core::{
    calculate_mining_reward, CreditLedger, HostHeight, LedgerConfig, LedgerError, LedgerState,
    Principal,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ghc-cli")]
#[command(about = "Green Hash Credits ledger CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the ledger snapshot file
    #[arg(short, long, default_value = "ghc-ledger.json", env = "GHC_LEDGER")]
    ledger: PathBuf,

    /// Principal submitting the operation
    #[arg(short, long, default_value = "deployer", env = "GHC_CALLER")]
    caller: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger snapshot; the caller becomes owner unless a
    /// configuration file says otherwise
    Init {
        /// TOML configuration file with owner, initial verifiers, height
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Add a verifier (owner only)
    AddVerifier { principal: String },

    /// Remove a verifier (owner only)
    RemoveVerifier { principal: String },

    /// Record a miner's renewable-energy verification
    VerifyMiner {
        miner: String,
        hash_power: u64,
        energy_source: String,
    },

    /// Update a verified miner's declared hash power
    UpdateHashPower { miner: String, hash_power: u64 },

    /// Issue credits to a verified miner
    IssueCredits { miner: String, amount: u64 },

    /// Redeem credits against an issuance record
    RedeemCredits { id: u64, amount: u64 },

    /// Move balance to another principal
    Transfer {
        amount: u64,
        sender: String,
        recipient: String,
        /// Opaque memo, logged but never interpreted
        #[arg(long)]
        memo: Option<String>,
    },

    /// Engage the contract-wide pause switch (owner only)
    Pause,

    /// Release the pause switch (owner only)
    Unpause,

    /// Print token metadata and ledger counters
    Status,

    /// Print a miner's registry record
    MinerInfo { miner: String },

    /// Print a credit issuance record
    CreditInfo { id: u64 },

    /// Print a principal's balance
    Balance { principal: String },

    /// Compute the reward for hash power sustained over a number of hours
    Reward { hash_power: u64, hours: u64 },
}

/// On-disk form of the ledger plus the host height counter, which advances
/// after every successful mutating command.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    height: u64,
    state: LedgerState,
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("no ledger snapshot at {} (run init first)", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("corrupt ledger snapshot at {}", path.display()))
}

fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let raw = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, raw)
        .with_context(|| format!("failed to write ledger snapshot to {}", path.display()))
}

/// Maps a ledger rejection to process output, keeping the numeric code the
/// contract API reports for it.
fn reject(err: LedgerError) -> anyhow::Error {
    match err.code() {
        Some(code) => anyhow!("error {code}: {err}"),
        None => anyhow!("error: {err}"),
    }
}

fn init_ledger(path: &Path, config: Option<&Path>, caller: &Principal) -> Result<()> {
    if path.exists() {
        bail!("ledger snapshot already exists at {}", path.display());
    }
    let (state, height) = match config {
        Some(config_path) => {
            let config = LedgerConfig::load(config_path)?;
            let clock = Arc::new(HostHeight::new(config.start_height));
            let ledger = CreditLedger::from_config(&config, clock);
            (ledger.snapshot().map_err(reject)?, config.start_height)
        }
        None => (LedgerState::new(caller.clone()), 1),
    };
    save_snapshot(path, &Snapshot { height, state })?;
    println!("ledger initialized at {}", path.display());
    Ok(())
}

fn run_operation(path: &Path, caller: &Principal, command: Commands) -> Result<()> {
    let snapshot = load_snapshot(path)?;
    let clock = Arc::new(HostHeight::new(snapshot.height));
    let ledger = CreditLedger::from_state(snapshot.state, clock.clone());
    let mut mutated = true;

    match command {
        Commands::Init { .. } | Commands::Reward { .. } => unreachable!("handled in main"),
        Commands::AddVerifier { principal } => {
            ledger
                .add_verifier(caller, Principal::new(&*principal))
                .map_err(reject)?;
            println!("verifier added: {principal}");
        }
        Commands::RemoveVerifier { principal } => {
            ledger
                .remove_verifier(caller, &Principal::new(&*principal))
                .map_err(reject)?;
            println!("verifier removed: {principal}");
        }
        Commands::VerifyMiner {
            miner,
            hash_power,
            energy_source,
        } => {
            ledger
                .verify_miner(caller, &Principal::new(&*miner), hash_power, &energy_source)
                .map_err(reject)?;
            println!("miner verified: {miner}");
        }
        Commands::UpdateHashPower { miner, hash_power } => {
            ledger
                .update_miner_hash_power(caller, &Principal::new(&*miner), hash_power)
                .map_err(reject)?;
            println!("hash power updated: {miner} -> {hash_power}");
        }
        Commands::IssueCredits { miner, amount } => {
            let id = ledger
                .issue_credits(caller, &Principal::new(&*miner), amount)
                .map_err(reject)?;
            println!("credit id: {id}");
        }
        Commands::RedeemCredits { id, amount } => {
            ledger.redeem_credits(caller, id, amount).map_err(reject)?;
            println!("redeemed {amount} against credit {id}");
        }
        Commands::Transfer {
            amount,
            sender,
            recipient,
            memo,
        } => {
            ledger
                .transfer(
                    caller,
                    amount,
                    &Principal::new(&*sender),
                    &Principal::new(&*recipient),
                    memo.as_deref().map(str::as_bytes),
                )
                .map_err(reject)?;
            println!("transferred {amount}: {sender} -> {recipient}");
        }
        Commands::Pause => {
            ledger.pause_contract(caller).map_err(reject)?;
            println!("contract paused");
        }
        Commands::Unpause => {
            ledger.unpause_contract(caller).map_err(reject)?;
            println!("contract unpaused");
        }
        Commands::Status => {
            let state = ledger.snapshot().map_err(reject)?;
            println!("token:     {} ({})", ledger.get_name(), ledger.get_symbol());
            println!("decimals:  {}", ledger.get_decimals());
            println!("supply:    {}", state.balances.total_supply());
            println!("owner:     {}", state.access.owner());
            println!("verifiers: {}", state.access.verifier_count());
            println!("miners:    {}", state.miners.len());
            println!("credits:   {}", state.credits.issued_count());
            println!("paused:    {}", state.paused);
            println!("height:    {}", snapshot.height);
            mutated = false;
        }
        Commands::MinerInfo { miner } => {
            match ledger
                .get_miner_info(&Principal::new(&*miner))
                .map_err(reject)?
            {
                Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
                None => println!("none"),
            }
            mutated = false;
        }
        Commands::CreditInfo { id } => {
            match ledger.get_credit_info(id).map_err(reject)? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("none"),
            }
            mutated = false;
        }
        Commands::Balance { principal } => {
            let balance = ledger
                .get_balance(&Principal::new(&*principal))
                .map_err(reject)?;
            println!("{balance}");
            mutated = false;
        }
    }

    if mutated {
        let height = clock.advance();
        let state = ledger.snapshot().map_err(reject)?;
        save_snapshot(path, &Snapshot { height, state })?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let caller = Principal::new(cli.caller.clone());

    match cli.command {
        Commands::Init { ref config } => {
            init_ledger(&cli.ledger, config.as_deref(), &caller)
        }
        Commands::Reward { hash_power, hours } => {
            println!("{}", calculate_mining_reward(hash_power, hours));
            Ok(())
        }
        command => run_operation(&cli.ledger, &caller, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_state_and_height() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let owner = Principal::new("deployer");

        init_ledger(&path, None, &owner).unwrap();
        run_operation(
            &path,
            &owner,
            Commands::VerifyMiner {
                miner: "wallet_2".to_string(),
                hash_power: 1_000_000,
                energy_source: "solar".to_string(),
            },
        )
        .unwrap();
        run_operation(
            &path,
            &owner,
            Commands::IssueCredits {
                miner: "wallet_2".to_string(),
                amount: 500,
            },
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        // Two mutating commands on top of the starting height of 1.
        assert_eq!(snapshot.height, 3);
        let clock = Arc::new(HostHeight::new(snapshot.height));
        let ledger = CreditLedger::from_state(snapshot.state, clock);
        assert_eq!(
            ledger.get_balance(&Principal::new("wallet_2")).unwrap(),
            500
        );
        assert_eq!(ledger.get_total_supply().unwrap(), 500);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let owner = Principal::new("deployer");
        init_ledger(&path, None, &owner).unwrap();
        assert!(init_ledger(&path, None, &owner).is_err());
    }

    #[test]
    fn rejections_carry_the_wire_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        init_ledger(&path, None, &Principal::new("deployer")).unwrap();

        let err = run_operation(
            &path,
            &Principal::new("wallet_1"),
            Commands::Pause,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("error 100:"));
    }
}
