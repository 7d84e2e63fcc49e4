//! reward-client
//!
//! Command-line front end for the reward contract.
//!
//! # Architecture Overview
//!
//! ```text
//!   config (TOML + env) ─▶ ChainClient ─▶ AlloyBinder
//!                                            │
//!   wallet connector ─▶ WalletSession ───────┤
//!                                            ▼
//!   claim:   ClaimFlow (validate ▶ estimate ▶ submit ▶ confirm)
//!   prices:  OracleReader (read-only, no wallet)
//!   info:    ContractQueries (read-only, no wallet)
//!   lottery / update-prices: ContractActions (estimate ▶ submit ▶ confirm)
//! ```

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use reward_client::blockchain::wallet::{connector_from_config, ensure_chain, WalletConnector};
use reward_client::claim::{
    AlloyBinder, ClaimFlow, ClaimOutcome, ClaimSettings, ContractBinder, ContractBinding,
    WalletSession,
};
use reward_client::config::{load_config, ClientConfig};
use reward_client::lifecycle::signals::abandon_on_ctrl_c;
use reward_client::lifecycle::Abandon;
use reward_client::maintenance::{ContractActions, ContractQueries};
use reward_client::observability::init_logging;
use reward_client::oracle::{self, OracleReader};

#[derive(Parser)]
#[command(name = "reward-client")]
#[command(about = "Claim rewards and read prices from the reward contract", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults plus environment when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the wallet and print the signer address
    Connect,
    /// Claim a reward amount (decimal, in whole tokens)
    Claim { amount: String },
    /// Read the ETH/USD price and the stored USD value
    Prices,
    /// Check reward eligibility (defaults to the connected wallet)
    Eligibility {
        #[arg(long)]
        address: Option<Address>,
    },
    /// Token balance (defaults to the connected wallet)
    Balance {
        #[arg(long)]
        address: Option<Address>,
    },
    /// Owner, upkeep and lottery state of the contract
    Info,
    /// Run the lottery draw
    Lottery,
    /// Refresh the stored USD value from the price feed
    UpdatePrices,
    /// Reward the contract would pay for a base amount
    DynamicReward { base: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(
        config_path = ?cli.config,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.contract.address,
        "reward-client v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let binder = AlloyBinder::from_config(&config)?;
    let connector: Arc<dyn WalletConnector> = Arc::from(connector_from_config(&config.wallet));

    match cli.command {
        Commands::Connect => {
            let mut session = WalletSession::new();
            let signer = session.connect(connector.as_ref()).await?;
            emit(cli.json, &Connected { address: signer.address() }, |c| {
                format!("Connected: {}", c.address)
            })?;
        }
        Commands::Claim { amount } => {
            binder.chain().verify_chain_id().await?;

            let abandon = Arc::new(Abandon::new());
            let signal_task = abandon_on_ctrl_c(abandon.clone());
            let mut abandon_rx = abandon.subscribe();

            let binder: Arc<dyn ContractBinder> = Arc::new(binder);
            let flow = ClaimFlow::new(connector, binder, ClaimSettings::from_config(&config));
            let mut session = WalletSession::new();

            let outcome = flow.claim(&mut session, &amount, &mut abandon_rx).await;
            signal_task.abort();

            let outcome = outcome?;
            emit(cli.json, &outcome, describe)?;
        }
        Commands::Prices => {
            let reader = OracleReader::new(binder.read_only()?, &config.contract);
            let snapshot = reader.read_all().await;
            let prices = Prices {
                eth_usd: oracle::render(&snapshot.eth_price),
                stored_usd_value: oracle::render(&snapshot.stored_usd_value),
            };
            emit(cli.json, &prices, |p| {
                format!(
                    "ETH/USD price:    {}\nStored USD value: {}",
                    p.eth_usd, p.stored_usd_value
                )
            })?;
        }
        Commands::Eligibility { address } => {
            let account = resolve_account(address, connector.as_ref()).await?;
            let eligible = binder
                .read_only()?
                .is_eligible_for_reward(account)
                .await
                .map_err(|e| e.into_contract_error())?;
            emit(cli.json, &Eligibility { address: account, eligible }, |e| {
                format!("{} eligible: {}", e.address, e.eligible)
            })?;
        }
        Commands::Balance { address } => {
            let account = resolve_account(address, connector.as_ref()).await?;
            let balance = queries(&binder, &config)?.token_balance(account).await?;
            emit(cli.json, &balance, |b| format!("{}", b))?;
        }
        Commands::Info => {
            let info = queries(&binder, &config)?.info().await?;
            emit(cli.json, &info, |i| {
                format!(
                    "Contract:        {}\nOwner:           {}\nUpkeep contract: {}\nLast winner:     {}\nUnlock time:     {}\nUpkeep needed:   {}",
                    i.address, i.owner, i.upkeep_contract, i.last_winner, i.unlock_time, i.upkeep_needed
                )
            })?;
        }
        Commands::DynamicReward { base } => {
            let reward = queries(&binder, &config)?.dynamic_reward(&base).await?;
            emit(cli.json, &reward, |r| format!("{}", r))?;
        }
        Commands::Lottery => {
            let outcome = keeper_transaction(&binder, connector.as_ref(), &config, Keeper::Lottery).await?;
            emit(cli.json, &outcome, describe)?;
        }
        Commands::UpdatePrices => {
            let outcome =
                keeper_transaction(&binder, connector.as_ref(), &config, Keeper::UpdatePrices).await?;
            emit(cli.json, &outcome, describe)?;
        }
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum Keeper {
    Lottery,
    UpdatePrices,
}

async fn keeper_transaction(
    binder: &AlloyBinder,
    connector: &dyn WalletConnector,
    config: &ClientConfig,
    keeper: Keeper,
) -> Result<ClaimOutcome, Box<dyn std::error::Error>> {
    binder.chain().verify_chain_id().await?;

    let mut session = WalletSession::new();
    session.connect(connector).await?;
    ensure_chain(connector, config.blockchain.chain_id).await?;
    let binding = ContractBinding::bind(&session, binder)?;
    let settings = ClaimSettings::from_config(config);
    let actions = ContractActions::new(&binding, settings.gas_margin_percent, settings.confirmation);

    let abandon = Arc::new(Abandon::new());
    let signal_task = abandon_on_ctrl_c(abandon.clone());
    let mut abandon_rx = abandon.subscribe();

    let outcome = match keeper {
        Keeper::Lottery => actions.run_lottery(&mut abandon_rx).await,
        Keeper::UpdatePrices => actions.update_prices(&mut abandon_rx).await,
    };
    signal_task.abort();

    Ok(outcome?)
}

fn describe(outcome: &ClaimOutcome) -> String {
    match outcome {
        ClaimOutcome::Confirmed { tx_hash, block_number } => {
            format!("Confirmed: {} (block {})", tx_hash, block_number)
        }
        ClaimOutcome::Abandoned { tx_hash } => {
            format!("Abandoned wait for {}; it may still be mined", tx_hash)
        }
    }
}

#[derive(Serialize)]
struct Connected {
    address: Address,
}

#[derive(Serialize)]
struct Prices {
    eth_usd: String,
    stored_usd_value: String,
}

#[derive(Serialize)]
struct Eligibility {
    address: Address,
    eligible: bool,
}

fn queries(
    binder: &AlloyBinder,
    config: &ClientConfig,
) -> Result<ContractQueries, Box<dyn std::error::Error>> {
    Ok(ContractQueries::new(binder.read_only()?, &config.contract))
}

async fn resolve_account(
    address: Option<Address>,
    connector: &dyn WalletConnector,
) -> Result<Address, Box<dyn std::error::Error>> {
    match address {
        Some(address) => Ok(address),
        None => {
            let mut session = WalletSession::new();
            Ok(session.connect(connector).await?.address())
        }
    }
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    human: impl FnOnce(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}
