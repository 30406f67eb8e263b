use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::Context;
use clap::Parser;
use elements::{
    address_registry::AddressRegistry,
    method_kind::{parse_when, MethodKind},
    upgrade_batch::{BatchConfig, UpgradeBatchBuilder},
};
use utils::{
    batch_writer::write_batch,
    display_batch::BatchSummary,
    network_resolver::{resolve_chain_id, resolve_safe_address, NetworkResolver},
};

mod elements;
mod errors;
mod utils;

const DEFAULT_DEPLOY_OUT: &str = "deploy-out";
const DEFAULT_UPGRADE_TAG: &str = "1.1.0";
const DEFAULT_OUTPUT_FILE: &str = "gnosis_safe_schedule.json";
const DEFAULT_BATCH_NAME: &str = "Schedule proxy upgrades";

#[derive(Debug, Parser)]
#[command(about = "Builds a Safe transaction builder batch that upgrades proxies through an access manager")]
struct Args {
    // Network name, also used as prefix for <NETWORK>_URL and <NETWORK>_SAFE_ADDRESS.
    #[clap(long, env = "NETWORK", default_value = "hardhat")]
    network: String,

    // YAML file with additional networks (`networks: { name: { chain_id, url } }`).
    #[clap(long)]
    networks_file: Option<PathBuf>,

    #[clap(long)]
    rpc_url: Option<String>,

    #[clap(long)]
    safe_address: Option<Address>,

    #[clap(long)]
    owner_address: Option<Address>,

    // Defaults to the `AccessManager` entry of the registry.
    #[clap(long)]
    access_manager: Option<Address>,

    #[clap(long, default_value = "schedule")]
    mode: MethodKind,

    // `when` argument of `schedule`. 0 means as soon as the access manager allows.
    #[clap(long, default_value_t = 0)]
    when: u64,

    // Registry produced by the deployment. Defaults to <deploy-out>/upgrade-<tag>-<chainId>.json
    #[clap(long)]
    input: Option<PathBuf>,

    #[clap(long, default_value = DEFAULT_DEPLOY_OUT)]
    deploy_out: PathBuf,

    #[clap(long, default_value = DEFAULT_UPGRADE_TAG)]
    upgrade_tag: String,

    #[clap(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    #[clap(long, default_value = DEFAULT_BATCH_NAME)]
    name: String,

    #[clap(long, default_value = "")]
    description: String,

    // Print the batch without writing it.
    #[clap(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let env = |key: &str| std::env::var(key).ok();

    let mut resolver = NetworkResolver::with_known_networks();
    if let Some(path) = &args.networks_file {
        resolver
            .extend_from_file(path)
            .context("loading networks file")?;
    }
    let network = resolver
        .network_config(&args.network, args.rpc_url.clone(), env)
        .context("resolving network")?;
    let chain_id = resolve_chain_id(&args.network, &network)
        .await
        .context("resolving chain id")?;
    let safe_address = resolve_safe_address(&args.network, args.safe_address, env)
        .context("resolving safe address")?;
    log::info!(
        "Network {} (chain id {}), safe {}",
        args.network,
        chain_id,
        safe_address
    );

    let input = args.input.clone().unwrap_or_else(|| {
        args.deploy_out
            .join(format!("upgrade-{}-{}.json", args.upgrade_tag, chain_id))
    });
    let registry = AddressRegistry::load(&input).context("loading address registry")?;
    if registry.is_empty() {
        log::warn!("{} contains no addresses", input.display());
    } else {
        log::info!("Loaded {} addresses from {}", registry.len(), input.display());
    }

    let builder = UpgradeBatchBuilder::new(BatchConfig {
        chain_id,
        safe_address,
        owner_address: args.owner_address,
        access_manager: args.access_manager,
        kind: args.mode,
        when: parse_when(args.when)?,
        name: args.name,
        description: args.description,
    });
    let batch = builder
        .build(&registry, chrono::Utc::now().timestamp_millis())
        .context("building upgrade batch")?;

    let pairs = registry.upgrade_pairs();
    let skipped = registry.unpaired_proxies();
    println!(
        "{}",
        BatchSummary {
            network: &args.network,
            batch: &batch,
            pairs: &pairs,
            skipped: &skipped,
        }
    );

    if args.dry_run {
        log::info!("Dry run, {} not written", args.output.display());
        return Ok(());
    }

    write_batch(&batch, &args.output).context("writing upgrade batch")?;
    println!(
        "Gnosis Safe schedule has been generated and saved to {}",
        args.output.display()
    );

    Ok(())
}
