//! Agent startup and the single tool invocation it performs.

use alloy_primitives::U256;
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use x402_cronos::{NetworkProfile, PaymentClient};

use crate::config::Config;

/// Runs one paid tool invocation.
///
/// - Loads `.env` variables.
/// - Initializes tracing (filtered by `RUST_LOG`, default `info`).
/// - Builds the network profile and signer from configuration.
/// - Invokes the tool, paying over x402 if the server demands it.
/// - Prints the tool result to stdout and a spend summary to the log.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let signer: PrivateKeySigner = config.private_key.parse()?;
    let params: serde_json::Value = serde_json::from_str(&config.params)?;

    let mut profile = NetworkProfile::for_network(config.network);
    if let Some(name) = config.eip712_name {
        profile.eip712.name = name;
    }
    if let Some(version) = config.eip712_version {
        profile.eip712.version = version;
    }

    info!(
        network = %profile.network,
        chain_id = profile.chain_id,
        asset = %profile.asset,
        payer = %signer.address(),
        max_budget = config.max_budget,
        eip712_name = %profile.eip712.name,
        eip712_version = %profile.eip712.version,
        "starting x402 agent"
    );

    let client = PaymentClient::new(profile, signer, U256::from(config.max_budget));

    let result = client
        .call_tool(&config.server_url, &config.tool, &params)
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    let spent = client.ledger().spent();
    info!(%spent, remaining = %client.ledger().remaining(), "agent finished");
    if spent > U256::ZERO {
        let explorer = client.profile().explorer_url.as_str().trim_end_matches('/');
        info!("view transactions: {explorer}/address/{}", client.payer());
    }

    Ok(())
}
