//! Configuration for the demo agent.

use clap::Parser;
use x402_cronos::Network;

/// Default spending ceiling: $1.00 worth of a 6-decimal asset.
pub const DEFAULT_MAX_BUDGET: u64 = 1_000_000;

/// CLI arguments for the x402 demo agent.
///
/// Every option can also come from the environment (and `.env`), so a
/// deployment can keep secrets out of the command line.
#[derive(Parser, Debug)]
#[command(name = "x402-cronos-agent")]
#[command(about = "Invoke MCP tools with automatic x402 payment on Cronos")]
pub struct Config {
    /// Tool to invoke on the server
    pub tool: String,

    /// JSON parameters passed to the tool
    #[arg(default_value = "{}")]
    pub params: String,

    /// Network to sign for: "mainnet" or "testnet"
    #[arg(long, env = "NETWORK", default_value = "testnet")]
    pub network: Network,

    /// Base URL of the MCP tool server
    #[arg(long, env = "MCP_SERVER_URL", default_value = "http://localhost:3001")]
    pub server_url: String,

    /// Hex-encoded private key of the paying wallet
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Maximum total spend, in asset base units
    #[arg(long, env = "MAX_BUDGET", default_value_t = DEFAULT_MAX_BUDGET)]
    pub max_budget: u64,

    /// Override the EIP-712 domain name of the asset contract
    #[arg(long, env = "EIP712_DOMAIN_NAME")]
    pub eip712_name: Option<String>,

    /// Override the EIP-712 domain version of the asset contract
    #[arg(long, env = "EIP712_DOMAIN_VERSION")]
    pub eip712_version: Option<String>,
}
