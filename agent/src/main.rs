//! x402 demo agent entrypoint.
//!
//! This binary invokes a tool on an MCP-style server, paying for the call
//! over x402 when the server demands it:
//!
//! ```text
//! x402-cronos-agent get_ohlcv '{"symbol": "BTC", "timeframe": "1h"}'
//! ```
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `NETWORK` selects "mainnet" or "testnet"
//! - `PRIVATE_KEY` holds the paying wallet's key
//! - `MAX_BUDGET` caps total spend, in asset base units
//! - `MCP_SERVER_URL` points at the tool server

mod config;
mod run;

use std::process;

use crate::run::run;

#[tokio::main]
async fn main() {
    let result = run().await;
    if let Err(e) = result {
        println!("{e}");
        process::exit(1)
    }
}
