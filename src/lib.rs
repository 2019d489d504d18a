#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Client-side [x402](https://www.x402.org) payments for Cronos.
//!
//! This crate implements the buyer half of the HTTP 402 pay-per-call flow:
//! a [`PaymentClient`] sends a JSON-RPC-over-HTTP style request, and when
//! the server answers `402 Payment Required` with machine-readable terms, it
//! signs an ERC-3009 `transferWithAuthorization` message under the asset's
//! EIP-712 domain and retries the call once with the credential in the
//! `X-PAYMENT` header. Spending is capped by a [`BudgetLedger`] that only
//! records charges the server actually accepted.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use alloy_primitives::U256;
//! use alloy_signer_local::PrivateKeySigner;
//! use serde_json::json;
//! use x402_cronos::{NetworkProfile, PaymentClient};
//!
//! let signer: PrivateKeySigner = std::env::var("PRIVATE_KEY")?.parse()?;
//! let client = PaymentClient::new(
//!     NetworkProfile::testnet(),
//!     signer,
//!     U256::from(1_000_000u64), // $1.00 at 6 decimals
//! );
//!
//! // Payment, when demanded, is handled automatically.
//! let candles = client
//!     .call_tool("http://localhost:3001", "get_ohlcv", &json!({"symbol": "BTC"}))
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`networks`] - Cronos network profiles (chain id, asset, EIP-712 domain)
//! - [`proto`] - Wire format types for the 402 challenge and the credential
//! - [`authorization`] - ERC-3009 authorization construction and signing
//! - [`signer`] - Capability interface over an external secp256k1 signer
//! - [`budget`] - Reserve/commit/rollback spend accounting
//! - [`client`] - The two-phase call orchestrator
//! - [`timestamp`] - Unix timestamp utilities for the validity window
//! - [`util`] - Base64 framing helpers
//!
//! ## Failure semantics
//!
//! Every failure is one variant of [`X402ClientError`]; see [`error`] for
//! the taxonomy. The client retries exactly once, and only for the
//! payment-required transition — never on validation, signing, or transport
//! errors.

pub mod authorization;
pub mod budget;
pub mod client;
pub mod error;
pub mod networks;
pub mod proto;
pub mod signer;
pub mod timestamp;
pub mod util;

pub use budget::{BudgetExceeded, BudgetLedger, BudgetReservation};
pub use client::PaymentClient;
pub use error::X402ClientError;
pub use networks::{Eip712DomainConfig, Network, NetworkProfile};
pub use proto::X_PAYMENT_HEADER;
pub use proto::exact::{ExactPaymentTerms, PaymentPayload, decode_payment, encode_payment};
pub use signer::SignerLike;
