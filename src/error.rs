//! Error taxonomy of the payment client.
//!
//! Every failure surfaces as one [`X402ClientError`] variant so callers can
//! pattern-match on the category instead of string-matching messages. The
//! client never retries on its own initiative; the only automatic retry is
//! the single payment-required → paid-retry transition, and that one is part
//! of the protocol, not error recovery.

use reqwest::StatusCode;

use crate::budget::BudgetExceeded;
use crate::proto::exact::TermsError;

/// All the ways a pay-per-call request can fail.
#[derive(Debug, thiserror::Error)]
pub enum X402ClientError {
    /// The 402 challenge body was malformed or incomplete. Surfaced before
    /// any signing; never retried.
    #[error("invalid payment terms: {0}")]
    InvalidTerms(#[from] TermsError),

    /// The prospective charge would breach the budget ceiling. Surfaced
    /// before any second network call.
    #[error(transparent)]
    BudgetExceeded(#[from] BudgetExceeded),

    /// The cryptographic signer failed. Fatal to the call.
    #[error("failed to sign payment authorization: {0}")]
    SigningFailure(String),

    /// The server rejected the paid retry. The reservation has been rolled
    /// back; nothing was charged against budget.
    #[error("server rejected paid retry with status {status}: {body}")]
    PaymentRetryFailed { status: StatusCode, body: String },

    /// The initial request failed with a status that is neither success nor
    /// a payment challenge. Terminal; no retry is attempted for non-payment
    /// errors.
    #[error("request failed with status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// Connection or timeout failure at either phase of the call.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credential serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
