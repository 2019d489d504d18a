//! The two-phase call orchestrator.
//!
//! [`PaymentClient`] drives one logical call: send the request, and when the
//! server answers `402 Payment Required`, reserve budget, sign a payment
//! authorization, and retry once with the credential attached. At most one
//! retry ever happens per call; a second 402, or any other failure of the
//! retry, is surfaced to the caller.

use alloy_primitives::{Address, U256};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::authorization::{build_authorization, payment_payload, sign_authorization, signing_domain};
use crate::budget::BudgetLedger;
use crate::error::X402ClientError;
use crate::networks::NetworkProfile;
use crate::proto::exact::{ExactPaymentTerms, TermsError, encode_payment};
use crate::proto::{PaymentRequired, X_PAYMENT_HEADER};
use crate::signer::SignerLike;
use crate::timestamp::UnixTimestamp;

/// HTTP client that pays for 402-gated calls automatically.
///
/// One client holds one [`NetworkProfile`], one signer and one
/// [`BudgetLedger`] for its whole lifetime. It is `Send + Sync`; concurrent
/// logical calls share the ledger (serialized internally) and the signer.
pub struct PaymentClient<S> {
    http: reqwest::Client,
    profile: NetworkProfile,
    signer: S,
    ledger: BudgetLedger,
}

impl<S> PaymentClient<S> {
    /// Creates a payment client with a default HTTP client (30 s timeout).
    pub fn new(profile: NetworkProfile, signer: S, max_budget: U256) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self::with_http_client(profile, signer, max_budget, http)
    }

    /// Creates a payment client with a custom `reqwest::Client`.
    pub fn with_http_client(
        profile: NetworkProfile,
        signer: S,
        max_budget: U256,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            profile,
            signer,
            ledger: BudgetLedger::new(max_budget),
        }
    }

    /// The budget ledger backing this client.
    pub fn ledger(&self) -> &BudgetLedger {
        &self.ledger
    }

    /// The network profile this client signs for.
    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }
}

impl<S> PaymentClient<S>
where
    S: SignerLike + Sync,
{
    /// The payer address, i.e. the `from` of every authorization.
    pub fn payer(&self) -> Address {
        self.signer.address()
    }

    /// POSTs `body` as JSON to `url`, paying for the call if challenged.
    ///
    /// Returns the parsed JSON response of whichever request succeeded.
    pub async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, X402ClientError> {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(%url, %status, "call succeeded without payment");
            return Ok(response.json().await?);
        }
        if status != StatusCode::PAYMENT_REQUIRED {
            let body = response.text().await.unwrap_or_default();
            return Err(X402ClientError::UnexpectedStatus { status, body });
        }

        let bytes = response.bytes().await?;
        let challenge: PaymentRequired =
            serde_json::from_slice(&bytes).map_err(TermsError::Malformed)?;
        let terms = ExactPaymentTerms::try_from(&challenge.payment_requirements)?;
        info!(
            amount = %terms.max_amount_required,
            network = %terms.network,
            pay_to = %terms.pay_to,
            "received 402 payment challenge"
        );

        // Hold the budget before any signing; the hold rolls back unless the
        // paid retry is confirmed below.
        let reservation = self.ledger.reserve(terms.max_amount_required)?;

        let now = UnixTimestamp::now();
        let authorization = build_authorization(&terms, self.signer.address(), now);
        let domain = signing_domain(&terms, &self.profile);
        let signature = sign_authorization(&self.signer, &authorization, &domain).await?;
        let credential = encode_payment(&payment_payload(&terms, authorization, &signature))?;

        let retry = self
            .http
            .post(url)
            .json(body)
            .header(X_PAYMENT_HEADER, credential)
            .send()
            .await?;
        let retry_status = retry.status();
        if retry_status.is_success() {
            reservation.commit();
            info!(
                amount = %terms.max_amount_required,
                spent = %self.ledger.spent(),
                "payment accepted"
            );
            return Ok(retry.json().await?);
        }
        let body = retry.text().await.unwrap_or_default();
        Err(X402ClientError::PaymentRetryFailed {
            status: retry_status,
            body,
        })
    }

    /// Invokes a tool on an MCP-style server, paying if required.
    ///
    /// Posts `params` to `{server_url}/tools/{tool}` and unwraps the
    /// conventional `"result"` envelope when the server uses one.
    pub async fn call_tool(
        &self,
        server_url: &str,
        tool: &str,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value, X402ClientError> {
        let url = format!("{}/tools/{}", server_url.trim_end_matches('/'), tool);
        let mut value = self.post(&url, params).await?;
        if let Some(result) = value.get_mut("result") {
            return Ok(result.take());
        }
        Ok(value)
    }
}
