//! Types for the "exact" payment scheme: validated terms, the ERC-3009
//! authorization struct, and the signed wire credential.
//!
//! The wire credential is the base64 framing of:
//!
//! ```json
//! {
//!   "x402Version": 1,
//!   "scheme": "exact",
//!   "network": "cronos-testnet",
//!   "payload": {
//!     "from": "0x...", "to": "0x...", "value": "1000",
//!     "validAfter": 0, "validBefore": 1700000300,
//!     "nonce": "0x...64 hex...", "signature": "0x...130 hex...",
//!     "asset": "0x..."
//!   }
//! }
//! ```

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

use crate::proto::{ChecksummedAddress, PaymentRequirements, X402Version1, decimal_u256};
use crate::timestamp::UnixTimestamp;
use crate::util::Base64Bytes;

/// Scheme identifier assumed when a server omits the `scheme` field.
pub const EXACT_SCHEME: &str = "exact";

/// Error produced when 402 payment terms cannot be validated.
#[derive(Debug, thiserror::Error)]
pub enum TermsError {
    /// The 402 body was not a parseable payment-required document.
    #[error("malformed 402 payment-required body: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A required field was absent.
    #[error("missing required field `{0}` in payment requirements")]
    MissingField(&'static str),
    /// A required field was present but failed to parse as its expected type.
    #[error("invalid value for `{field}` in payment requirements: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

/// Payment terms after parse-time validation.
///
/// Produced from the raw [`PaymentRequirements`] of a 402 challenge; every
/// field is present and well-typed or the conversion has already failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactPaymentTerms {
    /// The payment scheme tag, echoed into the signed envelope.
    pub scheme: String,
    /// The network name, echoed into the signed envelope.
    pub network: String,
    /// The token asset contract address; also the EIP-712 verifying contract.
    pub asset: Address,
    /// The recipient of the transfer.
    pub pay_to: Address,
    /// The charge, in base units.
    pub max_amount_required: U256,
}

fn parse_address(
    value: &Option<String>,
    field: &'static str,
) -> Result<Address, TermsError> {
    let raw = value
        .as_deref()
        .ok_or(TermsError::MissingField(field))?;
    raw.parse::<Address>().map_err(|e| TermsError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

impl TryFrom<&PaymentRequirements> for ExactPaymentTerms {
    type Error = TermsError;

    fn try_from(requirements: &PaymentRequirements) -> Result<Self, Self::Error> {
        let asset = parse_address(&requirements.asset, "asset")?;
        let pay_to = parse_address(&requirements.pay_to, "payTo")?;
        let network = requirements
            .network
            .clone()
            .ok_or(TermsError::MissingField("network"))?;
        let amount_raw = requirements
            .max_amount_required
            .as_deref()
            .ok_or(TermsError::MissingField("maxAmountRequired"))?;
        let max_amount_required =
            U256::from_str_radix(amount_raw, 10).map_err(|e| TermsError::InvalidField {
                field: "maxAmountRequired",
                reason: e.to_string(),
            })?;
        let scheme = requirements
            .scheme
            .clone()
            .unwrap_or_else(|| EXACT_SCHEME.to_string());
        Ok(ExactPaymentTerms {
            scheme,
            network,
            asset,
            pay_to,
            max_amount_required,
        })
    }
}

sol!(
    /// Solidity-compatible struct definition for ERC-3009
    /// `transferWithAuthorization`.
    ///
    /// This matches the EIP-3009 format used in EIP-712 typed data:
    /// it defines the authorization to transfer tokens from `from` to `to`
    /// for a specific `value`, valid only between `validAfter` and
    /// `validBefore` and identified by a unique `nonce`.
    struct TransferWithAuthorization {
        address from;
        address to;
        uint256 value;
        uint256 validAfter;
        uint256 validBefore;
        bytes32 nonce;
    }
);

/// The signed payload of the wire credential.
///
/// Wire layout is fixed for interoperability: addresses are EIP-55
/// checksummed strings, `value` is a decimal string, the validity window is
/// integer seconds, `nonce` is 32 bytes of hex and `signature` is the 65-byte
/// ECDSA signature as hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactPaymentPayload {
    pub from: ChecksummedAddress,
    pub to: ChecksummedAddress,
    #[serde(with = "decimal_u256")]
    pub value: U256,
    pub valid_after: UnixTimestamp,
    pub valid_before: UnixTimestamp,
    pub nonce: B256,
    pub signature: Bytes,
    pub asset: ChecksummedAddress,
}

/// The complete wire credential: protocol version, scheme and network tags,
/// plus the signed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version (always 1).
    pub x402_version: X402Version1,
    /// The payment scheme (e.g., "exact").
    pub scheme: String,
    /// The network name the terms were issued for.
    pub network: String,
    /// The signed authorization.
    pub payload: ExactPaymentPayload,
}

/// Base64-encode a payment payload for the `X-PAYMENT` header.
pub fn encode_payment(payload: &PaymentPayload) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(payload)?;
    Ok(Base64Bytes::encode(&json).to_string())
}

/// Decode a payment payload from an `X-PAYMENT` header value.
///
/// The exact inverse of [`encode_payment`]. The client never consumes
/// credentials; this exists for facilitator-side tooling and tests.
pub fn decode_payment(encoded: &str) -> Result<PaymentPayload, TermsError> {
    let bytes = Base64Bytes::from(encoded)
        .decode()
        .map_err(|e| TermsError::InvalidField {
            field: "payload",
            reason: format!("invalid base64: {e}"),
        })?;
    serde_json::from_slice(&bytes).map_err(|e| TermsError::InvalidField {
        field: "payload",
        reason: format!("invalid JSON: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    fn sample_requirements() -> PaymentRequirements {
        serde_json::from_value(json!({
            "scheme": "exact",
            "network": "cronos-testnet",
            "maxAmountRequired": "1000",
            "asset": "0xc01efAaF7C5C61bEbFAeb358E1161b537b8bC0e0",
            "payTo": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        }))
        .unwrap()
    }

    fn sample_payload() -> PaymentPayload {
        PaymentPayload {
            x402_version: X402Version1,
            scheme: EXACT_SCHEME.to_string(),
            network: "cronos-testnet".to_string(),
            payload: ExactPaymentPayload {
                from: address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").into(),
                to: address!("0x0000000000000000000000000000000000000001").into(),
                value: U256::from(1000u64),
                valid_after: UnixTimestamp::from_secs(0),
                valid_before: UnixTimestamp::from_secs(1_700_000_300),
                nonce: B256::repeat_byte(0x42),
                signature: Bytes::from(vec![0x11u8; 65]),
                asset: address!("0xc01efAaF7C5C61bEbFAeb358E1161b537b8bC0e0").into(),
            },
        }
    }

    #[test]
    fn validates_complete_terms() {
        let terms = ExactPaymentTerms::try_from(&sample_requirements()).unwrap();
        assert_eq!(terms.max_amount_required, U256::from(1000u64));
        assert_eq!(terms.network, "cronos-testnet");
        assert_eq!(
            terms.asset,
            address!("0xc01efAaF7C5C61bEbFAeb358E1161b537b8bC0e0")
        );
    }

    #[test]
    fn missing_asset_is_rejected() {
        let mut requirements = sample_requirements();
        requirements.asset = None;
        let err = ExactPaymentTerms::try_from(&requirements).unwrap_err();
        assert!(matches!(err, TermsError::MissingField("asset")));
    }

    #[test]
    fn missing_pay_to_is_rejected() {
        let mut requirements = sample_requirements();
        requirements.pay_to = None;
        let err = ExactPaymentTerms::try_from(&requirements).unwrap_err();
        assert!(matches!(err, TermsError::MissingField("payTo")));
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let mut requirements = sample_requirements();
        requirements.max_amount_required = Some("a lot".to_string());
        let err = ExactPaymentTerms::try_from(&requirements).unwrap_err();
        assert!(matches!(
            err,
            TermsError::InvalidField {
                field: "maxAmountRequired",
                ..
            }
        ));
    }

    #[test]
    fn scheme_defaults_to_exact() {
        let mut requirements = sample_requirements();
        requirements.scheme = None;
        let terms = ExactPaymentTerms::try_from(&requirements).unwrap();
        assert_eq!(terms.scheme, EXACT_SCHEME);
    }

    #[test]
    fn payload_serializes_to_wire_shape() {
        let value = serde_json::to_value(sample_payload()).unwrap();
        assert_eq!(value["x402Version"], json!(1));
        assert_eq!(value["scheme"], json!("exact"));
        assert_eq!(value["network"], json!("cronos-testnet"));
        let payload = &value["payload"];
        assert_eq!(payload["value"], json!("1000"));
        assert_eq!(payload["validAfter"], json!(0));
        assert_eq!(payload["validBefore"], json!(1_700_000_300u64));
        let nonce = payload["nonce"].as_str().unwrap();
        assert!(nonce.starts_with("0x"));
        assert_eq!(nonce.len(), 66);
        let signature = payload["signature"].as_str().unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 132);
        assert_eq!(
            payload["from"],
            json!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
        );
        assert_eq!(
            payload["asset"],
            json!("0xc01efAaF7C5C61bEbFAeb358E1161b537b8bC0e0")
        );
    }

    #[test]
    fn credential_roundtrip() {
        let payload = sample_payload();
        let encoded = encode_payment(&payload).unwrap();
        let decoded = decode_payment(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_payment("not base64!!!").is_err());
    }
}
