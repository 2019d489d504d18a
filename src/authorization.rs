//! Construction and signing of ERC-3009 transfer authorizations.
//!
//! Given validated payment terms and the active network profile, this module
//! produces the typed message a facilitator can settle on-chain: a
//! `TransferWithAuthorization` struct hashed under the asset contract's
//! EIP-712 domain and signed by the payer.

use alloy_primitives::{Address, B256, Bytes, FixedBytes, Signature, U256};
use alloy_sol_types::{Eip712Domain, SolStruct, eip712_domain};
use rand::{Rng, rng};
use tracing::debug;

use crate::error::X402ClientError;
use crate::networks::NetworkProfile;
use crate::proto::X402Version1;
use crate::proto::exact::{
    ExactPaymentPayload, ExactPaymentTerms, PaymentPayload, TransferWithAuthorization,
};
use crate::signer::SignerLike;
use crate::timestamp::UnixTimestamp;

/// How long a payment authorization stays valid, in seconds.
///
/// Policy constant: the window is not extended on retry. Five minutes is
/// enough for one settlement round-trip and keeps a leaked credential
/// short-lived.
pub const AUTH_VALIDITY_WINDOW_SECS: u64 = 300;

/// An unsigned transfer authorization message.
///
/// `valid_after` is always zero (valid immediately); `valid_before` is the
/// construction time plus [`AUTH_VALIDITY_WINDOW_SECS`]. The nonce is 32
/// bytes of fresh CSPRNG output per authorization; reuse would let the
/// verifier replay-reject an otherwise valid payment, so one is never shared
/// between calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransferAuthorization {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub valid_after: UnixTimestamp,
    pub valid_before: UnixTimestamp,
    pub nonce: B256,
}

/// Builds a fresh authorization message for the given terms.
pub fn build_authorization(
    terms: &ExactPaymentTerms,
    payer: Address,
    now: UnixTimestamp,
) -> TransferAuthorization {
    let nonce: [u8; 32] = rng().random();
    TransferAuthorization {
        from: payer,
        to: terms.pay_to,
        value: terms.max_amount_required,
        valid_after: UnixTimestamp::from_secs(0),
        valid_before: now + AUTH_VALIDITY_WINDOW_SECS,
        nonce: FixedBytes(nonce),
    }
}

/// Builds the EIP-712 domain the authorization is signed under.
///
/// The `name` and `version` come from the network profile, the
/// `verifyingContract` from the terms' asset address. The verifier
/// reconstructs this domain on its side; any difference yields a signature
/// that is rejected remotely with no local symptom.
pub fn signing_domain(terms: &ExactPaymentTerms, profile: &NetworkProfile) -> Eip712Domain {
    eip712_domain! {
        name: profile.eip712.name.clone(),
        version: profile.eip712.version.clone(),
        chain_id: profile.chain_id,
        verifying_contract: terms.asset,
    }
}

fn eip712_hash(authorization: &TransferAuthorization, domain: &Eip712Domain) -> B256 {
    let transfer_with_authorization = TransferWithAuthorization {
        from: authorization.from,
        to: authorization.to,
        value: authorization.value,
        validAfter: U256::from(authorization.valid_after.as_secs()),
        validBefore: U256::from(authorization.valid_before.as_secs()),
        nonce: authorization.nonce,
    };
    transfer_with_authorization.eip712_signing_hash(domain)
}

/// Signs the authorization under the given domain.
pub async fn sign_authorization<S: SignerLike + Sync>(
    signer: &S,
    authorization: &TransferAuthorization,
    domain: &Eip712Domain,
) -> Result<Signature, X402ClientError> {
    let hash = eip712_hash(authorization, domain);
    let signature = signer
        .sign_hash(&hash)
        .await
        .map_err(|e| X402ClientError::SigningFailure(format!("{e:?}")))?;
    debug!(?authorization, "signed transfer authorization");
    Ok(signature)
}

/// Assembles the wire credential from a signed authorization.
pub fn payment_payload(
    terms: &ExactPaymentTerms,
    authorization: TransferAuthorization,
    signature: &Signature,
) -> PaymentPayload {
    PaymentPayload {
        x402_version: X402Version1,
        scheme: terms.scheme.clone(),
        network: terms.network.clone(),
        payload: ExactPaymentPayload {
            from: authorization.from.into(),
            to: authorization.to.into(),
            value: authorization.value,
            valid_after: authorization.valid_after,
            valid_before: authorization.valid_before,
            nonce: authorization.nonce,
            signature: Bytes::from(signature.as_bytes().to_vec()),
            asset: terms.asset.into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_signer_local::PrivateKeySigner;
    use std::collections::HashSet;

    fn sample_terms() -> ExactPaymentTerms {
        ExactPaymentTerms {
            scheme: "exact".to_string(),
            network: "cronos-testnet".to_string(),
            asset: address!("0xc01efAaF7C5C61bEbFAeb358E1161b537b8bC0e0"),
            pay_to: address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
            max_amount_required: U256::from(1000u64),
        }
    }

    #[test]
    fn validity_window_is_fixed() {
        let now = UnixTimestamp::from_secs(1_700_000_000);
        let authorization = build_authorization(&sample_terms(), Address::ZERO, now);
        assert_eq!(authorization.valid_after.as_secs(), 0);
        assert_eq!(
            authorization.valid_before.as_secs(),
            1_700_000_000 + AUTH_VALIDITY_WINDOW_SECS
        );
    }

    #[test]
    fn nonces_are_unique() {
        let terms = sample_terms();
        let now = UnixTimestamp::from_secs(1_700_000_000);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let authorization = build_authorization(&terms, Address::ZERO, now);
            assert!(
                seen.insert(authorization.nonce),
                "nonce generated twice: {}",
                authorization.nonce
            );
        }
    }

    #[test]
    fn authorization_carries_terms_values() {
        let terms = sample_terms();
        let payer = address!("0x0000000000000000000000000000000000000042");
        let authorization =
            build_authorization(&terms, payer, UnixTimestamp::from_secs(1_700_000_000));
        assert_eq!(authorization.from, payer);
        assert_eq!(authorization.to, terms.pay_to);
        assert_eq!(authorization.value, terms.max_amount_required);
    }

    #[tokio::test]
    async fn signature_recovers_to_payer() {
        let signer = PrivateKeySigner::random();
        let terms = sample_terms();
        let profile = crate::networks::NetworkProfile::testnet();
        let authorization =
            build_authorization(&terms, signer.address(), UnixTimestamp::now());
        let domain = signing_domain(&terms, &profile);
        let signature = sign_authorization(&signer, &authorization, &domain)
            .await
            .unwrap();
        let hash = eip712_hash(&authorization, &domain);
        let recovered = signature.recover_address_from_prehash(&hash).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[tokio::test]
    async fn domain_change_changes_signature() {
        let signer = PrivateKeySigner::random();
        let terms = sample_terms();
        let profile = crate::networks::NetworkProfile::testnet();
        let migrated = profile.clone().with_eip712(crate::networks::Eip712DomainConfig {
            name: "USD Coin".into(),
            version: "2".into(),
        });
        let authorization =
            build_authorization(&terms, signer.address(), UnixTimestamp::from_secs(1_700_000_000));
        let sig_a = sign_authorization(&signer, &authorization, &signing_domain(&terms, &profile))
            .await
            .unwrap();
        let sig_b = sign_authorization(&signer, &authorization, &signing_domain(&terms, &migrated))
            .await
            .unwrap();
        assert_ne!(sig_a, sig_b);
    }
}
