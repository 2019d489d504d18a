//! Signing capability over an external secp256k1 ECDSA signer.
//!
//! The payment client does not implement any cryptography of its own. It
//! hashes the typed authorization per EIP-712 and hands the 32-byte digest
//! to a [`SignerLike`] implementation. A signing failure is fatal to the
//! call; there is no retry.

use alloy_primitives::{Address, FixedBytes, Signature};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::Arc;

/// A trait that abstracts signing operations, allowing both owned signers
/// and Arc-wrapped signers.
///
/// This is necessary because Alloy's `Signer` trait is not implemented for
/// `Arc<T>`, but callers may want to share one signer across concurrent
/// payment calls.
#[async_trait]
pub trait SignerLike {
    /// Returns the address of the signer, used as the `from` of every
    /// payment authorization.
    fn address(&self) -> Address;

    /// Signs the given hash.
    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error>;
}

#[async_trait]
impl SignerLike for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

#[async_trait]
impl<T: SignerLike + Send + Sync> SignerLike for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        (**self).sign_hash(hash).await
    }
}
