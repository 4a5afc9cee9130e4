//! Channel configuration updates and their signatures
use super::transaction::TransactionContext;
use crate::client::Connection;

/// Signature of a configuration update by one signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSignature {
    /// MSP id of the signer
    pub signer: String,
    pub signature_header: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Copies of each signature the orderer expects in a channel creation.
pub const SIGNATURES_PER_SIGNER: usize = 2;

/// A configuration update that is still collecting signatures.
///
/// Signatures can only be appended. Once every party has signed, [`ChannelConfigUpdate::seal`]
/// turns it into a [`SignedConfigUpdate`], which accepts no further signatures and is
/// consumed when the creation request is built.
#[derive(Debug, Clone)]
pub struct ChannelConfigUpdate {
    config: Vec<u8>,
    signatures: Vec<ConfigSignature>,
}

impl ChannelConfigUpdate {
    pub fn new(config: Vec<u8>) -> Self {
        Self {
            config,
            signatures: Vec::new(),
        }
    }

    pub fn config(&self) -> &[u8] {
        &self.config
    }

    pub fn signatures(&self) -> &[ConfigSignature] {
        &self.signatures
    }

    /// Appends the signature of a signer. The orderer counts signatures against its
    /// policies in a way that currently requires every signer to appear twice.
    pub fn append_signer(&mut self, signature: ConfigSignature) {
        for _ in 1..SIGNATURES_PER_SIGNER {
            self.signatures.push(signature.clone());
        }
        self.signatures.push(signature);
    }

    /// Closes the update once all `signers` have signed. A partially signed update
    /// is never sealed.
    pub fn seal(self, signers: usize) -> Option<SignedConfigUpdate> {
        if signers == 0 || self.signatures.len() != signers * SIGNATURES_PER_SIGNER {
            return None;
        }
        Some(SignedConfigUpdate {
            config: self.config,
            signatures: self.signatures,
        })
    }
}

/// A fully signed configuration update, ready to be submitted.
#[derive(Debug, Clone)]
pub struct SignedConfigUpdate {
    config: Vec<u8>,
    signatures: Vec<ConfigSignature>,
}

impl SignedConfigUpdate {
    pub fn signatures(&self) -> &[ConfigSignature] {
        &self.signatures
    }

    pub fn into_request(
        self,
        name: String,
        orderer: Connection,
        context: TransactionContext,
    ) -> CreateChannelRequest {
        CreateChannelRequest {
            config: self.config,
            signatures: self.signatures,
            name,
            orderer,
            context,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateChannelRequest {
    pub config: Vec<u8>,
    pub signatures: Vec<ConfigSignature>,
    pub name: String,
    pub orderer: Connection,
    pub context: TransactionContext,
}
