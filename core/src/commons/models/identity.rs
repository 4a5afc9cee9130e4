//! Administrative identities acting on behalf of an organization
use serde::{Deserialize, Serialize};

/// Key material of an identity, both in PEM format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CryptoContent {
    #[serde(rename = "privateKeyPEM")]
    pub private_key_pem: String,
    #[serde(rename = "signedCertPEM")]
    pub signed_cert_pem: String,
}

/// An actor authorized to sign on behalf of an organization or the ordering service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    #[serde(rename = "mspid")]
    pub msp_id: String,
    #[serde(rename = "cryptoContent")]
    pub crypto_content: CryptoContent,
}

impl Identity {
    pub fn new(username: String, msp_id: String, crypto_content: CryptoContent) -> Self {
        Self {
            username,
            msp_id,
            crypto_content,
        }
    }

    /// An identity is enrolled once it carries both a private key and a signed certificate.
    pub fn is_enrolled(&self) -> bool {
        !self.crypto_content.private_key_pem.trim().is_empty()
            && !self.crypto_content.signed_cert_pem.trim().is_empty()
    }

    /// Bytes identifying the creator of a transaction: MSP id followed by the certificate.
    pub fn creator_bytes(&self) -> Vec<u8> {
        let mut bytes = self.msp_id.as_bytes().to_vec();
        bytes.extend_from_slice(self.crypto_content.signed_cert_pem.as_bytes());
        bytes
    }
}
