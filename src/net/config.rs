//! TLS configuration for test endpoints.
//!
//! This module turns generated certificates into rustls key pairs and
//! client/server configurations.

use crate::cert::inspect::parse_certificate_der;
use crate::cert::loader::{load_certificates_from_pem, load_private_key_from_pem};
use crate::crypto::rsa::Keypair;
use crate::error::{CertTestError, Result};
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use std::sync::Arc;

/// A certificate chain plus matching private key, ready to be used as a TLS
/// endpoint identity.
#[derive(Debug)]
pub struct TlsKeyPair {
    /// Leaf first
    pub cert_chain: Vec<CertificateDer<'static>>,
    pub private_key: PrivateKeyDer<'static>,
}

impl TlsKeyPair {
    /// Parse PEM certificate(s) and a PEM private key, checking that the key
    /// belongs to the first certificate.
    pub fn from_pem(cert_pem: &str, key_pem: &str) -> Result<Self> {
        let cert_chain = load_certificates_from_pem(cert_pem)?;
        let private_key = load_private_key_from_pem(key_pem)?;

        check_key_matches(&cert_chain[0], &private_key)?;

        Ok(Self {
            cert_chain,
            private_key,
        })
    }
}

impl Clone for TlsKeyPair {
    fn clone(&self) -> Self {
        Self {
            cert_chain: self.cert_chain.clone(),
            private_key: self.private_key.clone_key(),
        }
    }
}

fn check_key_matches(cert_der: &CertificateDer<'_>, key: &PrivateKeyDer<'_>) -> Result<()> {
    let PrivateKeyDer::Pkcs8(pkcs8) = key else {
        return Err(CertTestError::EncodingError(
            "Only PKCS#8 RSA private keys are supported".to_string(),
        ));
    };

    let secret = RsaPrivateKey::from_pkcs8_der(pkcs8.secret_pkcs8_der())
        .map_err(|e| CertTestError::EncodingError(format!("Failed to parse private key: {}", e)))?;
    let public_key = Keypair { secret }.public_key_pkcs1_der()?;

    let cert = parse_certificate_der(cert_der.as_ref())?;
    let cert_key = cert
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .raw_bytes();

    if cert_key != public_key.as_slice() {
        return Err(CertTestError::EncodingError(
            "Private key does not match certificate public key".to_string(),
        ));
    }

    Ok(())
}

fn install_crypto_provider() {
    // Install default crypto provider if not already set
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Build a server configuration without client authentication.
pub fn build_server_config(key_pair: &TlsKeyPair) -> Result<Arc<ServerConfig>> {
    install_crypto_provider();

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(key_pair.cert_chain.clone(), key_pair.private_key.clone_key())
        .map_err(|e| CertTestError::TlsConfigError(format!("Failed to build server config: {}", e)))?;

    Ok(Arc::new(config))
}

/// Build a server configuration that requires client certificates issued by
/// one of `client_roots`.
pub fn build_mtls_server_config(
    key_pair: &TlsKeyPair,
    client_roots: RootCertStore,
) -> Result<Arc<ServerConfig>> {
    install_crypto_provider();

    let verifier = WebPkiClientVerifier::builder(Arc::new(client_roots))
        .build()
        .map_err(|e| {
            CertTestError::TlsConfigError(format!("Failed to build client verifier: {}", e))
        })?;

    let config = ServerConfig::builder()
        .with_client_cert_verifier(verifier)
        .with_single_cert(key_pair.cert_chain.clone(), key_pair.private_key.clone_key())
        .map_err(|e| CertTestError::TlsConfigError(format!("Failed to build server config: {}", e)))?;

    Ok(Arc::new(config))
}

/// Build a client configuration trusting `roots`.
pub fn build_client_config(roots: RootCertStore) -> Result<Arc<ClientConfig>> {
    install_crypto_provider();

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Build a client configuration trusting `roots` and presenting `key_pair`.
pub fn build_mtls_client_config(
    key_pair: &TlsKeyPair,
    roots: RootCertStore,
) -> Result<Arc<ClientConfig>> {
    install_crypto_provider();

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_client_auth_cert(key_pair.cert_chain.clone(), key_pair.private_key.clone_key())
        .map_err(|e| CertTestError::TlsConfigError(format!("Failed to build client config: {}", e)))?;

    Ok(Arc::new(config))
}
