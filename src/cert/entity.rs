//! Leaf certificates issued by a test authority.

use crate::cert::ca::Authority;
use crate::cert::inspect::{parse_certificate_der, subject_alt_names, SubjectAltNames};
use crate::cert::loader::encode_certificate_pem;
use crate::crypto::rsa::Keypair;
use crate::error::Result;
use crate::net::config::{build_server_config, TlsKeyPair};
use rustls::pki_types::CertificateDer;
use rustls::ServerConfig;
use std::sync::Arc;

/// A certificate signed by an [`Authority`], together with its private key.
#[derive(Debug, Clone)]
pub struct Certificate {
    name: String,
    cert_der: CertificateDer<'static>,
    key: Keypair,
}

impl Certificate {
    pub(crate) fn new(name: &str, cert_der: CertificateDer<'static>, key: Keypair) -> Self {
        Self {
            name: name.to_string(),
            cert_der,
            key,
        }
    }

    /// The common name given at issuance.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn certificate_der(&self) -> &[u8] {
        self.cert_der.as_ref()
    }

    pub fn certificate_pem(&self) -> String {
        encode_certificate_pem(self.certificate_der())
    }

    /// PKCS#8 PEM of the private key.
    pub fn private_key_pem(&self) -> Result<String> {
        self.key.private_key_pem()
    }

    /// This certificate followed by its issuing authority, as PEM.
    pub fn chain_pem(&self, authority: &Authority) -> String {
        format!(
            "{}{}",
            self.certificate_pem(),
            encode_certificate_pem(authority.certificate_der())
        )
    }

    /// DNS and IP names the certificate is valid for.
    pub fn subject_alt_names(&self) -> Result<SubjectAltNames> {
        let cert = parse_certificate_der(self.certificate_der())?;
        subject_alt_names(&cert)
    }

    /// Certificate and key in the form a rustls endpoint consumes.
    ///
    /// # Example
    ///
    /// ```
    /// use certtest::cert::ca::Authority;
    ///
    /// # fn example() -> certtest::error::Result<()> {
    /// let authority = Authority::new("root")?;
    /// let leaf = authority.issue("server", &[])?;
    /// let key_pair = leaf.tls_certificate()?;
    /// assert_eq!(key_pair.cert_chain.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn tls_certificate(&self) -> Result<TlsKeyPair> {
        let key_pem = self.private_key_pem()?;
        TlsKeyPair::from_pem(&self.certificate_pem(), &key_pem)
    }

    /// Server configuration presenting this certificate, without client
    /// authentication.
    pub fn server_config(&self) -> Result<Arc<ServerConfig>> {
        build_server_config(&self.tls_certificate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::options::SignOption;
    use rustls::pki_types::PrivateKeyDer;

    #[test]
    fn test_certificate_pem_format() {
        let authority = Authority::new("Root CA").unwrap();
        let leaf = authority.issue("example.com", &[]).unwrap();

        let pem = leaf.certificate_pem();
        assert!(pem.contains("BEGIN CERTIFICATE"));
        assert!(pem.contains("END CERTIFICATE"));
        assert_eq!(leaf.name(), "example.com");
    }

    #[test]
    fn test_chain_pem() {
        let authority = Authority::new("Root CA").unwrap();
        let leaf = authority.issue("example.com", &[]).unwrap();

        let chain = leaf.chain_pem(&authority);
        assert_eq!(chain.matches("BEGIN CERTIFICATE").count(), 2);
        assert!(chain.starts_with(&leaf.certificate_pem()));
    }

    #[test]
    fn test_tls_certificate() {
        let authority = Authority::new("Root CA").unwrap();
        let leaf = authority.issue("example.com", &[]).unwrap();

        let key_pair = leaf.tls_certificate().unwrap();
        assert_eq!(key_pair.cert_chain.len(), 1);
        assert_eq!(key_pair.cert_chain[0].as_ref(), leaf.certificate_der());
        assert!(matches!(key_pair.private_key, PrivateKeyDer::Pkcs8(_)));
    }

    #[test]
    fn test_ips_only() {
        let authority = Authority::new("root1").unwrap();
        let ip = "10.0.0.5".parse().unwrap();
        let leaf = authority
            .issue("leaf1", &[SignOption::with_ips([ip])])
            .unwrap();

        let names = leaf.subject_alt_names().unwrap();
        assert_eq!(names.ips, vec![ip]);
        assert!(names.domains.is_empty());
    }

    #[test]
    fn test_leaves_have_distinct_keys() {
        let authority = Authority::new("Root CA").unwrap();
        let leaf1 = authority.issue("one", &[]).unwrap();
        let leaf2 = authority.issue("two", &[]).unwrap();

        assert_ne!(
            leaf1.private_key_pem().unwrap(),
            leaf2.private_key_pem().unwrap()
        );
        assert_ne!(leaf1.certificate_der(), leaf2.certificate_der());
    }

    #[test]
    fn test_server_config() {
        let authority = Authority::new("Root CA").unwrap();
        let leaf = authority.issue("server", &[]).unwrap();

        assert!(leaf.server_config().is_ok());
    }
}
