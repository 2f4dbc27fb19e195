//! Test certificate authorities.
//!
//! An [`Authority`] is a self-signed root plus its key. It exists to sign
//! leaf certificates for the lifetime of a test and should never be used for
//! anything else.

use crate::cert::entity::Certificate;
use crate::cert::identity::{set_validity, subject_name};
use crate::cert::loader::{encode_certificate_pem, load_certificates_from_pem};
use crate::cert::options::{SignOption, SignOptions};
use crate::crypto::rsa::{generate_rsa_keypair, Keypair, KEY_SIZE};
use crate::error::{CertTestError, Result};
use crate::net::config::{build_client_config, build_mtls_client_config, build_mtls_server_config};
use rcgen::{
    BasicConstraints, CertificateParams, CertificateSigningRequest,
    CertificateSigningRequestParams, ExtendedKeyUsagePurpose, Ia5String, IsCa, KeyUsagePurpose,
    SanType,
};
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use std::fmt;
use std::sync::Arc;

/// A certificate authority for ephemeral test usage.
pub struct Authority {
    name: String,
    cert: rcgen::Certificate,
    key_pair: rcgen::KeyPair,
}

impl Authority {
    /// Create a new test certificate authority. `name` becomes the common
    /// name and distinguishes multiple authorities.
    ///
    /// # Example
    ///
    /// ```
    /// use certtest::cert::ca::Authority;
    ///
    /// # fn example() -> certtest::error::Result<()> {
    /// let authority = Authority::new("root1")?;
    /// let pem = authority.certificate_pem()?;
    /// assert!(pem.starts_with(b"-----BEGIN CERTIFICATE-----"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(name: &str) -> Result<Self> {
        let key = generate_rsa_keypair(KEY_SIZE)?;
        let key_pair = key.to_rcgen()?;

        let mut params = CertificateParams::default();
        params.distinguished_name = subject_name(name);
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        set_validity(&mut params);

        let cert = params.self_signed(&key_pair).map_err(|e| {
            CertTestError::CertificateCreationError(format!("Failed to create CA: {}", e))
        })?;

        tracing::debug!(target: "certtest::ca", name = name, "Created certificate authority");

        Ok(Self {
            name: name.to_string(),
            cert,
            key_pair,
        })
    }

    /// Issue a leaf certificate signed by this authority.
    ///
    /// Without options the certificate is valid for `localhost` and
    /// `127.0.0.1`. See [`SignOption`] for how options change that.
    ///
    /// # Example
    ///
    /// ```
    /// use certtest::cert::ca::Authority;
    /// use certtest::cert::options::SignOption;
    /// use std::net::IpAddr;
    ///
    /// # fn example() -> certtest::error::Result<()> {
    /// let ip: IpAddr = "10.0.0.5".parse().unwrap();
    /// let authority = Authority::new("root1")?;
    /// let leaf = authority.issue("leaf1", &[SignOption::with_ips([ip])])?;
    /// let names = leaf.subject_alt_names()?;
    /// assert_eq!(names.ips, vec![ip]);
    /// assert!(names.domains.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn issue(&self, name: &str, options: &[SignOption]) -> Result<Certificate> {
        let key = generate_rsa_keypair(KEY_SIZE)?;
        let opts = SignOptions::from_options(options);

        let request = build_signing_request(&key, name, &opts)?;

        let mut csr = CertificateSigningRequestParams::from_der(request.der())
            .map_err(|e| CertTestError::SigningError(format!("Failed to parse CSR: {}", e)))?;

        csr.params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
        ];
        csr.params.extended_key_usages = vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
        ];
        set_validity(&mut csr.params);

        let cert = csr
            .signed_by(&self.cert, &self.key_pair)
            .map_err(|e| CertTestError::SigningError(format!("Failed to sign CSR: {}", e)))?;

        tracing::debug!(
            target: "certtest::ca",
            authority = %self.name,
            name = name,
            domains = opts.domains().len(),
            ips = opts.ips().len(),
            "Issued certificate"
        );

        Ok(Certificate::new(name, cert.der().clone(), key))
    }

    /// The authority certificate as PEM. Every call returns the same bytes.
    pub fn certificate_pem(&self) -> Result<Vec<u8>> {
        tracing::trace!(target: "certtest::ca", name = %self.name, "Exporting CA certificate");
        Ok(encode_certificate_pem(self.certificate_der()).into_bytes())
    }

    /// The authority certificate as DER.
    pub fn certificate_der(&self) -> &[u8] {
        self.cert.der().as_ref()
    }

    /// The common name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A root store trusting only this authority.
    pub fn cert_pool(&self) -> Result<RootCertStore> {
        let pem = self.certificate_pem()?;
        let pem = std::str::from_utf8(&pem)
            .map_err(|e| CertTestError::EncodingError(format!("PEM is not UTF-8: {}", e)))?;

        let mut roots = RootCertStore::empty();
        for der in load_certificates_from_pem(pem)? {
            roots.add(der).map_err(|e| {
                CertTestError::EncodingError(format!("Failed to add CA cert: {}", e))
            })?;
        }

        Ok(roots)
    }

    /// Client configuration verifying servers against this authority.
    pub fn client_config(&self) -> Result<Arc<ClientConfig>> {
        build_client_config(self.cert_pool()?)
    }

    /// Client configuration presenting `client` and verifying servers
    /// against this authority.
    pub fn mtls_client_config(&self, client: &Certificate) -> Result<Arc<ClientConfig>> {
        build_mtls_client_config(&client.tls_certificate()?, self.cert_pool()?)
    }

    /// Server configuration presenting `server` and requiring client
    /// certificates issued by this authority.
    pub fn mtls_server_config(&self, server: &Certificate) -> Result<Arc<ServerConfig>> {
        build_mtls_server_config(&server.tls_certificate()?, self.cert_pool()?)
    }
}

impl fmt::Debug for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn build_signing_request(
    key: &Keypair,
    name: &str,
    opts: &SignOptions,
) -> Result<CertificateSigningRequest> {
    let key_pair = key.to_rcgen()?;

    let mut params = CertificateParams::default();
    params.distinguished_name = subject_name(name);
    for domain in opts.domains() {
        let dns_name = Ia5String::try_from(domain.as_str()).map_err(|e| {
            CertTestError::CertificateCreationError(format!("Invalid domain {:?}: {}", domain, e))
        })?;
        params.subject_alt_names.push(SanType::DnsName(dns_name));
    }
    for ip in opts.ips() {
        params.subject_alt_names.push(SanType::IpAddress(ip));
    }

    params.serialize_request(&key_pair).map_err(|e| {
        CertTestError::CertificateCreationError(format!("Failed to create CSR: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::inspect::{is_ca, is_self_issued, parse_certificate_der};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_create_authority_is_ca() {
        let authority = Authority::new("Test Root CA").unwrap();
        let cert = parse_certificate_der(authority.certificate_der()).unwrap();

        assert!(is_ca(&cert).unwrap());
        assert!(is_self_issued(&cert));
        assert_eq!(authority.name(), "Test Root CA");
    }

    #[test]
    fn test_certificate_pem_format() {
        let authority = Authority::new("Test Root CA").unwrap();
        let pem = String::from_utf8(authority.certificate_pem().unwrap()).unwrap();

        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert!(pem.trim_end().ends_with("-----END CERTIFICATE-----"));
    }

    #[test]
    fn test_certificate_pem_idempotent() {
        let authority = Authority::new("Test Root CA").unwrap();

        let first = authority.certificate_pem().unwrap();
        let second = authority.certificate_pem().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_authorities_differ() {
        let a = Authority::new("root-a").unwrap();
        let b = Authority::new("root-b").unwrap();

        assert_ne!(a.certificate_der(), b.certificate_der());
    }

    #[test]
    fn test_cert_pool_contains_only_authority() {
        let authority = Authority::new("Test Root CA").unwrap();
        let pool = authority.cert_pool().unwrap();

        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_issue_default_names() {
        let authority = Authority::new("Test Root CA").unwrap();
        let leaf = authority.issue("leaf", &[]).unwrap();
        let names = leaf.subject_alt_names().unwrap();

        assert_eq!(names.domains, vec!["localhost"]);
        assert_eq!(names.ips, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }

    #[test]
    fn test_issue_with_domains_replaces_defaults() {
        let authority = Authority::new("Test Root CA").unwrap();
        let leaf = authority
            .issue("leaf", &[SignOption::with_domains(["example.com", "www.example.com"])])
            .unwrap();
        let names = leaf.subject_alt_names().unwrap();

        assert_eq!(names.domains, vec!["example.com", "www.example.com"]);
        assert!(names.ips.is_empty());
    }

    #[test]
    fn test_issue_invalid_domain() {
        let authority = Authority::new("Test Root CA").unwrap();
        let result = authority.issue("leaf", &[SignOption::with_domains(["bücher.example"])]);

        assert!(matches!(
            result,
            Err(CertTestError::CertificateCreationError(_))
        ));
    }

    #[test]
    fn test_issued_leaf_is_not_self_issued() {
        let authority = Authority::new("Test Root CA").unwrap();
        let leaf = authority.issue("leaf", &[]).unwrap();
        let cert = parse_certificate_der(leaf.certificate_der()).unwrap();
        let root = parse_certificate_der(authority.certificate_der()).unwrap();

        assert!(!is_self_issued(&cert));
        assert_eq!(cert.tbs_certificate.issuer, root.tbs_certificate.subject);
    }

    #[test]
    fn test_authority_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Authority>();
    }
}
