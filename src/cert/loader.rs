//! PEM framing for certificates and keys.
//!
//! Parsing goes through `rustls-pemfile` so the results are the DER types
//! rustls consumes directly.

use crate::error::{CertTestError, Result};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls_pemfile::Item;
use std::io::Cursor;

/// Load the first certificate from PEM text.
///
/// # Example
///
/// ```
/// use certtest::cert::ca::Authority;
/// use certtest::cert::loader::load_certificate_from_pem;
///
/// # fn example() -> certtest::error::Result<()> {
/// let authority = Authority::new("root")?;
/// let pem = String::from_utf8(authority.certificate_pem()?).unwrap();
/// let der = load_certificate_from_pem(&pem)?;
/// assert_eq!(der.as_ref(), authority.certificate_der());
/// # Ok(())
/// # }
/// ```
pub fn load_certificate_from_pem(pem_str: &str) -> Result<CertificateDer<'static>> {
    let mut cursor = Cursor::new(pem_str.as_bytes());

    loop {
        match rustls_pemfile::read_one(&mut cursor)
            .map_err(|e| CertTestError::EncodingError(format!("Failed to read PEM: {}", e)))?
        {
            Some(Item::X509Certificate(cert_der)) => return Ok(cert_der),
            Some(_) => continue,
            None => {
                return Err(CertTestError::EncodingError(
                    "PEM does not contain a certificate".to_string(),
                ))
            }
        }
    }
}

/// Load every certificate from PEM text, skipping other items.
pub fn load_certificates_from_pem(pem_str: &str) -> Result<Vec<CertificateDer<'static>>> {
    let mut cursor = Cursor::new(pem_str.as_bytes());
    let mut certificates = Vec::new();

    loop {
        match rustls_pemfile::read_one(&mut cursor)
            .map_err(|e| CertTestError::EncodingError(format!("Failed to read PEM: {}", e)))?
        {
            Some(Item::X509Certificate(cert_der)) => {
                certificates.push(cert_der);
            }
            Some(_) => continue,
            None => break,
        }
    }

    if certificates.is_empty() {
        return Err(CertTestError::EncodingError(
            "No certificates found in PEM".to_string(),
        ));
    }

    Ok(certificates)
}

/// Load the first private key (PKCS#1, PKCS#8 or SEC1) from PEM text.
pub fn load_private_key_from_pem(pem_str: &str) -> Result<PrivateKeyDer<'static>> {
    let mut cursor = Cursor::new(pem_str.as_bytes());

    rustls_pemfile::private_key(&mut cursor)
        .map_err(|e| CertTestError::EncodingError(format!("Failed to read PEM: {}", e)))?
        .ok_or_else(|| CertTestError::EncodingError("PEM does not contain a private key".to_string()))
}

/// Frame a DER certificate as PEM with LF line endings.
pub fn encode_certificate_pem(der: &[u8]) -> String {
    let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
    pem::encode_config(&pem::Pem::new("CERTIFICATE", der.to_vec()), config)
}
