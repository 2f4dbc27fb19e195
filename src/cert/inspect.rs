//! Read-only views into generated certificates.
//!
//! Certificates are decoded with `x509-cert` so callers can assert on what
//! was actually written to the DER, not on the parameters that produced it.

use crate::error::{CertTestError, Result};
use const_oid::db::rfc4519::CN;
use const_oid::db::rfc5280::{ID_CE_BASIC_CONSTRAINTS, ID_CE_SUBJECT_ALT_NAME};
use const_oid::ObjectIdentifier;
use der::asn1::{PrintableStringRef, Utf8StringRef};
use der::Decode;
use std::net::IpAddr;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{BasicConstraints, SubjectAltName};
use x509_cert::name::Name;
use x509_cert::Certificate;

/// Subject Alternative Names split by kind, in certificate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltNames {
    pub domains: Vec<String>,
    pub ips: Vec<IpAddr>,
}

/// Decode a DER certificate.
pub fn parse_certificate_der(der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(der)
        .map_err(|e| CertTestError::EncodingError(format!("Failed to decode certificate: {}", e)))
}

/// Decode a single PEM certificate.
pub fn certificate_from_pem(pem_str: &str) -> Result<Certificate> {
    let pem = pem::parse(pem_str)
        .map_err(|e| CertTestError::EncodingError(format!("Failed to parse PEM: {}", e)))?;

    if pem.tag() != "CERTIFICATE" {
        return Err(CertTestError::EncodingError(format!(
            "Expected CERTIFICATE, got {}",
            pem.tag()
        )));
    }

    parse_certificate_der(pem.contents())
}

fn extension_value<'a>(cert: &'a Certificate, oid: &ObjectIdentifier) -> Option<&'a [u8]> {
    cert.tbs_certificate
        .extensions
        .as_ref()?
        .iter()
        .find(|ext| ext.extn_id == *oid)
        .map(|ext| ext.extn_value.as_bytes())
}

/// Extract DNS and IP Subject Alternative Names. Other name kinds are
/// ignored; a certificate without the extension yields empty lists.
pub fn subject_alt_names(cert: &Certificate) -> Result<SubjectAltNames> {
    let mut names = SubjectAltNames::default();

    let Some(value) = extension_value(cert, &ID_CE_SUBJECT_ALT_NAME) else {
        return Ok(names);
    };

    let san = SubjectAltName::from_der(value).map_err(|e| {
        CertTestError::EncodingError(format!("Failed to decode subjectAltName: {}", e))
    })?;

    for general_name in san.0 {
        match general_name {
            GeneralName::DnsName(dns) => names.domains.push(dns.to_string()),
            GeneralName::IpAddress(octets) => names.ips.push(ip_from_octets(octets.as_bytes())?),
            _ => {}
        }
    }

    Ok(names)
}

fn ip_from_octets(octets: &[u8]) -> Result<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        return Ok(IpAddr::from(v4));
    }
    if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        return Ok(IpAddr::from(v6));
    }
    Err(CertTestError::EncodingError(format!(
        "IP address SAN has {} bytes",
        octets.len()
    )))
}

/// Whether basic constraints mark the certificate as a CA.
pub fn is_ca(cert: &Certificate) -> Result<bool> {
    let Some(value) = extension_value(cert, &ID_CE_BASIC_CONSTRAINTS) else {
        return Ok(false);
    };

    let constraints = BasicConstraints::from_der(value).map_err(|e| {
        CertTestError::EncodingError(format!("Failed to decode basicConstraints: {}", e))
    })?;

    Ok(constraints.ca)
}

/// Issuer and subject names are identical.
pub fn is_self_issued(cert: &Certificate) -> bool {
    cert.tbs_certificate.issuer == cert.tbs_certificate.subject
}

/// First common name in `name`, if any.
pub fn common_name(name: &Name) -> Option<String> {
    name.0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .filter(|atv| atv.oid == CN)
        .find_map(|atv| {
            atv.value
                .decode_as::<Utf8StringRef<'_>>()
                .map(|s| s.to_string())
                .or_else(|_| {
                    atv.value
                        .decode_as::<PrintableStringRef<'_>>()
                        .map(|s| s.to_string())
                })
                .ok()
        })
}
