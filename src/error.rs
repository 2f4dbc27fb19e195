//! Error types for the certtest library.
//!
//! Every failure is passed straight through from the underlying key
//! generation, certificate or TLS crates, tagged with the step that failed.

use thiserror::Error;

/// The main error type for certtest operations.
#[derive(Error, Debug)]
pub enum CertTestError {
    /// RSA key pair could not be generated or converted
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Self-signed CA or certificate request could not be built
    #[error("Certificate creation error: {0}")]
    CertificateCreationError(String),

    /// Certificate request could not be signed by the authority
    #[error("Signing error: {0}")]
    SigningError(String),

    /// PEM or DER serialization or parsing failed
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// rustls configuration could not be assembled
    #[error("TLS config error: {0}")]
    TlsConfigError(String),
}

/// A specialized Result type for certtest operations.
pub type Result<T> = std::result::Result<T, CertTestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CertTestError::SigningError("bad request".to_string());
        assert_eq!(err.to_string(), "Signing error: bad request");

        let err = CertTestError::EncodingError("truncated".to_string());
        assert_eq!(err.to_string(), "Encoding error: truncated");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CertTestError>();
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> =
            Err(CertTestError::KeyGenerationError("no entropy".to_string()));
        assert!(err_result.is_err());
    }
}
