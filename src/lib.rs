//! certtest: ephemeral certificate authorities for TLS tests
//!
//! This library builds throwaway X.509 material for tests that need TLS:
//!
//! - A self-signed certificate authority per test fixture
//! - Leaf certificates signed by that authority, valid for `localhost` and
//!   `127.0.0.1` unless told otherwise
//! - PEM export, rustls key pairs, root stores and ready-made configs
//!
//! Nothing here is suitable for production certificates. Keys are never
//! written to disk and every certificate expires after a year.
//!
//! # Example
//!
//! ```rust
//! use certtest::{Authority, SignOption};
//!
//! fn example() -> certtest::Result<()> {
//!     let authority = Authority::new("root1")?;
//!     let server = authority.issue("server", &[SignOption::with_domains(["service.test"])])?;
//!
//!     let server_config = server.server_config()?;
//!     let client_config = authority.client_config()?;
//!     # let _ = (server_config, client_config);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod cert;
pub mod crypto;
pub mod error;
pub mod net;

// Re-export commonly used types
pub use cert::ca::Authority;
pub use cert::entity::Certificate;
pub use cert::options::SignOption;
pub use error::{CertTestError, Result};
pub use net::config::TlsKeyPair;
