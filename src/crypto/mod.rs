//! Cryptographic key material.
//!
//! Key generation is delegated to the `rsa` crate; this module only wraps the
//! result so it can be handed to rcgen and rustls.
//!
//! # Example
//!
//! ```rust
//! use certtest::crypto::rsa::{generate_rsa_keypair, KEY_SIZE};
//!
//! # fn example() -> certtest::error::Result<()> {
//! let keypair = generate_rsa_keypair(KEY_SIZE)?;
//! let pem = keypair.private_key_pem()?;
//! assert!(pem.contains("BEGIN PRIVATE KEY"));
//! # Ok(())
//! # }
//! ```

pub mod rsa;
