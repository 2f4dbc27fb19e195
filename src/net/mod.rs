//! TLS plumbing for generated certificates.

pub mod config;
