//! Certificate generation module.
//!
//! This module provides a disposable certificate authority and the leaf
//! certificates it issues.

pub mod ca;
pub mod entity;
pub mod identity;
pub mod inspect;
pub mod loader;
pub mod options;
