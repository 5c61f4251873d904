//! Shared test utilities for the Extension Installer workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each build their own catalogs. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`catalog`]: a small sample catalog, as descriptors and in memory
//! - [`site`]: [`TestSite`](site::TestSite) builder for a descriptor
//!   directory plus `extinstall.toml`

pub mod catalog;
pub mod site;
