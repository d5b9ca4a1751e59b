//! ShopWave Core - Shared types library.
//!
//! This crate provides the common types used by the ShopWave storefront:
//! - `storefront` - Public shop, checkout mock and admin panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no sessions, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
