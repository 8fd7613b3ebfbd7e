//! Core rate logic for Kur.
//!
//! This crate owns everything between the upstream rate sheet and the
//! router: parsing, the TTL cache, and cross-rate computation. It has no
//! web framework dependencies.
//!
//! # Modules
//!
//! - `currency` - Rate feed, cache, and the `CurrencyService` entry point

pub mod currency;
