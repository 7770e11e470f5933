//! Donation configuration handling for tythe
//!
//! A package opts into receiving donations by shipping one of:
//! - `tythe.json` (preferred)
//! - `tythe.yaml` / `tythe.yml`
//!
//! at its root. See [`donation`] for the accepted shapes.

pub mod donation;

pub use donation::{DonationConfig, read_config};
