//! Domain models for tythe
//!
//! This module contains pure domain objects representing core business entities:
//! payment destinations and the dependencies a crawl discovers.

pub mod dependency;
pub mod destination;

pub use dependency::Dependency;
pub use destination::{Destination, PaymentMethod};
