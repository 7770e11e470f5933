//! Command implementations for tythe CLI

pub mod cache;
pub mod completions;
pub mod distribute;
pub mod helpers;
pub mod list;
pub mod pay;
pub mod send;
