//! Task board management.
//!
//! The board keeps a read-through copy of the remote task collection and
//! replaces it wholesale after every successful mutation. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Pure board views (filtering, column partitioning) in [`view`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod view;

#[cfg(test)]
mod tests;
