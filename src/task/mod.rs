//! Task provisioning for Taskwright.
//!
//! Provisioning turns a task name and/or issue reference into a templated
//! task entry: the identity is resolved (optionally through the issue
//! tracker), a branch slug is derived, an existing review request for that
//! branch is looked up on a best-effort basis, and the results are
//! interpolated into the user's template. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
