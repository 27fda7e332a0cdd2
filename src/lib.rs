//! Taskwright: templated task provisioning from issue-tracker and code-review
//! metadata.
//!
//! This crate resolves a task's identity from free text or an issue key,
//! derives a deterministic branch name, links an existing review request for
//! that branch, and renders everything into a user-supplied template that is
//! then inserted into a task document.
//!
//! # Architecture
//!
//! Taskwright follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, filesystem, memory)
//!
//! # Modules
//!
//! - [`config`]: Settings loading and service wiring
//! - [`task`]: Identity resolution, branch derivation and template rendering

pub mod config;
pub mod task;
