//! Adapter implementations for task provisioning ports.

pub mod fs;
pub mod http;
pub mod memory;
