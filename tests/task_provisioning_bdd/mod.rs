//! Step definitions for task provisioning scenarios.

mod given;
mod then;
