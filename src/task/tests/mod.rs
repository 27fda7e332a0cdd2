//! Unit tests for the task provisioning context.
//!
//! - `domain_tests`: identity parsing, issue keys, review selection, document
//!   insertion
//! - `branch_tests`: branch slug derivation
//! - `template_tests`: placeholder rendering
//! - `service_tests`: resolver, correlator and orchestrator behaviour against
//!   mocked ports
