//! Application services for task provisioning.

mod correlator;
mod error;
mod provisioning;
mod resolver;

pub use correlator::ReviewCorrelator;
pub use error::{ProvisioningError, ProvisioningResult};
pub use provisioning::{ProvisionedTask, ProvisioningService};
pub use resolver::IdentityResolver;
