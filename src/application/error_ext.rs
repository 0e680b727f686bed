//! Error conversion helpers for scenario drivers
//!
//! Provides an extension trait that tags domain failures with the scenario step.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainResult;

/// Extension trait for converting `DomainResult` to `ApplicationResult` with context.
pub trait DomainResultExt<T> {
    /// Add scenario and step context to a domain error.
    ///
    /// # Example
    /// ```ignore
    /// arena.add(chassis, disk)
    ///     .in_scenario("assembly", "attach disk to chassis")?;
    /// ```
    fn in_scenario(self, scenario: &'static str, step: &str) -> ApplicationResult<T>;
}

impl<T> DomainResultExt<T> for DomainResult<T> {
    fn in_scenario(self, scenario: &'static str, step: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Scenario {
            scenario,
            context: step.to_string(),
            source: e,
        })
    }
}
