//! Application layer: scenario drivers
//!
//! Each service wires a domain component the way a client would and
//! returns the trace it produced.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::DomainResultExt;
