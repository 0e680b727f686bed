//! Scenario services
//!
//! One driver per component, each reproducing the classic client walkthrough.

pub mod assembly;
pub mod dialogs;
pub mod gallery;

pub use assembly::{AssemblyReport, AssemblyScenario};
pub use dialogs::{DialogReport, DialogScenario};
pub use gallery::{GalleryReport, GalleryScenario};
