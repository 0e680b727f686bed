//! Domain layer: the pattern components themselves
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod equipment;
pub mod error;
pub mod icon;
pub mod image;

pub use equipment::{EquipmentArena, EquipmentData, EquipmentKind, EquipmentRef};
pub use error::{DomainError, DomainResult};
pub use icon::{BoundingBox, Dialog, Icon, IconCatalog, IconFactory, IconSize};
pub use image::{Graphic, ImageProxy, ImageSession, ImageState, RealImage};
