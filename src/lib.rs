//! Structural design patterns as small, typed components.
//!
//! - [`domain::EquipmentArena`]: composite part/whole tree with exclusive ownership
//! - [`domain::IconFactory`]: flyweight registry sharing one icon per key
//! - [`domain::ImageProxy`]: virtual proxy that loads its image on first draw

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
