#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # spotfinder-entities
//!
//! Reusable, agnostic domain entities for SpotFinder.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod favorite;
pub mod geo;
pub mod id;
pub mod rating;
pub mod report;
pub mod subscription;
pub mod time;
pub mod user;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
