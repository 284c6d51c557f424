//! Simscope Core - Runtime inspection for simulation types
//!
//! This crate provides the registry behind the simscope inspector: typed
//! declarations of inspectable members, their reconciliation into
//! attribute access points and a uniform get/set/invoke facade.
//!
//! # Architecture
//!
//! - [`TypeDeclaration`] - Inspectable fields and methods of one type
//! - [`InspectionData`] - Validated registry with get/set/invoke access
//! - [`InspectionManager`] - Builds and caches registries per type
//! - [`Snapshot`] - Exports attribute values as TOML or JSON

pub mod config;
pub mod inspect;
#[cfg(test)]
pub mod test_utils;

pub use config::{Config, DuplicateNamePolicy, InspectionConfig};
pub use inspect::{
    AccessPoint, CallError, FieldRef, Inspect, InspectionData, InspectionError,
    InspectionManager, MethodRef, Snapshot, TypeDeclaration, TypeRef, Value,
};
