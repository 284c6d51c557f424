//! Runtime inspection system
//!
//! Exposes the attributes and methods of simulation types to an inspector
//! UI, which reads and edits attribute values on live instances and invokes
//! inspection methods.
//!
//! # Overview
//!
//! Each inspectable type lists its members once in a [`TypeDeclaration`]:
//!
//! - fields, read and written directly
//! - getter/setter methods, paired by display name into one attribute
//! - inspection methods, invoked with positional arguments
//!
//! The declaration is reconciled into an [`InspectionData`] registry. A
//! malformed declaration (a setter without a getter, a getter taking
//! parameters, a read-only getter with a setter) fails construction.
//!
//! # Usage
//!
//! ```rust,ignore
//! struct Robot { speed: i32, battery: i32 }
//!
//! impl Inspect for Robot {
//!     fn declare() -> TypeDeclaration<Self> {
//!         TypeDeclaration::new()
//!             .field(FieldRef::new("battery", |r: &Robot| &r.battery, |r: &mut Robot| &mut r.battery))
//!             .attribute(MethodRef::query("getSpeed", |r: &Robot| r.speed))
//!             .attribute(MethodRef::call1("setSpeed", |r: &mut Robot, v: i32| r.speed = v))
//!     }
//! }
//!
//! let manager = InspectionManager::default();
//! let data = manager.data::<Robot>()?;
//! data.set_attribute_value(&mut robot, "speed", Value::Int(12));
//! ```

mod access_point;
mod builder;
mod data;
mod declaration;
mod error;
mod export;
mod manager;
mod member;
mod registry;
mod types;

pub use access_point::AccessPoint;
pub use data::InspectionData;
pub use declaration::TypeDeclaration;
pub use error::{CallError, InspectionError, RegistryKind, ShapeFault};
pub use export::{AttributeSnapshot, Snapshot};
pub use manager::{Inspect, InspectionManager};
pub use member::{FieldRef, Marker, MarkerKind, MethodRef, Receiver};
pub use types::{InspectValue, ObjectType, ObjectValue, ParseValueError, Primitive, TypeRef, Value};
