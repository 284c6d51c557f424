//! Attribute access points
//!
//! An [`AccessPoint`] gives uniform get/set access to one inspectable
//! attribute, whether it is stored in a field or exposed through a getter
//! and an optional setter.

use super::error::InspectionError;
use super::member::{FieldRef, MethodRef};
use super::types::{TypeRef, Value};

enum Storage<T> {
    Field(FieldRef<T>),
    Accessors {
        getter: MethodRef<T>,
        setter: Option<MethodRef<T>>,
    },
}

/// Read/write access to one inspectable attribute
pub struct AccessPoint<T> {
    name: String,
    storage: Storage<T>,
    ty: TypeRef,
    read_only: bool,
}

impl<T> AccessPoint<T> {
    /// Access point over a field; read-only comes from the field marker
    pub(crate) fn from_field(name: String, field: FieldRef<T>) -> Self {
        Self {
            name,
            ty: field.declared_type().boxed(),
            read_only: field.marker().read_only,
            storage: Storage::Field(field),
        }
    }

    /// Read-only access point over a lone getter
    pub(crate) fn from_getter(name: String, getter: MethodRef<T>) -> Self {
        Self {
            name,
            ty: getter.return_type().boxed(),
            read_only: true,
            storage: Storage::Accessors {
                getter,
                setter: None,
            },
        }
    }

    /// Writable access point over a getter/setter pair
    pub(crate) fn from_pair(name: String, getter: MethodRef<T>, setter: MethodRef<T>) -> Self {
        Self {
            name,
            ty: getter.return_type().boxed(),
            read_only: false,
            storage: Storage::Accessors {
                getter,
                setter: Some(setter),
            },
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized (boxed) attribute type
    pub fn value_type(&self) -> TypeRef {
        self.ty
    }

    /// Whether writes are rejected
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the attribute is stored in a field
    pub fn uses_field(&self) -> bool {
        matches!(self.storage, Storage::Field(_))
    }

    /// Underlying field, if any
    pub fn field(&self) -> Option<&FieldRef<T>> {
        match &self.storage {
            Storage::Field(field) => Some(field),
            Storage::Accessors { .. } => None,
        }
    }

    /// Underlying getter, if any
    pub fn getter(&self) -> Option<&MethodRef<T>> {
        match &self.storage {
            Storage::Field(_) => None,
            Storage::Accessors { getter, .. } => Some(getter),
        }
    }

    /// Underlying setter, if any
    pub fn setter(&self) -> Option<&MethodRef<T>> {
        match &self.storage {
            Storage::Field(_) => None,
            Storage::Accessors { setter, .. } => setter.as_ref(),
        }
    }

    /// Read the attribute from `target`
    pub fn get(&self, target: &T) -> Result<Value, InspectionError> {
        match &self.storage {
            Storage::Field(field) => Ok(field.read(target)),
            Storage::Accessors { getter, .. } => {
                getter
                    .call_shared(target, Vec::new())
                    .map_err(|source| InspectionError::Access {
                        attribute: self.name.clone(),
                        source,
                    })
            }
        }
    }

    /// Write `value` into `target`.
    ///
    /// Rejected without touching `target` if the attribute is read only or
    /// `value` is not assignable to [`value_type`](Self::value_type).
    pub fn set(&self, target: &mut T, value: Value) -> Result<(), InspectionError> {
        if self.read_only {
            return Err(InspectionError::ReadOnly {
                attribute: self.name.clone(),
            });
        }

        let found = value.value_type();
        if !self.ty.is_assignable_from(&found) {
            return Err(InspectionError::TypeMismatch {
                attribute: self.name.clone(),
                expected: self.ty,
                found,
            });
        }

        let result = match &self.storage {
            Storage::Field(field) => field.write(target, value),
            Storage::Accessors {
                setter: Some(setter),
                ..
            } => setter.call(target, vec![value]).map(drop),
            Storage::Accessors { setter: None, .. } => {
                return Err(InspectionError::ReadOnly {
                    attribute: self.name.clone(),
                });
            }
        };

        result.map_err(|source| InspectionError::Access {
            attribute: self.name.clone(),
            source,
        })
    }
}

impl<T> std::fmt::Debug for AccessPoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPoint")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("read_only", &self.read_only)
            .field("uses_field", &self.uses_field())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Robot;

    fn battery_field() -> FieldRef<Robot> {
        FieldRef::new("battery", |r: &Robot| &r.battery, |r: &mut Robot| &mut r.battery)
    }

    #[test]
    fn test_field_point_is_boxed_and_writable() {
        let point = AccessPoint::from_field("battery".into(), battery_field());
        let mut robot = Robot::default();

        assert!(point.uses_field());
        assert!(point.getter().is_none());
        assert_eq!(point.value_type(), TypeRef::of::<i32>().boxed());
        assert!(!point.is_read_only());

        point.set(&mut robot, Value::Int(40)).unwrap();
        assert_eq!(point.get(&robot).unwrap(), Value::Int(40));
    }

    #[test]
    fn test_read_only_field_rejects_writes() {
        let point = AccessPoint::from_field("battery".into(), battery_field().read_only());
        let mut robot = Robot::default();

        let err = point.set(&mut robot, Value::Int(1)).unwrap_err();
        assert!(matches!(err, InspectionError::ReadOnly { .. }));
        assert_eq!(robot.battery, Robot::default().battery);
    }

    #[test]
    fn test_type_mismatch_leaves_target_unchanged() {
        let getter = MethodRef::query("getBattery", |r: &Robot| r.battery);
        let setter = MethodRef::call1("setBattery", |r: &mut Robot, v: i32| r.battery = v);
        let point = AccessPoint::from_pair("battery".into(), getter, setter);
        let mut robot = Robot::default();

        let err = point.set(&mut robot, Value::Double(2.0)).unwrap_err();
        assert!(matches!(
            err,
            InspectionError::TypeMismatch { expected, .. } if expected == TypeRef::of::<i32>().boxed()
        ));
        assert_eq!(robot.battery, Robot::default().battery);

        point.set(&mut robot, Value::Int(5)).unwrap();
        assert_eq!(robot.battery, 5);
    }

    #[test]
    fn test_getter_failure_is_an_access_fault() {
        let getter = MethodRef::try_query("getDiagnostics", |_: &Robot| {
            Err::<String, _>("sensor offline")
        });
        let point = AccessPoint::from_getter("diagnostics".into(), getter);

        let err = point.get(&Robot::default()).unwrap_err();
        match err {
            InspectionError::Access { attribute, source } => {
                assert_eq!(attribute, "diagnostics");
                assert_eq!(source.to_string(), "sensor offline");
            }
            other => panic!("Expected access fault, got {other:?}"),
        }
    }
}
