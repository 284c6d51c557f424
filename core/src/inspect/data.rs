//! Inspection facade
//!
//! [`InspectionData`] is the registry of one type as seen by an inspector:
//! it lists attributes and methods by display name, reads and writes
//! attribute values on a target instance and invokes inspection methods.
//!
//! [`attribute_value`](InspectionData::attribute_value) and
//! [`set_attribute_value`](InspectionData::set_attribute_value) are meant to
//! be polled from a UI and never fail; faults are logged and reported as
//! `None` / `false`. The `try_*` variants return the fault instead.

use super::access_point::AccessPoint;
use super::builder;
use super::declaration::TypeDeclaration;
use super::error::InspectionError;
use super::member::MethodRef;
use super::registry::Registry;
use super::types::{TypeRef, Value};
use crate::config::InspectionConfig;

/// Inspection registry of `T`
pub struct InspectionData<T> {
    type_name: String,
    registry: Registry<T>,
    report_access_faults: bool,
}

impl<T> InspectionData<T> {
    /// Build the registry for `declaration` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a construction fault if a member is malformed, a setter has
    /// no getter, or two members share a display name.
    pub fn new(declaration: TypeDeclaration<T>) -> Result<Self, InspectionError> {
        Self::with_config(declaration, &InspectionConfig::default())
    }

    /// Build the registry for `declaration`.
    pub fn with_config(
        declaration: TypeDeclaration<T>,
        config: &InspectionConfig,
    ) -> Result<Self, InspectionError> {
        let type_name = declaration.type_name().to_string();
        let registry = builder::build(declaration, config).inspect_err(|e| {
            tracing::error!("Failed to build inspection data for {}: {}", type_name, e);
        })?;

        tracing::info!(
            "Inspection data for {}: {} attributes, {} methods",
            type_name,
            registry.attributes.len(),
            registry.methods.len()
        );

        Ok(Self {
            type_name,
            registry,
            report_access_faults: config.report_access_faults,
        })
    }

    /// Name of the inspected type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Attribute display names in declaration order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.registry.attributes.names().collect()
    }

    /// Method display names in declaration order
    pub fn method_names(&self) -> Vec<&str> {
        self.registry.methods.names().collect()
    }

    /// All access points in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &AccessPoint<T>> {
        self.registry.attributes.values()
    }

    /// Access point of an attribute
    pub fn attribute(&self, name: &str) -> Option<&AccessPoint<T>> {
        self.registry.attributes.get(name)
    }

    /// Inspection method by display name
    pub fn method(&self, name: &str) -> Option<&MethodRef<T>> {
        self.registry.methods.get(name)
    }

    /// Boxed type of an attribute
    pub fn attribute_type(&self, name: &str) -> Option<TypeRef> {
        self.attribute(name).map(AccessPoint::value_type)
    }

    /// Whether an attribute rejects writes. Unknown attributes count as read only.
    pub fn is_attribute_read_only(&self, name: &str) -> bool {
        self.attribute(name).is_none_or(AccessPoint::is_read_only)
    }

    /// Whether any attribute or method is registered
    pub fn has_any_inspectable_elements(&self) -> bool {
        !self.registry.attributes.is_empty() || !self.registry.methods.is_empty()
    }

    /// Current value of an attribute, `None` if unknown or unreadable
    pub fn attribute_value(&self, target: &T, name: &str) -> Option<Value> {
        // Unknown names are a plain lookup miss, not a fault
        let point = self.attribute(name)?;
        point.get(target).map_err(|e| self.report(&e)).ok()
    }

    /// Write an attribute, returning whether the write happened
    pub fn set_attribute_value(&self, target: &mut T, name: &str, value: Value) -> bool {
        let Some(point) = self.attribute(name) else {
            return false;
        };
        point.set(target, value).map_err(|e| self.report(&e)).is_ok()
    }

    /// Current value of an attribute
    pub fn try_attribute_value(&self, target: &T, name: &str) -> Result<Value, InspectionError> {
        self.attribute(name)
            .ok_or_else(|| InspectionError::UnknownAttribute(name.to_string()))?
            .get(target)
    }

    /// Write an attribute.
    ///
    /// `target` is left untouched unless the write succeeds.
    pub fn try_set_attribute_value(
        &self,
        target: &mut T,
        name: &str,
        value: Value,
    ) -> Result<(), InspectionError> {
        self.attribute(name)
            .ok_or_else(|| InspectionError::UnknownAttribute(name.to_string()))?
            .set(target, value)
    }

    /// Invoke an inspection method with positional arguments
    pub fn invoke_method(
        &self,
        target: &mut T,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, InspectionError> {
        let method = self
            .method(name)
            .ok_or_else(|| InspectionError::NoSuchMethod(name.to_string()))?;

        tracing::debug!("Invoking {}::{}", self.type_name, method.signature());
        method
            .call(target, args)
            .map_err(|source| InspectionError::Invocation {
                method: name.to_string(),
                source,
            })
    }

    fn report(&self, error: &InspectionError) {
        let cause = std::error::Error::source(error)
            .map(|s| format!(": {s}"))
            .unwrap_or_default();
        if self.report_access_faults {
            tracing::warn!("{}: {}{}", self.type_name, error, cause);
        } else {
            tracing::debug!("{}: {}{}", self.type_name, error, cause);
        }
    }
}

impl<T> std::fmt::Debug for InspectionData<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectionData")
            .field("type_name", &self.type_name)
            .field("attributes", &self.attribute_names())
            .field("methods", &self.method_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::error::CallError;
    use crate::inspect::member::FieldRef;
    use crate::inspect::Inspect;
    use crate::test_utils::{Entity, Robot};

    fn robot_data() -> InspectionData<Robot> {
        InspectionData::new(Robot::declare()).unwrap()
    }

    #[test]
    fn test_field_attributes() {
        let data = robot_data();

        assert!(data.attribute_names().contains(&"battery"));
        assert_eq!(data.attribute_type("battery"), Some(TypeRef::of::<i32>().boxed()));
        assert_eq!(data.attribute_type("name"), Some(TypeRef::Str));
        assert!(!data.is_attribute_read_only("battery"));
        assert!(data.is_attribute_read_only("serial"));
        assert!(data.attribute("battery").unwrap().uses_field());
    }

    #[test]
    fn test_getter_setter_pair() {
        let data = robot_data();
        let mut robot = Robot::default();

        assert!(!data.is_attribute_read_only("speed"));
        assert!(data.set_attribute_value(&mut robot, "speed", Value::Int(12)));
        assert_eq!(robot.speed, 12);
        assert_eq!(data.attribute_value(&robot, "speed"), Some(Value::Int(12)));
    }

    #[test]
    fn test_getter_only_is_read_only() {
        let data = robot_data();
        let mut robot = Robot::default();
        robot.speed = 3;

        assert!(data.is_attribute_read_only("doubleSpeed"));
        assert_eq!(data.attribute_value(&robot, "doubleSpeed"), Some(Value::Int(6)));
        assert!(!data.set_attribute_value(&mut robot, "doubleSpeed", Value::Int(1)));
        assert!(matches!(
            data.try_set_attribute_value(&mut robot, "doubleSpeed", Value::Int(1)),
            Err(InspectionError::ReadOnly { .. })
        ));
        assert_eq!(robot.speed, 3);
    }

    #[test]
    fn test_wrong_type_write_is_rejected() {
        let data = robot_data();
        let mut robot = Robot::default();
        let before = robot.clone();

        assert!(!data.set_attribute_value(&mut robot, "battery", Value::Str("full".into())));
        assert!(!data.set_attribute_value(&mut robot, "speed", Value::Long(9)));
        assert_eq!(robot, before);
    }

    #[test]
    fn test_unknown_attribute() {
        let data = robot_data();
        let mut robot = Robot::default();

        assert_eq!(data.attribute_value(&robot, "altitude"), None);
        assert!(!data.set_attribute_value(&mut robot, "altitude", Value::Int(1)));
        assert!(data.is_attribute_read_only("altitude"));
        assert_eq!(data.attribute_type("altitude"), None);
        assert!(matches!(
            data.try_attribute_value(&robot, "altitude"),
            Err(InspectionError::UnknownAttribute(name)) if name == "altitude"
        ));
    }

    #[test]
    fn test_inherited_attributes() {
        let data = robot_data();
        let mut robot = Robot::default();

        assert!(data.set_attribute_value(&mut robot, "x", Value::Int(-4)));
        assert_eq!(robot.entity.x, -4);
        // Own attributes are listed before inherited ones
        let names = data.attribute_names();
        let position = |n: &str| names.iter().position(|&a| a == n).unwrap();
        assert!(position("battery") < position("x"));
    }

    #[test]
    fn test_invoke_method() {
        let data = robot_data();
        let mut robot = Robot::default();

        let result = data
            .invoke_method(&mut robot, "teleport", vec![Value::Int(3), Value::Int(4)])
            .unwrap();
        assert_eq!(result, Value::Boolean(true));
        assert_eq!((robot.entity.x, robot.entity.y), (3, 4));

        let result = data.invoke_method(&mut robot, "halt", Vec::new()).unwrap();
        assert_eq!(result, Value::Unit);
        assert_eq!(data.method("halt").unwrap().signature(), "stop() -> ()");
    }

    #[test]
    fn test_no_such_method() {
        let data = robot_data();
        let err = data
            .invoke_method(&mut Robot::default(), "selfDestruct", Vec::new())
            .unwrap_err();
        assert!(matches!(err, InspectionError::NoSuchMethod(name) if name == "selfDestruct"));
    }

    #[test]
    fn test_invocation_fault_wraps_cause() {
        let data = robot_data();
        let mut robot = Robot::default();
        robot.battery = 0;

        let err = data
            .invoke_method(&mut robot, "selfTest", Vec::new())
            .unwrap_err();
        match err {
            InspectionError::Invocation { method, source } => {
                assert_eq!(method, "selfTest");
                assert!(matches!(source, CallError::Failed(_)));
                assert_eq!(source.to_string(), "battery empty");
            }
            other => panic!("Expected invocation fault, got {other:?}"),
        }

        let err = data
            .invoke_method(&mut robot, "teleport", vec![Value::Int(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            InspectionError::Invocation {
                source: CallError::Arity { expected: 2, found: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_has_any_inspectable_elements() {
        assert!(robot_data().has_any_inspectable_elements());

        let empty = InspectionData::new(TypeDeclaration::<Entity>::new()).unwrap();
        assert!(!empty.has_any_inspectable_elements());
        assert!(empty.attribute_names().is_empty());

        let methods_only = InspectionData::new(
            TypeDeclaration::<Entity>::new().method(MethodRef::call0("reset", |e: &mut Entity| {
                e.x = 0;
            })),
        )
        .unwrap();
        assert!(methods_only.has_any_inspectable_elements());
    }

    #[test]
    fn test_quiet_fault_reporting_keeps_results() {
        let config = InspectionConfig {
            report_access_faults: false,
            ..InspectionConfig::default()
        };
        let data = InspectionData::with_config(
            TypeDeclaration::<Entity>::new().field(
                FieldRef::new("x", |e: &Entity| &e.x, |e: &mut Entity| &mut e.x).read_only(),
            ),
            &config,
        )
        .unwrap();

        let mut entity = Entity::default();
        assert!(!data.set_attribute_value(&mut entity, "x", Value::Int(2)));
        assert_eq!(data.attribute_value(&entity, "x"), Some(Value::Int(0)));
    }
}
