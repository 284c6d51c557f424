//! Attribute snapshot export
//!
//! Captures the current attribute values of one instance and serializes them
//! as TOML or JSON, e.g. to diff inspector state between runs.

use serde::{Deserialize, Serialize};

use super::data::InspectionData;

/// Recorded state of one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub read_only: bool,
    /// Rendered value, absent if the read failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Recorded state of every attribute of one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSnapshot>,
}

impl Snapshot {
    /// Capture all attributes of `target`, in declaration order
    pub fn capture<T>(data: &InspectionData<T>, target: &T) -> Self {
        let attributes = data
            .attributes()
            .map(|point| AttributeSnapshot {
                name: point.name().to_string(),
                type_name: point.value_type().to_string(),
                read_only: point.is_read_only(),
                value: data
                    .attribute_value(target, point.name())
                    .map(|v| v.to_string()),
            })
            .collect();

        let methods = data
            .method_names()
            .into_iter()
            .filter_map(|name| data.method(name))
            .map(|m| m.signature())
            .collect();

        Self {
            type_name: data.type_name().to_string(),
            methods,
            attributes,
        }
    }

    /// Look up a recorded attribute
    pub fn attribute(&self, name: &str) -> Option<&AttributeSnapshot> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{Inspect, MethodRef, TypeDeclaration};
    use crate::test_utils::{Entity, Robot};

    fn robot_snapshot() -> Snapshot {
        let data = InspectionData::new(Robot::declare()).unwrap();
        let mut robot = Robot::default();
        robot.speed = 5;
        Snapshot::capture(&data, &robot)
    }

    #[test]
    fn test_capture_records_every_attribute() {
        let snapshot = robot_snapshot();

        assert_eq!(snapshot.type_name, "Robot");
        assert_eq!(snapshot.attributes.first().unwrap().name, "battery");

        let speed = snapshot.attribute("speed").unwrap();
        assert_eq!(speed.value.as_deref(), Some("5"));
        assert!(!speed.read_only);

        let double = snapshot.attribute("doubleSpeed").unwrap();
        assert_eq!(double.value.as_deref(), Some("10"));
        assert!(double.read_only);

        assert!(snapshot.methods.iter().any(|m| m.starts_with("teleport(")));
    }

    #[test]
    fn test_failed_reads_have_no_value() {
        let data = InspectionData::new(
            TypeDeclaration::<Entity>::new()
                .attribute(MethodRef::try_query("getSignal", |_: &Entity| Err::<i32, _>("no signal"))),
        )
        .unwrap();

        let snapshot = Snapshot::capture(&data, &Entity::default());
        assert_eq!(snapshot.attribute("signal").unwrap().value, None);

        let toml = snapshot.to_toml().unwrap();
        assert!(toml.contains("name = \"signal\""));
        assert!(!toml.contains("value"));
    }

    #[test]
    fn test_json_export() {
        let snapshot = robot_snapshot();
        let json = snapshot.to_json().unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_toml_export() {
        let toml = robot_snapshot().to_toml().unwrap();
        assert!(toml.contains("type = \"Robot\""));
        assert!(toml.contains("[[attributes]]"));
    }
}
