//! Shared test utilities for unit tests

use crate::inspect::{FieldRef, Inspect, MethodRef, TypeDeclaration};

// ============================================================================
// Test Types
// ============================================================================

/// Base type inherited by [`Robot`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub x: i32,
    pub y: i32,
}

impl Inspect for Entity {
    fn declare() -> TypeDeclaration<Self> {
        TypeDeclaration::new()
            .field(FieldRef::new("x", |e: &Entity| &e.x, |e: &mut Entity| &mut e.x))
            .field(FieldRef::new("y", |e: &Entity| &e.y, |e: &mut Entity| &mut e.y))
    }
}

/// Type exercising every member kind
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    pub battery: i32,
    pub name: String,
    pub serial: i64,
    pub speed: i32,
    pub entity: Entity,
}

impl Default for Robot {
    fn default() -> Self {
        Self {
            battery: 100,
            name: "unit-7".to_string(),
            serial: 7,
            speed: 0,
            entity: Entity::default(),
        }
    }
}

impl Inspect for Robot {
    fn declare() -> TypeDeclaration<Self> {
        TypeDeclaration::new()
            .field(FieldRef::new("battery", |r: &Robot| &r.battery, |r: &mut Robot| &mut r.battery))
            .field(FieldRef::new("name", |r: &Robot| &r.name, |r: &mut Robot| &mut r.name))
            .field(
                FieldRef::new("serial", |r: &Robot| &r.serial, |r: &mut Robot| &mut r.serial)
                    .read_only(),
            )
            .attribute(MethodRef::query("getSpeed", |r: &Robot| r.speed))
            .attribute(MethodRef::call1("setSpeed", |r: &mut Robot, v: i32| r.speed = v))
            .attribute(MethodRef::query("getDoubleSpeed", |r: &Robot| r.speed * 2))
            .method(MethodRef::call2("teleport", |r: &mut Robot, x: i32, y: i32| {
                r.entity.x = x;
                r.entity.y = y;
                true
            }))
            .method(MethodRef::call0("stop", |r: &mut Robot| r.speed = 0).named("halt"))
            .method(MethodRef::try_call0("selfTest", |r: &mut Robot| {
                if r.battery == 0 {
                    Err("battery empty")
                } else {
                    Ok(r.battery)
                }
            }))
            .inherit(Entity::declare(), |r| &r.entity, |r| &mut r.entity)
    }
}
