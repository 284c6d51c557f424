//! Sample simulation entity inspected by the CLI

use simscope_core::inspect::{FieldRef, Inspect, MethodRef, TypeDeclaration};

/// Point the rover is heading for
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

simscope_core::inspect_object!(Waypoint);

/// Physical body shared by every simulated vehicle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chassis {
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise from the x axis
    pub heading: i32,
}

impl Inspect for Chassis {
    fn declare() -> TypeDeclaration<Self> {
        TypeDeclaration::new()
            .field(FieldRef::new("x", |c: &Chassis| &c.x, |c: &mut Chassis| &mut c.x))
            .field(FieldRef::new("y", |c: &Chassis| &c.y, |c: &mut Chassis| &mut c.y))
            .field(FieldRef::new(
                "heading",
                |c: &Chassis| &c.heading,
                |c: &mut Chassis| &mut c.heading,
            ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rover {
    pub chassis: Chassis,
    pub label: String,
    pub battery: i32,
    pub serial: i64,
    speed: f32,
    odometer: f64,
    target: Waypoint,
}

impl Default for Rover {
    fn default() -> Self {
        Self {
            chassis: Chassis::default(),
            label: "rover-1".to_string(),
            battery: 100,
            serial: 4711,
            speed: 1.0,
            odometer: 0.0,
            target: Waypoint { x: 10.0, y: 0.0 },
        }
    }
}

pub const MAX_SPEED: f32 = 5.0;

impl Rover {
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), String> {
        if !(0.0..=MAX_SPEED).contains(&speed) {
            return Err(format!("speed must be within 0..={MAX_SPEED}"));
        }
        self.speed = speed;
        Ok(())
    }

    /// Drive for `seconds` at the current speed, returning the distance covered
    pub fn drive(&mut self, seconds: f64) -> Result<f64, String> {
        if !seconds.is_finite() {
            return Err(format!("invalid duration: {seconds}"));
        }
        if seconds < 0.0 {
            return Err("cannot drive backwards in time".to_string());
        }
        let cost = (seconds * f64::from(self.speed)).ceil() as i32;
        if cost > self.battery {
            return Err(format!("battery too low ({}% left, {cost}% needed)", self.battery));
        }

        let distance = seconds * f64::from(self.speed);
        let radians = f64::from(self.chassis.heading).to_radians();
        self.chassis.x += distance * radians.cos();
        self.chassis.y += distance * radians.sin();
        self.odometer += distance;
        self.battery -= cost;
        Ok(distance)
    }

    pub fn turn(&mut self, degrees: i32) -> i32 {
        self.chassis.heading = (self.chassis.heading + degrees).rem_euclid(360);
        self.chassis.heading
    }
}

impl Inspect for Rover {
    fn declare() -> TypeDeclaration<Self> {
        TypeDeclaration::new()
            .field(FieldRef::new("label", |r: &Rover| &r.label, |r: &mut Rover| &mut r.label))
            .field(FieldRef::new("battery", |r: &Rover| &r.battery, |r: &mut Rover| &mut r.battery))
            .field(
                FieldRef::new("serial", |r: &Rover| &r.serial, |r: &mut Rover| &mut r.serial)
                    .read_only(),
            )
            .attribute(MethodRef::query("getSpeed", Rover::speed))
            .attribute(MethodRef::try_call1("setSpeed", Rover::set_speed))
            .attribute(MethodRef::query("getOdometer", |r: &Rover| r.odometer))
            .attribute(MethodRef::query("getTarget", |r: &Rover| r.target))
            .method(MethodRef::try_call1("drive", Rover::drive))
            .method(MethodRef::call1("turn", Rover::turn))
            .method(MethodRef::call0("recharge", |r: &mut Rover| r.battery = 100))
            .method(
                MethodRef::query("status", |r: &Rover| {
                    format!(
                        "{} at ({:.1}, {:.1}) heading {} deg, battery {}%",
                        r.label, r.chassis.x, r.chassis.y, r.chassis.heading, r.battery
                    )
                })
                .named("report"),
            )
            .inherit(Chassis::declare(), |r| &r.chassis, |r| &mut r.chassis)
    }
}
