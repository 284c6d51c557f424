//! List command - show attributes and methods of the inspected type

use anyhow::Result;

use crate::session::Session;

pub fn execute(session: &Session) -> Result<()> {
    let data = &session.data;

    println!("=== {} ===", data.type_name());
    if !data.has_any_inspectable_elements() {
        println!("  (nothing inspectable)");
        return Ok(());
    }

    println!("Attributes:");
    for point in data.attributes() {
        let access = if point.is_read_only() { "ro" } else { "rw" };
        let value = data
            .attribute_value(&session.rover, point.name())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<unreadable>".to_string());
        let ty = point.value_type();
        println!("  {:<12} {:<10} {}  = {}", point.name(), ty.type_name(), access, value);
    }

    println!("Methods:");
    for name in data.method_names() {
        if let Some(method) = data.method(name) {
            println!("  {:<12} {}", name, method.signature());
        }
    }

    Ok(())
}
