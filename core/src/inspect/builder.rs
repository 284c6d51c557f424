//! Registry construction
//!
//! Reconciles the members of a [`TypeDeclaration`] into a [`Registry`]:
//!
//! 1. Every attribute-marked field becomes an access point.
//! 2. Every attribute-marked method is classified as a getter (no
//!    parameters, returns a value) or a setter (one parameter, returns
//!    nothing). Anything else is rejected.
//! 3. Getters are paired with the setter of the same display name. Setters
//!    left over after pairing are rejected.
//!
//! Inspection methods are registered under their display name without any
//! shape constraints. Every structural violation aborts the build; there is
//! no partially usable registry.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use super::access_point::AccessPoint;
use super::declaration::TypeDeclaration;
use super::error::{InspectionError, RegistryKind, ShapeFault};
use super::member::{Marker, MarkerKind, MethodRef, Receiver};
use super::registry::{NameIndex, Registry};
use crate::config::{DuplicateNamePolicy, InspectionConfig};

const GETTER_PREFIX: &str = "get";
const SETTER_PREFIX: &str = "set";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Getter,
    Setter,
}

/// Build the registry for one declared type
pub(crate) fn build<T>(
    mut declaration: TypeDeclaration<T>,
    config: &InspectionConfig,
) -> Result<Registry<T>, InspectionError> {
    let policy = config.duplicate_names;
    let fields = declaration.take_marked_fields(MarkerKind::Attribute);
    let attribute_methods = declaration.take_marked_methods(MarkerKind::Attribute);
    let methods = declaration.take_marked_methods(MarkerKind::Method);
    let mut registry = Registry::new();

    for field in fields {
        let name = display_name(field.marker(), field.name());
        let point = AccessPoint::from_field(name.clone(), field);
        insert(&mut registry.attributes, name, point, policy, RegistryKind::Attribute)?;
    }

    build_accessors(&mut registry.attributes, attribute_methods, policy)?;

    for method in methods {
        let name = display_name(method.marker(), method.name());
        insert(&mut registry.methods, name, method, policy, RegistryKind::Method)?;
    }

    Ok(registry)
}

fn build_accessors<T>(
    attributes: &mut NameIndex<AccessPoint<T>>,
    methods: Vec<MethodRef<T>>,
    policy: DuplicateNamePolicy,
) -> Result<(), InspectionError> {
    let mut getters = NameIndex::new();
    // Declaration position is kept to report leftovers deterministically
    let mut setters: HashMap<String, (usize, MethodRef<T>)> = HashMap::new();

    for (position, method) in methods.into_iter().enumerate() {
        match classify(&method) {
            Some(Shape::Getter) => {
                let name = accessor_display_name(method.marker(), method.name(), GETTER_PREFIX);
                insert(&mut getters, name, method, policy, RegistryKind::Attribute)?;
            }
            Some(Shape::Setter) => {
                let name = accessor_display_name(method.marker(), method.name(), SETTER_PREFIX);
                match setters.entry(name) {
                    Entry::Occupied(entry) if policy == DuplicateNamePolicy::Reject => {
                        return Err(InspectionError::DuplicateName {
                            kind: RegistryKind::Attribute,
                            name: entry.key().clone(),
                        });
                    }
                    // A replaced setter keeps the slot of the first declaration
                    Entry::Occupied(mut entry) => entry.get_mut().1 = method,
                    Entry::Vacant(entry) => {
                        entry.insert((position, method));
                    }
                }
            }
            None => {
                return Err(InspectionError::Classification {
                    method: method.name().to_string(),
                });
            }
        }
    }

    for (name, getter) in getters.into_entries() {
        let setter = setters.remove(&name).map(|(_, setter)| setter);

        let point = match (setter, getter.marker().read_only) {
            (Some(_), true) => {
                return Err(InspectionError::ReadOnlyConflict { attribute: name });
            }
            (None, _) => {
                validate_getter(&getter)?;
                AccessPoint::from_getter(name.clone(), getter)
            }
            (Some(setter), false) => {
                validate_pair(&name, &getter, &setter)?;
                AccessPoint::from_pair(name.clone(), getter, setter)
            }
        };

        insert(attributes, name, point, policy, RegistryKind::Attribute)?;
    }

    if let Some((attribute, (_, setter))) = setters
        .into_iter()
        .min_by_key(|(_, (position, _))| *position)
    {
        return Err(InspectionError::OrphanSetter {
            setter: setter.name().to_string(),
            attribute,
        });
    }

    Ok(())
}

fn insert<V>(
    index: &mut NameIndex<V>,
    name: String,
    value: V,
    policy: DuplicateNamePolicy,
    kind: RegistryKind,
) -> Result<(), InspectionError> {
    if index.contains(&name) {
        tracing::debug!("duplicate {} name `{}` ({:?})", kind, name, policy);
    }
    if !index.insert(name.clone(), value, policy) {
        return Err(InspectionError::DuplicateName { kind, name });
    }
    Ok(())
}

fn classify<T>(method: &MethodRef<T>) -> Option<Shape> {
    match (method.params().len(), method.return_type().is_unit()) {
        (0, false) => Some(Shape::Getter),
        (1, true) => Some(Shape::Setter),
        _ => None,
    }
}

fn validate_getter<T>(getter: &MethodRef<T>) -> Result<(), InspectionError> {
    let fault = if getter.return_type().is_unit() {
        Some(ShapeFault::GetterReturnsUnit)
    } else if !getter.params().is_empty() {
        Some(ShapeFault::GetterHasParameters(getter.params().len()))
    } else if getter.receiver() == Receiver::Exclusive {
        // Reads only ever hold a shared reference to the target
        Some(ShapeFault::GetterNeedsMutableReceiver)
    } else {
        None
    };

    match fault {
        Some(fault) => Err(InspectionError::InvalidGetter {
            method: getter.name().to_string(),
            fault,
        }),
        None => Ok(()),
    }
}

fn validate_pair<T>(
    attribute: &str,
    getter: &MethodRef<T>,
    setter: &MethodRef<T>,
) -> Result<(), InspectionError> {
    validate_getter(getter)?;

    let invalid_setter = |fault| InspectionError::InvalidSetter {
        method: setter.name().to_string(),
        fault,
    };
    if !setter.return_type().is_unit() {
        return Err(invalid_setter(ShapeFault::SetterReturnsValue(setter.return_type())));
    }
    let [param] = setter.params() else {
        return Err(invalid_setter(ShapeFault::SetterParameterCount(setter.params().len())));
    };

    // Exact match, no widening
    if *param != getter.return_type() {
        return Err(InspectionError::SetterTypeMismatch {
            attribute: attribute.to_string(),
            getter: getter.return_type(),
            setter: *param,
        });
    }

    Ok(())
}

/// Display name of a field or inspection method
pub(crate) fn display_name(marker: &Marker, member: &str) -> String {
    if !marker.name.is_empty() {
        return marker.name.clone();
    }
    member.to_string()
}

/// Display name of a getter or setter.
///
/// The prefix is matched case-insensitively, so `getSpeed` and `GetSpeed`
/// both resolve to `speed`, while `get_speed` resolves to `_speed`. Names
/// without the prefix, or consisting of the prefix alone, are kept whole.
pub(crate) fn accessor_display_name(marker: &Marker, member: &str, prefix: &str) -> String {
    if !marker.name.is_empty() {
        return marker.name.clone();
    }
    strip_accessor_prefix(member, prefix).unwrap_or_else(|| member.to_string())
}

fn strip_accessor_prefix(member: &str, prefix: &str) -> Option<String> {
    let head = member.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let rest = &member[prefix.len()..];
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}
