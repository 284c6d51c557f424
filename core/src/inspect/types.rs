//! Inspection type definitions
//!
//! Runtime type tags and dynamic values exchanged through the inspection
//! facade. Members declare their types as [`TypeRef`]s; values crossing the
//! facade always carry the boxed form, so write-time checks compare tags
//! instead of relying on runtime type introspection.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Primitive-like value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Long,
    Char,
    Byte,
    Float,
    Double,
    Short,
    Boolean,
    Unit,
}

impl Primitive {
    /// Get the Rust type name for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Int => "i32",
            Primitive::Long => "i64",
            Primitive::Char => "char",
            Primitive::Byte => "i8",
            Primitive::Float => "f32",
            Primitive::Double => "f64",
            Primitive::Short => "i16",
            Primitive::Boolean => "bool",
            Primitive::Unit => "()",
        }
    }
}

/// Identity of a non-primitive type
#[derive(Clone, Copy)]
pub struct ObjectType {
    id: TypeId,
    name: &'static str,
}

impl ObjectType {
    /// Identity of `V`
    pub fn of<V: Any>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            name: std::any::type_name::<V>(),
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (`Position` for `sim::Position`)
    pub fn short_name(&self) -> &'static str {
        // Generic arguments may themselves contain paths
        let head = self.name.split('<').next().unwrap_or(self.name);
        match head.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectType {}

impl std::hash::Hash for ObjectType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type tag for declared members and runtime values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Raw primitive slot as declared on a member (an `i32` field, a `bool` return)
    Primitive(Primitive),
    /// Boxed form of a primitive, carried by [`Value`]
    Boxed(Primitive),
    /// Owned string
    Str,
    /// Any other concrete type
    Object(ObjectType),
    /// Dynamic slot accepting every value
    Any,
}

impl TypeRef {
    /// Declared type of a member returning nothing
    pub const UNIT: TypeRef = TypeRef::Primitive(Primitive::Unit);

    /// Declared type of `V`
    pub fn of<V: InspectValue>() -> Self {
        V::type_ref()
    }

    /// Map primitive-like types to their boxed counterpart.
    ///
    /// Every other type is returned unchanged, so the result is never a
    /// [`TypeRef::Primitive`].
    pub fn boxed(self) -> Self {
        match self {
            TypeRef::Primitive(p) => TypeRef::Boxed(p),
            other => other,
        }
    }

    /// Whether this is a raw primitive tag
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Whether this is the declared "no value" type
    pub fn is_unit(&self) -> bool {
        *self == TypeRef::UNIT
    }

    /// Whether a value of type `other` may be stored in a slot of this type
    pub fn is_assignable_from(&self, other: &TypeRef) -> bool {
        match self {
            TypeRef::Any => true,
            _ => self == other,
        }
    }

    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeRef::Primitive(p) | TypeRef::Boxed(p) => p.type_name(),
            TypeRef::Str => "String",
            TypeRef::Object(o) => o.short_name(),
            TypeRef::Any => "Value",
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Shared handle to a value of a non-primitive type
#[derive(Clone)]
pub struct ObjectValue {
    ty: ObjectType,
    inner: Arc<dyn Any + Send + Sync>,
    render: fn(&(dyn Any + Send + Sync)) -> String,
}

impl ObjectValue {
    /// Wrap `value`
    pub fn new<V>(value: V) -> Self
    where
        V: Any + Send + Sync + fmt::Debug,
    {
        Self {
            ty: ObjectType::of::<V>(),
            inner: Arc::new(value),
            render: render_debug::<V>,
        }
    }

    /// Type of the wrapped value
    pub fn object_type(&self) -> ObjectType {
        self.ty
    }

    /// Borrow the wrapped value if it is a `V`
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.inner.downcast_ref::<V>()
    }
}

fn render_debug<V: Any + fmt::Debug>(value: &(dyn Any + Send + Sync)) -> String {
    value
        .downcast_ref::<V>()
        .map(|v| format!("{v:?}"))
        .unwrap_or_default()
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&(self.render)(self.inner.as_ref()))
    }
}

/// Runtime value representation for inspection
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Char(char),
    Byte(i8),
    Float(f32),
    Double(f64),
    Short(i16),
    Boolean(bool),
    Unit,
    Str(String),
    Object(ObjectValue),
}

impl Value {
    /// Get the (boxed) type tag of this value
    pub fn value_type(&self) -> TypeRef {
        match self {
            Value::Int(_) => TypeRef::Boxed(Primitive::Int),
            Value::Long(_) => TypeRef::Boxed(Primitive::Long),
            Value::Char(_) => TypeRef::Boxed(Primitive::Char),
            Value::Byte(_) => TypeRef::Boxed(Primitive::Byte),
            Value::Float(_) => TypeRef::Boxed(Primitive::Float),
            Value::Double(_) => TypeRef::Boxed(Primitive::Double),
            Value::Short(_) => TypeRef::Boxed(Primitive::Short),
            Value::Boolean(_) => TypeRef::Boxed(Primitive::Boolean),
            Value::Unit => TypeRef::Boxed(Primitive::Unit),
            Value::Str(_) => TypeRef::Str,
            Value::Object(o) => TypeRef::Object(o.object_type()),
        }
    }

    /// Wrap a value of a non-primitive type
    pub fn object<V>(value: V) -> Self
    where
        V: Any + Send + Sync + fmt::Debug,
    {
        Value::Object(ObjectValue::new(value))
    }

    /// Parse user input (a UI text field, a CLI argument) as a value of type `ty`.
    ///
    /// [`TypeRef::Any`] infers the narrowest of bool, i32, i64, f64, falling back to a
    /// string. Object types cannot be parsed.
    pub fn parse(ty: &TypeRef, text: &str) -> Result<Value, ParseValueError> {
        let invalid = || ParseValueError::Invalid {
            expected: *ty,
            text: text.to_string(),
        };
        let trimmed = text.trim();

        match ty {
            TypeRef::Primitive(p) | TypeRef::Boxed(p) => match p {
                Primitive::Int => trimmed.parse().map(Value::Int).map_err(|_| invalid()),
                Primitive::Long => trimmed.parse().map(Value::Long).map_err(|_| invalid()),
                Primitive::Byte => trimmed.parse().map(Value::Byte).map_err(|_| invalid()),
                Primitive::Short => trimmed.parse().map(Value::Short).map_err(|_| invalid()),
                Primitive::Float => trimmed.parse().map(Value::Float).map_err(|_| invalid()),
                Primitive::Double => trimmed.parse().map(Value::Double).map_err(|_| invalid()),
                Primitive::Boolean => trimmed.parse().map(Value::Boolean).map_err(|_| invalid()),
                Primitive::Char => {
                    let mut chars = text.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Value::Char(c)),
                        _ => Err(invalid()),
                    }
                }
                Primitive::Unit => match trimmed {
                    "" | "()" => Ok(Value::Unit),
                    _ => Err(invalid()),
                },
            },
            TypeRef::Str => Ok(Value::Str(text.to_string())),
            TypeRef::Any => Ok(infer(trimmed, text)),
            TypeRef::Object(o) => Err(ParseValueError::Unsupported(o.short_name())),
        }
    }
}

fn infer(trimmed: &str, text: &str) -> Value {
    if let Ok(b) = trimmed.parse::<bool>() {
        return Value::Boolean(b);
    }
    if let Ok(i) = trimmed.parse::<i32>() {
        return Value::Int(i);
    }
    if let Ok(l) = trimmed.parse::<i64>() {
        return Value::Long(l);
    }
    if let Ok(d) = trimmed.parse::<f64>() {
        return Value::Double(d);
    }
    Value::Str(text.to_string())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            // {:?} keeps the round-trip safe formatting for floats
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Unit => f.write_str("()"),
            Value::Str(v) => f.write_str(v),
            Value::Object(o) => write!(f, "{o:?}"),
        }
    }
}

/// Error parsing user input into a [`Value`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseValueError {
    /// Text is not a valid literal of the expected type
    #[error("'{text}' is not a valid {expected}")]
    Invalid { expected: TypeRef, text: String },

    /// Values of this type cannot be entered as text
    #[error("values of type {0} cannot be parsed from text")]
    Unsupported(&'static str),
}

/// Conversion between a Rust type and the dynamic [`Value`] form
pub trait InspectValue: Sized {
    /// Declared type of `Self`
    fn type_ref() -> TypeRef;

    /// Convert into the dynamic form
    fn into_value(self) -> Value;

    /// Convert back, handing the value back unchanged if it has another type
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl InspectValue for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::Primitive(Primitive::$kind)
                }

                fn into_value(self) -> Value {
                    Value::$kind(self)
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$kind(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_primitive!(
    i32 => Int,
    i64 => Long,
    char => Char,
    i8 => Byte,
    f32 => Float,
    f64 => Double,
    i16 => Short,
    bool => Boolean,
);

impl InspectValue for () {
    fn type_ref() -> TypeRef {
        TypeRef::UNIT
    }

    fn into_value(self) -> Value {
        Value::Unit
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Unit => Ok(()),
            other => Err(other),
        }
    }
}

impl InspectValue for String {
    fn type_ref() -> TypeRef {
        TypeRef::Str
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl InspectValue for Value {
    fn type_ref() -> TypeRef {
        TypeRef::Any
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

/// Implement [`InspectValue`] for types exchanged as [`Value::Object`].
///
/// The types must be `Clone + Debug + Send + Sync + 'static`.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Position { x: i32, y: i32 }
///
/// simscope_core::inspect_object!(Position);
/// ```
#[macro_export]
macro_rules! inspect_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::inspect::InspectValue for $ty {
                fn type_ref() -> $crate::inspect::TypeRef {
                    $crate::inspect::TypeRef::Object($crate::inspect::ObjectType::of::<$ty>())
                }

                fn into_value(self) -> $crate::inspect::Value {
                    $crate::inspect::Value::object(self)
                }

                fn from_value(
                    value: $crate::inspect::Value,
                ) -> ::std::result::Result<Self, $crate::inspect::Value> {
                    match value {
                        $crate::inspect::Value::Object(ref o) => match o.downcast_ref::<$ty>() {
                            Some(v) => Ok(v.clone()),
                            None => Err(value),
                        },
                        other => Err(other),
                    }
                }
            }
        )+
    };
}
