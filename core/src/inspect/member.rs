//! Inspectable members
//!
//! [`FieldRef`] and [`MethodRef`] describe one declared member of a type: its
//! name, its declared type(s), the marker it carries and a typed accessor
//! closure. They are the metadata the registry builder consumes.

use std::error::Error as StdError;

use super::error::CallError;
use super::types::{InspectValue, TypeRef, Value};

/// Marker payload identifying a member as inspectable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marker {
    /// Display-name override (empty = use the member name)
    pub name: String,
    /// Attribute is read only (ignored for inspection methods)
    pub read_only: bool,
}

/// The two markers a declaration can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Inspectable attribute (fields, getters, setters)
    Attribute,
    /// Inspection method invoked from the inspector
    Method,
}

type FieldGet<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type FieldSet<T> = Box<dyn Fn(&mut T, Value) -> Result<(), CallError> + Send + Sync>;

/// A declared field
pub struct FieldRef<T> {
    name: String,
    ty: TypeRef,
    marker: Marker,
    get: FieldGet<T>,
    set: FieldSet<T>,
}

impl<T: 'static> FieldRef<T> {
    /// Describe the field `name` reached through `get` / `get_mut`
    pub fn new<V, G, M>(name: impl Into<String>, get: G, get_mut: M) -> Self
    where
        V: InspectValue + Clone + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            ty: V::type_ref(),
            marker: Marker::default(),
            get: Box::new(move |target: &T| get(target).clone().into_value()),
            set: Box::new(move |target: &mut T, value: Value| {
                *get_mut(target) = convert::<V>(value, 0)?;
                Ok(())
            }),
        }
    }

    /// Override the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.marker.name = name.into();
        self
    }

    /// Mark the field as read only
    pub fn read_only(mut self) -> Self {
        self.marker.read_only = true;
        self
    }

    /// Re-root this field onto a type that contains `T`
    pub(crate) fn project<C: 'static>(
        self,
        up: fn(&C) -> &T,
        up_mut: fn(&mut C) -> &mut T,
    ) -> FieldRef<C> {
        let get = self.get;
        let set = self.set;
        FieldRef {
            name: self.name,
            ty: self.ty,
            marker: self.marker,
            get: Box::new(move |outer: &C| get(up(outer))),
            set: Box::new(move |outer: &mut C, value: Value| set(up_mut(outer), value)),
        }
    }
}

impl<T> FieldRef<T> {
    /// Declared member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn declared_type(&self) -> TypeRef {
        self.ty
    }

    /// Marker payload
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub(crate) fn read(&self, target: &T) -> Value {
        (self.get)(target)
    }

    pub(crate) fn write(&self, target: &mut T, value: Value) -> Result<(), CallError> {
        (self.set)(target, value)
    }
}

impl<T> std::fmt::Debug for FieldRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// How a method receives its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Exclusive,
}

type SharedCall<T> = Box<dyn Fn(&T, Vec<Value>) -> Result<Value, CallError> + Send + Sync>;
type ExclusiveCall<T> = Box<dyn Fn(&mut T, Vec<Value>) -> Result<Value, CallError> + Send + Sync>;

enum Callable<T> {
    Shared(SharedCall<T>),
    Exclusive(ExclusiveCall<T>),
}

/// A declared method
pub struct MethodRef<T> {
    name: String,
    params: Vec<TypeRef>,
    returns: TypeRef,
    marker: Marker,
    callable: Callable<T>,
}

impl<T: 'static> MethodRef<T> {
    /// Method with an explicit signature taking `&mut T` and a dynamic argument list.
    ///
    /// The argument count is checked against `params` before `f` runs.
    pub fn dynamic<F>(name: impl Into<String>, params: Vec<TypeRef>, returns: TypeRef, f: F) -> Self
    where
        F: Fn(&mut T, Vec<Value>) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        let arity = params.len();
        Self::exclusive(name, params, returns, move |target, args| {
            check_arity(arity, &args)?;
            f(target, args)
        })
    }

    /// `fn(&self) -> R`
    pub fn query<R, F>(name: impl Into<String>, f: F) -> Self
    where
        R: InspectValue,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self::shared(name, Vec::new(), R::type_ref(), move |target, args| {
            check_arity(0, &args)?;
            Ok(f(target).into_value())
        })
    }

    /// `fn(&self) -> Result<R, E>`
    pub fn try_query<R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        R: InspectValue,
        E: Into<Box<dyn StdError + Send + Sync>>,
        F: Fn(&T) -> Result<R, E> + Send + Sync + 'static,
    {
        Self::shared(name, Vec::new(), R::type_ref(), move |target, args| {
            check_arity(0, &args)?;
            finish(f(target))
        })
    }

    /// `fn(&mut self) -> R`
    pub fn call0<R, F>(name: impl Into<String>, f: F) -> Self
    where
        R: InspectValue,
        F: Fn(&mut T) -> R + Send + Sync + 'static,
    {
        Self::exclusive(name, Vec::new(), R::type_ref(), move |target, args| {
            check_arity(0, &args)?;
            Ok(f(target).into_value())
        })
    }

    /// `fn(&mut self, A) -> R`
    pub fn call1<A, R, F>(name: impl Into<String>, f: F) -> Self
    where
        A: InspectValue,
        R: InspectValue,
        F: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        Self::exclusive(name, vec![A::type_ref()], R::type_ref(), move |target, args| {
            check_arity(1, &args)?;
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args, 0)?;
            Ok(f(target, a).into_value())
        })
    }

    /// `fn(&mut self, A, B) -> R`
    pub fn call2<A, B, R, F>(name: impl Into<String>, f: F) -> Self
    where
        A: InspectValue,
        B: InspectValue,
        R: InspectValue,
        F: Fn(&mut T, A, B) -> R + Send + Sync + 'static,
    {
        let params = vec![A::type_ref(), B::type_ref()];
        Self::exclusive(name, params, R::type_ref(), move |target, args| {
            check_arity(2, &args)?;
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args, 0)?;
            let b = next_arg::<B>(&mut args, 1)?;
            Ok(f(target, a, b).into_value())
        })
    }

    /// `fn(&mut self) -> Result<R, E>`
    pub fn try_call0<R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        R: InspectValue,
        E: Into<Box<dyn StdError + Send + Sync>>,
        F: Fn(&mut T) -> Result<R, E> + Send + Sync + 'static,
    {
        Self::exclusive(name, Vec::new(), R::type_ref(), move |target, args| {
            check_arity(0, &args)?;
            finish(f(target))
        })
    }

    /// `fn(&mut self, A) -> Result<R, E>`
    pub fn try_call1<A, R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        A: InspectValue,
        R: InspectValue,
        E: Into<Box<dyn StdError + Send + Sync>>,
        F: Fn(&mut T, A) -> Result<R, E> + Send + Sync + 'static,
    {
        Self::exclusive(name, vec![A::type_ref()], R::type_ref(), move |target, args| {
            check_arity(1, &args)?;
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args, 0)?;
            finish(f(target, a))
        })
    }

    /// `fn(&mut self, A, B) -> Result<R, E>`
    pub fn try_call2<A, B, R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        A: InspectValue,
        B: InspectValue,
        R: InspectValue,
        E: Into<Box<dyn StdError + Send + Sync>>,
        F: Fn(&mut T, A, B) -> Result<R, E> + Send + Sync + 'static,
    {
        let params = vec![A::type_ref(), B::type_ref()];
        Self::exclusive(name, params, R::type_ref(), move |target, args| {
            check_arity(2, &args)?;
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args, 0)?;
            let b = next_arg::<B>(&mut args, 1)?;
            finish(f(target, a, b))
        })
    }

    fn shared<F>(name: impl Into<String>, params: Vec<TypeRef>, returns: TypeRef, f: F) -> Self
    where
        F: Fn(&T, Vec<Value>) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            returns,
            marker: Marker::default(),
            callable: Callable::Shared(Box::new(f)),
        }
    }

    fn exclusive<F>(name: impl Into<String>, params: Vec<TypeRef>, returns: TypeRef, f: F) -> Self
    where
        F: Fn(&mut T, Vec<Value>) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            returns,
            marker: Marker::default(),
            callable: Callable::Exclusive(Box::new(f)),
        }
    }

    /// Override the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.marker.name = name.into();
        self
    }

    /// Mark the attribute this getter exposes as read only
    pub fn read_only(mut self) -> Self {
        self.marker.read_only = true;
        self
    }

    /// Re-root this method onto a type that contains `T`
    pub(crate) fn project<C: 'static>(
        self,
        up: fn(&C) -> &T,
        up_mut: fn(&mut C) -> &mut T,
    ) -> MethodRef<C> {
        let callable = match self.callable {
            Callable::Shared(f) => {
                Callable::Shared(Box::new(move |outer: &C, args: Vec<Value>| f(up(outer), args)))
            }
            Callable::Exclusive(f) => {
                Callable::Exclusive(Box::new(move |outer: &mut C, args: Vec<Value>| {
                    f(up_mut(outer), args)
                }))
            }
        };
        MethodRef {
            name: self.name,
            params: self.params,
            returns: self.returns,
            marker: self.marker,
            callable,
        }
    }
}

impl<T> MethodRef<T> {
    /// Declared member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    /// Declared return type
    pub fn return_type(&self) -> TypeRef {
        self.returns
    }

    /// Marker payload
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Receiver kind
    pub fn receiver(&self) -> Receiver {
        match self.callable {
            Callable::Shared(_) => Receiver::Shared,
            Callable::Exclusive(_) => Receiver::Exclusive,
        }
    }

    /// Human-readable signature, e.g. `turn(i32) -> bool`
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.type_name()).collect();
        format!("{}({}) -> {}", self.name, params.join(", "), self.returns)
    }

    /// Call through a shared reference
    pub(crate) fn call_shared(&self, target: &T, args: Vec<Value>) -> Result<Value, CallError> {
        match &self.callable {
            Callable::Shared(f) => f(target, args),
            Callable::Exclusive(_) => Err(CallError::ExclusiveReceiver),
        }
    }

    /// Call through an exclusive reference
    pub(crate) fn call(&self, target: &mut T, args: Vec<Value>) -> Result<Value, CallError> {
        match &self.callable {
            Callable::Shared(f) => f(target, args),
            Callable::Exclusive(f) => f(target, args),
        }
    }
}

impl<T> std::fmt::Debug for MethodRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("receiver", &self.receiver())
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

fn check_arity(expected: usize, args: &[Value]) -> Result<(), CallError> {
    if args.len() != expected {
        return Err(CallError::Arity {
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn convert<A: InspectValue>(value: Value, index: usize) -> Result<A, CallError> {
    A::from_value(value).map_err(|rejected| CallError::Argument {
        index,
        expected: A::type_ref().boxed(),
        found: rejected.value_type(),
    })
}

fn next_arg<A: InspectValue>(
    args: &mut std::vec::IntoIter<Value>,
    index: usize,
) -> Result<A, CallError> {
    // Arity was checked up front
    let value = args.next().unwrap_or(Value::Unit);
    convert(value, index)
}

fn finish<R, E>(result: Result<R, E>) -> Result<Value, CallError>
where
    R: InspectValue,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    result
        .map(InspectValue::into_value)
        .map_err(|e| CallError::Failed(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: i32,
    }

    #[test]
    fn test_field_read_write() {
        let field = FieldRef::new("count", |c: &Counter| &c.count, |c: &mut Counter| &mut c.count);
        let mut counter = Counter { count: 1 };

        assert_eq!(field.declared_type(), TypeRef::of::<i32>());
        assert_eq!(field.read(&counter), Value::Int(1));
        field.write(&mut counter, Value::Int(9)).unwrap();
        assert_eq!(counter.count, 9);

        let err = field.write(&mut counter, Value::Long(3)).unwrap_err();
        assert!(matches!(err, CallError::Argument { index: 0, .. }));
        assert_eq!(counter.count, 9);
    }

    #[test]
    fn test_method_signatures() {
        let query = MethodRef::query("getCount", |c: &Counter| c.count);
        assert!(query.params().is_empty());
        assert_eq!(query.return_type(), TypeRef::of::<i32>());
        assert_eq!(query.receiver(), Receiver::Shared);

        let setter = MethodRef::call1("setCount", |c: &mut Counter, v: i32| c.count = v);
        assert_eq!(setter.params(), &[TypeRef::of::<i32>()]);
        assert!(setter.return_type().is_unit());
        assert_eq!(setter.receiver(), Receiver::Exclusive);
        assert_eq!(setter.signature(), "setCount(i32) -> ()");
    }

    #[test]
    fn test_method_calls_check_arguments() {
        let add = MethodRef::call2("add", |c: &mut Counter, a: i32, b: i32| {
            c.count += a + b;
            c.count
        });
        let mut counter = Counter { count: 0 };

        assert_eq!(
            add.call(&mut counter, vec![Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Int(5)
        );
        assert!(matches!(
            add.call(&mut counter, vec![Value::Int(2)]),
            Err(CallError::Arity { expected: 2, found: 1 })
        ));
        assert!(matches!(
            add.call(&mut counter, vec![Value::Int(2), Value::Boolean(true)]),
            Err(CallError::Argument { index: 1, .. })
        ));
        assert_eq!(counter.count, 5);
    }

    #[test]
    fn test_exclusive_method_through_shared_reference() {
        let reset = MethodRef::call0("reset", |c: &mut Counter| c.count = 0);
        let counter = Counter { count: 4 };
        assert!(matches!(
            reset.call_shared(&counter, Vec::new()),
            Err(CallError::ExclusiveReceiver)
        ));
    }

    #[test]
    fn test_fallible_method_reports_target_error() {
        let step = MethodRef::try_call0("step", |c: &mut Counter| {
            if c.count >= 3 {
                return Err("counter exhausted");
            }
            c.count += 1;
            Ok(c.count)
        });
        let mut counter = Counter { count: 2 };

        assert_eq!(step.call(&mut counter, Vec::new()).unwrap(), Value::Int(3));
        let err = step.call(&mut counter, Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "counter exhausted");
    }

    #[test]
    fn test_projection_onto_containing_type() {
        struct Outer {
            inner: Counter,
        }

        let field = FieldRef::new("count", |c: &Counter| &c.count, |c: &mut Counter| &mut c.count)
            .project::<Outer>(|o| &o.inner, |o| &mut o.inner);
        let bump = MethodRef::call0("bump", |c: &mut Counter| c.count += 1)
            .project::<Outer>(|o| &o.inner, |o| &mut o.inner);

        let mut outer = Outer {
            inner: Counter { count: 1 },
        };
        bump.call(&mut outer, Vec::new()).unwrap();
        assert_eq!(field.read(&outer), Value::Int(2));
    }
}
