//! Type declarations
//!
//! A [`TypeDeclaration`] lists the inspectable members of one type. It is
//! built once, usually in [`Inspect::declare`](super::Inspect::declare), and
//! answers the marker queries the registry builder runs: all fields or
//! methods carrying a marker, own members first, then inherited ones.

use super::member::{FieldRef, MarkerKind, MethodRef};
use super::types::ObjectType;

struct Members<T> {
    fields: Vec<FieldRef<T>>,
    attributes: Vec<MethodRef<T>>,
    methods: Vec<MethodRef<T>>,
}

impl<T> Default for Members<T> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Declared inspectable members of `T`
pub struct TypeDeclaration<T> {
    type_name: String,
    own: Members<T>,
    inherited: Members<T>,
}

impl<T: 'static> Default for TypeDeclaration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> TypeDeclaration<T> {
    /// Create an empty declaration named after `T`
    pub fn new() -> Self {
        Self::named(ObjectType::of::<T>().short_name())
    }

    /// Create an empty declaration with an explicit type name
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            own: Members::default(),
            inherited: Members::default(),
        }
    }

    /// Declare an attribute-marked field
    pub fn field(mut self, field: FieldRef<T>) -> Self {
        self.own.fields.push(field);
        self
    }

    /// Declare an attribute-marked method (a getter or a setter)
    pub fn attribute(mut self, method: MethodRef<T>) -> Self {
        self.own.attributes.push(method);
        self
    }

    /// Declare an inspection method
    pub fn method(mut self, method: MethodRef<T>) -> Self {
        self.own.methods.push(method);
        self
    }

    /// Inherit every member declared for `P`, reached through `up` / `up_mut`.
    ///
    /// Inherited members are listed after own members, in `inherit` call order.
    pub fn inherit<P: 'static>(
        mut self,
        parent: TypeDeclaration<P>,
        up: fn(&T) -> &P,
        up_mut: fn(&mut T) -> &mut P,
    ) -> Self {
        let TypeDeclaration { own, inherited, .. } = parent;
        for members in [own, inherited] {
            self.inherited
                .fields
                .extend(members.fields.into_iter().map(|f| f.project(up, up_mut)));
            self.inherited
                .attributes
                .extend(members.attributes.into_iter().map(|m| m.project(up, up_mut)));
            self.inherited
                .methods
                .extend(members.methods.into_iter().map(|m| m.project(up, up_mut)));
        }
        self
    }
}

impl<T> TypeDeclaration<T> {
    /// Name of the declared type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All fields carrying `kind`, including inherited ones
    pub fn marked_fields(&self, kind: MarkerKind) -> impl Iterator<Item = &FieldRef<T>> {
        let (own, inherited) = match kind {
            MarkerKind::Attribute => (&self.own.fields[..], &self.inherited.fields[..]),
            // Fields are never inspection methods
            MarkerKind::Method => (&[][..], &[][..]),
        };
        own.iter().chain(inherited)
    }

    /// All methods carrying `kind`, including inherited ones
    pub fn marked_methods(&self, kind: MarkerKind) -> impl Iterator<Item = &MethodRef<T>> {
        let (own, inherited) = match kind {
            MarkerKind::Attribute => (&self.own.attributes, &self.inherited.attributes),
            MarkerKind::Method => (&self.own.methods, &self.inherited.methods),
        };
        own.iter().chain(inherited)
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        [&self.own, &self.inherited]
            .iter()
            .all(|m| m.fields.is_empty() && m.attributes.is_empty() && m.methods.is_empty())
    }

    /// Move out all fields carrying `kind`, own first, then inherited
    pub(crate) fn take_marked_fields(&mut self, kind: MarkerKind) -> Vec<FieldRef<T>> {
        match kind {
            MarkerKind::Attribute => {
                let mut fields = std::mem::take(&mut self.own.fields);
                fields.append(&mut self.inherited.fields);
                fields
            }
            MarkerKind::Method => Vec::new(),
        }
    }

    /// Move out all methods carrying `kind`, own first, then inherited
    pub(crate) fn take_marked_methods(&mut self, kind: MarkerKind) -> Vec<MethodRef<T>> {
        let (own, inherited) = match kind {
            MarkerKind::Attribute => (&mut self.own.attributes, &mut self.inherited.attributes),
            MarkerKind::Method => (&mut self.own.methods, &mut self.inherited.methods),
        };
        let mut methods = std::mem::take(own);
        methods.append(inherited);
        methods
    }
}
