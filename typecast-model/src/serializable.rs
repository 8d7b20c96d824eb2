use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::FieldValue;

fn instantiate_default<T: Serializable + Default>() -> Box<dyn Serializable> {
    Box::new(T::default())
}

/// Runtime handle to a serializable type: identity for descriptor lookup
/// plus a factory for default construction.
///
/// A `TypeRef` can only be obtained through [`TypeRef::of`], so every handle
/// the engine ever sees points at a real, constructible type. Equality and
/// hashing go by type id.
#[derive(Clone, Copy)]
pub struct TypeRef {
    type_id: TypeId,
    type_name: &'static str,
    instantiate: fn() -> Box<dyn Serializable>,
}

impl TypeRef {
    /// Creates the handle for `T`.
    pub fn of<T: Serializable + Default>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instantiate: instantiate_default::<T>,
        }
    }

    /// The underlying type's id, used as the registry key.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full path of the underlying type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Default-constructs a boxed instance of the underlying type.
    pub fn instantiate(&self) -> Box<dyn Serializable> {
        (self.instantiate)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.type_name).finish()
    }
}

/// Implemented by every domain type the engine can build or flatten.
///
/// Introspection is restricted to the explicit [`field_names`] list captured
/// by the implementation; the engine never discovers fields any other way.
/// Implementations are plain structs — `get` reads a field slot out, `set`
/// writes one in, and unknown field names are silently ignored by `set` so
/// dispensable raw keys can pass through the engine without effect.
///
/// [`field_names`]: Serializable::field_names
pub trait Serializable: Any + Send + Sync {
    /// Handle used to look up this type's descriptor.
    fn type_ref(&self) -> TypeRef;

    /// Every field the type exposes to serialization, in output order.
    fn field_names(&self) -> &'static [&'static str];

    /// Reads a field slot. `None` means the field is unset.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Writes a field slot. Unknown fields are ignored.
    fn set(&mut self, field: &str, value: FieldValue);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl fmt::Debug for dyn Serializable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Serializable")
            .field(&self.type_ref().type_name())
            .finish()
    }
}

impl dyn Serializable {
    /// Whether the concrete type behind the trait object is `T`.
    pub fn is<T: Serializable>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrows the concrete type behind the trait object.
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrows the concrete type behind the trait object.
    pub fn downcast_mut<T: Serializable>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Unboxes the concrete type behind the trait object, or `None` if the
    /// object is of a different type.
    pub fn downcast<T: Serializable>(self: Box<Self>) -> Option<T> {
        self.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }
}
