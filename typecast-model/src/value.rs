use std::fmt;

use serde_json::Value;

use crate::serializable::Serializable;

/// The typed slot a deserialized property lands in, and the shape
/// serialization reads back out of an object.
///
/// `Null` mirrors an explicit JSON `null`; an unset field is modeled by the
/// absence of any slot ([`Serializable::get`] returning `None`), matching
/// the null-vs-absent contract of the engine.
pub enum FieldValue {
    /// Explicit null sentinel. Nothing is recursed behind it.
    Null,
    /// Raw passthrough for scalar values or untyped subtrees.
    Scalar(Value),
    /// A nested typed object.
    Object(Box<dyn Serializable>),
    /// A sequence of slots, one per raw element.
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Wraps a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::Scalar(Value::String(value.into()))
    }

    /// Wraps a number scalar. Non-finite values collapse to `Null`, like
    /// JSON itself.
    pub fn number(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => FieldValue::Scalar(Value::Number(number)),
            None => FieldValue::Null,
        }
    }

    /// Wraps a boolean scalar.
    pub fn boolean(value: bool) -> Self {
        FieldValue::Scalar(Value::Bool(value))
    }

    /// Wraps a typed object.
    pub fn object(value: impl Serializable) -> Self {
        FieldValue::Object(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    pub fn as_object(&self) -> Option<&dyn Serializable> {
        match self {
            FieldValue::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn into_scalar(self) -> Option<Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Unboxes a nested object slot as a concrete type.
    pub fn into_object<T: Serializable>(self) -> Option<T> {
        match self {
            FieldValue::Object(object) => object.downcast::<T>(),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<FieldValue>> {
        match self {
            FieldValue::Array(elements) => Some(elements),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            other => FieldValue::Scalar(other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::string(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::string(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::boolean(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(Value::Number(value.into()))
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("Null"),
            FieldValue::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            FieldValue::Object(object) => f
                .debug_tuple("Object")
                .field(&object.type_ref().type_name())
                .finish(),
            FieldValue::Array(elements) => f.debug_tuple("Array").field(elements).finish(),
        }
    }
}
