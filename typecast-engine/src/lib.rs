//! Metadata-driven (de)serialization engine.
//!
//! The engine converts between untyped JSON trees (`serde_json::Value`) and
//! typed objects implementing [`Serializable`], driven entirely by the field
//! classifications stored in a [`TypeRegistry`]:
//! - mandatory fields are enforced before any assignment
//! - excluded fields are skipped in both directions
//! - array fields map sequences elementwise
//! - complex fields recurse into a statically bound nested type
//! - abstract fields pick their concrete type through a discriminator
//!
//! All operations are async: recursion into nested types is the only
//! suspension point, and independent properties of one object deserialize
//! concurrently. The engine performs no I/O and no logging; the file layer
//! lives in `typecast-file`.

mod error;
mod serializer;

pub use error::{EngineError, EngineResult};
pub use serializer::Serializer;

// Re-exported so engine users need a single dependency for the common path.
pub use typecast_model::{
    FieldValue, Serializable, TypeDescriptor, TypeRef, TypeRegistry, UpdatePolicy,
};
