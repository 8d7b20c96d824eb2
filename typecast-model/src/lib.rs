//! Core metadata model for typecast.
//!
//! This crate defines the engine-agnostic building blocks:
//! - [`Serializable`] — the trait every domain type implements, exposing an
//!   explicit field list instead of ad-hoc reflection
//! - [`TypeRef`] — a copyable runtime handle (identity + factory) for a
//!   registered type
//! - [`FieldValue`] — the typed slot a deserialized property lands in
//! - [`TypeDescriptor`] / [`TypeRegistry`] — per-type field classifications
//!   and the store they live in, including the lazy inheritance resolver
//!
//! The engine itself lives in `typecast-engine`; nothing here performs I/O.

mod descriptor;
mod registry;
mod serializable;
mod value;

pub use descriptor::{TypeDescriptor, UpdatePolicy};
pub use registry::TypeRegistry;
pub use serializable::{Serializable, TypeRef};
pub use value::FieldValue;
