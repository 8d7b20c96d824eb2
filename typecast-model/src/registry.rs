use std::any::TypeId;
use std::collections::HashMap;

use crate::descriptor::{TypeDescriptor, UpdatePolicy};
use crate::serializable::{Serializable, TypeRef};

/// Central store of [`TypeDescriptor`]s, keyed by type id.
///
/// Annotation happens once per type at startup; descriptors are merged with
/// their declared ancestors lazily on first [`resolve`](Self::resolve) and
/// are effectively read-only afterwards. Every annotation operation creates
/// a blank descriptor for the target type on first touch, so operations can
/// run in any order.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptors: HashMap<TypeId, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry<T: Serializable>(&mut self) -> &mut TypeDescriptor {
        self.descriptors.entry(TypeId::of::<T>()).or_default()
    }

    fn bind<V>(map: &mut HashMap<String, V>, key: &str, value: V, policy: UpdatePolicy) {
        match policy {
            UpdatePolicy::Overwrite => {
                map.insert(key.to_string(), value);
            }
            UpdatePolicy::KeepExisting => {
                map.entry(key.to_string()).or_insert(value);
            }
        }
    }

    // ── Annotation API ───────────────────────────────────────────

    /// Marks `field` as required during deserialization.
    pub fn mark_mandatory<T: Serializable>(&mut self, field: &str) {
        self.entry::<T>().mandatory_fields.insert(field.to_string());
    }

    /// Marks `field` as skipped in both directions.
    pub fn mark_excluded<T: Serializable>(&mut self, field: &str) {
        self.entry::<T>().excluded_fields.insert(field.to_string());
    }

    /// Marks `field` as holding a sequence of elements.
    pub fn mark_array<T: Serializable>(&mut self, field: &str) {
        self.entry::<T>().array_fields.insert(field.to_string());
    }

    /// Binds `field` (or each of its elements) to the nested type `element`.
    pub fn mark_complex<T: Serializable>(
        &mut self,
        field: &str,
        element: TypeRef,
        policy: UpdatePolicy,
    ) {
        Self::bind(
            &mut self.entry::<T>().complex_field_types,
            field,
            element,
            policy,
        );
    }

    /// Marks `field` as polymorphic, resolved through the sibling
    /// `discriminator_field` in the raw data.
    pub fn mark_abstract<T: Serializable>(
        &mut self,
        field: &str,
        discriminator_field: &str,
        policy: UpdatePolicy,
    ) {
        Self::bind(
            &mut self.entry::<T>().abstract_field_selectors,
            field,
            discriminator_field.to_string(),
            policy,
        );
    }

    /// Registers a concrete implementation for a discriminator value.
    pub fn add_implementation<T: Serializable>(
        &mut self,
        discriminator: &str,
        implementation: TypeRef,
        policy: UpdatePolicy,
    ) {
        Self::bind(
            &mut self.entry::<T>().type_implementations,
            discriminator,
            implementation,
            policy,
        );
    }

    /// Declares `base` as an ancestor of `T`. Repeated declarations append
    /// in order, nearest first; duplicates are ignored.
    pub fn declare_base<T: Serializable>(&mut self, base: TypeRef) {
        let descriptor = self.entry::<T>();
        if !descriptor.base_types.contains(&base) {
            descriptor.base_types.push(base);
        }
    }

    // ── Lookup & inheritance resolution ──────────────────────────

    /// Whether a descriptor exists for the given type id.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.descriptors.contains_key(&type_id)
    }

    /// Returns the stored descriptor for the given type id, unresolved.
    pub fn get(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
        self.descriptors.get(&type_id)
    }

    /// Returns `ty`'s descriptor with every declared ancestor folded in.
    ///
    /// The first call per type walks the declared ancestor list nearest to
    /// furthest, resolving each ancestor transitively before absorbing it.
    /// Later calls just clone the fixed point. Unannotated types resolve to
    /// an empty descriptor.
    pub fn resolve(&mut self, ty: TypeRef) -> TypeDescriptor {
        self.resolve_id(ty.type_id())
    }

    fn resolve_id(&mut self, type_id: TypeId) -> TypeDescriptor {
        let descriptor = self.descriptors.entry(type_id).or_default();
        if descriptor.resolved {
            return descriptor.clone();
        }
        // Marked before the ancestor walk so a (non-goal) circular
        // declaration terminates instead of recursing forever.
        descriptor.resolved = true;

        let bases = descriptor.base_types.clone();
        let mut merged = descriptor.clone();
        for base in bases {
            let ancestor = self.resolve_id(base.type_id());
            merged.absorb(&ancestor);
        }
        self.descriptors.insert(type_id, merged.clone());
        merged
    }
}
