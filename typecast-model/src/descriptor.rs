use std::collections::{HashMap, HashSet};

use crate::serializable::TypeRef;

/// Whether a map-valued registration may replace an existing binding.
///
/// Set-valued classifications (mandatory/excluded/array) always merge by
/// union and take no policy. Replacing a complex, abstract, or
/// implementation binding silently would change which types the engine
/// constructs, so overwriting is an explicit per-call opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Keep the first registered binding.
    #[default]
    KeepExisting,
    /// Replace the binding for this one key.
    Overwrite,
}

/// Field classifications for one serializable type.
///
/// Created on first annotation (or first engine use) and kept for the
/// registry's lifetime. The inheritance resolver folds every declared
/// ancestor's content in once, lazily; after that the descriptor is
/// read-only.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    pub(crate) mandatory_fields: HashSet<String>,
    pub(crate) excluded_fields: HashSet<String>,
    pub(crate) array_fields: HashSet<String>,
    pub(crate) complex_field_types: HashMap<String, TypeRef>,
    pub(crate) abstract_field_selectors: HashMap<String, String>,
    pub(crate) type_implementations: HashMap<String, TypeRef>,
    /// Declared ancestors, nearest first.
    pub(crate) base_types: Vec<TypeRef>,
    /// Set once the ancestor chain has been folded in.
    pub(crate) resolved: bool,
}

impl TypeDescriptor {
    /// Whether `field` must be present in raw data.
    pub fn is_mandatory(&self, field: &str) -> bool {
        self.mandatory_fields.contains(field)
    }

    /// Iterates the mandatory field names.
    pub fn mandatory_fields(&self) -> impl Iterator<Item = &str> {
        self.mandatory_fields.iter().map(String::as_str)
    }

    /// Whether `field` is skipped in both directions.
    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded_fields.contains(field)
    }

    /// Whether `field` holds a sequence of elements.
    pub fn is_array(&self, field: &str) -> bool {
        self.array_fields.contains(field)
    }

    /// The nested type bound to `field`, if it is a complex field.
    pub fn complex_type(&self, field: &str) -> Option<TypeRef> {
        self.complex_field_types.get(field).copied()
    }

    /// The sibling discriminator field bound to `field`, if it is an
    /// abstract field.
    pub fn abstract_selector(&self, field: &str) -> Option<&str> {
        self.abstract_field_selectors.get(field).map(String::as_str)
    }

    /// The implementation registered for a discriminator value.
    pub fn implementation(&self, discriminator: &str) -> Option<TypeRef> {
        self.type_implementations.get(discriminator).copied()
    }

    /// Whether `field` recurses into a typed element (complex or abstract).
    pub fn is_nested(&self, field: &str) -> bool {
        self.complex_field_types.contains_key(field)
            || self.abstract_field_selectors.contains_key(field)
    }

    /// The declared ancestors, nearest first.
    pub fn base_types(&self) -> &[TypeRef] {
        &self.base_types
    }

    /// Folds an ancestor's classifications into this descriptor: sets merge
    /// by union, map entries only fill gaps. Idempotent.
    pub(crate) fn absorb(&mut self, ancestor: &TypeDescriptor) {
        self.mandatory_fields
            .extend(ancestor.mandatory_fields.iter().cloned());
        self.excluded_fields
            .extend(ancestor.excluded_fields.iter().cloned());
        self.array_fields
            .extend(ancestor.array_fields.iter().cloned());

        for (field, nested) in &ancestor.complex_field_types {
            self.complex_field_types
                .entry(field.clone())
                .or_insert(*nested);
        }
        for (field, selector) in &ancestor.abstract_field_selectors {
            self.abstract_field_selectors
                .entry(field.clone())
                .or_insert_with(|| selector.clone());
        }
        for (discriminator, implementation) in &ancestor.type_implementations {
            self.type_implementations
                .entry(discriminator.clone())
                .or_insert(*implementation);
        }
    }
}
