use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use typecast_model::{FieldValue, Serializable, TypeDescriptor, TypeRef, TypeRegistry};

use crate::error::{EngineError, EngineResult};

/// Target type name reported when an abstract discriminator is missing.
const ABSTRACT_TARGET: &str = "abstract";

/// The recursive (de)serialization engine.
///
/// Wraps an annotated [`TypeRegistry`] and drives every conversion through
/// its merged descriptors. Descriptors are cloned out of the lock before any
/// recursion starts, so no lock is ever held across a suspension point. The
/// engine spawns nothing and performs no I/O; any future-aware host can
/// drive its calls.
#[derive(Clone)]
pub struct Serializer {
    registry: Arc<RwLock<TypeRegistry>>,
}

impl Serializer {
    /// Creates an engine over a fully annotated registry.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Resolves `ty`'s descriptor with ancestor metadata folded in.
    async fn resolve(&self, ty: TypeRef) -> TypeDescriptor {
        self.registry.write().await.resolve(ty)
    }

    // ── Deserialization ──────────────────────────────────────────

    /// Builds a typed object from raw serialized data.
    ///
    /// Mandatory fields are all checked before any assignment happens.
    /// Property deserializations for distinct keys run concurrently; the
    /// first failure aborts the whole call and no partial object is ever
    /// returned. An explicit `null` assigns the null sentinel without
    /// recursing; absent keys keep the constructor default.
    pub async fn deserialize(
        &self,
        ty: TypeRef,
        raw: &Value,
    ) -> EngineResult<Box<dyn Serializable>> {
        self.deserialize_inner(ty, raw).await
    }

    /// Typed wrapper around [`deserialize`](Self::deserialize).
    pub async fn deserialize_as<T: Serializable + Default>(&self, raw: &Value) -> EngineResult<T> {
        let object = self.deserialize(TypeRef::of::<T>(), raw).await?;
        object.downcast::<T>().ok_or_else(|| {
            EngineError::Configuration(format!(
                "deserialized object is not a `{}`",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Builds a polymorphic root object: the discriminator is read from the
    /// top of `raw` itself rather than from a nested element, then looked
    /// up in `container`'s implementation table.
    pub async fn deserialize_abstract(
        &self,
        container: TypeRef,
        raw: &Value,
        discriminator_field: &str,
    ) -> EngineResult<Box<dyn Serializable>> {
        let descriptor = self.resolve(container).await;
        let implementation = select_implementation(&descriptor, discriminator_field, raw)?;
        self.deserialize_inner(implementation, raw).await
    }

    /// Deserializes a single property of `ty` out of `raw`.
    ///
    /// An absent entry is an incomplete-object error; an explicit `null` is
    /// the terminal null sentinel. Exclusion is not consulted — a direct
    /// property call is an explicit request for that field.
    pub async fn deserialize_property(
        &self,
        ty: TypeRef,
        raw: &Value,
        field: &str,
    ) -> EngineResult<FieldValue> {
        let descriptor = self.resolve(ty).await;

        let value = raw.get(field).ok_or_else(|| EngineError::IncompleteObject {
            target_type: ty.type_name().to_string(),
            missing_field: field.to_string(),
            raw_data: raw.clone(),
        })?;
        if value.is_null() {
            return Ok(FieldValue::Null);
        }
        self.deserialize_field(&descriptor, raw, field, value).await
    }

    /// Deserializes `raw` as a single element of the array field `field`.
    ///
    /// The field must be registered as an array with a complex or abstract
    /// element binding; anything else is a configuration error rather than
    /// a data error.
    pub async fn deserialize_array_item(
        &self,
        ty: TypeRef,
        raw: &Value,
        field: &str,
    ) -> EngineResult<FieldValue> {
        let descriptor = self.resolve(ty).await;

        if !descriptor.is_array(field) {
            return Err(EngineError::Configuration(format!(
                "field `{field}` of `{}` is not marked as an array",
                ty.type_name()
            )));
        }
        if !descriptor.is_nested(field) {
            return Err(EngineError::Configuration(format!(
                "field `{field}` of `{}` has no complex or abstract element binding",
                ty.type_name()
            )));
        }
        self.deserialize_element(&descriptor, field, raw).await
    }

    fn deserialize_inner<'a>(
        &'a self,
        ty: TypeRef,
        raw: &'a Value,
    ) -> BoxFuture<'a, EngineResult<Box<dyn Serializable>>> {
        async move {
            let descriptor = self.resolve(ty).await;

            // Raw data that is not a map carries no entries at all.
            let empty = Map::new();
            let entries = raw.as_object().unwrap_or(&empty);

            for field in descriptor.mandatory_fields() {
                if !entries.contains_key(field) {
                    return Err(EngineError::IncompleteObject {
                        target_type: ty.type_name().to_string(),
                        missing_field: field.to_string(),
                        raw_data: raw.clone(),
                    });
                }
            }

            let descriptor = &descriptor;
            let slots = future::try_join_all(
                entries
                    .iter()
                    .filter(|(field, _)| !descriptor.is_excluded(field))
                    .map(|(field, value)| async move {
                        if value.is_null() {
                            return Ok((field.as_str(), FieldValue::Null));
                        }
                        let slot = self.deserialize_field(descriptor, raw, field, value).await?;
                        Ok::<_, EngineError>((field.as_str(), slot))
                    }),
            )
            .await?;

            let mut object = ty.instantiate();
            for (field, slot) in slots {
                object.set(field, slot);
            }
            Ok(object)
        }
        .boxed()
    }

    /// Deserializes one present, non-null property value: array unwrapping
    /// plus the per-element complex/abstract/scalar split.
    async fn deserialize_field(
        &self,
        descriptor: &TypeDescriptor,
        raw: &Value,
        field: &str,
        value: &Value,
    ) -> EngineResult<FieldValue> {
        if !descriptor.is_array(field) {
            return self.deserialize_element(descriptor, field, value).await;
        }

        let items = value.as_array().ok_or_else(|| EngineError::NotAnArray {
            field: field.to_string(),
            raw_data: raw.clone(),
        })?;

        let mut slots = Vec::with_capacity(items.len());
        for item in items {
            slots.push(self.deserialize_element(descriptor, field, item).await?);
        }
        Ok(FieldValue::Array(slots))
    }

    /// Deserializes a single element of a property: nested complex, nested
    /// abstract, or raw scalar passthrough.
    async fn deserialize_element(
        &self,
        descriptor: &TypeDescriptor,
        field: &str,
        element: &Value,
    ) -> EngineResult<FieldValue> {
        if let Some(nested) = descriptor.complex_type(field) {
            let object = self.deserialize_inner(nested, element).await?;
            return Ok(FieldValue::Object(object));
        }
        if let Some(selector) = descriptor.abstract_selector(field) {
            let implementation = select_implementation(descriptor, selector, element)?;
            let object = self.deserialize_inner(implementation, element).await?;
            return Ok(FieldValue::Object(object));
        }
        Ok(FieldValue::Scalar(element.clone()))
    }

    // ── Serialization ────────────────────────────────────────────

    /// Flattens a typed object into raw serialized data.
    ///
    /// Excluded fields are omitted; unset fields stay absent; a null slot
    /// becomes the field's entire output. Nested objects serialize under
    /// their own concrete type's metadata.
    pub async fn serialize(&self, object: &dyn Serializable) -> EngineResult<Value> {
        self.serialize_inner(object).await
    }

    /// Flattens a top-level collection into a raw sequence, one map per
    /// object.
    pub async fn serialize_sequence(
        &self,
        objects: &[Box<dyn Serializable>],
    ) -> EngineResult<Value> {
        let mut output = Vec::with_capacity(objects.len());
        for object in objects {
            output.push(self.serialize_inner(object.as_ref()).await?);
        }
        Ok(Value::Array(output))
    }

    fn serialize_inner<'a>(
        &'a self,
        object: &'a dyn Serializable,
    ) -> BoxFuture<'a, EngineResult<Value>> {
        async move {
            let descriptor = self.resolve(object.type_ref()).await;
            let mut output = Map::new();

            for field in object.field_names() {
                if descriptor.is_excluded(field) {
                    continue;
                }
                let Some(slot) = object.get(field) else {
                    continue;
                };
                let serialized = self.serialize_slot(&descriptor, field, slot).await?;
                output.insert((*field).to_string(), serialized);
            }

            Ok(Value::Object(output))
        }
        .boxed()
    }

    /// Serializes one field slot. Sequences drop their null elements so an
    /// output array never mixes real values with sentinels; a lone slot in
    /// an array-marked field is wrapped as a one-element sequence for
    /// symmetry with deserialization.
    async fn serialize_slot(
        &self,
        descriptor: &TypeDescriptor,
        field: &str,
        slot: FieldValue,
    ) -> EngineResult<Value> {
        match slot {
            FieldValue::Null => Ok(Value::Null),
            FieldValue::Array(elements) => {
                let mut output = Vec::with_capacity(elements.len());
                for element in elements {
                    if element.is_null() {
                        continue;
                    }
                    output.push(self.serialize_element(element).await?);
                }
                Ok(Value::Array(output))
            }
            single if descriptor.is_array(field) => {
                Ok(Value::Array(vec![self.serialize_element(single).await?]))
            }
            single => self.serialize_element(single).await,
        }
    }

    /// Serializes a single non-null element: nested objects recurse, raw
    /// scalars pass through.
    fn serialize_element(&self, element: FieldValue) -> BoxFuture<'_, EngineResult<Value>> {
        async move {
            match element {
                FieldValue::Null => Ok(Value::Null),
                FieldValue::Scalar(value) => Ok(value),
                FieldValue::Object(object) => self.serialize_inner(object.as_ref()).await,
                FieldValue::Array(elements) => {
                    let mut output = Vec::with_capacity(elements.len());
                    for nested in elements {
                        output.push(self.serialize_element(nested).await?);
                    }
                    Ok(Value::Array(output))
                }
            }
        }
        .boxed()
    }
}

/// Reads the discriminator at `selector` out of `raw` and maps it to a
/// registered implementation. An absent, non-string, or empty discriminator
/// counts as missing.
fn select_implementation(
    descriptor: &TypeDescriptor,
    selector: &str,
    raw: &Value,
) -> EngineResult<TypeRef> {
    let discriminator = raw
        .get(selector)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| EngineError::IncompleteObject {
            target_type: ABSTRACT_TARGET.to_string(),
            missing_field: selector.to_string(),
            raw_data: raw.clone(),
        })?;

    descriptor
        .implementation(discriminator)
        .ok_or_else(|| EngineError::UnknownType {
            discriminator: discriminator.to_string(),
            raw_data: raw.clone(),
        })
}
