//! JSON file adapter for typecast.
//!
//! Wraps the engine with sequential I/O pipelines:
//! - load: existence check → read → parse → deserialize
//! - save: serialize → ensure parent directory → pretty-printed write
//!
//! I/O and parse failures are translated into path-carrying [`FileError`]s;
//! engine errors pass through unchanged. The persisted format is a plain
//! pretty-printed JSON document with no schema header or version tag.

mod error;

pub use error::{FileError, FileResult};

use std::path::Path;

use serde_json::Value;
use tracing::debug;
use typecast_engine::{EngineError, Serializer};
use typecast_model::{Serializable, TypeRef};

/// Loads and saves serializable objects as pretty-printed JSON files.
pub struct FileStore {
    serializer: Serializer,
}

impl FileStore {
    /// Creates a store over an annotated engine.
    pub fn new(serializer: Serializer) -> Self {
        Self { serializer }
    }

    /// Reads `path`, parses its content as JSON and deserializes the result
    /// as `ty`.
    pub async fn load(
        &self,
        ty: TypeRef,
        path: impl AsRef<Path>,
    ) -> FileResult<Box<dyn Serializable>> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(FileError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: Value = serde_json::from_slice(&bytes).map_err(|source| FileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let object = self.serializer.deserialize(ty, &raw).await?;
        debug!(path = %path.display(), type_name = ty.type_name(), "loaded serialized file");
        Ok(object)
    }

    /// Typed wrapper around [`load`](Self::load).
    pub async fn load_as<T: Serializable + Default>(&self, path: impl AsRef<Path>) -> FileResult<T> {
        let object = self.load(TypeRef::of::<T>(), path).await?;
        object.downcast::<T>().ok_or_else(|| {
            EngineError::Configuration(format!(
                "loaded object is not a `{}`",
                std::any::type_name::<T>()
            ))
            .into()
        })
    }

    /// Serializes `object` and writes it to `path` as pretty-printed JSON,
    /// creating missing parent directories.
    pub async fn save(&self, object: &dyn Serializable, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();

        let raw = self.serializer.serialize(object).await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FileError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        let bytes = serde_json::to_vec_pretty(&raw).map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source: source.into(),
        })?;

        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| FileError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "saved serialized file");
        Ok(())
    }
}
