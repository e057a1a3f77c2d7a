// Schema opt-in trait and the per-type schema cache

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::errors::Result;
use crate::schema::Schema;

/// Marks a type as a validation target and supplies its schema.
///
/// Schemas must opt in: only types implementing this trait can be handed to
/// the engine, which turns "type was never marked as a schema" into a
/// compile-time error. The `DeserializeOwned` bound is the materialization
/// contract; a validated payload is decoded into the target type only after
/// every field passed.
pub trait Validatable: DeserializeOwned + 'static {
    fn schema() -> Result<Schema>;
}

static SCHEMAS: Lazy<RwLock<HashMap<TypeId, Arc<Schema>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Derive and cache the schema for `T`.
///
/// The cache entry for a type is written once and read-only afterwards, so
/// concurrent callers never observe a partially built schema.
pub fn schema_of<T: Validatable>() -> Result<Arc<Schema>> {
    let id = TypeId::of::<T>();
    {
        let cache = SCHEMAS.read().unwrap_or_else(|e| e.into_inner());
        if let Some(schema) = cache.get(&id) {
            return Ok(schema.clone());
        }
    }

    // Built outside the lock; nested SchemaRefs resolve lazily so this
    // cannot re-enter the cache for the same type.
    let schema = Arc::new(T::schema()?);
    log::debug!(
        "cached schema `{}` for {}",
        schema.name(),
        std::any::type_name::<T>()
    );

    let mut cache = SCHEMAS.write().unwrap_or_else(|e| e.into_inner());
    Ok(cache.entry(id).or_insert(schema).clone())
}
