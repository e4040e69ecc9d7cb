use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A schema tracked by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub id: Uuid,
    pub directory: PathBuf,
    /// Registered without scanning; no alters are expected on disk yet.
    pub empty: bool,
}

/// In-memory schema store. Cheap to share; every method takes `&self`.
#[derive(Debug, Default)]
pub struct SchemaStore {
    schemas: RwLock<HashMap<Uuid, Schema>>,
}

impl SchemaStore {
    pub fn insert(&self, schema: Schema) {
        self.schemas.write().insert(schema.id, schema);
    }

    pub fn get(&self, id: &Uuid) -> Option<Schema> {
        self.schemas.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Schema> {
        self.schemas.read().values().cloned().collect()
    }

    /// Stop tracking a schema. Returns whether it existed. The underlying
    /// filesystem is never touched.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.schemas.write().remove(id).is_some()
    }
}
