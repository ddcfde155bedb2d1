use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::cache::CacheError;

/// JSON encoding used for every value the cache layer writes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn new(value: T) -> Self { Self(value) }

    pub fn inner(self) -> T { self.0 }

    pub fn as_inner(&self) -> &T { &self.0 }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self { Json(value) }
}

impl<T> Json<T>
where
    T: Serialize,
{
    pub fn to_bytes(&self) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(&self.0)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }
}

impl<T> Json<T>
where
    T: for<'de> Deserialize<'de>,
{
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError> {
        serde_json::from_slice(bytes)
            .map(Json)
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}
