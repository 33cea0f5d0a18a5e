use crate::domain::model::Bucket;
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, StoreFetchError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Namespaced JSON bucket on top of a [`KeyValueStore`].
///
/// Every key/value pair lives inside one JSON object stored under
/// `namespace`. The bucket is always read whole and written whole; two
/// adapters sharing a namespace see each other's writes, last write wins.
#[derive(Debug, Clone)]
pub struct StorageAdapter<S: KeyValueStore> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> StorageAdapter<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The whole bucket. A missing namespace, or one holding anything other
    /// than a JSON object, reads as empty.
    pub fn bucket(&self) -> Result<Bucket> {
        let Some(raw) = self.store.get_item(&self.namespace)? else {
            return Ok(Bucket::new());
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(bucket)) => Ok(bucket),
            Ok(other) => {
                tracing::warn!(
                    "Namespace '{}' holds a non-object JSON value ({}), treating as empty",
                    self.namespace,
                    json_kind(&other)
                );
                Ok(Bucket::new())
            }
            Err(e) => {
                tracing::warn!(
                    "Namespace '{}' holds invalid JSON ({}), treating as empty",
                    self.namespace,
                    e
                );
                Ok(Bucket::new())
            }
        }
    }

    pub fn get_value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.bucket()?.remove(key))
    }

    /// Value at `key`, or `default` when the key is absent. A stored `null`
    /// is returned as-is.
    pub fn get_value_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get_value(key)?.unwrap_or(default))
    }

    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_value(key)?
            .map(|value| serde_json::from_value(value).map_err(StoreFetchError::from))
            .transpose()
    }

    pub fn set_value<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let mut bucket = self.bucket()?;
        bucket.insert(key.to_string(), value);
        self.persist(&bucket)
    }

    /// Applies [`set_value`](Self::set_value) per entry, in iteration order.
    /// Not atomic: on error, entries before the failing one stay written.
    pub fn set_values<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        for (key, value) in entries {
            self.set_value(key.as_ref(), &value)?;
        }
        Ok(())
    }

    pub fn remove_value(&self, key: &str) -> Result<()> {
        self.remove_values([key])
    }

    pub fn remove_values<I, K>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut bucket = self.bucket()?;
        for key in keys {
            bucket.remove(key.as_ref());
        }

        self.store.remove_item(&self.namespace)?;
        self.persist(&bucket)
    }

    fn persist(&self, bucket: &Bucket) -> Result<()> {
        let serialized = serde_json::to_string(bucket)?;
        tracing::debug!(
            "Writing {} keys ({} bytes) to namespace '{}'",
            bucket.len(),
            serialized.len(),
            self.namespace
        );
        self.store.set_item(&self.namespace, &serialized)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
