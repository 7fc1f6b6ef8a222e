use tonic::metadata::{MetadataKey, MetadataMap, MetadataValue};

use crate::GrpcError;

/// User supplied metadata attached to a single call.
///
/// Keys keep their insertion order. Inserting an existing key replaces its
/// value in place. Nothing is validated until the metadata is applied to a
/// request, so a bad key or value fails the call before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    entries: Vec<(String, String)>,
}

impl CallMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn apply(&self, map: &mut MetadataMap) -> Result<(), GrpcError> {
        for (key, value) in &self.entries {
            // binary (`-bin`) keys are rejected here
            let parsed = MetadataKey::from_bytes(key.as_bytes())
                .map_err(|_| GrpcError::MetadataKey(key.clone()))?;
            map.append(parsed, MetadataValue::try_from(value.as_str())?);
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for CallMetadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = CallMetadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}
