use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Serialization policy for record types: which serializer is forced, whether the generic
/// fallback is allowed, and which types and serializers have been registered up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    pub force_kryo: bool,
    pub generic_types_disabled: bool,
    pub force_avro: bool,
    /// Type name -> default generic serializer type name.
    pub default_kryo_serializer_classes: BTreeMap<String, String>,
    pub registered_kryo_types: BTreeSet<String>,
    pub registered_pojo_types: BTreeSet<String>,
}

impl SerializerConfig {
    pub fn add_default_kryo_serializer(&mut self, type_name: impl Into<String>, serializer_name: impl Into<String>) {
        self.default_kryo_serializer_classes
            .insert(type_name.into(), serializer_name.into());
    }

    pub fn register_kryo_type(&mut self, type_name: impl Into<String>) {
        self.registered_kryo_types.insert(type_name.into());
    }

    pub fn register_pojo_type(&mut self, type_name: impl Into<String>) {
        self.registered_pojo_types.insert(type_name.into());
    }
}
