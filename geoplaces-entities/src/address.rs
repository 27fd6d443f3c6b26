use serde::{Deserialize, Serialize};

/// A tagged fragment of a formatted address as delivered
/// by the map data provider.
///
/// Components are compared as full records when composite
/// component lists are deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}
