use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` the same as an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    <Option<T> as Deserialize>::deserialize(deserializer)
        .map(Option::unwrap_or_default)
}
