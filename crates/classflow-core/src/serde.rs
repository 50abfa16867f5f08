use serde::{Deserialize, Deserializer};

/// Deserializes a field that must tell "absent" apart from `null`.
///
/// Use together with `#[serde(default)]`: a missing key stays `None`, an
/// explicit `null` becomes `Some(None)` and a value becomes `Some(Some(v))`.
/// Partial updates rely on this to clear optional columns.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
