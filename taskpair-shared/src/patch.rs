/// Tri-state patch type for partial updates
///
/// JSON partial updates need to distinguish three cases per field:
/// the key is absent (leave the column alone), the key is `null` (clear
/// the column), or the key carries a value (set the column). A plain
/// `Option<T>` collapses the first two, so update handlers use
/// `Patch<T>` instead.
///
/// # Example
///
/// ```
/// use taskpair_shared::patch::Patch;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct UpdateBody {
///     #[serde(default)]
///     description: Patch<String>,
/// }
///
/// let absent: UpdateBody = serde_json::from_str("{}").unwrap();
/// assert!(matches!(absent.description, Patch::Unset));
///
/// let cleared: UpdateBody = serde_json::from_str(r#"{"description":null}"#).unwrap();
/// assert!(matches!(cleared.description, Patch::Null));
///
/// let set: UpdateBody = serde_json::from_str(r#"{"description":"milk"}"#).unwrap();
/// assert!(matches!(set.description, Patch::Value(_)));
/// ```
use serde::{Deserialize, Deserializer};

/// A field in a partial update: untouched, cleared, or replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field was not present in the request; leave the stored value alone.
    #[default]
    Unset,

    /// Field was explicitly `null`; clear the stored value.
    Null,

    /// Field carries a replacement value.
    Value(T),
}

impl<T> Patch<T> {
    /// Returns true if the field was present in the request (null or value).
    pub fn is_set(&self) -> bool {
        !matches!(self, Patch::Unset)
    }

    /// Returns the replacement value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the replacement value, preserving `Unset`/`Null`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }
}

// Deserializes a *present* key: `null` becomes `Null`, anything else `Value`.
// `Unset` only arises through `#[serde(default)]` when the key is absent.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}
