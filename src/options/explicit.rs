//! Three-valued optional: no opinion, explicitly cleared, or a value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A configuration value that keeps "not mentioned" apart from "cleared".
///
/// Deserialized from JSON, a missing key is [`Explicit::Unset`] (with
/// `#[serde(default)]`) and `null` is [`Explicit::Cleared`]. Both project to
/// absence once layering is done; only [`Explicit::Value`] survives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Explicit<T> {
    #[default]
    Unset,
    Cleared,
    Value(T),
}

impl<T> Explicit<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset | Self::Cleared => None,
        }
    }

    /// Stack `self` on top of a lower-precedence layer.
    ///
    /// Anything other than `Unset` wins, including `Cleared`.
    pub fn layer_over(self, lower: Self) -> Self {
        match self {
            Self::Unset => lower,
            decided => decided,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Explicit<U> {
        match self {
            Self::Unset => Explicit::Unset,
            Self::Cleared => Explicit::Cleared,
            Self::Value(value) => Explicit::Value(f(value)),
        }
    }

    /// Project to presence: `Unset` and `Cleared` both become `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset | Self::Cleared => None,
        }
    }
}

impl<T> From<Option<T>> for Explicit<T> {
    /// `None` carries no opinion.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Unset,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Explicit<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Value(value),
            None => Self::Cleared,
        })
    }
}

impl<T: Serialize> Serialize for Explicit<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_value().serialize(serializer)
    }
}
