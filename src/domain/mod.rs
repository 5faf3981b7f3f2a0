//! Domain identifiers for the catalog.
//!
//! Newtype wrappers keep movie and genre ids from being mixed up at call
//! sites that take several integer ids (listing by genre, replacing links).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Movie row.
///
/// The value `0` is reserved for "not yet persisted"; the store assigns the
/// real id on insert.
///
/// # Examples
///
/// ```rust
/// use marquee::domain::MovieId;
///
/// let id = MovieId::new(42);
/// assert_eq!(id.value(), 42);
/// assert!(!id.is_new());
/// assert!(MovieId::default().is_new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// True for ids that have not been assigned by the store.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.0 <= 0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Unique identifier for a Genre row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GenreId(i32);

impl GenreId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for GenreId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_id_conversions() {
        let id = MovieId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(MovieId::from(42), id);
    }

    #[test]
    fn movie_id_new_detection() {
        assert!(MovieId::new(0).is_new());
        assert!(MovieId::new(-1).is_new());
        assert!(!MovieId::new(1).is_new());
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        assert_eq!(serde_json::to_string(&MovieId::new(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&GenreId::new(3)).unwrap(), "3");

        let id: GenreId = serde_json::from_str("5").unwrap();
        assert_eq!(id.value(), 5);
    }
}
