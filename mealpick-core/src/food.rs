//! Catalog entries: food categories grouped by cuisine.
//!
//! A [`FoodItem`] is the unit being recommended. Its [`FoodId`] is opaque
//! and stable for the lifetime of the item, while the `category` name is
//! unique across the catalog and doubles as the natural key used when a
//! never-seen category is created lazily.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// Opaque, stable identifier of a catalog entry.
///
/// # Examples
/// ```
/// use mealpick_core::FoodId;
///
/// let id = FoodId::new("F1");
/// assert_eq!(id.as_str(), "F1");
/// assert_eq!(id.to_string(), "F1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FoodId(String);

impl FoodId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FoodId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Broad cuisine a food category belongs to.
///
/// # Examples
/// ```
/// use mealpick_core::Cuisine;
///
/// assert_eq!(Cuisine::Japanese.as_str(), "japanese");
/// assert_eq!("Korean".parse::<Cuisine>(), Ok(Cuisine::Korean));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Cuisine {
    /// Korean dishes.
    Korean,
    /// Chinese dishes.
    Chinese,
    /// Japanese dishes.
    Japanese,
    /// Western dishes.
    Western,
    /// Other Asian dishes.
    Asian,
    /// Snacks and street food.
    Snack,
}

impl Cuisine {
    /// Every cuisine, in catalog display order.
    pub const ALL: [Self; 6] = [
        Self::Korean,
        Self::Chinese,
        Self::Japanese,
        Self::Western,
        Self::Asian,
        Self::Snack,
    ];

    /// Return the cuisine as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Korean => "korean",
            Self::Chinese => "chinese",
            Self::Japanese => "japanese",
            Self::Western => "western",
            Self::Asian => "asian",
            Self::Snack => "snack",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised cuisine name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cuisine '{name}'")]
pub struct UnknownCuisine {
    /// The rejected input.
    pub name: String,
}

impl FromStr for Cuisine {
    type Err = UnknownCuisine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|cuisine| cuisine.as_str() == lowered)
            .ok_or_else(|| UnknownCuisine { name: s.to_owned() })
    }
}

/// A recommendable food category.
///
/// # Examples
/// ```
/// use mealpick_core::{Cuisine, FoodId, FoodItem};
///
/// let ramen = FoodItem::new(FoodId::new("F1"), Cuisine::Japanese, "Ramen");
/// assert_eq!(ramen.category, "Ramen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodItem {
    /// Stable identifier.
    pub id: FoodId,
    /// Cuisine grouping.
    pub cuisine: Cuisine,
    /// Unique human-readable category name.
    pub category: String,
}

impl FoodItem {
    /// Construct a catalog entry.
    pub fn new(id: FoodId, cuisine: Cuisine, category: impl Into<String>) -> Self {
        Self {
            id,
            cuisine,
            category: category.into(),
        }
    }
}
