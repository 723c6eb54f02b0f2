//! Catalog seeding.
//!
//! Seeding goes through [`CatalogStore::get_or_create`], so running it
//! against an already-populated store is harmless.

use log::debug;

use crate::{CatalogStore, Cuisine, FoodItem, StoreError};

const DEFAULT_CATALOG: &[(Cuisine, &str)] = &[
    (Cuisine::Korean, "Bibimbap"),
    (Cuisine::Korean, "Kimchi Stew"),
    (Cuisine::Korean, "Bulgogi"),
    (Cuisine::Korean, "Tteokbokki"),
    (Cuisine::Chinese, "Jjajangmyeon"),
    (Cuisine::Chinese, "Jjamppong"),
    (Cuisine::Chinese, "Sweet and Sour Pork"),
    (Cuisine::Chinese, "Mapo Tofu"),
    (Cuisine::Japanese, "Ramen"),
    (Cuisine::Japanese, "Sushi"),
    (Cuisine::Japanese, "Pork Cutlet"),
    (Cuisine::Japanese, "Udon"),
    (Cuisine::Western, "Pizza"),
    (Cuisine::Western, "Burger"),
    (Cuisine::Western, "Pasta"),
    (Cuisine::Western, "Steak"),
    (Cuisine::Asian, "Pho"),
    (Cuisine::Asian, "Pad Thai"),
    (Cuisine::Asian, "Curry"),
    (Cuisine::Snack, "Gimbap"),
    (Cuisine::Snack, "Sandwich"),
];

/// Starter `(cuisine, category)` pairs for a fresh catalog.
///
/// # Examples
/// ```
/// use mealpick_core::default_catalog;
///
/// assert!(default_catalog().iter().any(|(_, category)| *category == "Ramen"));
/// ```
#[must_use]
pub const fn default_catalog() -> &'static [(Cuisine, &'static str)] {
    DEFAULT_CATALOG
}

/// Ensure every `(cuisine, category)` pair exists in `store`.
///
/// Returns the stored items in the order given, whether they were created
/// now or already present.
///
/// # Errors
/// Propagates the first [`StoreError`] raised by the store.
pub fn seed_catalog<C>(store: &C, entries: &[(Cuisine, &str)]) -> Result<Vec<FoodItem>, StoreError>
where
    C: CatalogStore + ?Sized,
{
    let items = entries
        .iter()
        .map(|(cuisine, category)| store.get_or_create(*cuisine, category))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("seeded catalog with {} entries", items.len());
    Ok(items)
}
