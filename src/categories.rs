// The persisted category list, always canonical JSON under one key

use crate::error::{Result, RollError};
use crate::format::Format;
use crate::models::{Category, KeyedCategory};
use crate::store::KeyValue;
use tracing::{debug, info};

/// Store key holding the JSON array of every category
pub const CATEGORIES_KEY: &str = "categories";

/// Read the full category list. A missing key is an empty list.
pub fn load<S: KeyValue + ?Sized>(kv: &S) -> Result<Vec<Category>> {
    let Some(json) = kv.get(CATEGORIES_KEY)? else {
        return Ok(Vec::new());
    };

    serde_json::from_str(&json).map_err(|e| RollError::Decode {
        format: Format::Json,
        message: format!("stored categories are corrupt: {}", e),
    })
}

/// Read the list and number each entry by position for display
pub fn load_keyed<S: KeyValue + ?Sized>(kv: &S) -> Result<Vec<KeyedCategory>> {
    Ok(load(kv)?
        .into_iter()
        .enumerate()
        .map(|(key, category)| KeyedCategory { key, category })
        .collect())
}

/// Replace the whole list
pub fn save<S: KeyValue + ?Sized>(kv: &mut S, categories: &[Category]) -> Result<()> {
    let json = serde_json::to_string(categories).map_err(|e| RollError::Encode {
        format: Format::Json,
        message: e.to_string(),
    })?;
    kv.set(CATEGORIES_KEY, &json)?;

    debug!(count = categories.len(), "Saved categories");
    Ok(())
}

/// Push `incoming` to the end of the stored list. Names are not de-duplicated.
pub fn append<S: KeyValue + ?Sized>(kv: &mut S, incoming: Vec<Category>) -> Result<usize> {
    let mut categories = load(&*kv)?;
    categories.extend(incoming);
    save(kv, &categories)?;
    Ok(categories.len())
}

/// First category whose name matches exactly
pub fn find<S: KeyValue + ?Sized>(kv: &S, name: &str) -> Result<Option<Category>> {
    Ok(load(kv)?.into_iter().find(|c| c.name == name))
}

/// Delete every category with this name, returning how many were removed
pub fn remove_named<S: KeyValue + ?Sized>(kv: &mut S, name: &str) -> Result<usize> {
    let mut categories = load(&*kv)?;
    let before = categories.len();
    categories.retain(|c| c.name != name);

    let removed = before - categories.len();
    if removed > 0 {
        save(kv, &categories)?;
    }
    Ok(removed)
}

/// Drop the stored list entirely
pub fn clear<S: KeyValue + ?Sized>(kv: &mut S) -> Result<()> {
    kv.remove(CATEGORIES_KEY)?;
    info!("Cleared all categories");
    Ok(())
}

/// Replace everything with the default `General` category
pub fn reset<S: KeyValue + ?Sized>(kv: &mut S) -> Result<()> {
    save(kv, &[Category::general()])?;
    info!("Reset categories to defaults");
    Ok(())
}
