// Import categories from exchange files into the store

use crate::categories;
use crate::error::{Result, RollError};
use crate::format::{self, Format};
use crate::store::KeyValue;
use std::fs;
use std::path::Path;
use tracing::info;

/// Outcome of an import, for the caller to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    /// Number of categories appended
    pub count: usize,
    /// Name of the first imported category, if any
    pub first_name: Option<String>,
}

impl ImportResult {
    /// Short user-facing summary
    pub fn message(&self) -> String {
        match (self.count, &self.first_name) {
            (0, _) | (_, None) => "Nothing to import".to_string(),
            (1, Some(name)) => format!("Imported category: {}", name),
            _ => "Imported multiple categories".to_string(),
        }
    }
}

/// Read a file, detect its format from the extension, and append its categories
pub fn import_file<S, P>(kv: &mut S, path: P) -> Result<ImportResult>
where
    S: KeyValue + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = Format::from_path(path)?;

    let text = fs::read_to_string(path).map_err(|source| RollError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    info!(file = ?path, %format, "Importing categories");
    import_text(kv, format, &text)
}

/// Decode `text` and append the result to the stored list.
///
/// Decoding happens before the store is touched, so a bad file never changes it.
pub fn import_text<S: KeyValue + ?Sized>(kv: &mut S, format: Format, text: &str) -> Result<ImportResult> {
    let decoded = format::decode(text, format)?;

    let result = ImportResult {
        count: decoded.len(),
        first_name: decoded.first().map(|c| c.name.clone()),
    };

    if decoded.is_empty() {
        return Ok(result);
    }

    let total = categories::append(kv, decoded)?;
    info!(imported = result.count, total, "Import complete");

    Ok(result)
}
