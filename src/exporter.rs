// Export categories to exchange files

use crate::categories;
use crate::error::{Result, RollError};
use crate::format::{self, Format};
use crate::models::Category;
use crate::store::KeyValue;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Answer to a storage-write capability request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Source of the storage-write capability, usually the host platform
pub trait WritePermission {
    fn request_write_permission(&self) -> Permission;
}

impl WritePermission for Permission {
    fn request_write_permission(&self) -> Permission {
        *self
    }
}

/// Where an export landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub path: PathBuf,
}

impl ExportResult {
    pub fn message(&self) -> String {
        format!("Saved to {}", self.path.display())
    }
}

/// Write `categories` into `dir` as one file in `format`.
///
/// One category is named after itself; several get a timestamped name.
/// Several categories can only be exported as JSON.
pub fn export<W: WritePermission + ?Sized>(
    categories: &[Category],
    format: Format,
    dir: &Path,
    permission: &W,
) -> Result<ExportResult> {
    if categories.is_empty() {
        return Err(RollError::NothingToExport);
    }
    if categories.len() > 1 && !format.supports_many() {
        return Err(RollError::MultiDocumentExport {
            format,
            count: categories.len(),
        });
    }

    if permission.request_write_permission() != Permission::Granted {
        warn!(dir = ?dir, "Storage write permission denied");
        return Err(RollError::PermissionDenied);
    }

    let text = format::encode(categories, format)?;
    let path = dir.join(format!("{}.{}", file_stem(categories), format.extension()));

    write_atomic(&path, &text)?;
    info!(file = ?path, count = categories.len(), %format, "Exported categories");

    Ok(ExportResult { path })
}

/// Export the stored categories with the given names, in the order requested.
///
/// Names may repeat in the store; each name picks its first match, like
/// `categories::find`.
pub fn export_named<S, W>(
    kv: &S,
    names: &[String],
    format: Format,
    dir: &Path,
    permission: &W,
) -> Result<ExportResult>
where
    S: KeyValue + ?Sized,
    W: WritePermission + ?Sized,
{
    let stored = categories::load(kv)?;

    let mut selected: Vec<Category> = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            continue;
        }
        let category = stored
            .iter()
            .find(|c| &c.name == name)
            .ok_or_else(|| RollError::CategoryNotFound(name.clone()))?;
        selected.push(category.clone());
    }

    export(&selected, format, dir, permission)
}

/// Export the whole stored list
pub fn export_all<S, W>(kv: &S, format: Format, dir: &Path, permission: &W) -> Result<ExportResult>
where
    S: KeyValue + ?Sized,
    W: WritePermission + ?Sized,
{
    let stored = categories::load(kv)?;
    export(&stored, format, dir, permission)
}

fn file_stem(categories: &[Category]) -> String {
    match categories {
        [single] => sanitize_name(&single.name),
        _ => {
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
            let id = Uuid::now_v7().simple().to_string();
            // v7 leads with the timestamp, the tail is random
            format!("categories-{}-{}", stamp, &id[24..])
        }
    }
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => "category".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Write through a locked temp file and rename, so readers never see a partial file
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let write_err = |source: std::io::Error| RollError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = (|| -> std::io::Result<()> {
        // Truncate only once the lock is held
        let mut file = OpenOptions::new().write(true).create(true).truncate(false).open(&tmp_path)?;
        file.lock_exclusive()?;
        file.set_len(0)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        debug!(file = ?tmp_path, error = ?e, "Removing temp file after failed write");
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeBucket;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    fn chores() -> Category {
        Category::new("Chores", "House stuff").with_task("Dishes", TimeBucket::UpToTen)
    }

    fn hobbies() -> Category {
        Category::new("Hobbies", "Fun").with_task("Guitar", TimeBucket::HalfHourToHour)
    }

    #[test]
    fn test_single_export_named_after_category() {
        let temp = TempDir::new().unwrap();

        for format in [Format::Json, Format::Toml, Format::Yaml] {
            let result = export(&[chores()], format, temp.path(), &Permission::Granted).unwrap();
            assert_eq!(result.path, temp.path().join(format!("Chores.{}", format.extension())));

            let text = fs::read_to_string(&result.path).unwrap();
            assert_eq!(format::decode(&text, format).unwrap(), vec![chores()]);
        }
    }

    #[test]
    fn test_multi_export_uses_unique_timestamped_names() {
        let temp = TempDir::new().unwrap();
        let both = [chores(), hobbies()];

        let first = export(&both, Format::Json, temp.path(), &Permission::Granted).unwrap();
        let second = export(&both, Format::Json, temp.path(), &Permission::Granted).unwrap();
        assert_ne!(first.path, second.path);

        let name = first.path.file_name().unwrap().to_string_lossy().into_owned();
        let year = chrono::Local::now().format("%Y").to_string();
        assert!(name.starts_with(&format!("categories-{}", year)));
        assert!(name.ends_with(".json"));

        let text = fs::read_to_string(&first.path).unwrap();
        assert_eq!(format::decode(&text, Format::Json).unwrap(), both.to_vec());
    }

    #[test]
    fn test_multi_export_single_document_formats_refused() {
        let temp = TempDir::new().unwrap();

        for format in [Format::Toml, Format::Yaml] {
            let err = export(&[chores(), hobbies()], format, temp.path(), &Permission::Granted).unwrap_err();
            assert!(matches!(err, RollError::MultiDocumentExport { count: 2, .. }));
        }
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_permission_denied_writes_nothing() {
        let temp = TempDir::new().unwrap();

        let err = export(&[chores()], Format::Json, temp.path(), &Permission::Denied).unwrap_err();
        assert!(matches!(err, RollError::PermissionDenied));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_export_refused() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            export(&[], Format::Json, temp.path(), &Permission::Granted),
            Err(RollError::NothingToExport)
        ));
    }

    #[test]
    fn test_write_failure_is_write_error() {
        let temp = TempDir::new().unwrap();
        // A regular file where the directory should be
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = export(&[chores()], Format::Json, &blocker, &Permission::Granted).unwrap_err();
        assert!(matches!(err, RollError::Write { .. }));
    }

    #[test]
    fn test_creates_missing_destination() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("exports/nested");

        let result = export(&[chores()], Format::Yaml, &dir, &Permission::Granted).unwrap();
        assert!(result.path.exists());
        assert_eq!(result.message(), format!("Saved to {}", result.path.display()));

        // No temp files left behind
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Work/Home"), "Work_Home");
        assert_eq!(sanitize_name(".."), "category");
        assert_eq!(sanitize_name("  "), "category");
        assert_eq!(sanitize_name("Plain"), "Plain");
    }

    #[test]
    fn test_export_named_and_all() {
        let temp = TempDir::new().unwrap();
        let mut kv = MemoryStore::new();
        categories::save(&mut kv, &[chores(), hobbies()]).unwrap();

        let one = export_named(&kv, &["Hobbies".to_string()], Format::Toml, temp.path(), &Permission::Granted)
            .unwrap();
        assert!(one.path.ends_with("Hobbies.toml"));

        let missing = export_named(&kv, &["Nope".to_string()], Format::Json, temp.path(), &Permission::Granted);
        assert!(matches!(missing, Err(RollError::CategoryNotFound(_))));

        let all = export_all(&kv, Format::Json, temp.path(), &Permission::Granted).unwrap();
        let text = fs::read_to_string(&all.path).unwrap();
        assert_eq!(format::decode(&text, Format::Json).unwrap().len(), 2);
    }

    #[test]
    fn test_export_named_duplicate_name_writes_one_file() {
        let temp = TempDir::new().unwrap();
        let mut kv = MemoryStore::new();
        crate::importer::import_text(&mut kv, Format::Toml, "name = \"Chores\"\ndescription = \"first\"\n").unwrap();
        crate::importer::import_text(&mut kv, Format::Toml, "name = \"Chores\"\ndescription = \"second\"\n").unwrap();
        let names = vec!["Chores".to_string()];

        for format in [Format::Toml, Format::Json] {
            let result = export_named(&kv, &names, format, temp.path(), &Permission::Granted).unwrap();
            assert_eq!(result.path, temp.path().join(format!("Chores.{}", format.extension())));

            let text = fs::read_to_string(&result.path).unwrap();
            let exported = format::decode(&text, format).unwrap();
            assert_eq!(exported.len(), 1);
            assert_eq!(exported[0].description, "first");
        }
    }

    #[test]
    fn test_export_named_keeps_request_order() {
        let temp = TempDir::new().unwrap();
        let mut kv = MemoryStore::new();
        categories::save(&mut kv, &[chores(), hobbies()]).unwrap();
        let names = vec!["Hobbies".to_string(), "Chores".to_string(), "Hobbies".to_string()];

        let result = export_named(&kv, &names, Format::Json, temp.path(), &Permission::Granted).unwrap();
        let text = fs::read_to_string(&result.path).unwrap();
        assert_eq!(format::decode(&text, Format::Json).unwrap(), vec![hobbies(), chores()]);
    }

    #[test]
    fn test_overwrites_existing_export() {
        let temp = TempDir::new().unwrap();
        let long = chores().with_task("A much longer task name than before", TimeBucket::OverHour);

        export(&[long], Format::Json, temp.path(), &Permission::Granted).unwrap();
        let result = export(&[chores()], Format::Json, temp.path(), &Permission::Granted).unwrap();

        let text = fs::read_to_string(&result.path).unwrap();
        assert_eq!(format::decode(&text, Format::Json).unwrap(), vec![chores()]);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
