//! Custom templates: named snapshots of [`ExportSettings`], bounded to five entries
//! and persisted through a [`TemplateRepository`].
//!
//! ### Eviction
//! - `save_template` at the cap evicts the oldest entry (FIFO), it never rejects.
//! - `duplicate_template` at the cap fails instead of evicting.
//! - `import_templates` merges, then keeps only the newest five overall, which can
//!   drop existing templates as well as imported ones.
//!
//! Storage failures never abort an operation: the in-memory list is updated and the
//! failure is parked in a one-shot error slot until the caller clears it.

use crate::error::StoreError;
use crate::ids::generate_id;
use crate::settings::ExportSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key (and file stem) of the template list.
pub const TEMPLATE_STORAGE_KEY: &str = "image-export-custom-templates";
/// Maximum number of stored templates.
pub const MAX_TEMPLATES: usize = 5;
/// Exchange-file envelope version accepted by `import_templates`.
pub const EXPORT_VERSION: u64 = 1;
/// Exchange-file envelope type tag.
pub const EXPORT_TYPE: &str = "image-studio-templates";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTemplate {
    pub id: String,
    pub name: String,
    pub settings: ExportSettings,
    /// Unix milliseconds.
    pub created_at: i64,
}

/// Outcome of an import. Format problems are reported here rather than as `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub success: usize,
    pub failed: usize,
    pub error: Option<String>,
}

impl ImportResult {
    fn rejected(msg: &str) -> Self {
        Self {
            success: 0,
            failed: 0,
            error: Some(msg.to_string()),
        }
    }
}

/// Where the template list lives.
pub trait TemplateRepository {
    fn load(&self) -> Result<Vec<CustomTemplate>, StoreError>;
    fn save(&mut self, templates: &[CustomTemplate]) -> Result<(), StoreError>;
}

/// Template list stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<data dir>/chart-studio/image-export-custom-templates.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| {
            d.join("chart-studio")
                .join(format!("{TEMPLATE_STORAGE_KEY}.json"))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<CustomTemplate>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Read(e)),
        };
        // A corrupt file behaves like an empty store.
        match serde_json::from_str(&text) {
            Ok(list) => Ok(list),
            Err(e) => {
                log::warn!("ignoring unreadable template file {}: {e}", self.path.display());
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, templates: &[CustomTemplate]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(StoreError::Write)?;
        }
        let json = serde_json::to_string_pretty(templates)?;
        fs::write(&self.path, json).map_err(StoreError::Write)
    }
}

/// In-memory repository. `failing()` simulates a full or unavailable backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    pub stored: Vec<CustomTemplate>,
    fail_writes: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            stored: Vec::new(),
            fail_writes: true,
        }
    }
}

impl TemplateRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<CustomTemplate>, StoreError> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, templates: &[CustomTemplate]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write(std::io::Error::other("quota exceeded")));
        }
        self.stored = templates.to_vec();
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    version: u64,
    #[serde(rename = "type")]
    kind: &'a str,
    exported_at: String,
    templates: Vec<ExportedTemplate<'a>>,
}

#[derive(Serialize)]
struct ExportedTemplate<'a> {
    name: &'a str,
    settings: &'a ExportSettings,
}

/// The bounded template list plus its repository.
#[derive(Debug)]
pub struct TemplateStore<R: TemplateRepository> {
    repo: R,
    templates: Vec<CustomTemplate>,
    error: Option<StoreError>,
}

impl<R: TemplateRepository> TemplateStore<R> {
    /// Load templates from `repo`. A load failure leaves the store empty with `error` set.
    pub fn new(repo: R) -> Self {
        let (templates, error) = match repo.load() {
            Ok(mut list) => {
                if list.len() > MAX_TEMPLATES {
                    list.drain(..list.len() - MAX_TEMPLATES);
                }
                (list, None)
            }
            Err(e) => {
                log::warn!("{e}");
                (Vec::new(), Some(e))
            }
        };
        Self {
            repo,
            templates,
            error,
        }
    }

    pub fn templates(&self) -> &[CustomTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&CustomTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Find by exact name, falling back to id.
    pub fn find(&self, name_or_id: &str) -> Option<&CustomTemplate> {
        self.templates
            .iter()
            .find(|t| t.name == name_or_id)
            .or_else(|| self.get(name_or_id))
    }

    pub fn is_full(&self) -> bool {
        self.templates.len() >= MAX_TEMPLATES
    }

    /// Last persistence failure, if any.
    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn persist(&mut self) {
        if let Err(e) = self.repo.save(&self.templates) {
            log::warn!("{e}");
            self.error = Some(e);
        }
    }

    /// Save a snapshot of `settings`. At the cap the oldest template is evicted first.
    pub fn save_template(&mut self, name: &str, settings: &ExportSettings) -> CustomTemplate {
        let name = match name.trim() {
            "" => format!("Template {}", self.templates.len() + 1),
            n => n.to_string(),
        };
        let template = CustomTemplate {
            id: generate_id("template"),
            name,
            settings: settings.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        while self.templates.len() >= MAX_TEMPLATES {
            let evicted = self.templates.remove(0);
            log::info!("template limit reached, evicting '{}'", evicted.name);
        }
        self.templates.push(template.clone());
        self.persist();
        template
    }

    /// Copy a template as `"{name} (copy)"`. `None` if `id` is unknown or the store is full.
    pub fn duplicate_template(&mut self, id: &str) -> Option<CustomTemplate> {
        if self.is_full() {
            return None;
        }
        let source = self.get(id)?;
        let copy = CustomTemplate {
            id: generate_id("template"),
            name: format!("{} (copy)", source.name),
            settings: source.settings.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        self.templates.push(copy.clone());
        self.persist();
        Some(copy)
    }

    pub fn delete_template(&mut self, id: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        let removed = self.templates.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Rename; blank names are ignored.
    pub fn rename_template(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.templates.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.name = name.to_string();
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Serialize templates (all, or the listed ids) into the exchange envelope.
    pub fn export_templates(&self, ids: Option<&[String]>) -> serde_json::Result<String> {
        let selected: Vec<ExportedTemplate<'_>> = self
            .templates
            .iter()
            .filter(|t| ids.is_none_or(|ids| ids.contains(&t.id)))
            .map(|t| ExportedTemplate {
                name: &t.name,
                settings: &t.settings,
            })
            .collect();
        let envelope = ExportEnvelope {
            version: EXPORT_VERSION,
            kind: EXPORT_TYPE,
            exported_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            templates: selected,
        };
        serde_json::to_string_pretty(&envelope)
    }

    pub fn export_template(&self, id: &str) -> Option<serde_json::Result<String>> {
        self.get(id)?;
        Some(self.export_templates(Some(&[id.to_string()])))
    }

    /// Merge templates from an exchange file.
    pub fn import_templates(&mut self, json: &str) -> ImportResult {
        let Ok(root) = serde_json::from_str::<Value>(json) else {
            return ImportResult::rejected("Invalid JSON file");
        };
        if root.get("version").and_then(Value::as_u64) != Some(EXPORT_VERSION) {
            return ImportResult::rejected("File version not supported");
        }
        if root.get("type").and_then(Value::as_str) != Some(EXPORT_TYPE) {
            return ImportResult::rejected("Invalid file type");
        }
        let Some(entries) = root.get("templates").and_then(Value::as_array) else {
            return ImportResult::rejected("Invalid file format");
        };

        let mut taken: HashSet<String> = self.templates.iter().map(|t| t.name.clone()).collect();
        let mut result = ImportResult::default();
        let mut imported = Vec::new();
        for entry in entries {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|n| !n.is_empty());
            let settings = entry
                .get("settings")
                .and_then(|s| serde_json::from_value::<ExportSettings>(s.clone()).ok());
            let (Some(name), Some(settings)) = (name, settings) else {
                result.failed += 1;
                continue;
            };
            let name = unique_import_name(name, &taken);
            taken.insert(name.clone());
            imported.push(CustomTemplate {
                id: generate_id("template"),
                name,
                settings,
                created_at: chrono::Utc::now().timestamp_millis(),
            });
            result.success += 1;
        }

        if !imported.is_empty() {
            self.templates.extend(imported);
            if self.templates.len() > MAX_TEMPLATES {
                let excess = self.templates.len() - MAX_TEMPLATES;
                self.templates.drain(..excess);
            }
            self.persist();
        }
        log::info!(
            "imported {} template(s), {} failed",
            result.success,
            result.failed
        );
        result
    }
}

/// `name`, `name (imported)`, `name (imported 2)`, ... whichever is free first.
fn unique_import_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let first = format!("{name} (imported)");
    if !taken.contains(&first) {
        return first;
    }
    (2..)
        .map(|n| format!("{name} (imported {n})"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(first)
}

/// Suggested file name for an exported template bundle.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("image-studio-templates-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_names_count_up() {
        let mut taken = HashSet::new();
        assert_eq!(unique_import_name("A", &taken), "A");
        taken.insert("A".to_string());
        assert_eq!(unique_import_name("A", &taken), "A (imported)");
        taken.insert("A (imported)".to_string());
        assert_eq!(unique_import_name("A", &taken), "A (imported 2)");
    }
}
