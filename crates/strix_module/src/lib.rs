//! strix_module: source-text module records.
//!
//! While a module file is parsed, every import and export declaration
//! registers an entry here. The record mirrors the shape of ECMA-262
//! Source Text Module Records: regular and namespace import entries,
//! plus local, indirect, and star export entries, all keyed against a
//! deduplicated module-request table.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use strix_core::text::TextRange;

/// Export name used for `export default`.
pub const DEFAULT_EXTERNAL_NAME: &str = "default";
/// Local slot name used for anonymous default exports.
pub const DEFAULT_LOCAL_NAME: &str = "*default*";
/// Prefix of synthetic namespace names created for `export * as ns`.
/// The leading `=` keeps them outside the identifier grammar.
pub const ANONY_NAMESPACE_NAME: &str = "=ens";

/// Index into the module-request table.
pub type ModuleRequestIdx = usize;

/// One imported binding. `import_name` is `None` for namespace imports
/// (`import * as ns`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEntry {
    pub local_name: String,
    pub import_name: Option<String>,
    pub module_request: ModuleRequestIdx,
    #[serde(skip)]
    pub range: TextRange,
}

/// One exported binding.
///
/// - local export: `export_name` + `local_name` set.
/// - indirect export: `export_name` + `import_name` + `module_request`.
/// - star export: only `module_request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub export_name: Option<String>,
    pub local_name: Option<String>,
    pub import_name: Option<String>,
    pub module_request: Option<ModuleRequestIdx>,
    #[serde(skip)]
    pub range: TextRange,
}

impl ExportEntry {
    pub fn local(export_name: &str, local_name: &str, range: TextRange) -> Self {
        ExportEntry {
            export_name: Some(export_name.to_owned()),
            local_name: Some(local_name.to_owned()),
            import_name: None,
            module_request: None,
            range,
        }
    }

    pub fn indirect(
        export_name: &str,
        import_name: &str,
        module_request: ModuleRequestIdx,
        range: TextRange,
    ) -> Self {
        ExportEntry {
            export_name: Some(export_name.to_owned()),
            local_name: None,
            import_name: Some(import_name.to_owned()),
            module_request: Some(module_request),
            range,
        }
    }

    pub fn star(module_request: ModuleRequestIdx, range: TextRange) -> Self {
        ExportEntry {
            export_name: None,
            local_name: None,
            import_name: None,
            module_request: Some(module_request),
            range,
        }
    }
}

/// Import/export ledger of one module file.
#[derive(Debug, Default, Serialize)]
pub struct SourceTextModuleRecord {
    module_requests: Vec<String>,
    #[serde(skip)]
    module_request_map: FxHashMap<String, ModuleRequestIdx>,
    regular_import_entries: Vec<ImportEntry>,
    namespace_import_entries: Vec<ImportEntry>,
    local_export_entries: Vec<ExportEntry>,
    indirect_export_entries: Vec<ExportEntry>,
    star_export_entries: Vec<ExportEntry>,
    #[serde(skip)]
    export_names: FxHashSet<String>,
    #[serde(skip)]
    namespace_export_count: u32,
}

impl SourceTextModuleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module specifier, returning its index. Repeated
    /// requests for the same specifier share one slot.
    pub fn add_module_request(&mut self, specifier: &str) -> ModuleRequestIdx {
        if let Some(&idx) = self.module_request_map.get(specifier) {
            return idx;
        }
        let idx = self.module_requests.len();
        self.module_requests.push(specifier.to_owned());
        self.module_request_map.insert(specifier.to_owned(), idx);
        idx
    }

    pub fn add_import_entry(&mut self, entry: ImportEntry) {
        self.regular_import_entries.push(entry);
    }

    pub fn add_star_import_entry(&mut self, entry: ImportEntry) {
        self.namespace_import_entries.push(entry);
    }

    /// Returns `false` when the export name is already taken.
    #[must_use]
    pub fn add_local_export_entry(&mut self, entry: ExportEntry) -> bool {
        if !self.claim_export_name(&entry) {
            return false;
        }
        self.local_export_entries.push(entry);
        true
    }

    /// Returns `false` when the export name is already taken.
    #[must_use]
    pub fn add_indirect_export_entry(&mut self, entry: ExportEntry) -> bool {
        if !self.claim_export_name(&entry) {
            return false;
        }
        self.indirect_export_entries.push(entry);
        true
    }

    /// `export * from "m"` re-exports have no name of their own and
    /// never conflict at parse time.
    pub fn add_star_export_entry(&mut self, entry: ExportEntry) {
        self.star_export_entries.push(entry);
    }

    fn claim_export_name(&mut self, entry: &ExportEntry) -> bool {
        let name = entry
            .export_name
            .as_deref()
            .unwrap_or(DEFAULT_EXTERNAL_NAME);
        self.export_names.insert(name.to_owned())
    }

    /// Fresh internal name for the namespace binding synthesized from
    /// `export * as ns from "m"`.
    pub fn next_namespace_export_name(&mut self) -> String {
        let name = format!("{}{}", ANONY_NAMESPACE_NAME, self.namespace_export_count);
        self.namespace_export_count += 1;
        name
    }

    pub fn module_requests(&self) -> &[String] {
        &self.module_requests
    }

    pub fn regular_import_entries(&self) -> &[ImportEntry] {
        &self.regular_import_entries
    }

    pub fn namespace_import_entries(&self) -> &[ImportEntry] {
        &self.namespace_import_entries
    }

    pub fn local_export_entries(&self) -> &[ExportEntry] {
        &self.local_export_entries
    }

    pub fn indirect_export_entries(&self) -> &[ExportEntry] {
        &self.indirect_export_entries
    }

    pub fn star_export_entries(&self) -> &[ExportEntry] {
        &self.star_export_entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> TextRange {
        TextRange::empty(0)
    }

    #[test]
    fn module_requests_are_deduplicated() {
        let mut record = SourceTextModuleRecord::new();
        let a = record.add_module_request("./a");
        let b = record.add_module_request("./b");
        let a_again = record.add_module_request("./a");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(record.module_requests(), &["./a", "./b"]);
    }

    #[test]
    fn duplicate_export_name_rejected_across_kinds() {
        let mut record = SourceTextModuleRecord::new();
        let req = record.add_module_request("m");
        assert!(record.add_local_export_entry(ExportEntry::local("x", "x", range())));
        // Same name through an indirect re-export is still a clash.
        assert!(!record.add_indirect_export_entry(ExportEntry::indirect("x", "y", req, range())));
        assert!(record.add_indirect_export_entry(ExportEntry::indirect("z", "y", req, range())));
    }

    #[test]
    fn default_exports_share_one_slot() {
        let mut record = SourceTextModuleRecord::new();
        let entry = ExportEntry::local(DEFAULT_EXTERNAL_NAME, DEFAULT_LOCAL_NAME, range());
        assert!(record.add_local_export_entry(entry.clone()));
        assert!(!record.add_local_export_entry(entry));
    }

    #[test]
    fn star_exports_never_conflict() {
        let mut record = SourceTextModuleRecord::new();
        let req = record.add_module_request("m");
        record.add_star_export_entry(ExportEntry::star(req, range()));
        record.add_star_export_entry(ExportEntry::star(req, range()));
        assert_eq!(record.star_export_entries().len(), 2);
    }

    #[test]
    fn synthetic_namespace_names_count_up() {
        let mut record = SourceTextModuleRecord::new();
        assert_eq!(record.next_namespace_export_name(), "=ens0");
        assert_eq!(record.next_namespace_export_name(), "=ens1");
    }

    #[test]
    fn record_serializes_entry_lists() {
        let mut record = SourceTextModuleRecord::new();
        let req = record.add_module_request("m");
        record.add_import_entry(ImportEntry {
            local_name: "x".into(),
            import_name: Some("x".into()),
            module_request: req,
            range: range(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["module_requests"][0], "m");
        assert_eq!(json["regular_import_entries"][0]["local_name"], "x");
    }
}
