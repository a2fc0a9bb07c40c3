use crate::filter::FilterState;
use crate::{JdValue, statics};
use anyhow::Context;
use indexmap::IndexMap;
use std::{collections::HashSet, fs, path::Path};
use thiserror::Error;

/// One row of the explorer: field name -> value. Records in a collection
/// need not share the same set of fields.
pub type Record = IndexMap<String, JdValue>;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("an edit session is already open for '{open}' (requested '{requested}')")]
    EditSessionConflict { open: String, requested: String },
    #[error("no edit session is open")]
    NoActiveEditSession,
    #[error("no record with identity '{0}'")]
    UnknownIdentity(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
    #[error("expected a collection of objects, found {0}")]
    NotACollection(&'static str),
}

#[derive(Debug, Clone)]
struct EditSession {
    identity: String,
    index: usize,
    draft: Record,
}

/// In-memory record collection plus the bookkeeping the explorer needs:
/// the ordered known-field universe, per-column visibility, the set of
/// locally edited identities, and at most one open edit session.
///
/// Filter state deliberately lives outside the store (see FilterState);
/// replacing the collection does not touch it.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    fields: Vec<String>,
    visibility: IndexMap<String, bool>,
    edited: HashSet<String>,
    session: Option<EditSession>,
}

impl RecordStore {
    /// Replace the active collection. Recomputes the field universe and
    /// reseeds column visibility; clears the edit overlay.
    pub fn load(&mut self, records: Vec<Record>) {
        self.fields = field_universe(&records);
        self.visibility = seed_visibility(&self.fields);
        self.records = records;
        self.edited.clear();
        self.session = None;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ordered union of keys across all records, first appearance wins.
    pub fn known_fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_field_visible(&self, field: &str) -> bool {
        self.visibility.get(field).copied().unwrap_or(false)
    }

    pub fn set_field_visible(&mut self, field: &str, visible: bool) {
        if let Some(slot) = self.visibility.get_mut(field) {
            *slot = visible;
        }
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &str> {
        self.visibility
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(field, _)| field.as_str())
    }

    /// Records passing the filter, with their positions in the full
    /// collection. Lazy and order-preserving; recomputed from scratch on
    /// every call so equal inputs always yield equal output.
    pub fn visible_records<'a>(
        &'a self,
        filter: &'a FilterState,
    ) -> impl Iterator<Item = (usize, &'a Record)> + 'a {
        let fields = &self.fields;
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, record)| filter.matches(record, fields))
    }

    /// Derived identity of the record at `index`. Weak by design: the key
    /// part comes from the first non-empty priority field (else the first
    /// known field) and is disambiguated with the position, so it must be
    /// recomputed whenever the collection changes.
    pub fn identity_at(&self, index: usize) -> Option<String> {
        let record = self.records.get(index)?;
        Some(derive_identity(record, self.fields.first(), index))
    }

    fn index_of_identity(&self, identity: &str) -> Option<usize> {
        (0..self.records.len()).find(|i| self.identity_at(*i).as_deref() == Some(identity))
    }

    /// Open an edit session on a copy of the target record. Re-beginning
    /// the identity already being edited refreshes the draft; any other
    /// identity conflicts while a session is open.
    pub fn begin_edit(&mut self, identity: &str) -> Result<&mut Record, StoreError> {
        if let Some(session) = &self.session
            && session.identity != identity
        {
            return Err(StoreError::EditSessionConflict {
                open: session.identity.clone(),
                requested: identity.to_string(),
            });
        }

        let index = self
            .index_of_identity(identity)
            .ok_or_else(|| StoreError::UnknownIdentity(identity.to_string()))?;

        let session = self.session.insert(EditSession {
            identity: identity.to_string(),
            index,
            draft: self.records[index].clone(),
        });
        Ok(&mut session.draft)
    }

    pub fn editing_identity(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.identity.as_str())
    }

    pub fn draft(&self) -> Option<&Record> {
        self.session.as_ref().map(|s| &s.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut Record> {
        self.session.as_mut().map(|s| &mut s.draft)
    }

    /// Replace the record at its original position with the draft and mark
    /// the identity edited.
    pub fn commit_edit(&mut self) -> Result<(), StoreError> {
        let session = self.session.take().ok_or(StoreError::NoActiveEditSession)?;
        self.records[session.index] = session.draft;
        self.edited.insert(session.identity);
        Ok(())
    }

    /// Discard any open session without touching the collection. No-op
    /// when none is open.
    pub fn cancel_edit(&mut self) {
        self.session = None;
    }

    pub fn is_edited(&self, identity: &str) -> bool {
        self.edited.contains(identity)
    }

    pub fn edited_count(&self) -> usize {
        self.edited.len()
    }

    /// The full current collection for serialization, not the filtered view.
    pub fn export_snapshot(&self) -> &[Record] {
        &self.records
    }

    /// Indented JSON of the full collection, always a top-level array.
    pub fn export_pretty(&self) -> String {
        JdValue::Array(
            self.records
                .iter()
                .map(|r| JdValue::Object(r.clone()))
                .collect(),
        )
        .to_pretty()
    }

    pub fn export_to_path(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.export_pretty()).with_context(|| format!("writing {path:?}"))?;
        log::info!("exported {} records to {}", self.len(), path.display());
        Ok(())
    }

    /// Parse text and coerce it into a collection. Prior store state is
    /// untouched on failure; callers apply the result via `load`.
    pub fn import_text(text: &str) -> Result<Vec<Record>, ImportError> {
        let value = JdValue::parse(text).map_err(|e| {
            log::warn!("import rejected: {e:#}");
            ImportError::MalformedJson(format!("{e:#}"))
        })?;
        Self::import_collection(value)
    }

    /// A top-level object becomes a one-element collection; an array is
    /// used directly; anything else is not a collection.
    pub fn import_collection(raw: JdValue) -> Result<Vec<Record>, ImportError> {
        match raw {
            JdValue::Object(record) => Ok(vec![record]),
            JdValue::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    JdValue::Object(record) => Ok(record),
                    other => Err(ImportError::NotACollection(other.type_name())),
                })
                .collect(),
            other => Err(ImportError::NotACollection(other.type_name())),
        }
    }

    /// `exported-data-<ISO-date>.json`
    pub fn default_export_file_name() -> String {
        format!(
            "{}{}.{}",
            statics::EXPORT_FILE_PREFIX,
            chrono::Local::now().format("%Y-%m-%d"),
            statics::EXPORT_FILE_EXT
        )
    }
}

fn field_universe(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.clone()) {
                fields.push(key.clone());
            }
        }
    }
    fields
}

fn seed_visibility(fields: &[String]) -> IndexMap<String, bool> {
    let any_priority = fields
        .iter()
        .any(|f| statics::VISIBLE_PRIORITY_FIELDS.contains(&f.as_str()));

    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let visible = if any_priority {
                statics::VISIBLE_PRIORITY_FIELDS.contains(&field.as_str())
            } else {
                i < statics::DEFAULT_VISIBLE_COUNT
            };
            (field.clone(), visible)
        })
        .collect()
}

fn derive_identity(record: &Record, first_field: Option<&String>, index: usize) -> String {
    let priority_key = statics::IDENTITY_PRIORITY_FIELDS.iter().find_map(|field| {
        record
            .get(*field)
            .map(JdValue::display_text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    });

    let key = priority_key.unwrap_or_else(|| {
        first_field
            .and_then(|f| record.get(f))
            .map(JdValue::display_text)
            .unwrap_or_default()
    });

    format!("{key}{}{index}", statics::IDENTITY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordStore};
    use crate::{JdValue, statics};

    fn collection(text: &str) -> Vec<Record> {
        RecordStore::import_collection(JdValue::parse(text).unwrap()).unwrap()
    }

    #[test]
    fn field_universe_preserves_first_appearance_order() {
        let mut store = RecordStore::default();
        store.load(collection(
            r#"[{"b": 1, "a": 2}, {"c": 3, "a": 4}, {"d": 5}]"#,
        ));
        assert_eq!(store.known_fields(), ["b", "a", "c", "d"]);
    }

    #[test]
    fn visibility_prefers_priority_fields_when_present() {
        let mut store = RecordStore::default();
        store.load(collection(
            r#"[{"indicator": "1.4.2", "notes": "x", "tier": 1, "extra": true}]"#,
        ));
        assert!(store.is_field_visible("indicator"));
        assert!(store.is_field_visible("tier"));
        assert!(!store.is_field_visible("notes"));
        assert!(!store.is_field_visible("extra"));
    }

    #[test]
    fn visibility_falls_back_to_first_six_fields() {
        let mut store = RecordStore::default();
        store.load(collection(
            r#"[{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7,"h":8}]"#,
        ));
        let visible: Vec<&str> = store.visible_fields().collect();
        assert_eq!(visible, ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(visible.len(), statics::DEFAULT_VISIBLE_COUNT);
    }

    #[test]
    fn identity_prefers_unsd_code_then_id_then_indicator() {
        let mut store = RecordStore::default();
        store.load(collection(
            r#"[
                {"unsd_code": "C010", "id": "x", "indicator": "1.4.2"},
                {"id": "row-2", "indicator": "5.a.1"},
                {"indicator": "15.1.1"},
                {"title": "fallback to first known field"}
            ]"#,
        ));
        assert_eq!(store.identity_at(0).unwrap(), "C010#0");
        assert_eq!(store.identity_at(1).unwrap(), "row-2#1");
        assert_eq!(store.identity_at(2).unwrap(), "15.1.1#2");
        // First known field of the collection is "unsd_code"; absent here,
        // so the key part is empty and only the index disambiguates.
        assert_eq!(store.identity_at(3).unwrap(), "#3");
    }

    #[test]
    fn identity_skips_empty_priority_values() {
        let mut store = RecordStore::default();
        store.load(collection(r#"[{"unsd_code": "  ", "id": "real"}]"#));
        assert_eq!(store.identity_at(0).unwrap(), "real#0");
    }

    #[test]
    fn load_clears_edit_overlay() {
        let mut store = RecordStore::default();
        store.load(collection(r#"[{"id": "a"}]"#));
        store.begin_edit("a#0").unwrap();
        store.commit_edit().unwrap();
        assert!(store.is_edited("a#0"));

        store.load(collection(r#"[{"id": "a"}]"#));
        assert!(!store.is_edited("a#0"));
        assert!(store.editing_identity().is_none());
    }

    #[test]
    fn default_export_file_name_has_prefix_and_extension() {
        let name = RecordStore::default_export_file_name();
        assert!(name.starts_with(statics::EXPORT_FILE_PREFIX));
        assert!(name.ends_with(".json"));
    }
}
