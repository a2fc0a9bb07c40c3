use jdex::{FilterState, ImportError, JdValue, MatchMode, RecordStore};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn importing_a_single_object_yields_a_one_record_collection() {
    let records = RecordStore::import_text(r#"{"a": 1}"#).expect("import");
    assert_eq!(records.len(), 1);

    let mut store = RecordStore::default();
    store.load(records);
    assert_eq!(store.known_fields(), ["a"]);
}

#[test]
fn importing_an_array_uses_it_directly() {
    let records = RecordStore::import_text(r#"[{"a": 1}, {"b": 2}]"#).expect("import");
    assert_eq!(records.len(), 2);

    let mut store = RecordStore::default();
    store.load(records);
    assert_eq!(store.known_fields(), ["a", "b"]);
}

#[test]
fn malformed_json_is_rejected() {
    let err = RecordStore::import_text(r#"{"a": "#).unwrap_err();
    assert!(matches!(err, ImportError::MalformedJson(_)));
}

#[test]
fn scalar_top_level_is_not_a_collection() {
    let err = RecordStore::import_text("42").unwrap_err();
    assert!(matches!(err, ImportError::NotACollection("number")));

    let err = RecordStore::import_text(r#"[{"a": 1}, 42]"#).unwrap_err();
    assert!(matches!(err, ImportError::NotACollection("number")));
}

#[test]
fn failed_import_leaves_the_prior_collection_untouched() {
    let mut store = RecordStore::default();
    store.load(RecordStore::import_text(r#"[{"keep": true}]"#).unwrap());
    let before = store.export_pretty();

    assert!(RecordStore::import_text("not json at all {{{").is_err());

    assert_eq!(store.export_pretty(), before);
    assert_eq!(store.known_fields(), ["keep"]);
}

#[test]
fn export_contains_the_full_collection_not_the_filtered_view() {
    let mut store = RecordStore::default();
    store.load(
        RecordStore::import_text(r#"[{"tier": "1"}, {"tier": "2"}, {"tier": "3"}]"#).unwrap(),
    );

    let mut filter = FilterState::default();
    filter.set_field_filter("tier", "2", MatchMode::Exact);
    assert_eq!(store.visible_records(&filter).count(), 1);

    let reparsed = RecordStore::import_text(&store.export_pretty()).expect("reimport");
    assert_eq!(reparsed.len(), 3);
}

#[test]
fn export_round_trips_through_import() {
    let mut store = RecordStore::default();
    store.load(
        RecordStore::import_text(
            r#"[
                { "id": "a", "n": 7, "f": 7.5, "flag": true, "nil": null,
                  "tags": ["x", "y"], "meta": { "k": "v" } },
                { "id": "b", "text": "with \"quotes\" and\nnewlines" }
            ]"#,
        )
        .unwrap(),
    );

    let exported = store.export_pretty();
    let reimported = RecordStore::import_text(&exported).expect("reimport");
    assert_eq!(reimported, store.export_snapshot());
}

#[test]
fn export_to_path_writes_indented_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(RecordStore::default_export_file_name());

    let mut store = RecordStore::default();
    store.load(RecordStore::import_text(r#"[{"a": 1}]"#).unwrap());
    store.export_to_path(&path)?;

    let written = std::fs::read_to_string(&path)?;
    assert_eq!(written, "[\n  {\n    \"a\": 1\n  }\n]\n");

    // And it parses back.
    let value = JdValue::parse(&written)?;
    assert_eq!(value.as_array().map(<[JdValue]>::len), Some(1));
    Ok(())
}

#[test]
fn import_replaces_the_collection_via_load() {
    let mut store = RecordStore::default();
    store.load(RecordStore::import_text(r#"[{"old": 1}]"#).unwrap());
    store.load(RecordStore::import_text(r#"[{"new": 2}, {"new": 3}]"#).unwrap());

    assert_eq!(store.len(), 2);
    assert_eq!(store.known_fields(), ["new"]);
}
