use jdex::{JdNumber, JdValue, Record, RecordStore, StoreError};
use pretty_assertions::assert_eq;

fn collection(text: &str) -> Vec<Record> {
    RecordStore::import_collection(JdValue::parse(text).unwrap()).unwrap()
}

fn loaded_store() -> RecordStore {
    let mut store = RecordStore::default();
    store.load(collection(
        r#"[
            { "id": "alpha", "title": "First", "tier": "1" },
            { "id": "beta", "title": "Second", "tier": "2" },
            { "id": "gamma", "title": "Third" }
        ]"#,
    ));
    store
}

#[test]
fn begin_then_cancel_leaves_the_collection_byte_identical() {
    let mut store = loaded_store();
    let before = store.export_pretty();

    store.begin_edit("beta#1").expect("begin");
    store
        .draft_mut()
        .unwrap()
        .insert("title".to_string(), JdValue::String("Scribble".into()));
    store.cancel_edit();

    assert_eq!(store.export_pretty(), before);
    assert!(!store.is_edited("beta#1"));
}

#[test]
fn commit_replaces_the_record_in_place_and_marks_it_edited() {
    let mut store = loaded_store();

    store.begin_edit("beta#1").expect("begin");
    store
        .draft_mut()
        .unwrap()
        .insert("tier".to_string(), JdValue::Number(JdNumber::I64(3)));
    store.commit_edit().expect("commit");

    assert_eq!(store.len(), 3);
    assert_eq!(
        store.records()[1].get("tier"),
        Some(&JdValue::Number(JdNumber::I64(3)))
    );
    // Neighbors untouched.
    assert_eq!(
        store.records()[0].get("tier"),
        Some(&JdValue::String("1".into()))
    );
    assert!(store.is_edited("beta#1"));
    assert!(!store.is_edited("alpha#0"));
    assert_eq!(store.edited_count(), 1);
}

#[test]
fn a_second_begin_for_a_different_identity_conflicts() {
    let mut store = loaded_store();
    store.begin_edit("alpha#0").expect("begin");

    let err = store.begin_edit("beta#1").unwrap_err();
    assert_eq!(
        err,
        StoreError::EditSessionConflict {
            open: "alpha#0".to_string(),
            requested: "beta#1".to_string(),
        }
    );

    // The original session is still the open one.
    assert_eq!(store.editing_identity(), Some("alpha#0"));
}

#[test]
fn rebeginning_the_same_identity_refreshes_the_draft() {
    let mut store = loaded_store();

    store.begin_edit("alpha#0").expect("begin");
    store
        .draft_mut()
        .unwrap()
        .insert("title".to_string(), JdValue::String("Scratch".into()));

    let draft = store.begin_edit("alpha#0").expect("re-begin");
    assert_eq!(draft.get("title"), Some(&JdValue::String("First".into())));
}

#[test]
fn commit_without_a_session_is_an_error() {
    let mut store = loaded_store();
    assert_eq!(store.commit_edit(), Err(StoreError::NoActiveEditSession));
}

#[test]
fn cancel_without_a_session_is_a_no_op() {
    let mut store = loaded_store();
    store.cancel_edit();
    assert_eq!(store.editing_identity(), None);
}

#[test]
fn begin_with_an_unknown_identity_is_an_error() {
    let mut store = loaded_store();
    let err = store.begin_edit("nope#9").unwrap_err();
    assert_eq!(err, StoreError::UnknownIdentity("nope#9".to_string()));
}

#[test]
fn identical_records_at_different_indices_get_distinct_identities() {
    let mut store = RecordStore::default();
    store.load(collection(
        r#"[ { "id": "dup", "x": 1 }, { "id": "dup", "x": 1 } ]"#,
    ));

    let a = store.identity_at(0).unwrap();
    let b = store.identity_at(1).unwrap();
    assert_eq!(a, "dup#0");
    assert_eq!(b, "dup#1");
    assert_ne!(a, b);
}

#[test]
fn identity_is_stable_for_a_fixed_snapshot() {
    let store = loaded_store();
    assert_eq!(store.identity_at(2), store.identity_at(2));
    assert_eq!(store.identity_at(2).unwrap(), "gamma#2");
}

#[test]
fn committed_edits_survive_in_the_export_snapshot() {
    let mut store = loaded_store();

    store.begin_edit("gamma#2").expect("begin");
    store
        .draft_mut()
        .unwrap()
        .insert("tier".to_string(), JdValue::String("3".into()));
    store.commit_edit().expect("commit");

    let exported = store.export_pretty();
    let reparsed = RecordStore::import_text(&exported).expect("reimport");
    assert_eq!(reparsed[2].get("tier"), Some(&JdValue::String("3".into())));
}
