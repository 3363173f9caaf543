use birthday_core::{
    BirthdayRecord, EditOutcome, RecordField, RecordStore, RecordValidationError, StoreError,
};
use std::collections::BTreeSet;
use std::fs;

fn assert_usage_matches_records(store: &RecordStore) {
    let expected: BTreeSet<&str> = store
        .records()
        .iter()
        .filter(|record| !record.avatar.is_empty())
        .map(|record| record.avatar.as_str())
        .collect();
    let actual: BTreeSet<&str> = store.used_avatars().collect();
    assert_eq!(actual, expected);

    for name in &expected {
        let refs = store
            .records()
            .iter()
            .filter(|record| record.avatar == *name)
            .count();
        assert_eq!(store.avatar_usage().count(name), refs, "count for {name}");
    }
}

fn seeded_store() -> RecordStore {
    let mut store = RecordStore::new();
    store.add_record("Alice", "1990-05-01", false, "alice.png").unwrap();
    store.add_record("Bob", "1985-11-20", true, "shared.png").unwrap();
    store.add_record("Carol", "2001-02-03", false, "shared.png").unwrap();
    store.add_record("Dan", "1970-07-07", false, "").unwrap();
    assert_usage_matches_records(&store);
    store
}

#[test]
fn add_record_appends_and_tracks_avatar() {
    let mut store = RecordStore::new();
    assert!(store.is_empty());
    assert_eq!(store.used_avatars().count(), 0);

    let record = store
        .add_record("Alice", "1990-05-01", false, "alice.png")
        .unwrap();
    assert_eq!(record.name, "Alice");
    assert_eq!(store.len(), 1);
    assert_eq!(store.used_avatars().collect::<Vec<_>>(), vec!["alice.png"]);
    assert!(store.has_unsaved_changes());
}

#[test]
fn add_record_rejects_invalid_input_without_mutation() {
    let mut store = seeded_store();

    let err = store.add_record("", "1990-05-01", false, "x.png").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::EmptyName)
    ));

    let err = store
        .add_record("Eve", "1990-13-01", false, "x.png")
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::InvalidBirthday(_))
    ));

    assert_eq!(store.len(), 4);
    assert!(!store.avatar_usage().contains("x.png"));
    assert_usage_matches_records(&store);
}

#[test]
fn add_record_allows_duplicates() {
    let mut store = RecordStore::new();
    store.add_record("Twin", "2000-01-01", false, "twin.png").unwrap();
    store.add_record("Twin", "2000-01-01", false, "twin.png").unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.avatar_usage().count("twin.png"), 2);
}

#[test]
fn delete_record_shifts_following_records() {
    let mut store = seeded_store();
    let before: Vec<BirthdayRecord> = store.records().to_vec();

    let removed = store.delete_record(1).unwrap();
    assert_eq!(removed, before[1]);
    assert_eq!(store.len(), before.len() - 1);
    assert_eq!(store.records()[1], before[2]);
    assert_eq!(store.records()[2], before[3]);
    assert_usage_matches_records(&store);
}

#[test]
fn delete_keeps_avatar_shared_by_remaining_record() {
    let mut store = seeded_store();

    store.delete_record(1).unwrap();
    assert!(store.avatar_usage().contains("shared.png"));
    assert_usage_matches_records(&store);

    store.delete_record(1).unwrap();
    assert!(!store.avatar_usage().contains("shared.png"));
    assert_usage_matches_records(&store);
}

#[test]
fn delete_out_of_range_returns_index_error() {
    let mut store = seeded_store();
    let err = store.delete_record(4).unwrap_err();
    assert!(matches!(
        err,
        StoreError::IndexOutOfRange { index: 4, len: 4 }
    ));
    assert_eq!(store.len(), 4);

    let mut empty = RecordStore::new();
    assert!(matches!(
        empty.delete_record(0),
        Err(StoreError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn edit_birthday_empty_is_noop_and_invalid_date_is_rejected() {
    let mut store = seeded_store();

    let outcome = store
        .edit_field(0, RecordField::Birthday(String::new()))
        .unwrap();
    assert_eq!(outcome, EditOutcome::Unchanged);
    assert_eq!(store.records()[0].birthday, "1990-05-01");

    let err = store
        .edit_field(0, RecordField::Birthday("2024-02-30".to_string()))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::InvalidBirthday(_))
    ));
    assert_eq!(store.records()[0].birthday, "1990-05-01");

    let outcome = store
        .edit_field(0, RecordField::Birthday("2024-2-29".to_string()))
        .unwrap();
    assert_eq!(outcome, EditOutcome::Updated);
    assert_eq!(store.records()[0].birthday, "2024-02-29");
}

#[test]
fn signed_or_short_years_are_rejected_on_add_and_edit() {
    let mut store = seeded_store();

    for input in ["+2024-01-01", "990-05-01", "-0001-03-04"] {
        let err = store.add_record("Eve", input, false, "").unwrap_err();
        assert!(
            matches!(err, StoreError::Validation(RecordValidationError::InvalidBirthday(_))),
            "{input} should be rejected on add"
        );

        let err = store
            .edit_field(0, RecordField::Birthday(input.to_string()))
            .unwrap_err();
        assert!(
            matches!(err, StoreError::Validation(RecordValidationError::InvalidBirthday(_))),
            "{input} should be rejected on edit"
        );
    }

    assert_eq!(store.len(), 4);
    assert_eq!(store.records()[0].birthday, "1990-05-01");
}

#[test]
fn edit_name_and_lunar_flag() {
    let mut store = seeded_store();

    assert_eq!(
        store.edit_field(0, RecordField::Name("  ".to_string())).unwrap(),
        EditOutcome::Unchanged
    );
    assert_eq!(store.records()[0].name, "Alice");

    assert_eq!(
        store
            .edit_field(0, RecordField::Name("Alicia".to_string()))
            .unwrap(),
        EditOutcome::Updated
    );
    assert_eq!(store.records()[0].name, "Alicia");

    assert_eq!(
        store.edit_field(0, RecordField::IsLunar(true)).unwrap(),
        EditOutcome::Updated
    );
    assert!(store.records()[0].is_lunar);
    assert_eq!(
        store.edit_field(0, RecordField::IsLunar(true)).unwrap(),
        EditOutcome::Unchanged
    );
}

#[test]
fn edit_avatar_releases_old_value_by_reference_count() {
    let mut store = seeded_store();

    store
        .edit_field(1, RecordField::Avatar("bob.png".to_string()))
        .unwrap();
    assert!(store.avatar_usage().contains("shared.png"));
    assert!(store.avatar_usage().contains("bob.png"));
    assert_usage_matches_records(&store);

    store
        .edit_field(2, RecordField::Avatar("alice.png".to_string()))
        .unwrap();
    assert!(!store.avatar_usage().contains("shared.png"));
    assert_eq!(store.avatar_usage().count("alice.png"), 2);
    assert_usage_matches_records(&store);

    store.edit_field(0, RecordField::Avatar(String::new())).unwrap();
    assert_eq!(store.records()[0].avatar, "");
    assert_eq!(store.avatar_usage().count("alice.png"), 1);
    assert_usage_matches_records(&store);

    assert_eq!(
        store
            .edit_field(3, RecordField::Avatar(String::new()))
            .unwrap(),
        EditOutcome::Unchanged
    );
}

#[test]
fn edit_out_of_range_returns_index_error() {
    let mut store = seeded_store();
    let err = store
        .edit_field(9, RecordField::Name("Zed".to_string()))
        .unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 9, .. }));
}

#[test]
fn usage_invariant_holds_across_mixed_operations() {
    let mut store = RecordStore::new();
    let avatars = ["a.png", "b.png", "", "a.png", "c.jpg"];

    for (step, avatar) in avatars.iter().enumerate() {
        store
            .add_record(&format!("person-{step}"), "2000-01-01", step % 2 == 0, avatar)
            .unwrap();
        assert_usage_matches_records(&store);
    }

    store
        .edit_field(0, RecordField::Avatar("b.png".to_string()))
        .unwrap();
    assert_usage_matches_records(&store);
    store.delete_record(1).unwrap();
    assert_usage_matches_records(&store);
    store
        .edit_field(1, RecordField::Avatar("d.gif".to_string()))
        .unwrap();
    assert_usage_matches_records(&store);
    while !store.is_empty() {
        store.delete_record(0).unwrap();
        assert_usage_matches_records(&store);
    }
    assert_eq!(store.used_avatars().count(), 0);
}

#[test]
fn clear_drops_records_and_usage() {
    let mut store = seeded_store();
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.used_avatars().count(), 0);
    assert!(store.has_unsaved_changes());
}

#[test]
fn list_unused_assets_filters_used_names_in_listing_order() {
    let images = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.png", "c.jpg", "notes.txt"] {
        fs::write(images.path().join(name), b"").unwrap();
    }

    let mut store = RecordStore::new();
    store.add_record("Alice", "1990-05-01", false, "a.png").unwrap();

    let listing = birthday_core::scan_image_files(images.path()).unwrap();
    let expected: Vec<String> = listing
        .files
        .into_iter()
        .filter(|name| name != "a.png")
        .collect();

    let unused = store.list_unused_assets(images.path()).unwrap();
    assert!(!unused.directory_missing);
    assert_eq!(unused.files, expected);
    assert_eq!(
        unused.files.iter().cloned().collect::<BTreeSet<_>>(),
        BTreeSet::from(["b.png".to_string(), "c.jpg".to_string()])
    );
}

#[test]
fn list_unused_assets_reports_missing_directory() {
    let root = tempfile::tempdir().unwrap();
    let store = seeded_store();

    let unused = store.list_unused_assets(root.path().join("images")).unwrap();
    assert!(unused.directory_missing);
    assert!(unused.files.is_empty());
}

#[test]
fn avatar_existence_is_advisory() {
    let images = tempfile::tempdir().unwrap();
    fs::write(images.path().join("present.png"), b"").unwrap();

    assert!(RecordStore::avatar_file_exists(images.path(), "present.png"));
    assert!(!RecordStore::avatar_file_exists(images.path(), "ghost.png"));

    let mut store = RecordStore::new();
    store.add_record("Ghost", "1999-09-09", false, "ghost.png").unwrap();
    assert!(store.avatar_usage().contains("ghost.png"));
}
