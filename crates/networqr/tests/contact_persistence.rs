use tempfile::TempDir;

use networqr::store::{KEY_FULL_NAME, KEY_PHONE_NUMBER, KEY_PROFILE_URL};
use networqr::{
    forget_contact, load_stored_contact, save_contact, try_save_contact, ContactRecord,
    KeyValueStore, MemoryStore, SqliteStore,
};

fn jane(phone: Option<&str>) -> ContactRecord {
    ContactRecord::new(
        "Jane Doe",
        "https://linkedin.com/in/janedoe",
        phone.map(str::to_string),
    )
    .expect("valid record")
}

#[test]
fn saved_contact_survives_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("nested").join("contact.db");

    {
        let store = SqliteStore::open(&db_path).expect("open sqlite");
        try_save_contact(&store, &jane(Some("+1 555 123 4567"))).expect("save");
    }

    let store = SqliteStore::open(&db_path).expect("reopen sqlite");
    assert_eq!(load_stored_contact(&store), Some(jane(Some("+1 555 123 4567"))));
    assert_eq!(
        store.get(KEY_PHONE_NUMBER).expect("get"),
        Some("+1 555 123 4567".to_string())
    );
}

#[test]
fn saving_overwrites_previous_contact() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteStore::open(tmp.path().join("contact.db")).expect("open sqlite");

    save_contact(&store, &jane(Some("+1 555 123 4567")));
    save_contact(&store, &jane(None));

    assert_eq!(load_stored_contact(&store), Some(jane(None)));
    assert_eq!(store.get(KEY_PHONE_NUMBER).expect("get"), Some(String::new()));
}

#[test]
fn name_without_profile_loads_nothing() {
    let store = MemoryStore::new();
    store.set(KEY_FULL_NAME, "Jane Doe").expect("set");

    assert_eq!(load_stored_contact(&store), None);

    store.set(KEY_PROFILE_URL, "").expect("set");
    assert_eq!(load_stored_contact(&store), None);
}

#[test]
fn forget_clears_sqlite_store() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteStore::open(tmp.path().join("contact.db")).expect("open sqlite");

    save_contact(&store, &jane(None));
    assert!(forget_contact(&store).expect("forget"));
    assert_eq!(load_stored_contact(&store), None);
    assert!(!forget_contact(&store).expect("forget again"));
}

#[test]
fn unavailable_store_is_not_fatal() {
    let store = MemoryStore::disabled();

    save_contact(&store, &jane(None));
    assert!(try_save_contact(&store, &jane(None)).is_err());
    assert_eq!(load_stored_contact(&store), None);
}

#[test]
fn boxed_store_works_through_trait_object() {
    let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());

    save_contact(store.as_ref(), &jane(Some("N/A")));
    assert_eq!(load_stored_contact(store.as_ref()), Some(jane(Some("N/A"))));
}

#[test]
fn failed_save_keeps_previous_contact_whole() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("contact.db");
    let store = SqliteStore::open(&db_path).expect("open sqlite");

    let old = ContactRecord::new(
        "Old Name",
        "https://linkedin.com/in/old",
        Some("111".to_string()),
    )
    .expect("valid record");
    try_save_contact(&store, &old).expect("save old");

    // A second connection makes every write of the profile key fail, so the
    // next save breaks down on its second write.
    let saboteur = rusqlite::Connection::open(&db_path).expect("second connection");
    saboteur
        .execute_batch(&format!(
            r"
            CREATE TRIGGER reject_profile_insert BEFORE INSERT ON entries
            WHEN NEW.key = '{KEY_PROFILE_URL}' BEGIN SELECT RAISE(ABORT, 'disk full'); END;
            CREATE TRIGGER reject_profile_update BEFORE UPDATE ON entries
            WHEN NEW.key = '{KEY_PROFILE_URL}' BEGIN SELECT RAISE(ABORT, 'disk full'); END;
            "
        ))
        .expect("install triggers");

    let new = ContactRecord::new(
        "New Name",
        "https://linkedin.com/in/new",
        Some("222".to_string()),
    )
    .expect("valid record");
    assert!(try_save_contact(&store, &new).is_err());
    save_contact(&store, &new);

    assert_eq!(load_stored_contact(&store), Some(old));
}
