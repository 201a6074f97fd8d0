use attendance_core::db::open_db_in_memory;
use attendance_core::{
    AttendanceGrid, AttendanceSession, CollectionKind, CollectionStore, Item, KvStore,
    MemoryKvStore, NamedEntity, Person, SqliteKvStore, StorageError,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn missing_and_blank_values_load_as_empty() {
    let kv = MemoryKvStore::new();
    let collections = CollectionStore::new(&kv);
    assert!(collections.load::<Person>().unwrap().is_empty());

    kv.set(CollectionKind::Items.key(), "").unwrap();
    assert!(collections.load::<Item>().unwrap().is_empty());
}

#[test]
fn malformed_json_is_an_error_not_an_empty_collection() {
    let kv = MemoryKvStore::new();
    kv.set(CollectionKind::People.key(), "not json").unwrap();

    let err = CollectionStore::new(&kv).load::<Person>().unwrap_err();
    match err {
        StorageError::Malformed { kind, .. } => assert_eq!(kind, CollectionKind::People),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_shape_is_malformed() {
    let kv = MemoryKvStore::new();
    kv.set(
        CollectionKind::Sessions.key(),
        &json!([{ "id": "s1", "date": "yesterday", "records": [] }]).to_string(),
    )
    .unwrap();

    let err = CollectionStore::new(&kv)
        .load::<AttendanceSession>()
        .unwrap_err();
    assert!(matches!(err, StorageError::Malformed { .. }));
}

#[test]
fn stored_layout_uses_camel_case_fields_and_string_dates() {
    let kv = MemoryKvStore::new();
    let collections = CollectionStore::new(&kv);
    let taken_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let mut grid = AttendanceGrid::new();
    grid.set("p1", "i1", true);
    let session = AttendanceSession::from_grid(&grid, taken_at);
    collections.save(&[session.clone()]).unwrap();

    let raw = kv.get(CollectionKind::Sessions.key()).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored = &value[0];
    assert_eq!(stored["id"], session.id);
    assert!(stored["date"].as_str().unwrap().starts_with("2024-03-01T09:30:00"));
    let record = &stored["records"][0];
    assert_eq!(record["personId"], "p1");
    assert_eq!(record["itemId"], "i1");
    assert!(record["timestamp"].is_string());
}

#[test]
fn javascript_date_strings_are_revived() {
    let kv = MemoryKvStore::new();
    kv.set(
        CollectionKind::People.key(),
        &json!([{ "id": "1", "name": "John Smith", "createdAt": "2024-03-01T09:00:00.000Z" }])
            .to_string(),
    )
    .unwrap();
    kv.set(
        CollectionKind::Sessions.key(),
        &json!([{
            "id": "1709283600000",
            "date": "2024-03-01T09:00:00.000Z",
            "records": [{
                "id": "1-1-1709283600000",
                "personId": "1",
                "itemId": "1",
                "timestamp": "2024-03-01T09:00:00.000Z"
            }]
        }])
        .to_string(),
    )
    .unwrap();

    let collections = CollectionStore::new(&kv);
    let people = collections.load::<Person>().unwrap();
    assert_eq!(people[0].created_at, at("2024-03-01T09:00:00Z"));

    let sessions = collections.load::<AttendanceSession>().unwrap();
    assert_eq!(sessions[0].date, at("2024-03-01T09:00:00Z"));
    assert_eq!(sessions[0].records[0].timestamp, sessions[0].date);
}

#[test]
fn save_then_load_round_trips_field_for_field() {
    let conn = open_db_in_memory().unwrap();
    let collections = CollectionStore::new(SqliteKvStore::try_new(&conn).unwrap());

    let people = vec![
        Person::create("Ada".to_string()),
        Person::with_id("2".to_string(), "Grace".to_string(), at("2023-12-31T23:59:59.123456789Z")),
    ];
    let items = vec![Item::create("Review".to_string())];
    let mut grid = AttendanceGrid::new();
    grid.set(&people[0].id, &items[0].id, true);
    grid.set(&people[1].id, &items[0].id, true);
    let sessions = vec![AttendanceSession::from_grid(&grid, Utc::now())];

    collections.save(&people).unwrap();
    collections.save(&items).unwrap();
    collections.save(&sessions).unwrap();

    assert_eq!(collections.load::<Person>().unwrap(), people);
    assert_eq!(collections.load::<Item>().unwrap(), items);
    assert_eq!(collections.load::<AttendanceSession>().unwrap(), sessions);
}

#[test]
fn save_overwrites_the_whole_collection() {
    let kv = MemoryKvStore::new();
    let collections = CollectionStore::new(&kv);
    collections
        .save(&[Item::create("A".to_string()), Item::create("B".to_string())])
        .unwrap();
    collections.save(&[Item::create("C".to_string())]).unwrap();

    let items = collections.load::<Item>().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "C");
}

#[test]
fn seeding_is_idempotent() {
    let kv = MemoryKvStore::new();
    let collections = CollectionStore::new(&kv);

    let first = collections.seed_if_empty().unwrap();
    assert!(first.people_seeded && first.items_seeded);
    let people = collections.load::<Person>().unwrap();
    let items = collections.load::<Item>().unwrap();

    let second = collections.seed_if_empty().unwrap();
    assert!(!second.people_seeded && !second.items_seeded);
    assert_eq!(collections.load::<Person>().unwrap(), people);
    assert_eq!(collections.load::<Item>().unwrap(), items);

    let names = people.iter().map(|person| person.name.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["John Smith", "Sarah Johnson", "Mike Davis", "Emily Brown"]
    );
    assert_eq!(items[0].name, "Morning Meeting");
}
