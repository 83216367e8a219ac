use carnet_core::{
    ContainerRef, ItemField, MoveRequest, Section, StoreError, TripData, TripStore,
};
use serde_json::json;

#[test]
fn add_item_creates_day_and_section_on_demand() {
    let mut store = TripStore::default();
    let target = ContainerRef::date_section("2024-06-01", Section::Morning);

    store.add_item(&target).unwrap();
    let plan = store.data().day("2024-06-01").expect("day should exist");
    assert_eq!(plan.section(Section::Morning).len(), 1);
    assert!(store.data().day("2024-06-01").unwrap().section(Section::Lunch).is_empty());
}

#[test]
fn add_item_to_list_opens_card_and_list() {
    let mut store = TripStore::new(sample_data());
    store.toggle_list_collapsed(0).unwrap();
    assert!(store.data().lists()[0].collapsed);

    store.add_item(&ContainerRef::list(0)).unwrap();
    let list = &store.data().lists()[0];
    assert!(!list.collapsed);
    assert_eq!(list.items.last().unwrap().expanded, Some(true));
}

#[test]
fn add_item_rejects_junk_date_keys() {
    let mut store = TripStore::default();
    let junk = ContainerRef::date_section("next tuesday", Section::Morning);
    assert!(matches!(
        store.add_item(&junk),
        Err(StoreError::InvalidDateKey(_))
    ));
    assert!(store.data().days().is_empty());
}

#[test]
fn update_item_field_assigns_in_place_without_reordering() {
    let mut store = TripStore::new(sample_data());
    let target = ContainerRef::date_section("2024-06-01", Section::Morning);

    store
        .update_item_field(&target, 0, ItemField::Title, "Musée d'Orsay")
        .unwrap();
    store
        .update_item_field(&target, 0, ItemField::Img, "data:image/png;base64,AAA")
        .unwrap();

    let items = store.data().day("2024-06-01").unwrap().section(Section::Morning);
    assert_eq!(items[0].title, "Musée d'Orsay");
    assert_eq!(items[0].img, "data:image/png;base64,AAA");
    assert_eq!(items[1].title, "Deuxième");
}

#[test]
fn delete_item_shifts_following_indices_down() {
    let mut store = TripStore::new(sample_data());
    let target = ContainerRef::date_section("2024-06-01", Section::Morning);

    store.delete_item(&target, 0).unwrap();
    let items = store.data().day("2024-06-01").unwrap().section(Section::Morning);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Deuxième");
}

#[test]
fn stale_indices_fault_instead_of_corrupting_neighbors() {
    let mut store = TripStore::new(sample_data());
    let target = ContainerRef::date_section("2024-06-01", Section::Morning);

    store.delete_item(&target, 1).unwrap();
    let err = store.delete_item(&target, 1).unwrap_err();
    assert!(matches!(
        err,
        StoreError::IndexOutOfRange { index: 1, len: 1, .. }
    ));

    let missing_day = ContainerRef::date_section("2031-01-01", Section::Night);
    let err = store
        .update_item_field(&missing_day, 3, ItemField::Title, "x")
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::IndexOutOfRange { index: 3, len: 0, .. }
    ));

    let err = store.delete_list(9).unwrap_err();
    assert!(matches!(err, StoreError::ListIndexOutOfRange { index: 9, len: 1 }));
}

#[test]
fn move_item_between_containers_preserves_total_count() {
    let mut store = TripStore::new(sample_data());
    let before = store.data().total_items();

    store
        .move_item(&MoveRequest {
            source: ContainerRef::date_section("2024-06-01", Section::Morning),
            source_index: 0,
            dest: ContainerRef::list(0),
        })
        .unwrap();

    assert_eq!(store.data().total_items(), before);
    let list = &store.data().lists()[0];
    let moved = list.items.last().unwrap();
    assert_eq!(moved.title, "Louvre");
    // Arriving in a list folds the card and opens the list.
    assert_eq!(moved.expanded, Some(false));
    assert!(!list.collapsed);
    assert_eq!(
        store.data().day("2024-06-01").unwrap().section(Section::Morning).len(),
        1
    );
}

#[test]
fn move_item_into_planner_creates_destination_section() {
    let mut store = TripStore::new(sample_data());

    store
        .move_item(&MoveRequest {
            source: ContainerRef::Staging,
            source_index: 0,
            dest: ContainerRef::date_section("2024-06-02", Section::Dinner),
        })
        .unwrap();

    assert!(store.data().staging().is_empty());
    let items = store.data().day("2024-06-02").unwrap().section(Section::Dinner);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].place, "Nice");
}

#[test]
fn same_container_move_reorders_without_losing_items() {
    let mut store = TripStore::new(sample_data());
    let target = ContainerRef::date_section("2024-06-01", Section::Morning);
    let before = store.data().total_items();

    // Self-drop of the first card: must end up last, and the unrelated
    // second card must survive.
    store
        .move_item(&MoveRequest {
            source: target.clone(),
            source_index: 0,
            dest: target.clone(),
        })
        .unwrap();

    assert_eq!(store.data().total_items(), before);
    let titles: Vec<_> = store
        .data()
        .day("2024-06-01")
        .unwrap()
        .section(Section::Morning)
        .iter()
        .map(|item| item.title.clone())
        .collect();
    assert_eq!(titles, ["Deuxième", "Louvre"]);
}

#[test]
fn failed_move_leaves_the_aggregate_untouched() {
    let mut store = TripStore::new(sample_data());
    let before = store.data().clone();

    let err = store
        .move_item(&MoveRequest {
            source: ContainerRef::date_section("2024-06-01", Section::Morning),
            source_index: 0,
            dest: ContainerRef::list(7),
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::ListIndexOutOfRange { .. }));
    assert_eq!(store.data(), &before);
}

#[test]
fn prune_empty_days_keeps_content_and_is_idempotent() {
    let mut store = TripStore::new(
        TripData::from_value(&json!({
            "2024-06-01": {
                "Morning": [{"title": "", "place": "", "desc": "", "img": ""}]
            },
            "2024-06-02": {
                "Lunch": [{"title": "", "place": "Nice", "desc": "", "img": ""}]
            },
            "2024-06-03": {
                "Night": []
            }
        }))
        .unwrap(),
    );

    store.prune_empty_days();
    let after_once = store.data().clone();
    assert!(after_once.day("2024-06-01").is_none());
    assert!(after_once.day("2024-06-02").is_some());
    assert!(after_once.day("2024-06-03").is_none());

    store.prune_empty_days();
    assert_eq!(store.data(), &after_once);
}

#[test]
fn coordinates_alone_do_not_save_a_day_from_pruning() {
    let mut store = TripStore::new(
        TripData::from_value(&json!({
            "2024-06-01": {
                "Morning": [{"title": "", "place": "", "desc": "", "img": "", "lat": 1.0, "lon": 2.0}]
            }
        }))
        .unwrap(),
    );
    store.prune_empty_days();
    assert!(store.data().days().is_empty());
}

#[test]
fn list_crud_appends_and_removes_positionally() {
    let mut store = TripStore::new(sample_data());
    store.create_list("Restaurants");
    assert_eq!(store.data().lists().len(), 2);
    assert_eq!(store.data().lists()[1].name, "Restaurants");
    assert!(!store.data().lists()[1].collapsed);

    // Deleting a list discards its items for good.
    store.add_item(&ContainerRef::list(0)).unwrap();
    store.delete_list(0).unwrap();
    assert_eq!(store.data().lists().len(), 1);
    assert_eq!(store.data().lists()[0].name, "Restaurants");
}

#[test]
fn toggle_item_expanded_flips_unset_state_to_open() {
    let mut store = TripStore::new(sample_data());
    let staging = ContainerRef::Staging;

    store.toggle_item_expanded(&staging, 0).unwrap();
    assert_eq!(store.data().staging()[0].expanded, Some(true));
    store.toggle_item_expanded(&staging, 0).unwrap();
    assert_eq!(store.data().staging()[0].expanded, Some(false));
}

#[test]
fn replace_bumps_the_generation_stamp() {
    let mut store = TripStore::new(sample_data());
    assert_eq!(store.generation(), 0);
    store.replace(TripData::default());
    store.replace(sample_data());
    assert_eq!(store.generation(), 2);
}

fn sample_data() -> TripData {
    TripData::from_value(&json!({
        "2024-06-01": {
            "Morning": [
                {"title": "Louvre", "place": "Louvre, Paris", "desc": "", "img": ""},
                {"title": "Deuxième", "place": "", "desc": "note", "img": ""}
            ]
        },
        "lists": [
            {"name": "À faire", "collapsed": false, "items": [
                {"title": "marché", "place": "", "desc": "", "img": ""}
            ]}
        ],
        "staging": [
            {"title": "plage", "place": "Nice", "desc": "", "img": ""}
        ]
    }))
    .expect("sample document should decode")
}
