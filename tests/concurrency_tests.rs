//! Concurrency and thread safety tests for the item store

use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

use lostfound::{
    BackendConfig, ItemKind, ItemStore, LostFound, LostFoundConfig, MatchQuery, NewItem,
    StoreConfig, StoreYamlConfig,
};

fn new_item(name: String) -> NewItem {
    NewItem {
        item_name: name,
        category: "Bags".into(),
        location: "Quad".into(),
        date: "2024-10-06".into(),
        contact_info: "555-0142".into(),
        ..Default::default()
    }
}

fn concurrent_creates(store: Arc<ItemStore>, kind: ItemKind, threads: usize) -> Vec<u64> {
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store
                    .create(kind, new_item(format!("item-{i}")))
                    .expect("create should succeed")
                    .id
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn concurrent_creates_get_distinct_sequential_ids_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        ItemStore::new(StoreConfig::new().with_backend(BackendConfig::json_dir(
            dir.path().to_string_lossy(),
        )))
        .unwrap(),
    );

    let ids: BTreeSet<u64> = concurrent_creates(Arc::clone(&store), ItemKind::Lost, 24)
        .into_iter()
        .collect();

    assert_eq!(ids, (1..=24).collect::<BTreeSet<u64>>());
    let persisted: Vec<u64> = store
        .load_all(ItemKind::Lost)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(persisted.len(), 24);
    assert_eq!(persisted.iter().copied().collect::<BTreeSet<_>>(), ids);
}

#[test]
fn collections_do_not_block_each_other() {
    let store = Arc::new(
        ItemStore::new(StoreConfig::new().with_backend(BackendConfig::in_memory())).unwrap(),
    );

    let lost_store = Arc::clone(&store);
    let found_store = Arc::clone(&store);
    let lost = thread::spawn(move || concurrent_creates(lost_store, ItemKind::Lost, 8));
    let found = thread::spawn(move || concurrent_creates(found_store, ItemKind::Found, 8));

    let mut lost_ids = lost.join().unwrap();
    let mut found_ids = found.join().unwrap();
    lost_ids.sort_unstable();
    found_ids.sort_unstable();

    assert_eq!(lost_ids, (1..=8).collect::<Vec<u64>>());
    assert_eq!(found_ids, (1..=8).collect::<Vec<u64>>());
}

#[test]
fn readers_never_observe_partial_collections() {
    let service = Arc::new(
        LostFound::open(&LostFoundConfig {
            store: StoreYamlConfig {
                backend: "in_memory".into(),
                ..StoreYamlConfig::default()
            },
            ..LostFoundConfig::default()
        })
        .unwrap(),
    );

    let writer = {
        let store = Arc::clone(service.store());
        thread::spawn(move || {
            for i in 0..50 {
                store.create(ItemKind::Found, new_item(format!("w{i}"))).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..50 {
                    let items = service.store().load_all(ItemKind::Found).unwrap();
                    // Ids are a dense prefix 1..=n in insertion order.
                    for (pos, item) in items.iter().enumerate() {
                        assert_eq!(item.id, pos as u64 + 1);
                    }
                    assert!(items.len() >= last, "collection shrank");
                    last = items.len();

                    let hits = service.match_items(&MatchQuery::new("Bags")).unwrap();
                    assert!(hits.len() <= 10);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(service.stats().unwrap().total_found_items, 50);
}
