#![cfg(target_arch = "wasm32")]

use lifesim_game::persistence::{ARCHIVE_KEY, SAVE_KEY};
use lifesim_web::{Gender, KeyValueStore, LocalStorageStore, create_local_engine};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_store() -> LocalStorageStore {
    let store = LocalStorageStore::new().expect("localStorage available");
    for key in [SAVE_KEY, ARCHIVE_KEY, "lifesim.legacy"] {
        store.remove(key).expect("remove");
    }
    store
}

#[wasm_bindgen_test]
fn store_roundtrips_strings() {
    let store = fresh_store();
    assert!(store.get(SAVE_KEY).unwrap().is_none());
    store.set(SAVE_KEY, "{\"version\":1}").unwrap();
    assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("{\"version\":1}"));
    store.remove(SAVE_KEY).unwrap();
    assert!(store.get(SAVE_KEY).unwrap().is_none());
}

#[wasm_bindgen_test]
fn engine_autosaves_into_local_storage() {
    let store = fresh_store();
    let engine = create_local_engine().expect("engine");
    let mut session = engine.start_life(9, "Wren", Gender::Female);
    engine.advance_year(&mut session).expect("tick");
    assert!(store.get(SAVE_KEY).unwrap().is_some());
    let resumed = engine.resume().expect("resumable");
    assert_eq!(resumed.player.age, 1);

    engine.finish_life(&mut session, None).expect("first finish");
    assert!(store.get(SAVE_KEY).unwrap().is_none());
    assert_eq!(engine.archive().len(), 1);
}
