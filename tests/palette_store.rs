use sketchboard::draw::model::Color;
use sketchboard::draw::palette::{JsonFileStore, KeyValueStore, PALETTE_STORE_KEY};
use sketchboard::draw::Session;
use tempfile::tempdir;

#[test]
fn palette_survives_sessions_through_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut first = Session::default();
    let mut store = JsonFileStore::new(&path);
    first.set_color(Color::rgb(255, 0, 0));
    assert!(first.save_palette_color(&mut store).unwrap());
    first.set_color(Color::rgba(0, 0, 255, 128));
    assert!(first.save_palette_color(&mut store).unwrap());
    first.set_color(Color::rgb(255, 0, 0));
    assert!(!first.save_palette_color(&mut store).unwrap());

    let raw = std::fs::read_to_string(&path).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let list: Vec<String> =
        serde_json::from_str(stored[PALETTE_STORE_KEY].as_str().unwrap()).unwrap();
    assert_eq!(list, vec!["#FF0000", "#0000FF80"]);

    let mut second = Session::default();
    let store = JsonFileStore::new(&path);
    assert!(second.load_palette(&store).unwrap());
    assert_eq!(
        second.palette().colors(),
        &[Color::rgb(255, 0, 0), Color::rgba(0, 0, 255, 128)]
    );
}

#[test]
fn loading_from_empty_store_keeps_palette() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    let mut session = Session::default();
    assert!(!session.load_palette(&store).unwrap());
    assert!(session.palette().colors().is_empty());
}

#[test]
fn corrupt_store_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "[1, 2").unwrap();
    let store = JsonFileStore::new(&path);
    let err = store.get(PALETTE_STORE_KEY).unwrap_err();
    assert!(format!("{err:#}").contains("storage.json"));
}
