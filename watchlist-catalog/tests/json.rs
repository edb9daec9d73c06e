use std::collections::BTreeMap;

use tempfile::TempDir;
use watchlist_catalog::*;

#[test]
fn save_creates_parents_and_leaves_no_temp_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("a/b/doc.json");
    let value = BTreeMap::from([("anilist:40882".to_string(), "eren-yeager".to_string())]);

    save_json(&path, &value).unwrap();
    assert!(path.is_file());
    assert!(!tmp.path().join("a/b/doc.json.tmp").exists());

    let read: BTreeMap<String, String> = load_json(&path).unwrap();
    assert_eq!(read, value);
}

#[test]
fn parse_error_names_the_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.json");
    std::fs::write(&path, "{").unwrap();

    let err = load_json::<serde_json::Value>(&path).unwrap_err();
    assert!(matches!(err, JsonError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn subdirs_are_sorted_and_skip_private_names() {
    let tmp = TempDir::new().unwrap();
    for name in ["naruto", "_index", ".cache", "bleach"] {
        std::fs::create_dir_all(tmp.path().join(name)).unwrap();
    }
    std::fs::write(tmp.path().join("notes.txt"), "").unwrap();

    let names: Vec<String> = list_subdirs(tmp.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["bleach", "naruto"]);

    assert!(list_subdirs(&tmp.path().join("missing")).unwrap().is_empty());
}

#[test]
fn layout_paths() {
    let layout = DataLayout::new("/data");
    assert_eq!(
        layout.entity_file(EntityClass::Company, "wit-studio"),
        std::path::PathBuf::from("/data/companies/wit-studio/company.json")
    );
    assert_eq!(
        layout.extracted_file("attack-on-titan", EntityClass::Creator),
        std::path::PathBuf::from("/data/franchises/attack-on-titan/extracted_entities/creators.json")
    );
    assert_eq!(
        layout.entity_source_file(EntityClass::Character, "eren-yeager", SourceKind::Mal),
        std::path::PathBuf::from("/data/characters/eren-yeager/sources/mal.json")
    );
}
