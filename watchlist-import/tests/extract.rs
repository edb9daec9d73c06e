use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;
use watchlist_catalog::*;
use watchlist_import::*;

fn write_doc(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn anilist_doc() -> Value {
    json!({
        "data": { "Media": {
            "characters": { "edges": [
                {
                    "role": "MAIN",
                    "node": {
                        "id": 40882,
                        "name": { "full": "Eren Yeager", "native": "エレン・イェーガー" },
                        "image": { "large": "https://img.anili.st/eren.png" }
                    },
                    "voiceActors": [
                        {
                            "id": 95061,
                            "name": { "full": "Yuki Kaji", "native": "梶裕貴" },
                            "image": { "large": "https://img.anili.st/kaji.png" },
                            "languageV2": "Japanese"
                        },
                        {
                            "id": 123456,
                            "name": { "full": "Shin Yong-woo" },
                            "languageV2": "Korean"
                        }
                    ]
                },
                {
                    "role": "MAIN",
                    "node": { "id": 40881, "name": { "full": "Mikasa Ackerman" } },
                    "voiceActors": []
                },
                {
                    "role": "BACKGROUND",
                    "node": { "id": 2, "name": { "full": "Townsperson" } },
                    "voiceActors": null
                }
            ]},
            "staff": { "edges": [
                { "role": "Original Creator", "node": { "id": 96879, "name": { "full": "Hajime Isayama" } } },
                { "role": "In-Between Animation", "node": { "id": 5000, "name": { "full": "Taro Tanaka" } } }
            ]},
            "studios": { "nodes": [
                { "id": 858, "name": "Wit Studio", "isAnimationStudio": true }
            ]}
        }}
    })
}

fn jikan_doc() -> Value {
    json!({
        "anime": {
            "studios": [ { "mal_id": 858, "name": "Wit Studio" } ],
            "producers": [ { "mal_id": 1000, "name": "Pony Canyon" } ]
        },
        "characters": [
            {
                "role": "Main",
                "character": {
                    "mal_id": 40882,
                    "name": "Yeager, Eren",
                    "images": { "jpg": { "image_url": "https://cdn.myanimelist.net/eren.jpg" } }
                },
                "voice_actors": [
                    {
                        "language": "Japanese",
                        "person": { "mal_id": 6689, "name": "Kaji, Yuki", "images": null }
                    },
                    {
                        "language": "Korean",
                        "person": { "mal_id": 7777, "name": "Shin, Yong-woo" }
                    }
                ]
            },
            {
                "role": "Main",
                "character": { "mal_id": 40881, "name": "Ackerman, Mikasa" },
                "voice_actors": []
            }
        ],
        "staff": [
            { "person": { "mal_id": 11705, "name": "Isayama, Hajime" }, "positions": ["Original Creator"] },
            { "person": { "mal_id": 5001, "name": "Tanaka, Taro" }, "positions": ["In-Between Animation"] }
        ]
    })
}

fn setup_franchise(root: &Path, franchise: &str, entry: &str) {
    let sources = root
        .join("franchises")
        .join(franchise)
        .join("entries")
        .join(entry)
        .join("sources");
    write_doc(&sources.join("anilist_raw.json"), &anilist_doc());
    write_doc(&sources.join("jikan_raw.json"), &jikan_doc());
}

#[test]
fn eren_yeager_end_to_end() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let extraction = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();

    assert!(warnings.is_empty());
    assert_eq!(extraction.characters.len(), 2);

    let eren = extraction
        .characters
        .iter()
        .find(|c| c.canonical_name == "Eren Yeager")
        .unwrap();
    assert_eq!(eren.sources.len(), 2);
    assert_eq!(eren.sources[&SourceKind::Anilist].source_id, SourceId::Int(40882));
    assert_eq!(eren.sources[&SourceKind::Mal].source_id, SourceId::Int(40882));
    assert_eq!(eren.native_name(), Some("エレン・イェーガー"));
    assert!(eren.entries.contains("season-1"));

    assert_eq!(eren.voice_actors.len(), 1);
    let kaji = &eren.voice_actors[0];
    assert_eq!(kaji.name, "Yuki Kaji");
    assert_eq!(kaji.sources[&SourceKind::Anilist].source_id, SourceId::Int(95061));
    assert_eq!(kaji.sources[&SourceKind::Mal].source_id, SourceId::Int(6689));
}

#[test]
fn single_source_records_are_dropped() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let extraction = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();

    assert!(extraction.characters.iter().all(|c| {
        c.sources
            .values()
            .all(|r| r.source_id != SourceId::Int(2))
    }));
    // Pony Canyon is only on MAL.
    let companies: Vec<&str> = extraction
        .companies
        .iter()
        .map(|c| c.canonical_name.as_str())
        .collect();
    assert_eq!(companies, vec!["Wit Studio"]);
}

#[test]
fn creator_matches_across_name_order() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let extraction = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();

    let isayama = extraction
        .creators
        .iter()
        .find(|c| c.canonical_name == "Hajime Isayama")
        .unwrap();
    assert_eq!(isayama.sources[&SourceKind::Mal].raw_name, "Isayama, Hajime");
    assert_eq!(isayama.roles, vec!["Original Creator"]);
}

#[test]
fn blocked_roles_filtered_when_enabled() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let unfiltered = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();
    assert_eq!(unfiltered.creators.len(), 2);

    let options = ExtractOptions {
        filter_blocked_roles: true,
        ..ExtractOptions::default()
    };
    let filtered = extract_franchise(&layout, "attack-on-titan", &options, &mut warnings).unwrap();
    let names: Vec<&str> = filtered
        .creators
        .iter()
        .map(|c| c.canonical_name.as_str())
        .collect();
    assert_eq!(names, vec!["Hajime Isayama"]);
}

#[test]
fn missing_document_is_fatal_for_franchise() {
    let tmp = TempDir::new().unwrap();
    let sources = tmp
        .path()
        .join("franchises/broken/entries/movie/sources");
    write_doc(&sources.join("anilist_raw.json"), &anilist_doc());
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let err = extract_franchise(&layout, "broken", &ExtractOptions::default(), &mut warnings)
        .unwrap_err();
    match err {
        ExtractError::Load { source, .. } => {
            assert!(matches!(source, LoadError::Missing { kind: SourceKind::Mal, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_document_is_fatal_for_franchise() {
    let tmp = TempDir::new().unwrap();
    let sources = tmp
        .path()
        .join("franchises/broken/entries/movie/sources");
    write_doc(&sources.join("anilist_raw.json"), &anilist_doc());
    std::fs::write(sources.join("jikan_raw.json"), "{ not json").unwrap();
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let result = extract_franchise(&layout, "broken", &ExtractOptions::default(), &mut warnings);
    assert!(matches!(result, Err(ExtractError::Load { .. })));
}

#[test]
fn franchise_without_entries_dir_is_single_entry() {
    let tmp = TempDir::new().unwrap();
    let sources = tmp.path().join("franchises/your-name/sources");
    write_doc(&sources.join("anilist_raw.json"), &anilist_doc());
    write_doc(&sources.join("jikan_raw.json"), &jikan_doc());
    let layout = DataLayout::new(tmp.path());

    let entries = discover_entries(&layout, "your-name").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_slug, "your-name");
}

#[test]
fn entries_fold_into_one_entity() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    setup_franchise(tmp.path(), "attack-on-titan", "season-2");
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let extraction = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();

    assert_eq!(extraction.characters.len(), 2);
    let eren = &extraction.characters[0];
    let entries: Vec<&str> = eren.entries.iter().map(String::as_str).collect();
    assert_eq!(entries, vec!["season-1", "season-2"]);
}

#[test]
fn extract_all_continues_past_failures() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    std::fs::create_dir_all(tmp.path().join("franchises/empty")).unwrap();
    let layout = DataLayout::new(tmp.path());

    let report = extract_all(&layout, &ExtractOptions::default(), None).unwrap();

    let summary = report.summary();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    let failures: Vec<&str> = report.failures().map(|(slug, _)| slug).collect();
    assert_eq!(failures, vec!["empty"]);

    assert!(
        layout
            .extracted_file("attack-on-titan", EntityClass::Character)
            .is_file()
    );
    let read_back = read_extraction(&layout, "attack-on-titan").unwrap();
    assert_eq!(read_back.characters.len(), 2);
    assert_eq!(read_back.creators.len(), 2);
    assert_eq!(read_back.companies.len(), 1);
}

#[test]
fn ambiguous_names_warn_and_keep_first() {
    let tmp = TempDir::new().unwrap();
    let mut jikan = jikan_doc();
    jikan["staff"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "person": { "mal_id": 99999, "name": "Hajime Isayama" }, "positions": ["Script"] }));
    let sources = tmp
        .path()
        .join("franchises/attack-on-titan/entries/season-1/sources");
    write_doc(&sources.join("anilist_raw.json"), &anilist_doc());
    write_doc(&sources.join("jikan_raw.json"), &jikan);
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let extraction = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();

    assert_eq!(warnings.len(), 1);
    assert!(matches!(&warnings[0], RunWarning::AmbiguousMatch { ambiguity, .. }
        if ambiguity.key == "hajime isayama" && ambiguity.right_candidates == 2));
    let isayama = extraction
        .creators
        .iter()
        .find(|c| c.canonical_name == "Hajime Isayama")
        .unwrap();
    assert_eq!(isayama.sources[&SourceKind::Mal].source_id, SourceId::Int(11705));
}

#[test]
fn later_entry_cannot_replace_an_id() {
    let tmp = TempDir::new().unwrap();
    setup_franchise(tmp.path(), "attack-on-titan", "season-1");
    let mut jikan = jikan_doc();
    jikan["staff"][0]["person"]["mal_id"] = json!(22222);
    let sources = tmp
        .path()
        .join("franchises/attack-on-titan/entries/season-2/sources");
    write_doc(&sources.join("anilist_raw.json"), &anilist_doc());
    write_doc(&sources.join("jikan_raw.json"), &jikan);
    let layout = DataLayout::new(tmp.path());

    let mut warnings = Vec::new();
    let extraction = extract_franchise(
        &layout,
        "attack-on-titan",
        &ExtractOptions::default(),
        &mut warnings,
    )
    .unwrap();

    let isayama = extraction
        .creators
        .iter()
        .find(|c| c.canonical_name == "Hajime Isayama")
        .unwrap();
    assert_eq!(isayama.sources[&SourceKind::Mal].source_id, SourceId::Int(11705));
    assert!(isayama.entries.contains("season-2"));
    assert!(warnings.iter().any(|w| matches!(
        w,
        RunWarning::IdentityConflict { key, franchise, .. }
            if key == "mal:22222" && franchise == "attack-on-titan"
    )));
}
