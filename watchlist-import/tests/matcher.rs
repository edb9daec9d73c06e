use watchlist_catalog::*;
use watchlist_import::*;

fn record(source: SourceKind, id: i64, name: &str, class: EntityClass) -> SourceRecord {
    let payload = match class {
        EntityClass::Character => RecordPayload::Character(CharacterPayload::default()),
        EntityClass::Creator => RecordPayload::Creator(CreatorPayload::default()),
        EntityClass::Company => RecordPayload::Company(CompanyPayload::default()),
    };
    SourceRecord {
        source,
        source_id: SourceId::Int(id),
        raw_name: name.to_string(),
        native_name: None,
        entity_class: class,
        image: None,
        payload,
    }
}

fn credit(source: SourceKind, id: i64, name: &str, language: &str) -> VoiceCredit {
    VoiceCredit {
        language: language.to_string(),
        person: record(source, id, name, EntityClass::Creator),
    }
}

#[test]
fn characters_match_on_equal_ids() {
    let left = vec![record(SourceKind::Anilist, 12345, "Eren Yeager", EntityClass::Character)];
    let right = vec![record(SourceKind::Mal, 12345, "Yeager, Eren", EntityClass::Character)];

    let outcome = match_records(EntityClass::Character, &left, &right);
    assert_eq!(outcome.pairs.len(), 1);
    assert!(outcome.ambiguities.is_empty());
}

#[test]
fn characters_do_not_match_on_different_ids() {
    let left = vec![record(SourceKind::Anilist, 12345, "Eren Yeager", EntityClass::Character)];
    let right = vec![record(SourceKind::Mal, 12346, "Eren Yeager", EntityClass::Character)];

    let outcome = match_records(EntityClass::Character, &left, &right);
    assert!(outcome.pairs.is_empty());
}

#[test]
fn creators_match_across_name_order() {
    let left = vec![record(SourceKind::Anilist, 96879, "Hajime Isayama", EntityClass::Creator)];
    let right = vec![record(SourceKind::Mal, 11705, "Isayama, Hajime", EntityClass::Creator)];

    let outcome = match_records(EntityClass::Creator, &left, &right);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].left.raw_name, "Hajime Isayama");
    assert_eq!(outcome.pairs[0].right.raw_name, "Isayama, Hajime");
}

#[test]
fn creators_never_match_on_substring() {
    let left = vec![record(SourceKind::Anilist, 1, "Hajime", EntityClass::Creator)];
    let right = vec![record(SourceKind::Mal, 2, "Isayama, Hajime", EntityClass::Creator)];

    let outcome = match_records(EntityClass::Creator, &left, &right);
    assert!(outcome.pairs.is_empty());
}

#[test]
fn companies_match_ignoring_case_and_punctuation() {
    let left = vec![record(SourceKind::Anilist, 858, "WIT STUDIO", EntityClass::Company)];
    let right = vec![record(SourceKind::Mal, 858, "Wit Studio.", EntityClass::Company)];

    let outcome = match_records(EntityClass::Company, &left, &right);
    assert_eq!(outcome.pairs.len(), 1);
}

#[test]
fn ambiguous_key_pairs_first_and_reports() {
    let left = vec![
        record(SourceKind::Anilist, 1, "Yuki Kaji", EntityClass::Creator),
        record(SourceKind::Anilist, 2, "Kaji, Yuki", EntityClass::Creator),
    ];
    let right = vec![record(SourceKind::Mal, 3, "Yuki Kaji", EntityClass::Creator)];

    let outcome = match_records(EntityClass::Creator, &left, &right);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].left.source_id, SourceId::Int(1));
    assert_eq!(outcome.ambiguities.len(), 1);
    assert_eq!(outcome.ambiguities[0].key, "yuki kaji");
    assert_eq!(outcome.ambiguities[0].left_candidates, 2);
    assert_eq!(outcome.ambiguities[0].right_candidates, 1);
}

#[test]
fn empty_names_never_match() {
    let left = vec![record(SourceKind::Anilist, 1, "  ", EntityClass::Creator)];
    let right = vec![record(SourceKind::Mal, 2, "", EntityClass::Creator)];

    let outcome = match_records(EntityClass::Creator, &left, &right);
    assert!(outcome.pairs.is_empty());
    assert!(outcome.ambiguities.is_empty());
}

#[test]
fn dub_voice_actors_are_never_candidates() {
    let left = CharacterPayload {
        role: Some("MAIN".to_string()),
        voice_actors: vec![
            credit(SourceKind::Anilist, 95061, "Yuki Kaji", "Japanese"),
            credit(SourceKind::Anilist, 500, "Shin Yongwoo", "Korean"),
        ],
    };
    let right = CharacterPayload {
        role: Some("Main".to_string()),
        voice_actors: vec![
            credit(SourceKind::Mal, 6689, "Kaji, Yuki", "Japanese"),
            credit(SourceKind::Mal, 7777, "Shin Yongwoo", "Korean"),
        ],
    };

    let outcome = match_voice_actors(&left, &right);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].left.source_id, SourceId::Int(95061));
    assert_eq!(outcome.pairs[0].right.source_id, SourceId::Int(6689));
}

#[test]
fn voice_actor_language_is_case_insensitive() {
    let left = CharacterPayload {
        role: None,
        voice_actors: vec![credit(SourceKind::Anilist, 1, "Yui Ishikawa", "JAPANESE")],
    };
    let right = CharacterPayload {
        role: None,
        voice_actors: vec![credit(SourceKind::Mal, 2, "Ishikawa, Yui", "Japanese")],
    };

    assert_eq!(match_voice_actors(&left, &right).pairs.len(), 1);
}

#[test]
fn dub_credit_never_pairs_with_same_named_japanese_credit() {
    let left = CharacterPayload {
        role: None,
        voice_actors: vec![credit(SourceKind::Anilist, 95061, "Yuki Kaji", "Korean")],
    };
    let right = CharacterPayload {
        role: None,
        voice_actors: vec![credit(SourceKind::Mal, 6689, "Kaji, Yuki", "Japanese")],
    };

    let outcome = match_voice_actors(&left, &right);
    assert!(outcome.pairs.is_empty());
    assert!(outcome.ambiguities.is_empty());
}
