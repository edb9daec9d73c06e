use watchlist_catalog::normalize::*;

const SAMPLES: &[&str] = &[
    "Hajime Isayama",
    "Isayama, Hajime",
    "  Kōichi   Yamadera ",
    "Studio Ghibli, Inc.",
    "MAPPA",
    "A-1 Pictures",
    "Ufotable",
    "Björk Guðmundsdóttir",
    "梶 裕貴",
    "℡ ™ ½",
    "Smith, Jr., John",
    "",
    ",",
    "Ōtsuka, Akio",
];

#[test]
fn normalize_is_idempotent() {
    for sample in SAMPLES {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
    }
}

#[test]
fn last_first_and_first_last_agree() {
    assert_eq!(normalize("Isayama, Hajime"), "hajime isayama");
    assert_eq!(normalize("Hajime Isayama"), "hajime isayama");
    assert_eq!(normalize("Ōtsuka, Akio"), normalize("Akio Otsuka"));
}

#[test]
fn punctuation_and_case_are_ignored() {
    assert_eq!(normalize("A-1 Pictures"), "a1 pictures");
    assert_eq!(normalize("Studio Ghibli Inc."), normalize("STUDIO GHIBLI INC"));
    assert_eq!(normalize("Studio Ghibli, Inc."), "inc studio ghibli");
}

#[test]
fn three_segments_are_not_reordered() {
    assert_eq!(normalize("Smith, Jr., John"), "smith jr john");
}

#[test]
fn non_latin_letters_survive() {
    assert_eq!(normalize("梶  裕貴"), "梶 裕貴");
}

#[test]
fn empty_and_punctuation_only_names() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" , "), "");
    assert_eq!(normalize("!!!"), "");
}

#[test]
fn slugs() {
    assert_eq!(slugify("Attack on Titan"), "attack-on-titan");
    assert_eq!(slugify("Re:Zero - Starting Life"), "rezero-starting-life");
    assert_eq!(slugify("  --Fate/stay night--  "), "fate-stay-night");
    assert_eq!(slugify("Kōichi Yamadera"), "koichi-yamadera");
    assert_eq!(slugify("snake_case name"), "snake_case-name");
    assert_eq!(slugify("進撃の巨人"), "");
}
