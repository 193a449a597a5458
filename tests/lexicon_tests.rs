/// Lexicon loading, merging and lookup against the shipped data files.

use std::path::Path;
use std::sync::Arc;
use surface_realiser::core::lexicon::{Lexicon, LexiconError, Tagger};
use surface_realiser::core::realiser::Realiser;
use surface_realiser::schema::element::Tree;
use surface_realiser::schema::feature::{Category, Language, Number};
use surface_realiser::schema::word::Inflection;

#[test]
fn embedded_lexicons_load() {
    let en = Lexicon::english().unwrap();
    assert_eq!(en.language(), Language::English);
    assert!(en.len() > 100);

    let fr = Lexicon::french().unwrap();
    assert_eq!(fr.language(), Language::French);
    assert!(fr.lookup("être", Category::Verb).is_some());
}

#[test]
fn data_files_match_embedded_copies() {
    let en = Lexicon::load_from_ron(Path::new("lexicon_data/english.ron")).unwrap();
    assert_eq!(en.len(), Lexicon::english().unwrap().len());
    let fr = Lexicon::load_from_ron(Path::new("lexicon_data/french.ron")).unwrap();
    assert_eq!(fr.len(), Lexicon::french().unwrap().len());
}

#[test]
fn variants_resolve_to_their_entry() {
    let en = Lexicon::english().unwrap();
    let a = en.lookup("an", Category::Determiner).unwrap();
    assert_eq!(a.base, "a");
}

#[test]
fn irregular_entries_carry_forms() {
    let en = Lexicon::english().unwrap();
    let mouse = en.lookup("mouse", Category::Noun).unwrap();
    assert_eq!(mouse.forms.plural.as_deref(), Some("mice"));
    assert_eq!(mouse.default_inflection(), Inflection::Irregular);

    let sheep = en.lookup("sheep", Category::Noun).unwrap();
    assert_eq!(sheep.default_inflection(), Inflection::Invariant);
}

#[test]
fn every_stored_plural_is_realised() {
    let realiser = Realiser::english().unwrap();
    let mut checked = 0;
    for entry in realiser.lexicon().entries() {
        let Some(plural) = entry.forms.plural.clone() else {
            continue;
        };
        if entry.category != Category::Noun {
            continue;
        }
        let mut tree = Tree::new();
        let np = tree.np("", &entry.base);
        tree.set_feature(np, surface_realiser::schema::feature::Feature::Number, Number::Plural);
        assert_eq!(realiser.realise_words(&tree, np).unwrap(), [plural]);
        checked += 1;
    }
    assert!(checked > 5);
}

#[test]
fn merging_replaces_by_id() {
    let mut en = Lexicon::english().unwrap();
    let before = en.len();
    let extra = Lexicon::load_from_ron(Path::new("tests/fixtures/lexicon/english_extra.ron")).unwrap();
    en.merge(extra).unwrap();
    // mouse replaced; wug and gorp added
    assert_eq!(en.len(), before + 2);
    assert_eq!(
        en.lookup("mouse", Category::Noun).unwrap().forms.plural.as_deref(),
        Some("mouses")
    );
}

#[test]
fn merging_across_languages_fails() {
    let mut en = Lexicon::english().unwrap();
    let fr = Lexicon::french().unwrap();
    assert!(matches!(
        en.merge(fr),
        Err(LexiconError::LanguageMismatch { .. })
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let input = r#"(
        language: English,
        entries: [
            (base: "cat", category: "noun"),
            (base: "cat", category: "noun", plural: "cats"),
        ],
    )"#;
    assert!(matches!(
        Lexicon::parse_ron(input),
        Err(LexiconError::DuplicateId(_))
    ));
}

#[test]
fn bad_codes_are_rejected() {
    let bad_category = r#"(language: English, entries: [(base: "x", category: "gizmo")])"#;
    assert!(matches!(
        Lexicon::parse_ron(bad_category),
        Err(LexiconError::UnknownCategory { .. })
    ));
    let bad_inflection =
        r#"(language: English, entries: [(base: "x", category: "noun", inflections: ["weird"])])"#;
    assert!(matches!(
        Lexicon::parse_ron(bad_inflection),
        Err(LexiconError::UnknownInflection { .. })
    ));
}

#[test]
fn unknown_words_are_created_on_demand() {
    let en = Lexicon::english().unwrap();
    assert!(en.lookup("blorft", Category::Noun).is_none());
    let entry = en.first("blorft", Category::Noun).unwrap();
    assert_eq!(entry.base, "blorft");
    assert_eq!(entry.category, Category::Noun);

    let mut strict = Lexicon::english().unwrap();
    strict.set_create_if_missing(false);
    assert!(strict.first("blorft", Category::Noun).is_none());
}

struct EverythingIsAVerb;

impl Tagger for EverythingIsAVerb {
    fn tag(&self, _word: &str) -> Option<Category> {
        Some(Category::Verb)
    }
}

#[test]
fn tagger_decides_category_of_unknown_words() {
    let realiser = Realiser::builder()
        .with_tagger(Arc::new(EverythingIsAVerb))
        .build()
        .unwrap();
    let entry = realiser.lexicon().first("snarf", Category::Any).unwrap();
    assert_eq!(entry.category, Category::Verb);
}

#[test]
fn lexicon_supplied_directly() {
    let lexicon = Lexicon::parse_ron(
        r#"(language: English, entries: [(base: "ox", category: "noun", plural: "oxen", inflections: ["irreg"])])"#,
    )
    .unwrap();
    let realiser = Realiser::builder().with_lexicon(lexicon).build().unwrap();
    let mut tree = Tree::new();
    let oxen = tree.np("", "ox");
    tree.set_feature(oxen, surface_realiser::schema::feature::Feature::Number, Number::Plural);
    assert_eq!(realiser.realise_words(&tree, oxen).unwrap(), ["oxen"]);
}
