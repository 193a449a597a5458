/// French realisation: agreement, clitics, negation and morphophonology.

use std::path::Path;
use surface_realiser::core::realiser::{RealiseError, Realiser};
use surface_realiser::core::morphology::MorphologyError;
use surface_realiser::schema::element::{NodeId, Tree};
use surface_realiser::schema::feature::{
    Category, Feature, InterrogativeType, Number, Tense,
};

fn french() -> Realiser {
    Realiser::french().unwrap()
}

fn marie_mange(tree: &mut Tree, object: NodeId) -> NodeId {
    let marie = tree.proper_np("Marie");
    let manger = tree.verb("manger");
    let clause = tree.clause(marie, manger);
    tree.set_object(clause, object).unwrap();
    clause
}

#[test]
fn adjectives_agree_and_place_themselves() {
    let realiser = french();
    let mut tree = Tree::new();
    let np = tree.np("un", "maison");
    let beau = tree.word("beau", Category::Adjective);
    let perdu = tree.word("perdu", Category::Adjective);
    realiser.add_modifier(&mut tree, np, beau).unwrap();
    realiser.add_modifier(&mut tree, np, perdu).unwrap();
    assert_eq!(
        realiser.realise_words(&tree, np).unwrap(),
        ["une", "belle", "maison", "perdue"]
    );
}

#[test]
fn present_tense_clause() {
    let realiser = french();
    let mut tree = Tree::new();
    let pomme = tree.np("un", "pomme");
    let s = marie_mange(&mut tree, pomme);
    assert_eq!(realiser.realise(&tree, s).unwrap(), "Marie mange une pomme.");
}

#[test]
fn negated_partitive_becomes_de() {
    let realiser = french();
    let (tree, root) = Tree::load_from_ron(Path::new("tests/fixtures/marie_mange.ron")).unwrap();
    assert_eq!(realiser.realise(&tree, root).unwrap(), "Marie ne mange pas de pain.");
}

#[test]
fn object_pronoun_is_a_clitic() {
    let realiser = french();
    let mut tree = Tree::new();
    let elle = tree.pronoun_np("elle");
    let s = marie_mange(&mut tree, elle);
    assert_eq!(realiser.realise(&tree, s).unwrap(), "Marie la mange.");
}

#[test]
fn passive_pronoun_agent_is_detached() {
    let realiser = french();
    let mut tree = Tree::new();
    let elle = tree.pronoun_np("elle");
    let manger = tree.verb("manger");
    let s = tree.clause(elle, manger);
    let pomme = tree.np("le", "pomme");
    tree.set_object(s, pomme).unwrap();
    tree.set_feature(s, Feature::Passive, true);
    assert_eq!(realiser.realise(&tree, s).unwrap(), "La pomme est mangée par elle.");
}

#[test]
fn perfect_with_etre_agrees_with_subject() {
    let realiser = french();
    let mut tree = Tree::new();
    let marie = tree.proper_np("Marie");
    let arriver = tree.verb("arriver");
    let s = tree.clause(marie, arriver);
    tree.set_feature(s, Feature::Perfect, true);
    assert_eq!(realiser.realise(&tree, s).unwrap(), "Marie est arrivée.");
}

#[test]
fn yes_no_question_uses_est_ce_que() {
    let realiser = french();
    let mut tree = Tree::new();
    let pomme = tree.np("un", "pomme");
    let s = marie_mange(&mut tree, pomme);
    tree.set_feature(s, Feature::InterrogativeType, InterrogativeType::YesNo);
    assert_eq!(
        realiser.realise(&tree, s).unwrap(),
        "Est-ce que Marie mange une pomme?"
    );
}

#[test]
fn future_tense() {
    let realiser = french();
    let mut tree = Tree::new();
    let pomme = tree.np("le", "pomme");
    let s = marie_mange(&mut tree, pomme);
    tree.set_feature(s, Feature::Tense, Tense::Future);
    assert_eq!(realiser.realise(&tree, s).unwrap(), "Marie mangera la pomme.");
}

#[test]
fn contraction_and_elision() {
    let realiser = french();
    let mut tree = Tree::new();
    let jardin = tree.np("le", "jardin");
    let au_jardin = tree.pp("à", jardin);
    assert_eq!(realiser.realise_words(&tree, au_jardin).unwrap(), ["au", "jardin"]);

    let arbre = tree.np("le", "arbre");
    let de_l_arbre = tree.pp("de", arbre);
    assert_eq!(
        realiser.realise_words(&tree, de_l_arbre).unwrap(),
        ["de", "l'", "arbre"]
    );

    let livres = tree.np("le", "livre");
    tree.set_feature(livres, Feature::Number, Number::Plural);
    let des_livres = tree.pp("de", livres);
    assert_eq!(realiser.realise_words(&tree, des_livres).unwrap(), ["des", "livres"]);
}

#[test]
fn elided_article_joins_without_space() {
    let realiser = french();
    let mut tree = Tree::new();
    let eau = tree.np("le", "eau");
    assert_eq!(realiser.realise(&tree, eau).unwrap(), "L'eau.");
}

#[test]
fn unconjugatable_verb_is_an_error() {
    let realiser = Realiser::builder()
        .language(surface_realiser::schema::feature::Language::French)
        .build()
        .unwrap();
    let mut tree = Tree::new();
    let marie = tree.proper_np("Marie");
    let verb = tree.verb("xyzzy");
    let s = tree.clause(marie, verb);
    assert!(matches!(
        realiser.realise(&tree, s),
        Err(RealiseError::Morphology(MorphologyError::UnknownVerbGroup(_)))
    ));
}

#[test]
fn extra_lexicon_file() {
    let realiser = Realiser::builder()
        .language(surface_realiser::schema::feature::Language::French)
        .lexicon_file("tests/fixtures/french_extra.ron")
        .build()
        .unwrap();
    let mut tree = Tree::new();
    let np = tree.np("le", "fourmi");
    let petit = tree.word("petit", Category::Adjective);
    realiser.add_modifier(&mut tree, np, petit).unwrap();
    assert_eq!(
        realiser.realise_words(&tree, np).unwrap(),
        ["la", "petite", "fourmi"]
    );
}

#[test]
fn english_lexicon_cannot_merge_into_french() {
    let result = Realiser::builder()
        .language(surface_realiser::schema::feature::Language::French)
        .lexicon_file("tests/fixtures/lexicon/english_extra.ron")
        .build();
    assert!(matches!(result, Err(RealiseError::Lexicon(_))));
}
