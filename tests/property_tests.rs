/// Property tests: invariants that must hold for any input, not just the
/// hand-picked sentences.

use proptest::prelude::*;
use surface_realiser::core::context::RealiseContext;
use surface_realiser::core::lexicon::Lexicon;
use surface_realiser::core::morphology::english::{present_3s, regular_plural};
use surface_realiser::core::morphophonology;
use surface_realiser::core::realiser::Realiser;
use surface_realiser::core::syntax::Token;
use surface_realiser::schema::element::Tree;
use surface_realiser::schema::feature::{
    Category, Feature, InterrogativeType, Number, Tense,
};

const FRENCH_WORDS: &[(&str, Category)] = &[
    ("de", Category::Preposition),
    ("à", Category::Preposition),
    ("le", Category::Determiner),
    ("la", Category::Determiner),
    ("les", Category::Determiner),
    ("que", Category::Complementiser),
    ("si", Category::Complementiser),
    ("il", Category::Pronoun),
    ("ils", Category::Pronoun),
    ("arbre", Category::Noun),
    ("jardin", Category::Noun),
    ("eau", Category::Noun),
    ("héros", Category::Noun),
    ("beau", Category::Adjective),
    ("ami", Category::Noun),
];

const NOUNS: &[&str] = &["dog", "cat", "monkey", "horse", "giraffe", "woman"];

fn french_sequence() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..FRENCH_WORDS.len(), 0..12)
}

fn tokens(ctx: &RealiseContext, picks: &[usize]) -> Vec<Token> {
    picks
        .iter()
        .map(|&i| {
            let (word, category) = FRENCH_WORDS[i];
            let mut token = Token::new(ctx, word, category);
            token.realisation = Some(word.to_string());
            token
        })
        .collect()
}

fn texts(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|t| t.text().to_string()).collect()
}

fn tense() -> impl Strategy<Value = Tense> {
    prop_oneof![
        Just(Tense::Present),
        Just(Tense::Past),
        Just(Tense::Future),
        Just(Tense::Conditional),
    ]
}

fn question() -> impl Strategy<Value = Option<InterrogativeType>> {
    prop_oneof![
        Just(None),
        Just(Some(InterrogativeType::YesNo)),
        Just(Some(InterrogativeType::WhoObject)),
        Just(Some(InterrogativeType::WhoSubject)),
        Just(Some(InterrogativeType::Why)),
    ]
}

proptest! {
    #[test]
    fn morphophonology_is_idempotent(picks in french_sequence()) {
        let lex = Lexicon::french().unwrap();
        let ctx = RealiseContext::new(&lex);
        let mut seq = tokens(&ctx, &picks);
        morphophonology::apply(&ctx, &mut seq);
        let once = texts(&seq);
        morphophonology::apply(&ctx, &mut seq);
        prop_assert_eq!(once, texts(&seq));
    }

    #[test]
    fn morphophonology_never_adds_words(picks in french_sequence()) {
        let lex = Lexicon::french().unwrap();
        let ctx = RealiseContext::new(&lex);
        let mut seq = tokens(&ctx, &picks);
        morphophonology::apply(&ctx, &mut seq);
        prop_assert_eq!(seq.len(), picks.len());
        let surviving = seq.iter().filter(|t| !t.is_blank()).count();
        prop_assert!(surviving <= picks.len());
        prop_assert!(picks.is_empty() || surviving >= 1);
    }

    #[test]
    fn regular_plural_extends_the_stem(word in "[a-z]{1,12}") {
        let plural = regular_plural(&word);
        prop_assert!(plural.ends_with('s'));
        prop_assert!(plural.len() > word.len());
        prop_assert!(plural.starts_with(&word[..word.len() - 1]));
    }

    #[test]
    fn third_person_singular_ends_in_s(word in "[a-z]{2,12}") {
        prop_assume!(word != "be");
        let form = present_3s(&word);
        prop_assert!(form.ends_with('s'));
        prop_assert!(form.starts_with(&word[..word.len() - 1]));
    }

    #[test]
    fn verb_agrees_with_subject_number(noun in 0..NOUNS.len(), plural in any::<bool>()) {
        let realiser = Realiser::english().unwrap();
        let mut tree = Tree::new();
        let subject = tree.np("the", NOUNS[noun]);
        if plural {
            tree.set_feature(subject, Feature::Number, Number::Plural);
        }
        let chase = tree.verb("chase");
        let s = tree.clause(subject, chase);
        let words = realiser.realise_words(&tree, s).unwrap();
        prop_assert_eq!(words.len(), 3);
        let expected = if plural { "chase" } else { "chases" };
        prop_assert_eq!(words[2].as_str(), expected);
    }

    #[test]
    fn realisation_leaves_the_tree_alone(
        tense in tense(),
        negated in any::<bool>(),
        passive in any::<bool>(),
        progressive in any::<bool>(),
        question in question(),
    ) {
        let realiser = Realiser::english().unwrap();
        let mut tree = Tree::new();
        let mary = tree.proper_np("Mary");
        let chase = tree.verb("chase");
        let s = tree.clause(mary, chase);
        let monkey = tree.np("the", "monkey");
        tree.set_object(s, monkey).unwrap();
        tree.set_feature(s, Feature::Tense, tense);
        tree.set_feature(s, Feature::Negated, negated);
        tree.set_feature(s, Feature::Passive, passive);
        tree.set_feature(s, Feature::Progressive, progressive);
        if let Some(q) = question {
            tree.set_feature(s, Feature::InterrogativeType, q);
        }
        let before = tree.clone();

        let text = realiser.realise(&tree, s).unwrap();
        prop_assert!(!text.is_empty());
        prop_assert_eq!(text.ends_with('?'), question.is_some());
        prop_assert!(tree.structurally_equal(s, &before, s));
        prop_assert_eq!(tree.features(s), before.features(s));
        prop_assert_eq!(realiser.realise(&tree, s).unwrap(), text);
    }
}
