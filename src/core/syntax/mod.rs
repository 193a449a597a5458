/// Syntax realisation: element trees to ordered, feature-annotated word
/// tokens.
///
/// Each element kind owns one realisation routine. Routines may rewrite
/// features inside the subtree they are realising (clause features flow down
/// into the verb phrase, coordinations copy features onto coordinates); the
/// caller always hands in a working copy of the tree.

pub mod clause;
pub mod coordination;
pub mod phrase;
pub mod verb;

use thiserror::Error;

use crate::core::context::{RealiseContext, RealiseWarning};
use crate::schema::element::{ElementError, ElementKind, NodeId, Tree, Word};
use crate::schema::feature::{
    Category, DiscourseFunction, Feature, FeatureSet, FeatureValue, Gender, Number, Person,
};
use crate::schema::word::{WordEntry, WordForms};

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("element {node:?} has malformed {feature:?}: {value:?}")]
    MalformedFeature {
        node: NodeId,
        feature: Feature,
        value: FeatureValue,
    },
    #[error("restructuring failed: {0}")]
    Element(#[from] ElementError),
}

/// An abstract word in the output sequence. Morphology fills `realisation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub base: String,
    pub category: Category,
    pub features: FeatureSet,
    /// Per-instance irregular forms, consulted before the lexicon.
    pub forms: WordForms,
    pub entry: Option<WordEntry>,
    /// Phrase governing this word, for upward agreement queries.
    pub parent: Option<NodeId>,
    /// Canned text bypasses morphology.
    pub canned: bool,
    pub realisation: Option<String>,
}

impl Token {
    /// A token for `base`, resolved against the lexicon.
    pub fn new(ctx: &RealiseContext, base: &str, category: Category) -> Token {
        let entry = ctx.lexicon().first(base, category);
        let category = match (&entry, category) {
            (Some(e), Category::Any) => e.category,
            _ => category,
        };
        Token {
            base: base.to_string(),
            category,
            features: FeatureSet::new(),
            forms: WordForms::default(),
            entry,
            parent: None,
            canned: false,
            realisation: None,
        }
    }

    /// Verbatim text.
    pub fn canned(text: &str) -> Token {
        Token {
            base: text.to_string(),
            category: Category::Any,
            features: FeatureSet::new(),
            forms: WordForms::default(),
            entry: None,
            parent: None,
            canned: true,
            realisation: Some(text.to_string()),
        }
    }

    pub fn with(mut self, feature: Feature, value: impl Into<FeatureValue>) -> Self {
        self.features.set(feature, value);
        self
    }

    pub fn with_parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent = parent;
        self
    }

    /// Current surface text: the realisation once set, the base before.
    pub fn text(&self) -> &str {
        self.realisation.as_deref().unwrap_or(&self.base)
    }

    pub fn is_blank(&self) -> bool {
        self.text().is_empty()
    }

    pub fn is(&self, base: &str) -> bool {
        !self.canned && self.base == base
    }

    pub fn is_copular(&self) -> bool {
        self.entry.as_ref().is_some_and(|e| e.flags.copular)
    }
}

/// Realise any element into tokens.
pub fn realise(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    node: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    if tree.features(node).flag(Feature::Elided) {
        return Ok(Vec::new());
    }
    let kind = tree.kind(node).clone();
    match kind {
        ElementKind::Empty => Ok(Vec::new()),
        ElementKind::Word(w) => Ok(vec![word_token(ctx, tree, node, &w)]),
        ElementKind::Text(s) => {
            if s.is_empty() {
                ctx.add_warning(RealiseWarning::EmptyText);
                return Ok(Vec::new());
            }
            let mut token = Token::canned(&s).with_parent(tree.parent(node));
            token.features = tree.features(node).clone();
            Ok(vec![token])
        }
        ElementKind::Placeholder { name, value } => match value {
            Some(v) => realise(ctx, tree, v),
            None => {
                ctx.add_warning(RealiseWarning::UnfilledPlaceholder(name.clone()));
                let mut token = Token::new(ctx, &name, Category::Noun).with_parent(tree.parent(node));
                token.features = tree.features(node).clone();
                Ok(vec![token])
            }
        },
        ElementKind::NounPhrase(_) => phrase::realise_noun_phrase(ctx, tree, node),
        ElementKind::VerbPhrase(_) => verb::realise_verb_phrase(ctx, tree, node),
        ElementKind::PrepositionPhrase(_)
        | ElementKind::AdjectivePhrase(_)
        | ElementKind::AdverbPhrase(_) => phrase::realise_phrase(ctx, tree, node),
        ElementKind::Clause(_) => clause::realise_clause(ctx, tree, node),
        ElementKind::Coordination(_) => coordination::realise_coordination(ctx, tree, node),
        ElementKind::List(items) => realise_list(ctx, tree, &items, None),
    }
}

/// Realise a sequence of elements, tagging each with `function` first.
/// False elements are skipped.
pub fn realise_list(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    nodes: &[NodeId],
    function: Option<DiscourseFunction>,
) -> Result<Vec<Token>, SyntaxError> {
    let mut out = Vec::new();
    for node in nodes {
        if !tree.is_truthy(*node) {
            continue;
        }
        if let Some(df) = function {
            tree.set_feature(*node, Feature::DiscourseFunction, df);
        }
        out.extend(realise(ctx, tree, *node)?);
    }
    Ok(out)
}

/// Token for a word node. Lexicon person, number and gender act as
/// defaults under the instance's own features.
pub(crate) fn word_token(ctx: &mut RealiseContext, tree: &Tree, node: NodeId, word: &Word) -> Token {
    let lexicon = ctx.lexicon();
    let entry = match lexicon.lookup(&word.base, word.category) {
        Some(e) => Some(e.clone()),
        None => {
            let inflecting = matches!(
                word.category,
                Category::Noun | Category::Verb | Category::Adjective | Category::Adverb
            );
            if inflecting && !tree.features(node).flag(Feature::Proper) && !word.base.is_empty() {
                ctx.add_warning(RealiseWarning::UnknownWord {
                    base: word.base.clone(),
                    category: word.category.name().to_string(),
                });
            }
            lexicon.first(&word.base, word.category)
        }
    };
    let category = match (&entry, word.category) {
        (Some(e), Category::Any) => e.category,
        _ => word.category,
    };
    let mut features = tree.features(node).clone();
    if let Some(e) = &entry {
        if !features.has(Feature::Person) {
            features.set_opt(Feature::Person, e.person);
        }
        if !features.has(Feature::Number) {
            features.set_opt(Feature::Number, e.number);
        }
        if !features.has(Feature::Gender) {
            features.set_opt(Feature::Gender, e.gender);
        }
        if e.flags.proper && !features.has(Feature::Proper) {
            features.set(Feature::Proper, true);
        }
    }
    Token {
        base: word.base.clone(),
        category,
        features,
        forms: word.forms.clone(),
        entry,
        parent: tree.parent(node),
        canned: false,
        realisation: None,
    }
}

/// Whether a verb-phrase head (or a bare verb) is a copula.
pub(crate) fn is_copular(ctx: &RealiseContext, tree: &Tree, node: NodeId) -> bool {
    let node = match tree.kind(node) {
        ElementKind::VerbPhrase(core) => core.head,
        _ => node,
    };
    match tree.kind(node) {
        ElementKind::Word(w) => ctx
            .lexicon()
            .lookup(&w.base, Category::Verb)
            .is_some_and(|e| e.flags.copular),
        _ => false,
    }
}

/// The word heading a noun phrase, if the head is a plain word.
pub(crate) fn head_word(tree: &Tree, node: NodeId) -> Option<NodeId> {
    match tree.kind(node) {
        ElementKind::Word(_) => Some(node),
        ElementKind::NounPhrase(np) => head_word(tree, np.core.head),
        ElementKind::Placeholder { value: Some(v), .. } => head_word(tree, *v),
        _ => None,
    }
}

fn head_entry<'a>(ctx: &RealiseContext<'a>, tree: &Tree, node: NodeId) -> Option<&'a WordEntry> {
    let word = head_word(tree, node)?;
    let w = tree.word_of(word)?;
    ctx.lexicon().lookup(&w.base, w.category)
}

/// Grammatical number of a nominal: its own feature, then its head word's,
/// then the lexicon's. Coordinations joined by the language's plain
/// conjunction are plural.
pub(crate) fn nominal_number(ctx: &RealiseContext, tree: &Tree, node: NodeId) -> Option<Number> {
    if let Some(n) = tree.features(node).number() {
        return Some(n);
    }
    match tree.kind(node) {
        ElementKind::Coordination(c) => {
            let conjunction = c
                .conjunction
                .and_then(|n| tree.word_of(n))
                .map(|w| w.base.as_str())
                .unwrap_or(ctx.language().conjunction());
            if conjunction == ctx.language().conjunction() && c.coordinates.len() > 1 {
                Some(Number::Plural)
            } else {
                c.coordinates
                    .last()
                    .and_then(|last| nominal_number(ctx, tree, *last))
            }
        }
        ElementKind::NounPhrase(np) => {
            if matches!(tree.kind(np.core.head), ElementKind::Coordination(_)) {
                return nominal_number(ctx, tree, np.core.head);
            }
            let word = head_word(tree, node)?;
            tree.features(word)
                .number()
                .or_else(|| head_entry(ctx, tree, node).and_then(|e| e.number))
        }
        ElementKind::Word(_) => head_entry(ctx, tree, node).and_then(|e| e.number),
        ElementKind::Placeholder { value: Some(v), .. } => nominal_number(ctx, tree, *v),
        _ => None,
    }
}

/// Grammatical person of a nominal. In coordinations first person outranks
/// second, which outranks third.
pub(crate) fn nominal_person(ctx: &RealiseContext, tree: &Tree, node: NodeId) -> Option<Person> {
    if let Some(p) = tree.features(node).person() {
        return Some(p);
    }
    match tree.kind(node) {
        ElementKind::Coordination(c) => {
            let persons: Vec<Person> = c
                .coordinates
                .iter()
                .filter_map(|n| nominal_person(ctx, tree, *n))
                .collect();
            if persons.contains(&Person::First) {
                Some(Person::First)
            } else if persons.contains(&Person::Second) {
                Some(Person::Second)
            } else {
                None
            }
        }
        ElementKind::NounPhrase(_) | ElementKind::Word(_) => {
            let word = head_word(tree, node)?;
            tree.features(word)
                .person()
                .or_else(|| head_entry(ctx, tree, node).and_then(|e| e.person))
        }
        ElementKind::Placeholder { value: Some(v), .. } => nominal_person(ctx, tree, *v),
        _ => None,
    }
}

/// Grammatical gender of a nominal. Coordinations are masculine unless every
/// coordinate is feminine.
pub(crate) fn nominal_gender(ctx: &RealiseContext, tree: &Tree, node: NodeId) -> Option<Gender> {
    if let Some(g) = tree.features(node).gender() {
        return Some(g);
    }
    match tree.kind(node) {
        ElementKind::Coordination(c) => {
            let all_feminine = !c.coordinates.is_empty()
                && c.coordinates
                    .iter()
                    .all(|n| nominal_gender(ctx, tree, *n) == Some(Gender::Feminine));
            Some(if all_feminine {
                Gender::Feminine
            } else {
                Gender::Masculine
            })
        }
        ElementKind::NounPhrase(_) | ElementKind::Word(_) => {
            let word = head_word(tree, node)?;
            tree.features(word)
                .gender()
                .or_else(|| head_entry(ctx, tree, node).and_then(|e| e.gender))
        }
        ElementKind::Placeholder { value: Some(v), .. } => nominal_gender(ctx, tree, *v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexicon::Lexicon;

    #[test]
    fn word_tokens_take_lexicon_defaults() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let they = tree.word("they", Category::Pronoun);
        let tokens = realise(&mut ctx, &mut tree, they).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].features.number(), Some(Number::Plural));
        assert_eq!(tokens[0].features.person(), Some(Person::Third));
    }

    #[test]
    fn unknown_words_warn() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let w = tree.word("blorft", Category::Noun);
        realise(&mut ctx, &mut tree, w).unwrap();
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn unfilled_placeholder_realises_its_name() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let p = tree.placeholder("agent");
        let tokens = realise(&mut ctx, &mut tree, p).unwrap();
        assert_eq!(tokens[0].base, "agent");
        assert_eq!(
            ctx.warnings(),
            &[RealiseWarning::UnfilledPlaceholder("agent".into())]
        );
    }

    #[test]
    fn elided_and_empty_realise_nothing() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let np = tree.np("the", "cat");
        tree.set_feature(np, Feature::Elided, true);
        let empty = tree.empty();
        let blank = tree.text("");
        let list = tree.list(vec![np, empty, blank]);
        assert!(realise(&mut ctx, &mut tree, list).unwrap().is_empty());
    }

    #[test]
    fn coordination_with_and_is_plural() {
        let lex = Lexicon::english().unwrap();
        let ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.proper_np("Mary");
        let b = tree.np("your", "giraffe");
        let both = tree.coordination(vec![a, b]);
        assert_eq!(nominal_number(&ctx, &tree, both), Some(Number::Plural));
        let c = tree.proper_np("George");
        let d = tree.proper_np("Martha");
        let either = tree.coordination_with(vec![c, d], "or");
        assert_eq!(nominal_number(&ctx, &tree, either), None);
    }
}
