/// The element tree: an arena of words, phrases, clauses and coordinations.
///
/// Nodes are addressed by [`NodeId`]. Each node records its parent as a plain
/// index; parents are only ever used for upward feature queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::feature::{
    Category, ClauseStatus, DiscourseFunction, Feature, FeatureSet, FeatureValue,
};
use super::word::WordForms;

#[derive(Debug, Error)]
pub enum ElementError {
    #[error("element {node:?} is a {found}, expected {expected}")]
    WrongKind {
        node: NodeId,
        found: &'static str,
        expected: &'static str,
    },
    #[error("unknown category '{0}' in element definition")]
    UnknownCategory(String),
    #[error("feature {feature:?} cannot hold {value:?}")]
    MalformedFeature {
        feature: Feature,
        value: FeatureValue,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Newtype wrapper for arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A lexical item. `forms` holds irregular spellings that override the
/// lexicon for this instance only.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub base: String,
    pub category: Category,
    pub forms: WordForms,
}

/// Slots shared by every phrase kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseCore {
    pub premodifiers: Vec<NodeId>,
    pub head: NodeId,
    pub complements: Vec<NodeId>,
    pub postmodifiers: Vec<NodeId>,
}

impl PhraseCore {
    pub fn new(head: NodeId) -> Self {
        PhraseCore {
            premodifiers: Vec::new(),
            head,
            complements: Vec::new(),
            postmodifiers: Vec::new(),
        }
    }

    fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.premodifiers
            .iter()
            .copied()
            .chain(std::iter::once(self.head))
            .chain(self.complements.iter().copied())
            .chain(self.postmodifiers.iter().copied())
    }

    fn map(&self, f: &mut impl FnMut(NodeId) -> NodeId) -> PhraseCore {
        PhraseCore {
            premodifiers: self.premodifiers.iter().map(|n| f(*n)).collect(),
            head: f(self.head),
            complements: self.complements.iter().map(|n| f(*n)).collect(),
            postmodifiers: self.postmodifiers.iter().map(|n| f(*n)).collect(),
        }
    }

    fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        if self.head == old {
            self.head = new;
            return true;
        }
        for slot in self
            .premodifiers
            .iter_mut()
            .chain(self.complements.iter_mut())
            .chain(self.postmodifiers.iter_mut())
        {
            if *slot == old {
                *slot = new;
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NounPhrase {
    pub specifier: Option<NodeId>,
    pub core: PhraseCore,
}

/// A clause. The core's head is the predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub front_modifiers: Vec<NodeId>,
    pub subject: NodeId,
    pub cue_phrase: Option<NodeId>,
    pub core: PhraseCore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coordination {
    pub coordinates: Vec<NodeId>,
    /// Conjunction word; the language default when absent.
    pub conjunction: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Sentinel for an absent head or subject.
    Empty,
    Word(Word),
    /// Canned text, emitted verbatim.
    Text(String),
    Placeholder {
        name: String,
        value: Option<NodeId>,
    },
    NounPhrase(NounPhrase),
    VerbPhrase(PhraseCore),
    PrepositionPhrase(PhraseCore),
    AdjectivePhrase(PhraseCore),
    AdverbPhrase(PhraseCore),
    Clause(Clause),
    Coordination(Coordination),
    List(Vec<NodeId>),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Word(_) => "word",
            Self::Text(_) => "text",
            Self::Placeholder { .. } => "placeholder",
            Self::NounPhrase(_) => "noun phrase",
            Self::VerbPhrase(_) => "verb phrase",
            Self::PrepositionPhrase(_) => "preposition phrase",
            Self::AdjectivePhrase(_) => "adjective phrase",
            Self::AdverbPhrase(_) => "adverb phrase",
            Self::Clause(_) => "clause",
            Self::Coordination(_) => "coordination",
            Self::List(_) => "list",
        }
    }

    pub fn core(&self) -> Option<&PhraseCore> {
        match self {
            Self::NounPhrase(np) => Some(&np.core),
            Self::VerbPhrase(c)
            | Self::PrepositionPhrase(c)
            | Self::AdjectivePhrase(c)
            | Self::AdverbPhrase(c) => Some(c),
            Self::Clause(c) => Some(&c.core),
            _ => None,
        }
    }

    pub fn core_mut(&mut self) -> Option<&mut PhraseCore> {
        match self {
            Self::NounPhrase(np) => Some(&mut np.core),
            Self::VerbPhrase(c)
            | Self::PrepositionPhrase(c)
            | Self::AdjectivePhrase(c)
            | Self::AdverbPhrase(c) => Some(c),
            Self::Clause(c) => Some(&mut c.core),
            _ => None,
        }
    }

    pub fn as_word(&self) -> Option<&Word> {
        match self {
            Self::Word(w) => Some(w),
            _ => None,
        }
    }

    pub fn is_phrase(&self) -> bool {
        matches!(
            self,
            Self::NounPhrase(_)
                | Self::VerbPhrase(_)
                | Self::PrepositionPhrase(_)
                | Self::AdjectivePhrase(_)
                | Self::AdverbPhrase(_)
        )
    }

    /// Children in linear (surface) order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::Empty | Self::Word(_) | Self::Text(_) => Vec::new(),
            Self::Placeholder { value, .. } => value.iter().copied().collect(),
            Self::NounPhrase(np) => np.specifier.iter().copied().chain(np.core.children()).collect(),
            Self::VerbPhrase(c)
            | Self::PrepositionPhrase(c)
            | Self::AdjectivePhrase(c)
            | Self::AdverbPhrase(c) => c.children().collect(),
            Self::Clause(c) => c
                .front_modifiers
                .iter()
                .copied()
                .chain(c.cue_phrase)
                .chain(std::iter::once(c.subject))
                .chain(c.core.children())
                .collect(),
            Self::Coordination(c) => c.coordinates.iter().copied().chain(c.conjunction).collect(),
            Self::List(items) => items.clone(),
        }
    }

    fn map_children(&self, f: &mut impl FnMut(NodeId) -> NodeId) -> ElementKind {
        match self {
            Self::Empty => Self::Empty,
            Self::Word(w) => Self::Word(w.clone()),
            Self::Text(s) => Self::Text(s.clone()),
            Self::Placeholder { name, value } => Self::Placeholder {
                name: name.clone(),
                value: value.map(|v| f(v)),
            },
            Self::NounPhrase(np) => Self::NounPhrase(NounPhrase {
                specifier: np.specifier.map(|s| f(s)),
                core: np.core.map(f),
            }),
            Self::VerbPhrase(c) => Self::VerbPhrase(c.map(f)),
            Self::PrepositionPhrase(c) => Self::PrepositionPhrase(c.map(f)),
            Self::AdjectivePhrase(c) => Self::AdjectivePhrase(c.map(f)),
            Self::AdverbPhrase(c) => Self::AdverbPhrase(c.map(f)),
            Self::Clause(c) => Self::Clause(Clause {
                front_modifiers: c.front_modifiers.iter().map(|n| f(*n)).collect(),
                cue_phrase: c.cue_phrase.map(|n| f(n)),
                subject: f(c.subject),
                core: c.core.map(f),
            }),
            Self::Coordination(c) => Self::Coordination(Coordination {
                coordinates: c.coordinates.iter().map(|n| f(*n)).collect(),
                conjunction: c.conjunction.map(|n| f(n)),
            }),
            Self::List(items) => Self::List(items.iter().map(|n| f(*n)).collect()),
        }
    }

    fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        match self {
            Self::Empty | Self::Word(_) | Self::Text(_) => false,
            Self::Placeholder { value, .. } => {
                if *value == Some(old) {
                    *value = Some(new);
                    true
                } else {
                    false
                }
            }
            Self::NounPhrase(np) => {
                if np.specifier == Some(old) {
                    np.specifier = Some(new);
                    true
                } else {
                    np.core.replace(old, new)
                }
            }
            Self::VerbPhrase(c)
            | Self::PrepositionPhrase(c)
            | Self::AdjectivePhrase(c)
            | Self::AdverbPhrase(c) => c.replace(old, new),
            Self::Clause(c) => {
                if c.subject == old {
                    c.subject = new;
                    return true;
                }
                if c.cue_phrase == Some(old) {
                    c.cue_phrase = Some(new);
                    return true;
                }
                if let Some(slot) = c.front_modifiers.iter_mut().find(|n| **n == old) {
                    *slot = new;
                    return true;
                }
                c.core.replace(old, new)
            }
            Self::Coordination(c) => {
                if let Some(slot) = c.coordinates.iter_mut().find(|n| **n == old) {
                    *slot = new;
                    return true;
                }
                if c.conjunction == Some(old) {
                    c.conjunction = Some(new);
                    return true;
                }
                false
            }
            Self::List(items) => match items.iter_mut().find(|n| **n == old) {
                Some(slot) => {
                    *slot = new;
                    true
                }
                None => false,
            },
        }
    }
}

/// One arena node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub features: FeatureSet,
    pub parent: Option<NodeId>,
}

/// Arena owning every element of one or more trees.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Element>,
}

fn wrong_kind(node: NodeId, found: &ElementKind, expected: &'static str) -> ElementError {
    ElementError::WrongKind {
        node,
        found: found.name(),
        expected,
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The element behind `id`.
    ///
    /// `id` must come from this tree: ids index the arena directly, so an id
    /// minted by another (larger) tree panics on out-of-bounds access. The
    /// same holds for every id-taking accessor below. Use [`Tree::import`]
    /// to bring elements across trees.
    pub fn get(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    /// Kind of `id`. Panics if `id` is not from this tree.
    pub fn kind(&self, id: NodeId) -> &ElementKind {
        &self.nodes[id.0].kind
    }

    /// Features of `id`. Panics if `id` is not from this tree.
    pub fn features(&self, id: NodeId) -> &FeatureSet {
        &self.nodes[id.0].features
    }

    pub fn features_mut(&mut self, id: NodeId) -> &mut FeatureSet {
        &mut self.nodes[id.0].features
    }

    pub fn set_feature(&mut self, id: NodeId, feature: Feature, value: impl Into<FeatureValue>) {
        self.nodes[id.0].features.set(feature, value);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Parent chain, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    pub fn word_of(&self, id: NodeId) -> Option<&Word> {
        self.kind(id).as_word()
    }

    /// Add a node and adopt its children.
    pub fn add(&mut self, kind: ElementKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let children = kind.children();
        self.nodes.push(Element {
            kind,
            features: FeatureSet::new(),
            parent: None,
        });
        for child in children {
            self.nodes[child.0].parent = Some(id);
        }
        id
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn empty(&mut self) -> NodeId {
        self.add(ElementKind::Empty)
    }

    pub fn word(&mut self, base: &str, category: Category) -> NodeId {
        self.add(ElementKind::Word(Word {
            base: base.to_string(),
            category,
            forms: WordForms::default(),
        }))
    }

    /// A word carrying its own irregular forms.
    pub fn word_with_forms(&mut self, base: &str, category: Category, forms: WordForms) -> NodeId {
        self.add(ElementKind::Word(Word {
            base: base.to_string(),
            category,
            forms,
        }))
    }

    pub fn text(&mut self, text: &str) -> NodeId {
        self.add(ElementKind::Text(text.to_string()))
    }

    pub fn placeholder(&mut self, name: &str) -> NodeId {
        self.add(ElementKind::Placeholder {
            name: name.to_string(),
            value: None,
        })
    }

    pub fn noun_phrase(&mut self, specifier: Option<NodeId>, head: NodeId) -> NodeId {
        if let Some(spec) = specifier {
            self.features_mut(spec)
                .set(Feature::DiscourseFunction, DiscourseFunction::Specifier);
        }
        self.add(ElementKind::NounPhrase(NounPhrase {
            specifier,
            core: PhraseCore::new(head),
        }))
    }

    /// Noun phrase from a determiner and a noun. An empty determiner means
    /// none.
    pub fn np(&mut self, determiner: &str, noun: &str) -> NodeId {
        let spec = if determiner.is_empty() {
            None
        } else {
            Some(self.word(determiner, Category::Determiner))
        };
        let head = self.word(noun, Category::Noun);
        self.noun_phrase(spec, head)
    }

    /// Noun phrase headed by a proper noun.
    pub fn proper_np(&mut self, name: &str) -> NodeId {
        let head = self.word(name, Category::Noun);
        self.set_feature(head, Feature::Proper, true);
        self.noun_phrase(None, head)
    }

    /// Noun phrase headed by a pronoun.
    pub fn pronoun_np(&mut self, pronoun: &str) -> NodeId {
        let head = self.word(pronoun, Category::Pronoun);
        self.noun_phrase(None, head)
    }

    pub fn verb_phrase(&mut self, head: NodeId) -> NodeId {
        self.add(ElementKind::VerbPhrase(PhraseCore::new(head)))
    }

    /// Verb phrase from a verb, splitting off a particle: "get up" becomes
    /// head "get" with particle "up".
    pub fn verb(&mut self, text: &str) -> NodeId {
        let mut parts = text.trim().splitn(2, ' ');
        let base = parts.next().unwrap_or_default();
        let head = self.word(base, Category::Verb);
        let vp = self.verb_phrase(head);
        if let Some(particle) = parts.next() {
            self.set_feature(vp, Feature::Particle, particle.trim());
        }
        vp
    }

    pub fn preposition_phrase(&mut self, head: NodeId, complement: NodeId) -> NodeId {
        let mut core = PhraseCore::new(head);
        core.complements.push(complement);
        self.add(ElementKind::PrepositionPhrase(core))
    }

    pub fn pp(&mut self, preposition: &str, complement: NodeId) -> NodeId {
        let head = self.word(preposition, Category::Preposition);
        self.preposition_phrase(head, complement)
    }

    pub fn adjective_phrase(&mut self, head: NodeId) -> NodeId {
        self.add(ElementKind::AdjectivePhrase(PhraseCore::new(head)))
    }

    pub fn adverb_phrase(&mut self, head: NodeId) -> NodeId {
        self.add(ElementKind::AdverbPhrase(PhraseCore::new(head)))
    }

    /// A clause. Bare words and text are promoted: the subject to a noun
    /// phrase, the predicate to a verb phrase.
    pub fn clause(&mut self, subject: NodeId, predicate: NodeId) -> NodeId {
        let subject = self.promote_to_noun_phrase(subject);
        let predicate = self.promote_to_verb_phrase(predicate);
        self.features_mut(subject)
            .set(Feature::DiscourseFunction, DiscourseFunction::Subject);
        self.features_mut(predicate)
            .set(Feature::DiscourseFunction, DiscourseFunction::VerbPhrase);
        self.add(ElementKind::Clause(Clause {
            front_modifiers: Vec::new(),
            subject,
            cue_phrase: None,
            core: PhraseCore::new(predicate),
        }))
    }

    pub fn coordination(&mut self, coordinates: Vec<NodeId>) -> NodeId {
        self.add(ElementKind::Coordination(Coordination {
            coordinates,
            conjunction: None,
        }))
    }

    /// Coordination with an explicit conjunction word.
    pub fn coordination_with(&mut self, coordinates: Vec<NodeId>, conjunction: &str) -> NodeId {
        let conj = self.word(conjunction, Category::Conjunction);
        self.features_mut(conj)
            .set(Feature::DiscourseFunction, DiscourseFunction::Conjunction);
        self.add(ElementKind::Coordination(Coordination {
            coordinates,
            conjunction: Some(conj),
        }))
    }

    pub fn list(&mut self, items: Vec<NodeId>) -> NodeId {
        self.add(ElementKind::List(items))
    }

    fn promote_to_noun_phrase(&mut self, id: NodeId) -> NodeId {
        match self.kind(id) {
            ElementKind::Word(_) | ElementKind::Text(_) | ElementKind::Placeholder { .. } => {
                let np = self.noun_phrase(None, id);
                let features = self.features(id).clone();
                features.transfer_to(self.features_mut(np));
                np
            }
            _ => id,
        }
    }

    fn promote_to_verb_phrase(&mut self, id: NodeId) -> NodeId {
        match self.kind(id) {
            ElementKind::Word(_) | ElementKind::Text(_) | ElementKind::Placeholder { .. } => {
                self.verb_phrase(id)
            }
            ElementKind::Empty => self.verb_phrase(id),
            _ => id,
        }
    }

    fn core_mut(&mut self, id: NodeId, expected: &'static str) -> Result<&mut PhraseCore, ElementError> {
        let node = &mut self.nodes[id.0];
        let found = node.kind.name();
        node.kind.core_mut().ok_or(ElementError::WrongKind {
            node: id,
            found,
            expected,
        })
    }

    /// The predicate of a clause, or the phrase itself otherwise.
    fn predicate_or_self(&self, id: NodeId) -> NodeId {
        match self.kind(id) {
            ElementKind::Clause(c) => c.core.head,
            _ => id,
        }
    }

    pub fn set_head(&mut self, phrase: NodeId, head: NodeId) -> Result<(), ElementError> {
        self.core_mut(phrase, "phrase")?.head = head;
        self.adopt(phrase, head);
        self.features_mut(head)
            .set(Feature::DiscourseFunction, DiscourseFunction::Head);
        Ok(())
    }

    pub fn set_specifier(&mut self, np: NodeId, specifier: NodeId) -> Result<(), ElementError> {
        match &mut self.nodes[np.0].kind {
            ElementKind::NounPhrase(p) => p.specifier = Some(specifier),
            other => return Err(wrong_kind(np, other, "noun phrase")),
        }
        self.adopt(np, specifier);
        self.features_mut(specifier)
            .set(Feature::DiscourseFunction, DiscourseFunction::Specifier);
        Ok(())
    }

    pub fn set_subject(&mut self, clause: NodeId, subject: NodeId) -> Result<(), ElementError> {
        let subject = self.promote_to_noun_phrase(subject);
        match &mut self.nodes[clause.0].kind {
            ElementKind::Clause(c) => c.subject = subject,
            other => return Err(wrong_kind(clause, other, "clause")),
        }
        self.adopt(clause, subject);
        self.features_mut(subject)
            .set(Feature::DiscourseFunction, DiscourseFunction::Subject);
        Ok(())
    }

    pub fn set_predicate(&mut self, clause: NodeId, predicate: NodeId) -> Result<(), ElementError> {
        let predicate = self.promote_to_verb_phrase(predicate);
        match &mut self.nodes[clause.0].kind {
            ElementKind::Clause(c) => c.core.head = predicate,
            other => return Err(wrong_kind(clause, other, "clause")),
        }
        self.adopt(clause, predicate);
        self.features_mut(predicate)
            .set(Feature::DiscourseFunction, DiscourseFunction::VerbPhrase);
        Ok(())
    }

    pub fn set_cue_phrase(&mut self, clause: NodeId, cue: NodeId) -> Result<(), ElementError> {
        match &mut self.nodes[clause.0].kind {
            ElementKind::Clause(c) => c.cue_phrase = Some(cue),
            other => return Err(wrong_kind(clause, other, "clause")),
        }
        self.adopt(clause, cue);
        self.features_mut(cue)
            .set(Feature::DiscourseFunction, DiscourseFunction::CuePhrase);
        Ok(())
    }

    fn set_verb_argument(
        &mut self,
        target: NodeId,
        argument: NodeId,
        function: DiscourseFunction,
    ) -> Result<(), ElementError> {
        let vp = self.predicate_or_self(target);
        let argument = self.promote_to_noun_phrase(argument);
        let existing: Vec<NodeId> = match self.kind(vp) {
            ElementKind::VerbPhrase(c) => c.complements.clone(),
            other => return Err(wrong_kind(vp, other, "verb phrase")),
        };
        let kept: Vec<NodeId> = existing
            .into_iter()
            .filter(|c| self.features(*c).discourse_function() != Some(function))
            .collect();
        let core = self.core_mut(vp, "verb phrase")?;
        core.complements = kept;
        core.complements.push(argument);
        self.adopt(vp, argument);
        self.features_mut(argument)
            .set(Feature::DiscourseFunction, function);
        Ok(())
    }

    /// Set the direct object of a clause or verb phrase, replacing any
    /// previous one.
    pub fn set_object(&mut self, target: NodeId, object: NodeId) -> Result<(), ElementError> {
        self.set_verb_argument(target, object, DiscourseFunction::Object)
    }

    pub fn set_indirect_object(&mut self, target: NodeId, object: NodeId) -> Result<(), ElementError> {
        self.set_verb_argument(target, object, DiscourseFunction::IndirectObject)
    }

    pub fn add_premodifier(&mut self, phrase: NodeId, modifier: NodeId) -> Result<(), ElementError> {
        self.core_mut(phrase, "phrase")?.premodifiers.push(modifier);
        self.adopt(phrase, modifier);
        Ok(())
    }

    pub fn add_postmodifier(&mut self, phrase: NodeId, modifier: NodeId) -> Result<(), ElementError> {
        self.core_mut(phrase, "phrase")?.postmodifiers.push(modifier);
        self.adopt(phrase, modifier);
        Ok(())
    }

    /// Add a complement. Complements without a discourse function take the
    /// object function; clauses and coordinations also become subordinate.
    pub fn add_complement(&mut self, phrase: NodeId, complement: NodeId) -> Result<(), ElementError> {
        let subordinate = matches!(
            self.kind(complement),
            ElementKind::Clause(_) | ElementKind::Coordination(_)
        );
        let fs = self.features_mut(complement);
        if subordinate {
            fs.set(Feature::ClauseStatus, ClauseStatus::Subordinate);
        }
        if !fs.has(Feature::DiscourseFunction) {
            fs.set(Feature::DiscourseFunction, DiscourseFunction::Object);
        }
        self.core_mut(phrase, "phrase")?.complements.push(complement);
        self.adopt(phrase, complement);
        Ok(())
    }

    pub fn add_front_modifier(&mut self, clause: NodeId, modifier: NodeId) -> Result<(), ElementError> {
        match &mut self.nodes[clause.0].kind {
            ElementKind::Clause(c) => c.front_modifiers.push(modifier),
            other => return Err(wrong_kind(clause, other, "clause")),
        }
        self.adopt(clause, modifier);
        Ok(())
    }

    pub fn add_coordinate(&mut self, coordination: NodeId, coordinate: NodeId) -> Result<(), ElementError> {
        match &mut self.nodes[coordination.0].kind {
            ElementKind::Coordination(c) => c.coordinates.push(coordinate),
            other => return Err(wrong_kind(coordination, other, "coordination")),
        }
        self.adopt(coordination, coordinate);
        Ok(())
    }

    /// All nodes of the subtree rooted at `root`, pre-order.
    pub fn constituents(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.kind(id).children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Replace the first occurrence of `one` under `root` with `another`.
    /// The replacement inherits the transferable features of `one`.
    pub fn replace(&mut self, root: NodeId, one: NodeId, another: NodeId) -> bool {
        let Some(owner) = self
            .constituents(root)
            .into_iter()
            .find(|n| self.kind(*n).children().contains(&one))
        else {
            return false;
        };
        if !self.nodes[owner.0].kind.replace_child(one, another) {
            return false;
        }
        let features = self.features(one).clone();
        features.transfer_to(self.features_mut(another));
        self.adopt(owner, another);
        true
    }

    /// Names of the placeholders under `root`, unfilled ones included.
    pub fn placeholders(&self, root: NodeId) -> Vec<(NodeId, String)> {
        self.constituents(root)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                ElementKind::Placeholder { name, .. } => Some((n, name.clone())),
                _ => None,
            })
            .collect()
    }

    /// Fill every placeholder named `name` under `root` with `value`. The
    /// first slot takes `value` itself, later ones take deep copies.
    pub fn fill_placeholder(&mut self, root: NodeId, name: &str, value: NodeId) -> bool {
        let slots: Vec<NodeId> = self
            .placeholders(root)
            .into_iter()
            .filter(|(_, n)| n == name)
            .map(|(id, _)| id)
            .collect();
        for (i, slot) in slots.iter().enumerate() {
            let filler = if i == 0 { value } else { self.deep_copy(value) };
            let features = self.features(*slot).clone();
            features.transfer_to(self.features_mut(filler));
            if let ElementKind::Placeholder { value, .. } = &mut self.nodes[slot.0].kind {
                *value = Some(filler);
            }
            self.adopt(*slot, filler);
        }
        !slots.is_empty()
    }

    /// Copy the subtree rooted at `id` within this arena.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let snapshot = self.clone();
        self.import(&snapshot, id)
    }

    /// Copy a subtree from another arena into this one.
    pub fn import(&mut self, source: &Tree, id: NodeId) -> NodeId {
        self.import_rec(source, id, None)
    }

    fn import_rec(&mut self, source: &Tree, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let new_id = NodeId(self.nodes.len());
        let original = source.get(id);
        self.nodes.push(Element {
            kind: ElementKind::Empty,
            features: original.features.clone(),
            parent,
        });
        let kind = original
            .kind
            .map_children(&mut |child| self.import_rec(source, child, Some(new_id)));
        self.nodes[new_id.0].kind = kind;
        new_id
    }

    /// Absence-as-false: empty sentinels, empty text and hollow containers
    /// are false.
    pub fn is_truthy(&self, id: NodeId) -> bool {
        match self.kind(id) {
            ElementKind::Empty => false,
            ElementKind::Text(s) => !s.is_empty(),
            ElementKind::Word(w) => !w.base.is_empty(),
            ElementKind::Placeholder { value, .. } => value.map_or(true, |v| self.is_truthy(v)),
            ElementKind::Coordination(c) => c.coordinates.iter().any(|n| self.is_truthy(*n)),
            ElementKind::List(items) => items.iter().any(|n| self.is_truthy(*n)),
            _ => true,
        }
    }

    /// Combine two elements: either one alone when the other is false,
    /// otherwise a coordination of both.
    pub fn combine(&mut self, a: NodeId, b: NodeId) -> NodeId {
        match (self.is_truthy(a), self.is_truthy(b)) {
            (_, false) => a,
            (false, true) => b,
            (true, true) => self.coordination(vec![a, b]),
        }
    }

    /// Structural equality across arenas, ignoring non-comparable features.
    pub fn structurally_equal(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        let x = self.get(a);
        let y = other.get(b);
        if !x.features.comparable_eq(&y.features) {
            return false;
        }
        let same_leaf = match (&x.kind, &y.kind) {
            (ElementKind::Word(w1), ElementKind::Word(w2)) => w1 == w2,
            (ElementKind::Text(t1), ElementKind::Text(t2)) => t1 == t2,
            (
                ElementKind::Placeholder { name: n1, .. },
                ElementKind::Placeholder { name: n2, .. },
            ) => n1 == n2,
            (k1, k2) => k1.name() == k2.name(),
        };
        if !same_leaf {
            return false;
        }
        let xs = x.kind.children();
        let ys = y.kind.children();
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys.iter())
                .all(|(c1, c2)| self.structurally_equal(*c1, other, *c2))
    }

    /// Base-form rendering, without morphology. Used for diagnostics.
    pub fn to_plain_string(&self, id: NodeId) -> String {
        match self.kind(id) {
            ElementKind::Empty => String::new(),
            ElementKind::Word(w) => w.base.clone(),
            ElementKind::Text(s) => s.clone(),
            ElementKind::Placeholder { name, value } => match value {
                Some(v) => self.to_plain_string(*v),
                None => name.clone(),
            },
            ElementKind::Coordination(c) => {
                let conj = c
                    .conjunction
                    .map(|n| self.to_plain_string(n))
                    .unwrap_or_else(|| "and".to_string());
                let parts: Vec<String> = c
                    .coordinates
                    .iter()
                    .map(|n| self.to_plain_string(*n))
                    .filter(|s| !s.is_empty())
                    .collect();
                parts.join(&format!(" {} ", conj))
            }
            kind => kind
                .children()
                .into_iter()
                .map(|n| self.to_plain_string(n))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mary_chases_monkey(tree: &mut Tree) -> NodeId {
        let mary = tree.proper_np("Mary");
        let chase = tree.verb("chase");
        let clause = tree.clause(mary, chase);
        let monkey = tree.np("the", "monkey");
        tree.set_object(clause, monkey).unwrap();
        clause
    }

    #[test]
    #[should_panic]
    fn foreign_id_is_out_of_bounds() {
        let mut big = Tree::new();
        let clause = mary_chases_monkey(&mut big);
        let small = Tree::new();
        let _ = small.kind(clause);
    }

    #[test]
    fn imported_id_is_usable() {
        let mut big = Tree::new();
        let clause = mary_chases_monkey(&mut big);
        let mut small = Tree::new();
        let copy = small.import(&big, clause);
        assert!(matches!(small.kind(copy), ElementKind::Clause(_)));
    }

    #[test]
    fn clause_promotes_bare_words() {
        let mut tree = Tree::new();
        let subj = tree.word("Mary", Category::Noun);
        let verb = tree.word("chase", Category::Verb);
        let clause = tree.clause(subj, verb);
        match tree.kind(clause) {
            ElementKind::Clause(c) => {
                assert!(matches!(tree.kind(c.subject), ElementKind::NounPhrase(_)));
                assert!(matches!(tree.kind(c.core.head), ElementKind::VerbPhrase(_)));
                assert_eq!(tree.parent(c.subject), Some(clause));
            }
            other => panic!("expected clause, got {:?}", other),
        }
    }

    #[test]
    fn verb_splits_particle() {
        let mut tree = Tree::new();
        let vp = tree.verb("get up");
        assert_eq!(tree.features(vp).text(Feature::Particle), Some("up"));
        assert_eq!(tree.to_plain_string(vp), "get");
    }

    #[test]
    fn set_object_replaces_previous_object() {
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        let cat = tree.np("a", "cat");
        tree.set_object(clause, cat).unwrap();
        assert_eq!(tree.to_plain_string(clause), "Mary chase a cat");
    }

    #[test]
    fn wrong_kind_is_an_error() {
        let mut tree = Tree::new();
        let vp = tree.verb("run");
        let det = tree.word("the", Category::Determiner);
        assert!(matches!(
            tree.set_specifier(vp, det),
            Err(ElementError::WrongKind { .. })
        ));
    }

    #[test]
    fn subordinate_complement() {
        let mut tree = Tree::new();
        let outer = tree.verb("know");
        let inner = mary_chases_monkey(&mut tree);
        tree.add_complement(outer, inner).unwrap();
        let fs = tree.features(inner);
        assert_eq!(fs.clause_status(), Some(ClauseStatus::Subordinate));
        assert_eq!(fs.discourse_function(), Some(DiscourseFunction::Object));
    }

    #[test]
    fn replace_transfers_features() {
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        let monkey = match tree.kind(clause) {
            ElementKind::Clause(c) => match tree.kind(c.core.head) {
                ElementKind::VerbPhrase(vp) => vp.complements[0],
                _ => unreachable!(),
            },
            _ => unreachable!(),
        };
        tree.set_feature(monkey, Feature::Number, crate::schema::feature::Number::Plural);
        let giraffe = tree.np("the", "giraffe");
        assert!(tree.replace(clause, monkey, giraffe));
        assert!(tree.features(giraffe).is_plural());
        assert_eq!(
            tree.features(giraffe).discourse_function(),
            Some(DiscourseFunction::Object)
        );
        assert_eq!(tree.to_plain_string(clause), "Mary chase the giraffe");
    }

    #[test]
    fn placeholders_fill_every_slot() {
        let mut tree = Tree::new();
        let a = tree.placeholder("who");
        let b = tree.placeholder("who");
        let list = tree.list(vec![a, b]);
        let mary = tree.proper_np("Mary");
        assert!(tree.fill_placeholder(list, "who", mary));
        assert_eq!(tree.to_plain_string(list), "Mary Mary");
        assert!(!tree.fill_placeholder(list, "nobody", mary));
    }

    #[test]
    fn truthiness() {
        let mut tree = Tree::new();
        let empty = tree.empty();
        let blank = tree.text("");
        let word = tree.word("cat", Category::Noun);
        assert!(!tree.is_truthy(empty));
        assert!(!tree.is_truthy(blank));
        assert!(tree.is_truthy(word));
        assert_eq!(tree.combine(word, empty), word);
        assert_eq!(tree.combine(blank, word), word);
        let both = tree.combine(word, word);
        assert!(matches!(tree.kind(both), ElementKind::Coordination(_)));
    }

    #[test]
    fn deep_copy_is_structurally_equal() {
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        let copy = tree.deep_copy(clause);
        assert_ne!(copy, clause);
        assert!(tree.structurally_equal(clause, &tree, copy));
        let chase_copy = match tree.kind(copy) {
            ElementKind::Clause(c) => c.core.head,
            _ => unreachable!(),
        };
        assert_eq!(tree.parent(chase_copy), Some(copy));
    }

    #[test]
    fn constituents_are_preorder() {
        let mut tree = Tree::new();
        let np = tree.np("the", "monkey");
        let order: Vec<String> = tree
            .constituents(np)
            .into_iter()
            .map(|n| tree.kind(n).name().to_string())
            .collect();
        assert_eq!(order, vec!["noun phrase", "word", "word"]);
    }
}
