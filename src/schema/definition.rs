/// RON element definitions: a serialisable tree shape that builds into a
/// [`Tree`] arena.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use ron::extensions::Extensions;
use std::path::Path;

use super::element::{ElementError, ElementKind, NodeId, PhraseCore, Tree};
use super::feature::{Category, Feature, FeatureValue};

type FeatureMap = FxHashMap<Feature, FeatureValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhraseKindDef {
    Noun,
    Verb,
    Preposition,
    Adjective,
    Adverb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordDef {
    pub base: String,
    #[serde(default = "any_category")]
    pub category: String,
    #[serde(default)]
    pub features: FeatureMap,
}

fn any_category() -> String {
    "any".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseDef {
    pub kind: PhraseKindDef,
    pub head: Box<ElementDef>,
    #[serde(default)]
    pub specifier: Option<Box<ElementDef>>,
    #[serde(default)]
    pub premodifiers: Vec<ElementDef>,
    #[serde(default)]
    pub complements: Vec<ElementDef>,
    #[serde(default)]
    pub postmodifiers: Vec<ElementDef>,
    /// Verb particle ("up" in "get up").
    #[serde(default)]
    pub particle: Option<String>,
    #[serde(default)]
    pub features: FeatureMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseDef {
    #[serde(default)]
    pub subject: Option<Box<ElementDef>>,
    pub predicate: Box<ElementDef>,
    #[serde(default)]
    pub object: Option<Box<ElementDef>>,
    #[serde(default)]
    pub indirect_object: Option<Box<ElementDef>>,
    #[serde(default)]
    pub front_modifiers: Vec<ElementDef>,
    #[serde(default)]
    pub cue_phrase: Option<Box<ElementDef>>,
    #[serde(default)]
    pub premodifiers: Vec<ElementDef>,
    #[serde(default)]
    pub complements: Vec<ElementDef>,
    #[serde(default)]
    pub postmodifiers: Vec<ElementDef>,
    #[serde(default)]
    pub features: FeatureMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationDef {
    pub coordinates: Vec<ElementDef>,
    #[serde(default)]
    pub conjunction: Option<String>,
    #[serde(default)]
    pub features: FeatureMap,
}

/// A serialisable element tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementDef {
    Word(WordDef),
    Text(String),
    Placeholder(String),
    Phrase(PhraseDef),
    Clause(ClauseDef),
    Coordination(CoordinationDef),
    List(Vec<ElementDef>),
}

impl Tree {
    /// Parse a RON element definition into a fresh tree, returning the tree
    /// and its root.
    pub fn parse_ron(input: &str) -> Result<(Tree, NodeId), ElementError> {
        let def: ElementDef = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(input)?;
        let mut tree = Tree::new();
        let root = tree.from_def(&def)?;
        Ok((tree, root))
    }

    pub fn load_from_ron(path: &Path) -> Result<(Tree, NodeId), ElementError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Build a definition into this arena.
    pub fn from_def(&mut self, def: &ElementDef) -> Result<NodeId, ElementError> {
        match def {
            ElementDef::Word(w) => {
                let category = Category::parse(&w.category)
                    .ok_or_else(|| ElementError::UnknownCategory(w.category.clone()))?;
                let id = self.word(&w.base, category);
                self.apply_features(id, &w.features)?;
                Ok(id)
            }
            ElementDef::Text(s) => Ok(self.text(s)),
            ElementDef::Placeholder(name) => Ok(self.placeholder(name)),
            ElementDef::Phrase(p) => self.phrase_from_def(p),
            ElementDef::Clause(c) => self.clause_from_def(c),
            ElementDef::Coordination(c) => {
                let coordinates = c
                    .coordinates
                    .iter()
                    .map(|d| self.from_def(d))
                    .collect::<Result<Vec<_>, _>>()?;
                let id = match &c.conjunction {
                    Some(conj) => self.coordination_with(coordinates, conj),
                    None => self.coordination(coordinates),
                };
                self.apply_features(id, &c.features)?;
                Ok(id)
            }
            ElementDef::List(items) => {
                let items = items
                    .iter()
                    .map(|d| self.from_def(d))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.list(items))
            }
        }
    }

    fn phrase_from_def(&mut self, p: &PhraseDef) -> Result<NodeId, ElementError> {
        let head = self.from_def(&p.head)?;
        let id = match p.kind {
            PhraseKindDef::Noun => {
                let specifier = match &p.specifier {
                    Some(s) => Some(self.from_def(s)?),
                    None => None,
                };
                self.noun_phrase(specifier, head)
            }
            PhraseKindDef::Verb => self.verb_phrase(head),
            PhraseKindDef::Preposition => {
                self.add(ElementKind::PrepositionPhrase(PhraseCore::new(head)))
            }
            PhraseKindDef::Adjective => self.adjective_phrase(head),
            PhraseKindDef::Adverb => self.adverb_phrase(head),
        };
        for d in &p.premodifiers {
            let m = self.from_def(d)?;
            self.add_premodifier(id, m)?;
        }
        for d in &p.complements {
            let c = self.from_def(d)?;
            self.add_complement(id, c)?;
        }
        for d in &p.postmodifiers {
            let m = self.from_def(d)?;
            self.add_postmodifier(id, m)?;
        }
        if let Some(particle) = &p.particle {
            self.set_feature(id, Feature::Particle, particle.as_str());
        }
        self.apply_features(id, &p.features)?;
        Ok(id)
    }

    fn clause_from_def(&mut self, c: &ClauseDef) -> Result<NodeId, ElementError> {
        let subject = match &c.subject {
            Some(s) => self.from_def(s)?,
            None => self.empty(),
        };
        let predicate = self.from_def(&c.predicate)?;
        let id = self.clause(subject, predicate);
        if let Some(o) = &c.object {
            let o = self.from_def(o)?;
            self.set_object(id, o)?;
        }
        if let Some(o) = &c.indirect_object {
            let o = self.from_def(o)?;
            self.set_indirect_object(id, o)?;
        }
        for d in &c.front_modifiers {
            let m = self.from_def(d)?;
            self.add_front_modifier(id, m)?;
        }
        if let Some(cue) = &c.cue_phrase {
            let cue = self.from_def(cue)?;
            self.set_cue_phrase(id, cue)?;
        }
        for d in &c.premodifiers {
            let m = self.from_def(d)?;
            self.add_premodifier(id, m)?;
        }
        for d in &c.complements {
            let m = self.from_def(d)?;
            self.add_complement(id, m)?;
        }
        for d in &c.postmodifiers {
            let m = self.from_def(d)?;
            self.add_postmodifier(id, m)?;
        }
        self.apply_features(id, &c.features)?;
        Ok(id)
    }

    fn apply_features(&mut self, id: NodeId, features: &FeatureMap) -> Result<(), ElementError> {
        for (feature, value) in features {
            if !feature.accepts(value) {
                return Err(ElementError::MalformedFeature {
                    feature: *feature,
                    value: value.clone(),
                });
            }
            self.set_feature(id, *feature, value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"
        Clause((
            subject: Phrase((kind: Noun, head: Word((base: "Mary", category: "noun", features: {Proper: Bool(true)})))),
            predicate: Phrase((kind: Verb, head: Word((base: "chase", category: "verb")))),
            object: Phrase((
                kind: Noun,
                specifier: Word((base: "the", category: "determiner")),
                head: Word((base: "monkey", category: "noun")),
            )),
            features: {Tense: Tense(Past)},
        ))
    "#;

    #[test]
    fn parse_clause_definition() {
        let (tree, root) = Tree::parse_ron(SIMPLE).unwrap();
        assert_eq!(tree.to_plain_string(root), "Mary chase the monkey");
        assert_eq!(
            tree.features(root).tense(),
            Some(crate::schema::feature::Tense::Past)
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let input = r#"Word((base: "x", category: "gizmo"))"#;
        assert!(matches!(
            Tree::parse_ron(input),
            Err(ElementError::UnknownCategory(_))
        ));
    }

    #[test]
    fn malformed_feature_is_rejected() {
        let input = r#"Word((base: "x", features: {Tense: Bool(true)}))"#;
        assert!(matches!(
            Tree::parse_ron(input),
            Err(ElementError::MalformedFeature { .. })
        ));
    }
}
