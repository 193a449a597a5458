/// The realisation pipeline: element tree → tokens → inflected words →
/// sentence.
///
/// Orchestrates syntax, morphology, morphophonology and assembly over a
/// working copy of the caller's tree.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::core::assembler;
use crate::core::context::{RealiseContext, RealiseWarning};
use crate::core::lexicon::{Lexicon, LexiconError, Tagger};
use crate::core::morphology::{self, MorphologyError};
use crate::core::morphophonology;
use crate::core::syntax::{self, phrase, SyntaxError, Token};
use crate::schema::element::{ElementError, NodeId, Tree};
use crate::schema::feature::{Feature, Language};

#[derive(Debug, Error)]
pub enum RealiseError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("morphology error: {0}")]
    Morphology(#[from] MorphologyError),
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("element error: {0}")]
    Element(#[from] ElementError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Realiser settings as stored on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RealiserConfig {
    #[serde(default)]
    pub language: Language,
    /// Lexicon files merged over the embedded entries, in order.
    #[serde(default)]
    pub lexicon_files: Vec<String>,
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_create_if_missing() -> bool {
    true
}

impl Default for RealiserConfig {
    fn default() -> Self {
        RealiserConfig {
            language: Language::default(),
            lexicon_files: Vec::new(),
            create_if_missing: true,
        }
    }
}

impl RealiserConfig {
    pub fn load_from_ron(path: &Path) -> Result<RealiserConfig, RealiseError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<RealiserConfig, RealiseError> {
        Ok(ron::from_str(input)?)
    }
}

/// Everything one realisation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Realisation {
    pub text: String,
    pub words: Vec<String>,
    pub warnings: Vec<RealiseWarning>,
}

/// Turns element trees into sentences for one language. Built via
/// `Realiser::builder()`.
#[derive(Debug, Clone)]
pub struct Realiser {
    lexicon: Lexicon,
}

/// Builder for constructing a `Realiser`.
pub struct RealiserBuilder {
    language: Language,
    lexicon_files: Vec<PathBuf>,
    lexicon_dirs: Vec<PathBuf>,
    /// Directly provided lexicon, replacing the embedded one.
    lexicon: Option<Lexicon>,
    tagger: Option<Arc<dyn Tagger>>,
    create_if_missing: Option<bool>,
}

impl Realiser {
    pub fn builder() -> RealiserBuilder {
        RealiserBuilder {
            language: Language::English,
            lexicon_files: Vec::new(),
            lexicon_dirs: Vec::new(),
            lexicon: None,
            tagger: None,
            create_if_missing: None,
        }
    }

    /// English realiser over the embedded lexicon.
    pub fn english() -> Result<Realiser, RealiseError> {
        Self::builder().language(Language::English).build()
    }

    /// French realiser over the embedded lexicon.
    pub fn french() -> Result<Realiser, RealiseError> {
        Self::builder().language(Language::French).build()
    }

    pub fn language(&self) -> Language {
        self.lexicon.language()
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Realise `root` into a finished sentence.
    pub fn realise(&self, tree: &Tree, root: NodeId) -> Result<String, RealiseError> {
        Ok(self.realise_with_diagnostics(tree, root)?.text)
    }

    /// The inflected token sequence before assembly. Blanked tokens are
    /// kept with an empty realisation.
    pub fn realise_tokens(&self, tree: &Tree, root: NodeId) -> Result<Vec<Token>, RealiseError> {
        let mut ctx = RealiseContext::new(&self.lexicon);
        self.run(&mut ctx, tree, root)
    }

    /// The surface words, in order, without punctuation of the sentence.
    pub fn realise_words(&self, tree: &Tree, root: NodeId) -> Result<Vec<String>, RealiseError> {
        Ok(surface_words(&self.realise_tokens(tree, root)?))
    }

    pub fn realise_with_diagnostics(
        &self,
        tree: &Tree,
        root: NodeId,
    ) -> Result<Realisation, RealiseError> {
        let mut ctx = RealiseContext::new(&self.lexicon);
        let tokens = self.run(&mut ctx, tree, root)?;
        let interrogative = tree.features(root).has(Feature::InterrogativeType);
        Ok(Realisation {
            text: assembler::assemble(&tokens, interrogative),
            words: surface_words(&tokens),
            warnings: ctx.take_warnings(),
        })
    }

    /// Parse a RON element definition and realise it.
    pub fn realise_ron(&self, input: &str) -> Result<Realisation, RealiseError> {
        let (tree, root) = Tree::parse_ron(input)?;
        self.realise_with_diagnostics(&tree, root)
    }

    /// Attach `modifier` to `phrase` in the position its category calls
    /// for in this language.
    pub fn add_modifier(
        &self,
        tree: &mut Tree,
        phrase: NodeId,
        modifier: NodeId,
    ) -> Result<(), RealiseError> {
        phrase::add_modifier(&self.lexicon, tree, phrase, modifier)?;
        Ok(())
    }

    fn run(
        &self,
        ctx: &mut RealiseContext,
        tree: &Tree,
        root: NodeId,
    ) -> Result<Vec<Token>, RealiseError> {
        let mut working = tree.clone();
        let mut tokens = syntax::realise(ctx, &mut working, root)?;
        morphology::inflect_tokens(ctx, &working, &mut tokens)?;
        morphophonology::apply(ctx, &mut tokens);
        Ok(tokens)
    }
}

fn surface_words(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !t.is_blank())
        .map(|t| t.text().to_string())
        .collect()
}

impl RealiserBuilder {
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Merge a lexicon file over the embedded entries.
    pub fn lexicon_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_files.push(path.into());
        self
    }

    /// Merge every .ron file in a directory over the embedded entries.
    pub fn lexicon_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_dirs.push(path.into());
        self
    }

    /// Provide a lexicon directly (for testing without files).
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = Some(create);
        self
    }

    pub fn config(mut self, config: RealiserConfig) -> Self {
        self.language = config.language;
        self.lexicon_files
            .extend(config.lexicon_files.into_iter().map(PathBuf::from));
        self.create_if_missing = Some(config.create_if_missing);
        self
    }

    pub fn build(self) -> Result<Realiser, RealiseError> {
        let mut lexicon = match self.lexicon {
            Some(lexicon) => lexicon,
            None => Lexicon::default_for(self.language)?,
        };

        // Files override the embedded entries, directories after files
        for path in &self.lexicon_files {
            lexicon.merge(Lexicon::load_from_ron(path)?)?;
        }
        for dir in &self.lexicon_dirs {
            if dir.exists() {
                lexicon.load_dir(dir)?;
            }
        }

        if let Some(tagger) = self.tagger {
            lexicon.set_tagger(tagger);
        }
        if let Some(create) = self.create_if_missing {
            lexicon.set_create_if_missing(create);
        }
        Ok(Realiser { lexicon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::feature::{Category, Tense};

    fn chase(tree: &mut Tree) -> NodeId {
        let mary = tree.proper_np("Mary");
        let vp = tree.verb("chase");
        let monkey = tree.np("the", "monkey");
        tree.set_object(vp, monkey).unwrap();
        tree.clause(mary, vp)
    }

    #[test]
    fn builder_defaults_to_english() {
        let realiser = Realiser::builder().build().unwrap();
        assert_eq!(realiser.language(), Language::English);
        assert!(!realiser.lexicon().is_empty());
    }

    #[test]
    fn realises_simple_clause() {
        let realiser = Realiser::english().unwrap();
        let mut tree = Tree::new();
        let s = chase(&mut tree);
        assert_eq!(realiser.realise(&tree, s).unwrap(), "Mary chases the monkey.");
        tree.set_feature(s, Feature::Tense, Tense::Past);
        assert_eq!(realiser.realise(&tree, s).unwrap(), "Mary chased the monkey.");
    }

    #[test]
    fn caller_tree_is_untouched() {
        let realiser = Realiser::english().unwrap();
        let mut tree = Tree::new();
        let s = chase(&mut tree);
        let before = tree.clone();
        realiser.realise(&tree, s).unwrap();
        assert!(tree.structurally_equal(s, &before, s));
        assert_eq!(tree.len(), before.len());
    }

    #[test]
    fn words_and_diagnostics() {
        let realiser = Realiser::english().unwrap();
        let mut tree = Tree::new();
        let s = chase(&mut tree);
        let gap = tree.placeholder("where");
        tree.add_postmodifier(s, gap).unwrap();
        let out = realiser.realise_with_diagnostics(&tree, s).unwrap();
        assert_eq!(out.words.last().map(String::as_str), Some("where"));
        assert_eq!(
            out.warnings,
            vec![RealiseWarning::UnfilledPlaceholder("where".into())]
        );
    }

    #[test]
    fn config_from_ron() {
        let cfg = RealiserConfig::parse_ron("(language: French, create_if_missing: false)").unwrap();
        assert_eq!(cfg.language, Language::French);
        assert!(cfg.lexicon_files.is_empty());
        let realiser = Realiser::builder().config(cfg).build().unwrap();
        assert_eq!(realiser.language(), Language::French);
        assert!(!realiser.lexicon().create_if_missing());
    }

    #[test]
    fn missing_lexicon_file_is_an_error() {
        let result = Realiser::builder()
            .lexicon_file("no/such/lexicon.ron")
            .build();
        assert!(matches!(result, Err(RealiseError::Lexicon(LexiconError::Io(_)))));
    }

    #[test]
    fn modifier_placement() {
        let realiser = Realiser::english().unwrap();
        let mut tree = Tree::new();
        let s = chase(&mut tree);
        let quickly = tree.word("quickly", Category::Adverb);
        realiser.add_modifier(&mut tree, s, quickly).unwrap();
        assert_eq!(realiser.realise(&tree, s).unwrap(), "Mary quickly chases the monkey.");
    }
}
