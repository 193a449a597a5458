/// Per-language lexicon: word entries indexed by spelling, category and id,
/// loaded from RON.

use ron::extensions::Extensions;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::schema::feature::{
    Category, DiscourseFunction, Gender, Language, Number, Person, PronounType,
};
use crate::schema::word::{Inflection, WordEntry, WordFlags, WordForms};

const ENGLISH_DATA: &str = include_str!("../../lexicon_data/english.ron");
const FRENCH_DATA: &str = include_str!("../../lexicon_data/french.ron");

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("entry '{id}' has unknown category '{category}'")]
    UnknownCategory { id: String, category: String },
    #[error("entry '{id}' has unknown inflection code '{code}'")]
    UnknownInflection { id: String, code: String },
    #[error("duplicate entry id '{0}'")]
    DuplicateId(String),
    #[error("cannot merge a {found:?} lexicon into a {expected:?} one")]
    LanguageMismatch { expected: Language, found: Language },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Part-of-speech guesser consulted for words the lexicon does not know.
pub trait Tagger: Send + Sync {
    fn tag(&self, word: &str) -> Option<Category>;
}

/// Word store for one language.
#[derive(Clone)]
pub struct Lexicon {
    language: Language,
    entries: Vec<WordEntry>,
    by_id: FxHashMap<String, usize>,
    by_spelling: FxHashMap<String, Vec<usize>>,
    by_category: FxHashMap<Category, Vec<usize>>,
    tagger: Option<Arc<dyn Tagger>>,
    create_if_missing: bool,
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("language", &self.language)
            .field("entries", &self.entries.len())
            .field("tagger", &self.tagger.is_some())
            .field("create_if_missing", &self.create_if_missing)
            .finish()
    }
}

// RON deserialization helpers: lexicon files are flat records, the
// internal entry groups forms and flags.

#[derive(Debug, Deserialize)]
#[serde(rename = "Lexicon")]
struct RonLexicon {
    language: Language,
    entries: Vec<RonEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RonEntry {
    id: Option<String>,
    base: String,
    category: String,
    variants: Vec<String>,
    inflections: Vec<String>,
    plural: Option<String>,
    comparative: Option<String>,
    superlative: Option<String>,
    past: Option<String>,
    past_participle: Option<String>,
    present_participle: Option<String>,
    present3s: Option<String>,
    feminine_singular: Option<String>,
    feminine_plural: Option<String>,
    feminine_past_participle: Option<String>,
    liaison: Option<String>,
    opposite_gender: Option<String>,
    future_radical: Option<String>,
    imparfait_radical: Option<String>,
    present1s: Option<String>,
    present2s: Option<String>,
    present1p: Option<String>,
    present2p: Option<String>,
    present3p: Option<String>,
    subjunctive1s: Option<String>,
    subjunctive2s: Option<String>,
    subjunctive3s: Option<String>,
    subjunctive1p: Option<String>,
    subjunctive2p: Option<String>,
    subjunctive3p: Option<String>,
    imperative2s: Option<String>,
    imperative1p: Option<String>,
    imperative2p: Option<String>,
    proper: bool,
    transitive: bool,
    intransitive: bool,
    ditransitive: bool,
    reflexive: bool,
    expletive_subject: bool,
    vowel_elision: bool,
    aspired_h: bool,
    preposed: bool,
    copular: bool,
    auxiliary_etre: bool,
    possessive: bool,
    detached: bool,
    gender: Option<Gender>,
    person: Option<Person>,
    number: Option<Number>,
    pronoun_type: Option<PronounType>,
    discourse_function: Option<DiscourseFunction>,
}

impl RonEntry {
    fn into_entry(self) -> Result<WordEntry, LexiconError> {
        let category_name = self.category.clone();
        let category = Category::parse(&self.category);
        let id = self
            .id
            .unwrap_or_else(|| format!("{}_{}", category_name.to_ascii_lowercase(), self.base));
        let category = category.ok_or_else(|| LexiconError::UnknownCategory {
            id: id.clone(),
            category: category_name,
        })?;
        let mut inflections = Vec::new();
        for code in &self.inflections {
            let infl = Inflection::parse(code).ok_or_else(|| LexiconError::UnknownInflection {
                id: id.clone(),
                code: code.clone(),
            })?;
            inflections.push(infl);
        }
        // present3s doubles as the English third person singular.
        let forms = WordForms {
            plural: self.plural,
            comparative: self.comparative,
            superlative: self.superlative,
            past: self.past,
            past_participle: self.past_participle,
            present_participle: self.present_participle,
            present3s: self.present3s.clone(),
            feminine_singular: self.feminine_singular,
            feminine_plural: self.feminine_plural,
            feminine_past_participle: self.feminine_past_participle,
            liaison: self.liaison,
            opposite_gender: self.opposite_gender,
            future_radical: self.future_radical,
            imparfait_radical: self.imparfait_radical,
            present: [
                self.present1s,
                self.present2s,
                self.present3s,
                self.present1p,
                self.present2p,
                self.present3p,
            ],
            subjunctive: [
                self.subjunctive1s,
                self.subjunctive2s,
                self.subjunctive3s,
                self.subjunctive1p,
                self.subjunctive2p,
                self.subjunctive3p,
            ],
            imperative2s: self.imperative2s,
            imperative1p: self.imperative1p,
            imperative2p: self.imperative2p,
        };
        let flags = WordFlags {
            proper: self.proper,
            transitive: self.transitive,
            intransitive: self.intransitive,
            ditransitive: self.ditransitive,
            reflexive: self.reflexive,
            expletive_subject: self.expletive_subject,
            vowel_elision: self.vowel_elision,
            aspired_h: self.aspired_h,
            preposed: self.preposed,
            copular: self.copular,
            auxiliary_etre: self.auxiliary_etre,
            possessive: self.possessive,
            detached: self.detached,
        };
        Ok(WordEntry {
            id,
            base: self.base,
            category,
            variants: self.variants,
            inflections,
            forms,
            flags,
            gender: self.gender,
            person: self.person,
            number: self.number,
            pronoun_type: self.pronoun_type,
            discourse_function: self.discourse_function,
        })
    }
}

impl Lexicon {
    pub fn new(language: Language) -> Self {
        Lexicon {
            language,
            entries: Vec::new(),
            by_id: FxHashMap::default(),
            by_spelling: FxHashMap::default(),
            by_category: FxHashMap::default(),
            tagger: None,
            create_if_missing: true,
        }
    }

    /// The embedded English lexicon.
    pub fn english() -> Result<Lexicon, LexiconError> {
        Self::parse_ron(ENGLISH_DATA)
    }

    /// The embedded French lexicon.
    pub fn french() -> Result<Lexicon, LexiconError> {
        Self::parse_ron(FRENCH_DATA)
    }

    /// The embedded lexicon for `language`.
    pub fn default_for(language: Language) -> Result<Lexicon, LexiconError> {
        match language {
            Language::English => Self::english(),
            Language::French => Self::french(),
        }
    }

    /// Load a lexicon from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Lexicon, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a lexicon from a RON string.
    pub fn parse_ron(input: &str) -> Result<Lexicon, LexiconError> {
        let raw: RonLexicon = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(input)?;
        let mut lexicon = Lexicon::new(raw.language);
        for entry in raw.entries {
            lexicon.insert(entry.into_entry()?)?;
        }
        Ok(lexicon)
    }

    /// Merge every .ron file in `dir` into this lexicon.
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), LexiconError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                paths.push(path);
            }
        }
        paths.sort();
        for path in paths {
            let other = Self::load_from_ron(&path)?;
            self.merge(other)?;
        }
        Ok(())
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter()
    }

    pub fn set_tagger(&mut self, tagger: Arc<dyn Tagger>) {
        self.tagger = Some(tagger);
    }

    /// Whether lookups of unknown words fabricate a regular entry.
    pub fn set_create_if_missing(&mut self, create: bool) {
        self.create_if_missing = create;
    }

    pub fn create_if_missing(&self) -> bool {
        self.create_if_missing
    }

    /// Add an entry. Ids must be unique.
    pub fn insert(&mut self, entry: WordEntry) -> Result<(), LexiconError> {
        if self.by_id.contains_key(&entry.id) {
            return Err(LexiconError::DuplicateId(entry.id));
        }
        let idx = self.entries.len();
        self.index(idx, &entry);
        self.entries.push(entry);
        Ok(())
    }

    fn index(&mut self, idx: usize, entry: &WordEntry) {
        self.by_id.insert(entry.id.clone(), idx);
        for spelling in entry.spellings() {
            let slot = self.by_spelling.entry(spelling.to_string()).or_default();
            if !slot.contains(&idx) {
                slot.push(idx);
            }
        }
        self.by_category.entry(entry.category).or_default().push(idx);
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_spelling.clear();
        self.by_category.clear();
        let entries = std::mem::take(&mut self.entries);
        for (idx, entry) in entries.iter().enumerate() {
            self.index(idx, entry);
        }
        self.entries = entries;
    }

    /// Merge another lexicon into this one. Entries from `other` replace
    /// entries in `self` with the same id.
    pub fn merge(&mut self, other: Lexicon) -> Result<(), LexiconError> {
        if other.language != self.language {
            return Err(LexiconError::LanguageMismatch {
                expected: self.language,
                found: other.language,
            });
        }
        for entry in other.entries {
            match self.by_id.get(&entry.id) {
                Some(&idx) => self.entries[idx] = entry,
                None => self.entries.push(entry),
            }
        }
        self.reindex();
        Ok(())
    }

    /// Stored entry for a spelling, without creating anything. Entries whose
    /// base form matches win over entries matching through a variant.
    pub fn lookup(&self, spelling: &str, category: Category) -> Option<&WordEntry> {
        let candidates = self
            .by_spelling
            .get(spelling)
            .or_else(|| self.by_spelling.get(&spelling.to_lowercase()))?;
        let mut fallback = None;
        for entry in candidates.iter().map(|i| &self.entries[*i]) {
            if !entry.category.matches(category) {
                continue;
            }
            if entry.base.eq_ignore_ascii_case(spelling) {
                return Some(entry);
            }
            if fallback.is_none() {
                fallback = Some(entry);
            }
        }
        fallback
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.by_spelling.contains_key(spelling)
    }

    /// All entries for a spelling and category, as independent copies. When
    /// none is stored and `create_if_missing` is on, a fresh regular entry
    /// is returned instead.
    pub fn get(&self, spelling: &str, category: Category) -> Vec<WordEntry> {
        let found: Vec<WordEntry> = self
            .by_spelling
            .get(spelling)
            .map(|idxs| {
                idxs.iter()
                    .map(|i| &self.entries[*i])
                    .filter(|e| e.category.matches(category))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if found.is_empty() && self.create_if_missing {
            return vec![self.create(spelling, category)];
        }
        found
    }

    /// First matching entry, see [`Lexicon::get`].
    pub fn first(&self, spelling: &str, category: Category) -> Option<WordEntry> {
        match self.lookup(spelling, category) {
            Some(e) => Some(e.clone()),
            None if self.create_if_missing => Some(self.create(spelling, category)),
            None => None,
        }
    }

    /// Fabricate an entry for an unknown word. The category comes from the
    /// request, then the tagger, then defaults to noun.
    pub fn create(&self, spelling: &str, category: Category) -> WordEntry {
        let category = match category {
            Category::Any => self
                .tagger
                .as_ref()
                .and_then(|t| t.tag(spelling))
                .unwrap_or(Category::Noun),
            c => c,
        };
        WordEntry::new(spelling, category)
    }

    pub fn by_id(&self, id: &str) -> Option<WordEntry> {
        self.by_id.get(id).map(|i| self.entries[*i].clone())
    }

    pub fn by_category(&self, category: Category) -> Vec<WordEntry> {
        self.by_category
            .get(&category)
            .map(|idxs| idxs.iter().map(|i| self.entries[*i].clone()).collect())
            .unwrap_or_default()
    }

    /// First entry of `category` satisfying `predicate`, in insertion order.
    pub fn find<F>(&self, category: Category, predicate: F) -> Option<WordEntry>
    where
        F: Fn(&WordEntry) -> bool,
    {
        self.by_category
            .get(&category)?
            .iter()
            .map(|i| &self.entries[*i])
            .find(|e| predicate(e))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"(
        language: English,
        entries: [
            (base: "child", category: "noun", plural: "children", inflections: ["irreg"]),
            (base: "a", category: "determiner", variants: ["an"]),
            (base: "like", category: "verb"),
            (base: "like", category: "preposition"),
        ],
    )"#;

    struct AlwaysVerb;

    impl Tagger for AlwaysVerb {
        fn tag(&self, _word: &str) -> Option<Category> {
            Some(Category::Verb)
        }
    }

    #[test]
    fn parse_and_lookup() {
        let lex = Lexicon::parse_ron(SMALL).unwrap();
        assert_eq!(lex.len(), 4);
        let child = lex.lookup("child", Category::Noun).unwrap();
        assert_eq!(child.forms.plural.as_deref(), Some("children"));
        assert_eq!(child.default_inflection(), Inflection::Irregular);
        assert_eq!(child.id, "noun_child");
    }

    #[test]
    fn variants_are_indexed() {
        let lex = Lexicon::parse_ron(SMALL).unwrap();
        let a = lex.lookup("an", Category::Determiner).unwrap();
        assert_eq!(a.base, "a");
    }

    #[test]
    fn category_filters_homographs() {
        let lex = Lexicon::parse_ron(SMALL).unwrap();
        assert_eq!(lex.get("like", Category::Any).len(), 2);
        let prep = lex.first("like", Category::Preposition).unwrap();
        assert_eq!(prep.category, Category::Preposition);
    }

    #[test]
    fn missing_words_are_created_on_demand() {
        let mut lex = Lexicon::parse_ron(SMALL).unwrap();
        let table = lex.first("table", Category::Noun).unwrap();
        assert_eq!(table.base, "table");
        assert!(lex.lookup("table", Category::Noun).is_none());

        lex.set_tagger(Arc::new(AlwaysVerb));
        assert_eq!(lex.first("zorp", Category::Any).unwrap().category, Category::Verb);

        lex.set_create_if_missing(false);
        assert!(lex.first("zorp", Category::Any).is_none());
        assert!(lex.get("zorp", Category::Any).is_empty());
    }

    #[test]
    fn returned_entries_are_copies() {
        let lex = Lexicon::parse_ron(SMALL).unwrap();
        let mut child = lex.first("child", Category::Noun).unwrap();
        child.forms.plural = Some("childs".to_string());
        assert_eq!(
            lex.lookup("child", Category::Noun).unwrap().forms.plural.as_deref(),
            Some("children")
        );
    }

    #[test]
    fn unknown_category_is_an_error() {
        let input = r#"(language: English, entries: [(base: "x", category: "gizmo")])"#;
        assert!(matches!(
            Lexicon::parse_ron(input),
            Err(LexiconError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn duplicate_id_is_an_error() {
        let input = r#"(language: English, entries: [
            (base: "x", category: "noun"),
            (base: "x", category: "noun"),
        ])"#;
        assert!(matches!(
            Lexicon::parse_ron(input),
            Err(LexiconError::DuplicateId(_))
        ));
    }

    #[test]
    fn merge_overrides_by_id() {
        let mut lex = Lexicon::parse_ron(SMALL).unwrap();
        let other = Lexicon::parse_ron(
            r#"(language: English, entries: [
                (base: "child", category: "noun", plural: "childer"),
                (base: "ox", category: "noun", plural: "oxen"),
            ])"#,
        )
        .unwrap();
        lex.merge(other).unwrap();
        assert_eq!(lex.len(), 5);
        assert_eq!(
            lex.lookup("child", Category::Noun).unwrap().forms.plural.as_deref(),
            Some("childer")
        );
        assert!(lex.contains("ox"));
    }

    #[test]
    fn merge_rejects_other_language() {
        let mut lex = Lexicon::new(Language::English);
        let fr = Lexicon::new(Language::French);
        assert!(matches!(
            lex.merge(fr),
            Err(LexiconError::LanguageMismatch { .. })
        ));
    }

    #[test]
    fn embedded_lexicons_load() {
        let en = Lexicon::english().unwrap();
        assert_eq!(en.language(), Language::English);
        assert!(en.lookup("be", Category::Verb).is_some());
        let fr = Lexicon::french().unwrap();
        assert_eq!(fr.language(), Language::French);
        assert!(fr.lookup("être", Category::Verb).is_some());
    }

    #[test]
    fn find_by_predicate() {
        let fr = Lexicon::french().unwrap();
        let elle = fr
            .find(Category::Pronoun, |e| {
                e.person == Some(Person::Third)
                    && e.number == Some(Number::Singular)
                    && e.gender == Some(Gender::Feminine)
                    && e.discourse_function == Some(DiscourseFunction::Subject)
            })
            .unwrap();
        assert_eq!(elle.base, "elle");
    }
}
