/// Grammatical features: closed value families and the per-element feature set.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Target language of a lexicon and of realisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    French,
}

impl Language {
    /// Default coordinating conjunction.
    pub fn conjunction(&self) -> &'static str {
        match self {
            Self::English => "and",
            Self::French => "et",
        }
    }

    /// Preposition introducing the agent of a passive clause.
    pub fn passive_preposition(&self) -> &'static str {
        match self {
            Self::English => "by",
            Self::French => "par",
        }
    }

    /// Complementiser used for subordinate clauses that name none.
    pub fn complementiser(&self) -> &'static str {
        match self {
            Self::English => "that",
            Self::French => "que",
        }
    }

    pub fn parse(s: &str) -> Option<Language> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "fr" | "french" => Some(Self::French),
            _ => None,
        }
    }
}

/// Lexical category of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Any,
    Symbol,
    Noun,
    Adjective,
    Adverb,
    Verb,
    Determiner,
    Numeral,
    Pronoun,
    Conjunction,
    Preposition,
    Complementiser,
    Modal,
    Particle,
    Interjection,
}

impl Category {
    /// Parse a lexicon category name. Accepts the lowercase names used in
    /// lexicon files and a handful of short tags.
    pub fn parse(s: &str) -> Option<Category> {
        let category = match s.to_ascii_lowercase().as_str() {
            "any" => Self::Any,
            "symbol" => Self::Symbol,
            "noun" | "n" => Self::Noun,
            "adjective" | "adj" => Self::Adjective,
            "adverb" | "adv" => Self::Adverb,
            "verb" | "v" => Self::Verb,
            "determiner" | "det" => Self::Determiner,
            "numeral" | "num" => Self::Numeral,
            "pronoun" | "pron" => Self::Pronoun,
            "conjunction" | "conj" => Self::Conjunction,
            "preposition" | "prep" => Self::Preposition,
            "complementiser" | "complementizer" => Self::Complementiser,
            "modal" => Self::Modal,
            "particle" => Self::Particle,
            "interjection" => Self::Interjection,
            _ => return None,
        };
        Some(category)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Symbol => "symbol",
            Self::Noun => "noun",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Verb => "verb",
            Self::Determiner => "determiner",
            Self::Numeral => "numeral",
            Self::Pronoun => "pronoun",
            Self::Conjunction => "conjunction",
            Self::Preposition => "preposition",
            Self::Complementiser => "complementiser",
            Self::Modal => "modal",
            Self::Particle => "particle",
            Self::Interjection => "interjection",
        }
    }

    /// Whether `self` satisfies a requested category; `Any` matches everything.
    pub fn matches(&self, requested: Category) -> bool {
        requested == Category::Any || *self == requested
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    Nominative,
    Accusative,
    Genitive,
    Dative,
    Vocative,
    Locative,
    Instrumental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    Singular,
    Plural,
    /// "both": a dual reading used by coordinated pronouns.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Person {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tense {
    Present,
    Past,
    Future,
    Conditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    BareInfinitive,
    Gerund,
    Imperative,
    Infinitive,
    Indicative,
    PastParticiple,
    PresentParticiple,
    Subjunctive,
    Normal,
}

impl Form {
    /// Finite forms take tense and agreement.
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Normal | Self::Indicative | Self::Subjunctive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterrogativeType {
    How,
    Why,
    Where,
    HowMany,
    YesNo,
    HowPredicate,
    WhatObject,
    WhatSubject,
    WhoObject,
    WhoSubject,
    WhoIndirectObject,
}

impl InterrogativeType {
    /// Questions that target the direct object of the verb.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::WhoObject | Self::WhatObject)
    }

    pub fn is_subject(&self) -> bool {
        matches!(self, Self::WhoSubject | Self::WhatSubject)
    }

    /// Questions whose wh-word stands in for an object or adjunct, and which
    /// therefore need "do"-support or subject/auxiliary inversion.
    pub fn is_wh_object_like(&self) -> bool {
        matches!(
            self,
            Self::How
                | Self::Why
                | Self::Where
                | Self::HowPredicate
                | Self::WhoObject
                | Self::WhatObject
                | Self::WhoIndirectObject
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseStatus {
    Matrix,
    Subordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscourseFunction {
    Auxiliary,
    Complement,
    Conjunction,
    CuePhrase,
    FrontModifier,
    Head,
    IndirectObject,
    Object,
    PreModifier,
    PostModifier,
    Specifier,
    Subject,
    VerbPhrase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PronounType {
    Personal,
    Relative,
    /// Adverbial clitics such as French "en" and "y".
    SpecialPersonal,
}

/// A feature key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Case,
    Number,
    Gender,
    Person,
    Tense,
    Form,
    InterrogativeType,
    ClauseStatus,
    DiscourseFunction,
    PronounType,
    Modal,
    Complementiser,
    Particle,
    Negated,
    Passive,
    Perfect,
    Progressive,
    Possessive,
    Pronominal,
    Proper,
    Reflexive,
    Comparative,
    Superlative,
    Elided,
    Raised,
    NonMorph,
    SuppressedComplementiser,
    IgnoreModal,
    RealiseAuxiliary,
    RaiseSpecifier,
    AggregateAuxiliary,
    Detached,
}

/// Features excluded from structural equality.
pub const NON_COMPARABLE: &[Feature] = &[Feature::DiscourseFunction];

/// Features carried over when one element replaces another.
pub const TRANSFERABLE: &[Feature] = &[
    Feature::DiscourseFunction,
    Feature::Number,
    Feature::Gender,
    Feature::Person,
];

impl Feature {
    /// Whether `value` belongs to the family this feature draws from.
    pub fn accepts(&self, value: &FeatureValue) -> bool {
        use FeatureValue as V;
        match self {
            Self::Case => matches!(value, V::Case(_)),
            Self::Number => matches!(value, V::Number(_)),
            Self::Gender => matches!(value, V::Gender(_)),
            Self::Person => matches!(value, V::Person(_)),
            Self::Tense => matches!(value, V::Tense(_)),
            Self::Form => matches!(value, V::Form(_)),
            Self::InterrogativeType => matches!(value, V::InterrogativeType(_)),
            Self::ClauseStatus => matches!(value, V::ClauseStatus(_)),
            Self::DiscourseFunction => matches!(value, V::DiscourseFunction(_)),
            Self::PronounType => matches!(value, V::PronounType(_)),
            Self::Modal | Self::Complementiser | Self::Particle => matches!(value, V::Text(_)),
            _ => matches!(value, V::Bool(_)),
        }
    }
}

/// A feature value. Each variant wraps one closed family, plus free text for
/// lexical features (modal, complementiser, particle) and booleans for flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureValue {
    Case(Case),
    Number(Number),
    Gender(Gender),
    Person(Person),
    Tense(Tense),
    Form(Form),
    InterrogativeType(InterrogativeType),
    ClauseStatus(ClauseStatus),
    DiscourseFunction(DiscourseFunction),
    PronounType(PronounType),
    Text(String),
    Bool(bool),
}

macro_rules! impl_from_family {
    ($($family:ident),*) => {
        $(
            impl From<$family> for FeatureValue {
                fn from(v: $family) -> Self {
                    FeatureValue::$family(v)
                }
            }
        )*
    };
}

impl_from_family!(
    Case,
    Number,
    Gender,
    Person,
    Tense,
    Form,
    InterrogativeType,
    ClauseStatus,
    DiscourseFunction,
    PronounType
);

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

/// The features attached to one element. Closed keys live in `values`;
/// anything else a caller wants to carry goes into `custom`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    #[serde(default)]
    values: FxHashMap<Feature, FeatureValue>,
    #[serde(default)]
    custom: FxHashMap<String, String>,
}

macro_rules! typed_getter {
    ($($name:ident => $family:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<$family> {
                match self.values.get(&Feature::$family) {
                    Some(FeatureValue::$family(v)) => Some(*v),
                    _ => None,
                }
            }
        )*
    };
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, feature: Feature, value: impl Into<FeatureValue>) -> Self {
        self.set(feature, value);
        self
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.values.contains_key(&feature)
    }

    pub fn get(&self, feature: Feature) -> Option<&FeatureValue> {
        self.values.get(&feature)
    }

    /// Stores `value` as given. A value outside the feature's family is kept
    /// and reported when realisation reads it (see
    /// [`try_interrogative_type`](Self::try_interrogative_type)); typed
    /// getters treat it as absent.
    pub fn set(&mut self, feature: Feature, value: impl Into<FeatureValue>) {
        self.values.insert(feature, value.into());
    }

    /// Set `feature` to `value`, or remove it when `value` is `None`.
    pub fn set_opt<V: Into<FeatureValue>>(&mut self, feature: Feature, value: Option<V>) {
        match value {
            Some(v) => self.set(feature, v),
            None => {
                self.values.remove(&feature);
            }
        }
    }

    pub fn remove(&mut self, feature: Feature) -> Option<FeatureValue> {
        self.values.remove(&feature)
    }

    /// Union with `other`; values from `other` win.
    pub fn merge(&mut self, other: &FeatureSet) {
        for (k, v) in &other.values {
            self.values.insert(*k, v.clone());
        }
        for (k, v) in &other.custom {
            self.custom.insert(k.clone(), v.clone());
        }
    }

    /// Union with `other`; values already present in `self` win.
    pub fn fill_from(&mut self, other: &FeatureSet) {
        for (k, v) in &other.values {
            self.values.entry(*k).or_insert_with(|| v.clone());
        }
        for (k, v) in &other.custom {
            self.custom.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    /// Copy a single feature from `other` when it is set there.
    pub fn copy_from(&mut self, other: &FeatureSet, feature: Feature) {
        if let Some(v) = other.get(feature) {
            self.values.insert(feature, v.clone());
        }
    }

    /// Boolean flag; absent means false.
    pub fn flag(&self, feature: Feature) -> bool {
        matches!(self.values.get(&feature), Some(FeatureValue::Bool(true)))
    }

    pub fn text(&self, feature: Feature) -> Option<&str> {
        match self.values.get(&feature) {
            Some(FeatureValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    typed_getter!(
        case => Case,
        number => Number,
        gender => Gender,
        person => Person,
        tense => Tense,
        form => Form,
        interrogative_type => InterrogativeType,
        clause_status => ClauseStatus,
        discourse_function => DiscourseFunction,
        pronoun_type => PronounType,
    );

    /// Interrogative type, distinguishing "absent" from "present but holding
    /// a value of another family".
    pub fn try_interrogative_type(&self) -> Result<Option<InterrogativeType>, FeatureValue> {
        match self.values.get(&Feature::InterrogativeType) {
            None => Ok(None),
            Some(FeatureValue::InterrogativeType(t)) => Ok(Some(*t)),
            Some(other) => Err(other.clone()),
        }
    }

    pub fn is_plural(&self) -> bool {
        self.number() == Some(Number::Plural)
    }

    pub fn is_feminine(&self) -> bool {
        self.gender() == Some(Gender::Feminine)
    }

    pub fn custom(&self, key: &str) -> Option<&str> {
        self.custom.get(key).map(|s| s.as_str())
    }

    pub fn set_custom(&mut self, key: &str, value: &str) {
        self.custom.insert(key.to_string(), value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &FeatureValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.custom.is_empty()
    }

    /// Equality that ignores [`NON_COMPARABLE`] features.
    pub fn comparable_eq(&self, other: &FeatureSet) -> bool {
        let visible = |set: &FeatureSet| -> FxHashMap<Feature, FeatureValue> {
            set.values
                .iter()
                .filter(|(k, _)| !NON_COMPARABLE.contains(k))
                .map(|(k, v)| (*k, v.clone()))
                .collect()
        };
        visible(self) == visible(other) && self.custom == other.custom
    }

    /// Copy the [`TRANSFERABLE`] features into `target`.
    pub fn transfer_to(&self, target: &mut FeatureSet) {
        for feature in TRANSFERABLE {
            target.copy_from(self, *feature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_feature_is_none() {
        let fs = FeatureSet::new();
        assert!(!fs.has(Feature::Number));
        assert_eq!(fs.number(), None);
        assert!(!fs.flag(Feature::Negated));
    }

    #[test]
    fn typed_getters_read_their_family() {
        let fs = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::Tense, Tense::Past)
            .with(Feature::Negated, true)
            .with(Feature::Modal, "can");
        assert!(fs.is_plural());
        assert_eq!(fs.tense(), Some(Tense::Past));
        assert!(fs.flag(Feature::Negated));
        assert_eq!(fs.text(Feature::Modal), Some("can"));
    }

    #[test]
    fn wrong_family_value_is_kept_but_not_typed() {
        let fs = FeatureSet::new().with(Feature::InterrogativeType, "whence");
        assert!(fs.has(Feature::InterrogativeType));
        assert_eq!(fs.interrogative_type(), None);
        assert_eq!(
            fs.try_interrogative_type(),
            Err(FeatureValue::Text("whence".to_string()))
        );
    }

    #[test]
    fn merge_prefers_other() {
        let mut a = FeatureSet::new().with(Feature::Number, Number::Singular);
        let b = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::Gender, Gender::Feminine);
        a.merge(&b);
        assert_eq!(a.number(), Some(Number::Plural));
        assert_eq!(a.gender(), Some(Gender::Feminine));
    }

    #[test]
    fn fill_from_keeps_self() {
        let mut a = FeatureSet::new().with(Feature::Number, Number::Singular);
        let b = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::Person, Person::Third);
        a.fill_from(&b);
        assert_eq!(a.number(), Some(Number::Singular));
        assert_eq!(a.person(), Some(Person::Third));
    }

    #[test]
    fn discourse_function_is_not_compared() {
        let a = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::DiscourseFunction, DiscourseFunction::Subject);
        let b = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::DiscourseFunction, DiscourseFunction::Object);
        assert!(a.comparable_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn transfer_copies_only_transferable() {
        let src = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::Gender, Gender::Feminine)
            .with(Feature::Tense, Tense::Past);
        let mut dst = FeatureSet::new();
        src.transfer_to(&mut dst);
        assert_eq!(dst.number(), Some(Number::Plural));
        assert_eq!(dst.gender(), Some(Gender::Feminine));
        assert_eq!(dst.tense(), None);
    }

    #[test]
    fn malformed_interrogative_is_reported() {
        let mut fs = FeatureSet::new();
        fs.values
            .insert(Feature::InterrogativeType, FeatureValue::Text("maybe".into()));
        assert!(fs.try_interrogative_type().is_err());
        let fs = FeatureSet::new().with(Feature::InterrogativeType, InterrogativeType::YesNo);
        assert_eq!(fs.try_interrogative_type(), Ok(Some(InterrogativeType::YesNo)));
    }

    #[test]
    fn category_parse_accepts_names() {
        assert_eq!(Category::parse("noun"), Some(Category::Noun));
        assert_eq!(Category::parse("VERB"), Some(Category::Verb));
        assert_eq!(Category::parse("gizmo"), None);
        assert!(Category::Noun.matches(Category::Any));
        assert!(!Category::Noun.matches(Category::Verb));
    }

    #[test]
    fn ron_round_trip() {
        let fs = FeatureSet::new()
            .with(Feature::Number, Number::Plural)
            .with(Feature::Negated, true);
        let s = ron::to_string(&fs).unwrap();
        let back: FeatureSet = ron::from_str(&s).unwrap();
        assert_eq!(fs, back);
    }
}
