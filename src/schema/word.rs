/// Lexicon word entries and their irregular inflected forms.

use serde::{Deserialize, Serialize};

use super::feature::{Category, DiscourseFunction, Gender, Number, Person, PronounType};

/// Inflection class of a word, as recorded in lexicon data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inflection {
    /// Regular productive morphology.
    Regular,
    /// Irregular; forms must come from the lexicon.
    Irregular,
    /// Regular with consonant doubling ("stop" → "stopped", "big" → "bigger").
    RegularDouble,
    /// Greco-Latin regular ("focus" → "foci").
    GrecoLatinRegular,
    /// Mass noun, never pluralised.
    Uncount,
    /// Invariant across number ("sheep").
    Invariant,
}

impl Inflection {
    /// Parse an inflection code as found in lexicon files.
    pub fn parse(code: &str) -> Option<Inflection> {
        let infl = match code {
            "reg" | "regular" => Self::Regular,
            "irreg" | "irregular" => Self::Irregular,
            "regd" => Self::RegularDouble,
            "glreg" => Self::GrecoLatinRegular,
            "uncount" | "noncount" | "groupuncount" => Self::Uncount,
            "inv" | "metareg" | "sing" => Self::Invariant,
            _ => return None,
        };
        Some(infl)
    }
}

/// Irregular or pre-computed inflected forms. Every slot is optional; an
/// empty slot means "derive by rule".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordForms {
    pub plural: Option<String>,
    pub comparative: Option<String>,
    pub superlative: Option<String>,
    pub past: Option<String>,
    pub past_participle: Option<String>,
    pub present_participle: Option<String>,
    pub present3s: Option<String>,
    pub feminine_singular: Option<String>,
    pub feminine_plural: Option<String>,
    pub feminine_past_participle: Option<String>,
    pub liaison: Option<String>,
    pub opposite_gender: Option<String>,
    pub future_radical: Option<String>,
    pub imparfait_radical: Option<String>,
    /// Present indicative, indexed 1s, 2s, 3s, 1p, 2p, 3p.
    pub present: [Option<String>; 6],
    /// Present subjunctive, indexed as `present`.
    pub subjunctive: [Option<String>; 6],
    pub imperative2s: Option<String>,
    pub imperative1p: Option<String>,
    pub imperative2p: Option<String>,
}

impl WordForms {
    pub fn is_empty(&self) -> bool {
        *self == WordForms::default()
    }
}

/// Boolean lexical properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordFlags {
    pub proper: bool,
    pub transitive: bool,
    pub intransitive: bool,
    pub ditransitive: bool,
    pub reflexive: bool,
    pub expletive_subject: bool,
    pub vowel_elision: bool,
    pub aspired_h: bool,
    /// French adjective placed before the noun.
    pub preposed: bool,
    pub copular: bool,
    /// French verb forming compound tenses with "être".
    pub auxiliary_etre: bool,
    pub possessive: bool,
    pub detached: bool,
}

/// A canonical lexicon entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: String,
    pub base: String,
    pub category: Category,
    pub variants: Vec<String>,
    pub inflections: Vec<Inflection>,
    pub forms: WordForms,
    pub flags: WordFlags,
    pub gender: Option<Gender>,
    pub person: Option<Person>,
    pub number: Option<Number>,
    pub pronoun_type: Option<PronounType>,
    pub discourse_function: Option<DiscourseFunction>,
}

impl WordEntry {
    /// A bare entry with regular inflection, as created on demand for
    /// words missing from the lexicon.
    pub fn new(base: &str, category: Category) -> Self {
        WordEntry {
            id: format!("{}_{}", category.name(), base),
            base: base.to_string(),
            category,
            variants: Vec::new(),
            inflections: Vec::new(),
            forms: WordForms::default(),
            flags: WordFlags::default(),
            gender: None,
            person: None,
            number: None,
            pronoun_type: None,
            discourse_function: None,
        }
    }

    /// The inflection class used when the caller asks for none in particular.
    pub fn default_inflection(&self) -> Inflection {
        self.inflections.first().copied().unwrap_or(Inflection::Regular)
    }

    pub fn has_inflection(&self, inflection: Inflection) -> bool {
        self.inflections.contains(&inflection)
    }

    pub fn is_personal_pronoun(&self) -> bool {
        self.category == Category::Pronoun
            && (self.pronoun_type == Some(PronounType::Personal)
                || (self.pronoun_type.is_none() && self.person.is_some()))
    }

    /// All spellings this entry is indexed under.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base.as_str()).chain(self.variants.iter().map(|s| s.as_str()))
    }
}
