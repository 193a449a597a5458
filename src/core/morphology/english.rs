/// English inflection rules.

use crate::core::syntax::Token;
use crate::schema::element::{ElementKind, Tree};
use crate::schema::feature::{
    Case, Category, DiscourseFunction, Feature, Form, Gender, Number, Person, Tense,
};
use crate::schema::word::Inflection;

use super::stored;

const WH_PRONOUNS: &[&str] = &["who", "what", "which", "where", "why", "how", "how many"];

pub fn inflect(tree: &Tree, token: &mut Token) -> String {
    match token.category {
        Category::Noun => noun(tree, token),
        Category::Verb => verb(token),
        Category::Adjective => adjective(token),
        Category::Adverb => adverb(token),
        Category::Determiner => determiner(tree, token),
        Category::Pronoun => pronoun(token),
        _ => token.base.clone(),
    }
}

fn inflection(token: &Token) -> Inflection {
    token
        .entry
        .as_ref()
        .map(|e| e.default_inflection())
        .unwrap_or(Inflection::Regular)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Ends in a consonant followed by "y".
fn ends_with_consonant_y(word: &str) -> bool {
    let mut rev = word.chars().rev();
    matches!(
        (rev.next(), rev.next()),
        (Some('y'), Some(c)) if c.is_alphabetic() && !is_vowel(c)
    )
}

fn strip_last(word: &str) -> &str {
    match word.char_indices().last() {
        Some((i, _)) => &word[..i],
        None => word,
    }
}

fn last_char(word: &str) -> String {
    word.chars().last().map(String::from).unwrap_or_default()
}

fn governing_plural(tree: &Tree, token: &Token) -> bool {
    token
        .parent
        .filter(|p| matches!(tree.kind(*p), ElementKind::NounPhrase(_)))
        .is_some_and(|p| tree.features(p).is_plural())
}

fn noun(tree: &Tree, token: &mut Token) -> String {
    let proper = token.features.flag(Feature::Proper)
        || token.entry.as_ref().is_some_and(|e| e.flags.proper);
    let plural = token.features.is_plural() || governing_plural(tree, token);
    let mut realised = if plural && !proper {
        plural_noun(token)
    } else {
        token.base.clone()
    };
    if token.features.flag(Feature::Possessive) {
        realised = possessive(&realised);
    }
    realised
}

fn plural_noun(token: &Token) -> String {
    if let Some(p) = &token.forms.plural {
        return p.clone();
    }
    let infl = inflection(token);
    if matches!(infl, Inflection::Uncount | Inflection::Invariant) {
        return token.base.clone();
    }
    if let Some(p) = token.entry.as_ref().and_then(|e| e.forms.plural.clone()) {
        return p;
    }
    match infl {
        Inflection::GrecoLatinRegular => greco_latin_plural(&token.base),
        _ => regular_plural(&token.base),
    }
}

/// "fly" → "flies", "box" → "boxes", "dog" → "dogs".
pub fn regular_plural(base: &str) -> String {
    if ends_with_consonant_y(base) {
        format!("{}ies", strip_last(base))
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|e| base.ends_with(e)) {
        format!("{}es", base)
    } else {
        format!("{}s", base)
    }
}

/// "focus" → "foci", "stigma" → "stigmata", "datum" → "data" and so on.
/// Unmatched endings stay unchanged.
pub fn greco_latin_plural(base: &str) -> String {
    let swap = |suffix: &str, replacement: &str| {
        format!("{}{}", &base[..base.len() - suffix.len()], replacement)
    };
    if base.ends_with("us") {
        swap("us", "i")
    } else if base.ends_with("ma") {
        format!("{}ta", base)
    } else if base.ends_with('a') {
        format!("{}e", base)
    } else if base.ends_with("um") {
        swap("um", "a")
    } else if base.ends_with("on") {
        swap("on", "a")
    } else if base.ends_with("sis") {
        swap("sis", "ses")
    } else if base.ends_with("is") {
        swap("is", "ides")
    } else if base.ends_with("men") {
        swap("men", "mina")
    } else if base.ends_with("ex") {
        swap("ex", "ices")
    } else if base.ends_with('x') {
        swap("x", "ces")
    } else {
        base.to_string()
    }
}

fn possessive(word: &str) -> String {
    if word.ends_with('s') {
        format!("{}'", word)
    } else {
        format!("{}'s", word)
    }
}

/// Rough syllable count: vowel groups, minus a final vowel.
pub fn count_syllables(word: &str) -> usize {
    let mut groups: usize = 0;
    let mut in_group = false;
    for c in word.chars() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    let final_vowel = word.chars().last().is_some_and(is_vowel);
    groups.saturating_sub(final_vowel as usize).max(1)
}

fn adjective(token: &Token) -> String {
    if token.features.flag(Feature::Comparative) {
        graded(token, Grade::Comparative)
    } else if token.features.flag(Feature::Superlative) {
        graded(token, Grade::Superlative)
    } else {
        token.base.clone()
    }
}

fn adverb(token: &Token) -> String {
    let grade = if token.features.flag(Feature::Comparative) {
        Grade::Comparative
    } else if token.features.flag(Feature::Superlative) {
        Grade::Superlative
    } else {
        return token.base.clone();
    };
    if token.base.ends_with("ly") && stored_grade(token, grade).is_none() {
        return format!("{} {}", grade.periphrasis(), token.base);
    }
    graded(token, grade)
}

#[derive(Debug, Clone, Copy)]
enum Grade {
    Comparative,
    Superlative,
}

impl Grade {
    fn periphrasis(self) -> &'static str {
        match self {
            Grade::Comparative => "more",
            Grade::Superlative => "most",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Grade::Comparative => "er",
            Grade::Superlative => "est",
        }
    }
}

fn stored_grade(token: &Token, grade: Grade) -> Option<String> {
    stored(token, |forms| match grade {
        Grade::Comparative => forms.comparative.clone(),
        Grade::Superlative => forms.superlative.clone(),
    })
}

fn graded(token: &Token, grade: Grade) -> String {
    if let Some(form) = stored_grade(token, grade) {
        return form;
    }
    let base = &token.base;
    if inflection(token) == Inflection::RegularDouble {
        return format!("{}{}{}", base, last_char(base), grade.suffix());
    }
    if count_syllables(base) >= 2 {
        return format!("{} {}", grade.periphrasis(), base);
    }
    if ends_with_consonant_y(base) {
        format!("{}i{}", strip_last(base), grade.suffix())
    } else if base.ends_with('e') {
        format!("{}{}", base, &grade.suffix()[1..])
    } else {
        format!("{}{}", base, grade.suffix())
    }
}

fn determiner(tree: &Tree, token: &Token) -> String {
    let plural = token.features.is_plural()
        || (token.features.number().is_none() && governing_plural(tree, token));
    let base = token.base.as_str();
    if plural {
        if let Some(p) = token
            .forms
            .plural
            .clone()
            .or_else(|| token.entry.as_ref().and_then(|e| e.forms.plural.clone()))
        {
            return p;
        }
        match base {
            "this" => "these".to_string(),
            "that" => "those".to_string(),
            "a" | "an" => "some".to_string(),
            _ => base.to_string(),
        }
    } else {
        match base {
            "these" => "this".to_string(),
            "those" => "that".to_string(),
            _ => base.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PronounUse {
    Subject,
    Object,
    Specifier,
    Reflexive,
    Possessive,
}

fn pronoun(token: &mut Token) -> String {
    let lower = token.base.to_lowercase();
    if WH_PRONOUNS.contains(&lower.as_str()) {
        return token.base.clone();
    }
    let personal = token.entry.as_ref().map_or(true, |e| e.is_personal_pronoun());
    if !personal {
        return token.base.clone();
    }
    let fs = &token.features;
    let entry = token.entry.as_ref();
    let number = fs
        .number()
        .or_else(|| entry.and_then(|e| e.number))
        .unwrap_or(Number::Singular);
    if number == Number::Both {
        return "both".to_string();
    }
    let person = fs
        .person()
        .or_else(|| entry.and_then(|e| e.person))
        .unwrap_or(Person::First);
    let gender = fs
        .gender()
        .or_else(|| entry.and_then(|e| e.gender))
        .unwrap_or(Gender::Neuter);
    token.features.set(Feature::Number, number);
    token.features.set(Feature::Gender, gender);
    let fs = &token.features;
    let function = fs.discourse_function().unwrap_or(DiscourseFunction::Subject);
    let passive = fs.flag(Feature::Passive);

    let as_subject = match function {
        DiscourseFunction::Subject => !passive,
        DiscourseFunction::Object | DiscourseFunction::Complement => passive,
        DiscourseFunction::Specifier => true,
        DiscourseFunction::IndirectObject => false,
        _ => true,
    };
    let usage = if fs.flag(Feature::Reflexive) {
        PronounUse::Reflexive
    } else if fs.flag(Feature::Possessive) {
        if function == DiscourseFunction::Specifier {
            PronounUse::Specifier
        } else {
            PronounUse::Possessive
        }
    } else {
        match fs.case() {
            Some(Case::Nominative) => PronounUse::Subject,
            Some(Case::Accusative | Case::Dative) => PronounUse::Object,
            Some(Case::Genitive) => PronounUse::Specifier,
            _ if as_subject => PronounUse::Subject,
            _ => PronounUse::Object,
        }
    };
    pronoun_form(number, usage, person, gender).to_string()
}

fn pronoun_form(number: Number, usage: PronounUse, person: Person, gender: Gender) -> &'static str {
    use PronounUse::*;
    let third = |m: &'static str, f: &'static str, n: &'static str| match gender {
        Gender::Masculine => m,
        Gender::Feminine => f,
        Gender::Neuter => n,
    };
    match (number, usage, person) {
        (Number::Plural, Subject, Person::First) => "we",
        (Number::Plural, Subject, Person::Second) => "you",
        (Number::Plural, Subject, Person::Third) => "they",
        (Number::Plural, Object, Person::First) => "us",
        (Number::Plural, Object, Person::Second) => "you",
        (Number::Plural, Object, Person::Third) => "them",
        (Number::Plural, Specifier, Person::First) => "our",
        (Number::Plural, Specifier, Person::Second) => "your",
        (Number::Plural, Specifier, Person::Third) => "their",
        (Number::Plural, Reflexive, Person::First) => "ourselves",
        (Number::Plural, Reflexive, Person::Second) => "yourselves",
        (Number::Plural, Reflexive, Person::Third) => "themselves",
        (Number::Plural, Possessive, Person::First) => "ours",
        (Number::Plural, Possessive, Person::Second) => "yours",
        (Number::Plural, Possessive, Person::Third) => "theirs",
        (_, Subject, Person::First) => "I",
        (_, Subject, Person::Second) => "you",
        (_, Subject, Person::Third) => third("he", "she", "it"),
        (_, Object, Person::First) => "me",
        (_, Object, Person::Second) => "you",
        (_, Object, Person::Third) => third("him", "her", "it"),
        (_, Specifier, Person::First) => "my",
        (_, Specifier, Person::Second) => "your",
        (_, Specifier, Person::Third) => third("his", "her", "its"),
        (_, Reflexive, Person::First) => "myself",
        (_, Reflexive, Person::Second) => "yourself",
        (_, Reflexive, Person::Third) => third("himself", "herself", "itself"),
        (_, Possessive, Person::First) => "mine",
        (_, Possessive, Person::Second) => "yours",
        (_, Possessive, Person::Third) => third("his", "hers", "its"),
    }
}

fn verb(token: &Token) -> String {
    let fs = &token.features;
    let form = fs.form();
    let tense = fs.tense();
    let number = fs.number();
    let person = fs.person();
    let base = token.base.as_str();
    let is_be = base.eq_ignore_ascii_case("be");

    if fs.flag(Feature::Negated)
        || matches!(
            form,
            Some(Form::BareInfinitive | Form::Imperative | Form::Infinitive)
        )
    {
        return base.to_string();
    }
    if matches!(form, Some(Form::PresentParticiple | Form::Gerund)) {
        return stored(token, |f| f.present_participle.clone()).unwrap_or_else(|| {
            if inflection(token) == Inflection::RegularDouble {
                format!("{}{}ing", base, last_char(base))
            } else {
                regular_present_participle(base)
            }
        });
    }
    if form == Some(Form::PastParticiple) {
        return stored(token, |f| f.past_participle.clone()).unwrap_or_else(|| {
            if is_be {
                "been".to_string()
            } else if inflection(token) == Inflection::RegularDouble {
                format!("{}{}ed", base, last_char(base))
            } else {
                regular_past(base, number, person)
            }
        });
    }
    if tense == Some(Tense::Past) {
        if is_be {
            return regular_past(base, number, person);
        }
        return stored(token, |f| f.past.clone()).unwrap_or_else(|| {
            if inflection(token) == Inflection::RegularDouble {
                format!("{}{}ed", base, last_char(base))
            } else {
                regular_past(base, number, person)
            }
        });
    }
    let third_singular = matches!(number, None | Some(Number::Singular))
        && matches!(person, None | Some(Person::Third))
        && matches!(tense, None | Some(Tense::Present));
    if third_singular {
        return stored(token, |f| f.present3s.clone()).unwrap_or_else(|| present_3s(base));
    }
    if is_be {
        if person == Some(Person::First) && matches!(number, None | Some(Number::Singular)) {
            "am".to_string()
        } else {
            "are".to_string()
        }
    } else {
        base.to_string()
    }
}

pub fn present_3s(base: &str) -> String {
    if base.eq_ignore_ascii_case("be") {
        "is".to_string()
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|e| base.ends_with(e)) {
        format!("{}es", base)
    } else if ends_with_consonant_y(base) {
        format!("{}ies", strip_last(base))
    } else {
        format!("{}s", base)
    }
}

pub fn regular_past(base: &str, number: Option<Number>, person: Option<Person>) -> String {
    if base.eq_ignore_ascii_case("be") {
        if number == Some(Number::Plural) || person == Some(Person::Second) {
            "were".to_string()
        } else {
            "was".to_string()
        }
    } else if base.ends_with('e') {
        format!("{}d", base)
    } else if ends_with_consonant_y(base) {
        format!("{}ied", strip_last(base))
    } else {
        format!("{}ed", base)
    }
}

pub fn regular_present_participle(base: &str) -> String {
    if base.eq_ignore_ascii_case("be") {
        return "being".to_string();
    }
    if let Some(stem) = base.strip_suffix("ie") {
        return format!("{}ying", stem);
    }
    let mut rev = base.chars().rev();
    if let (Some('e'), Some(before)) = (rev.next(), rev.next()) {
        if !matches!(before, 'i' | 'y' | 'e' | 'o') {
            return format!("{}ing", strip_last(base));
        }
    }
    format!("{}ing", base)
}
