/// French inflection: agreement of determiners, nouns and adjectives,
/// verb conjugation by group, and personal pronoun selection.

use crate::core::context::RealiseContext;
use crate::core::syntax::{nominal_gender, nominal_number, Token};
use crate::schema::element::{ElementKind, Tree};
use crate::schema::feature::{
    Category, DiscourseFunction, Feature, Form, Gender, Number, Person, PronounType, Tense,
};

use super::{agreement, stored, MorphologyError};

pub fn inflect(
    ctx: &RealiseContext,
    tree: &Tree,
    token: &mut Token,
) -> Result<String, MorphologyError> {
    let realised = match token.category {
        Category::Noun => noun(ctx, tree, token),
        Category::Adjective => adjective(ctx, tree, token),
        Category::Determiner => determiner(ctx, tree, token),
        Category::Pronoun => pronoun(ctx, tree, token),
        Category::Verb => verb(token)?,
        Category::Adverb if token.features.flag(Feature::Comparative) => {
            stored(token, |f| f.comparative.clone()).unwrap_or_else(|| token.base.clone())
        }
        _ => token.base.clone(),
    };
    Ok(realised)
}

/// Feminine singular of `realised`, from the lexicon when the word is still
/// in its base form, by ending otherwise.
pub fn feminize(ctx: &RealiseContext, token: &Token, realised: &str) -> String {
    if realised == token.base {
        if let Some(fem) = stored(token, |f| f.feminine_singular.clone()) {
            return fem;
        }
    }
    feminize_by_rule(ctx, realised)
}

fn feminize_by_rule(ctx: &RealiseContext, realised: &str) -> String {
    let ends = |s: &str| realised.ends_with(s);
    if ends("el") || ends("eil") {
        format!("{}le", realised)
    } else if ends("as") {
        format!("{}se", realised)
    } else if ends("en") || ends("on") {
        format!("{}ne", realised)
    } else if ends("et") {
        format!("{}te", realised)
    } else if let Some(stem) = realised.strip_suffix("eux") {
        format!("{}euse", stem)
    } else if let Some(stem) = realised.strip_suffix("er") {
        format!("{}ère", stem)
    } else if let Some(stem) = realised.strip_suffix("eau") {
        format!("{}elle", stem)
    } else if ends("os") {
        format!("{}se", realised)
    } else if ends("gu") {
        format!("{}ë", realised)
    } else if ends("g") {
        format!("{}ue", realised)
    } else if let Some(stem) = realised
        .strip_suffix("eur")
        .filter(|stem| ctx.lexicon().contains(&format!("{}ant", stem)))
    {
        format!("{}euse", stem)
    } else if let Some(stem) = realised.strip_suffix("teur") {
        format!("{}trice", stem)
    } else if let Some(stem) = realised.strip_suffix("if") {
        format!("{}ive", stem)
    } else {
        format!("{}e", realised)
    }
}

/// Regular plural: "jeu" → "jeux", "cheval" → "chevaux", "nez" unchanged.
pub fn pluralize(realised: &str) -> String {
    if realised.ends_with(['s', 'x', 'z']) {
        realised.to_string()
    } else if realised.ends_with("au") || realised.ends_with("eu") {
        format!("{}x", realised)
    } else if let Some(stem) = realised.strip_suffix("al") {
        format!("{}aux", stem)
    } else {
        format!("{}s", realised)
    }
}

fn governing_np_plural(ctx: &RealiseContext, tree: &Tree, token: &Token) -> bool {
    token
        .parent
        .filter(|p| matches!(tree.kind(*p), ElementKind::NounPhrase(_)))
        .is_some_and(|p| nominal_number(ctx, tree, p) == Some(Number::Plural))
}

fn noun(ctx: &RealiseContext, tree: &Tree, token: &mut Token) -> String {
    let wanted = token.features.gender();
    let swap = token.entry.as_ref().and_then(|e| match (e.gender, wanted) {
        (Some(have), Some(want)) if have != want && want != Gender::Neuter => {
            e.forms.opposite_gender.clone()
        }
        _ => None,
    });
    if let Some(opposite) = swap {
        token.entry = ctx.lexicon().lookup(&opposite, Category::Noun).cloned();
        token.base = opposite;
    }

    let proper = token.features.flag(Feature::Proper)
        || token.entry.as_ref().is_some_and(|e| e.flags.proper);
    let plural = token.features.is_plural() || governing_np_plural(ctx, tree, token);
    if plural && !proper {
        stored(token, |f| f.plural.clone()).unwrap_or_else(|| pluralize(&token.base))
    } else {
        token.base.clone()
    }
}

fn adjective(ctx: &RealiseContext, tree: &Tree, token: &mut Token) -> String {
    let mut realised = if token.features.flag(Feature::Comparative) {
        stored(token, |f| f.comparative.clone()).unwrap_or_else(|| token.base.clone())
    } else {
        token.base.clone()
    };
    let (gender, number) = agreement(ctx, tree, token);
    let feminine = gender == Some(Gender::Feminine);
    if feminine {
        realised = feminize(ctx, token, &realised);
    }
    if number == Some(Number::Plural) {
        realised = if feminine {
            stored(token, |f| f.feminine_plural.clone()).unwrap_or_else(|| format!("{}s", realised))
        } else {
            stored(token, |f| f.plural.clone()).unwrap_or_else(|| pluralize(&realised))
        };
    }
    token.features.set_opt(Feature::Gender, gender);
    token.features.set_opt(Feature::Number, number);
    realised
}

fn determiner(ctx: &RealiseContext, tree: &Tree, token: &mut Token) -> String {
    let np = token
        .parent
        .filter(|p| matches!(tree.kind(*p), ElementKind::NounPhrase(_)));
    let gender = np
        .and_then(|p| nominal_gender(ctx, tree, p))
        .or(token.features.gender());
    let plural = token.features.is_plural()
        || np.is_some_and(|p| nominal_number(ctx, tree, p) == Some(Number::Plural));
    let has_premodifiers = np
        .and_then(|p| tree.kind(p).core())
        .is_some_and(|core| !core.premodifiers.is_empty());
    token.features.set_opt(Feature::Gender, gender);
    token.features.set(
        Feature::Number,
        if plural { Number::Plural } else { Number::Singular },
    );
    inflect_determiner(token, gender, plural, has_premodifiers)
}

fn inflect_determiner(
    token: &Token,
    gender: Option<Gender>,
    plural: bool,
    has_premodifiers: bool,
) -> String {
    let feminine = gender == Some(Gender::Feminine);
    if plural {
        let form = feminine
            .then(|| stored(token, |f| f.feminine_plural.clone()))
            .flatten()
            .or_else(|| stored(token, |f| f.plural.clone()))
            .unwrap_or_else(|| token.base.clone());
        if form == "des" && has_premodifiers {
            "de".to_string()
        } else {
            form
        }
    } else if feminine {
        stored(token, |f| f.feminine_singular.clone()).unwrap_or_else(|| token.base.clone())
    } else {
        token.base.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PronounUse {
    Subject,
    Direct,
    Indirect,
    Reflexive,
    Detached,
}

/// Whether a pronoun stands apart from the verb: inside a prepositional
/// phrase, a coordination, or explicitly marked.
fn is_detached(tree: &Tree, token: &Token) -> bool {
    if token.features.flag(Feature::Detached) {
        return true;
    }
    let mut current = token.parent;
    while let Some(node) = current {
        match tree.kind(node) {
            ElementKind::NounPhrase(_) | ElementKind::Placeholder { .. } => {
                current = tree.parent(node)
            }
            ElementKind::PrepositionPhrase(_) | ElementKind::Coordination(_) => return true,
            _ => return false,
        }
    }
    false
}

fn pronoun(ctx: &RealiseContext, tree: &Tree, token: &mut Token) -> String {
    let personal = token.entry.as_ref().map_or(
        token.features.pronoun_type() == Some(PronounType::Personal),
        |e| e.is_personal_pronoun(),
    );
    if !personal {
        return token.base.clone();
    }
    let entry = token.entry.as_ref();
    let fs = &token.features;
    let person = fs
        .person()
        .or_else(|| entry.and_then(|e| e.person))
        .unwrap_or(Person::Third);
    let number = match fs.number().or_else(|| entry.and_then(|e| e.number)) {
        Some(Number::Plural | Number::Both) => Number::Plural,
        _ => Number::Singular,
    };
    let gender = match fs.gender().or_else(|| entry.and_then(|e| e.gender)) {
        Some(Gender::Feminine) => Gender::Feminine,
        _ => Gender::Masculine,
    };
    let function = fs
        .discourse_function()
        .unwrap_or(DiscourseFunction::Subject);

    if fs.flag(Feature::Possessive) {
        return possessive_determiner(ctx, tree, token, person, number);
    }

    let passive = fs.flag(Feature::Passive);
    let usage = if is_detached(tree, token) {
        PronounUse::Detached
    } else if fs.flag(Feature::Reflexive)
        || entry.is_some_and(|e| e.flags.reflexive && fs.discourse_function().is_none())
    {
        PronounUse::Reflexive
    } else {
        match function {
            DiscourseFunction::Subject if passive => PronounUse::Direct,
            DiscourseFunction::Subject | DiscourseFunction::Specifier => PronounUse::Subject,
            DiscourseFunction::Object if passive => PronounUse::Subject,
            DiscourseFunction::Object => PronounUse::Direct,
            DiscourseFunction::IndirectObject => PronounUse::Indirect,
            DiscourseFunction::Complement => PronounUse::Detached,
            _ => PronounUse::Subject,
        }
    };

    let realised = personal_form(person, number, gender, usage).to_string();
    token.features.set(Feature::Person, person);
    token.features.set(Feature::Number, number);
    token.features.set(Feature::Gender, gender);
    token.entry = ctx.lexicon().lookup(&realised, Category::Pronoun).cloned();
    realised
}

fn personal_form(person: Person, number: Number, gender: Gender, usage: PronounUse) -> &'static str {
    use PronounUse::*;
    let feminine = gender == Gender::Feminine;
    match (person, number, usage) {
        (Person::First, Number::Singular, Subject) => "je",
        (Person::First, Number::Singular, Detached) => "moi",
        (Person::First, Number::Singular, _) => "me",
        (Person::Second, Number::Singular, Subject) => "tu",
        (Person::Second, Number::Singular, Detached) => "toi",
        (Person::Second, Number::Singular, _) => "te",
        (Person::First, _, _) => "nous",
        (Person::Second, _, _) => "vous",
        (Person::Third, _, Reflexive) => "se",
        (Person::Third, Number::Singular, Subject) if feminine => "elle",
        (Person::Third, Number::Singular, Subject) => "il",
        (Person::Third, Number::Singular, Direct) if feminine => "la",
        (Person::Third, Number::Singular, Direct) => "le",
        (Person::Third, Number::Singular, Indirect) => "lui",
        (Person::Third, Number::Singular, Detached) if feminine => "elle",
        (Person::Third, Number::Singular, Detached) => "lui",
        (Person::Third, _, Subject) if feminine => "elles",
        (Person::Third, _, Subject) => "ils",
        (Person::Third, _, Direct) => "les",
        (Person::Third, _, Indirect) => "leur",
        (Person::Third, _, Detached) if feminine => "elles",
        (Person::Third, _, Detached) => "eux",
    }
}

/// "mon", "ta", "leurs": chosen by the possessor, agreeing with the
/// possessed noun phrase.
fn possessive_determiner(
    ctx: &RealiseContext,
    tree: &Tree,
    token: &mut Token,
    person: Person,
    number: Number,
) -> String {
    let base = match (person, number) {
        (Person::First, Number::Singular) => "mon",
        (Person::Second, Number::Singular) => "ton",
        (Person::Third, Number::Singular) => "son",
        (Person::First, _) => "notre",
        (Person::Second, _) => "votre",
        (Person::Third, _) => "leur",
    };
    let np = token
        .parent
        .filter(|p| matches!(tree.kind(*p), ElementKind::NounPhrase(_)));
    let gender = np.and_then(|p| nominal_gender(ctx, tree, p));
    let plural = np.is_some_and(|p| nominal_number(ctx, tree, p) == Some(Number::Plural));

    token.base = base.to_string();
    token.category = Category::Determiner;
    token.entry = ctx.lexicon().lookup(base, Category::Determiner).cloned();
    token.features.set_opt(Feature::Gender, gender);
    token.features.set(
        Feature::Number,
        if plural { Number::Plural } else { Number::Singular },
    );
    inflect_determiner(token, gender, plural, false)
}

/// Conjugation group of a regular verb with its present radical.
#[derive(Debug, Clone, PartialEq)]
struct Radical {
    stem: String,
    group: u8,
}

fn present_radical(base: &str, number: Number) -> Result<Radical, MorphologyError> {
    let plural = number == Number::Plural;
    let radical = if let Some(stem) = base.strip_suffix("er") {
        Radical { stem: stem.to_string(), group: 1 }
    } else if let Some(stem) = base.strip_suffix("ir").filter(|s| s.ends_with('o')) {
        let glide = if plural { "y" } else { "i" };
        Radical { stem: format!("{}{}", stem, glide), group: 2 }
    } else if let Some(stem) = base.strip_suffix('r').filter(|s| s.ends_with('i')) {
        let stem = if plural { format!("{}ss", stem) } else { stem.to_string() };
        Radical { stem, group: 2 }
    } else if let Some(stem) = base.strip_suffix("ïr") {
        let stem = if plural { format!("{}ïss", stem) } else { format!("{}i", stem) };
        Radical { stem, group: 2 }
    } else if let Some(stem) = base.strip_suffix("re") {
        let stem = match stem.strip_suffix('t') {
            Some(short) if !plural => short,
            _ => stem,
        };
        Radical { stem: stem.to_string(), group: 3 }
    } else {
        return Err(MorphologyError::UnknownVerbGroup(base.to_string()));
    };
    Ok(radical)
}

/// Conjugation group (1, 2 or 3) the regular rules would use for `base`.
pub fn conjugation_group(base: &str) -> Option<u8> {
    present_radical(base, Number::Singular).ok().map(|r| r.group)
}

/// Join radical and ending with the spelling adjustments the ending calls
/// for: "commenç-ons", "mange-ons", "pai-e", "achèt-e".
pub fn add_suffix(radical: &str, suffix: &str) -> String {
    let mut stem: Vec<char> = radical.chars().collect();
    let first = suffix.chars().next();
    if matches!(first, Some('a' | 'ä' | 'à' | 'â' | 'o' | 'ô')) {
        match stem.last() {
            Some('c') => {
                stem.pop();
                stem.push('ç');
            }
            Some('g') => stem.push('e'),
            _ => {}
        }
    } else if first == Some('e') && suffix != "ez" {
        let n = stem.len();
        if n >= 1 && stem[n - 1] == 'y' && !(n >= 2 && stem[n - 2] == 'e') {
            stem[n - 1] = 'i';
        }
        if n >= 2 && matches!(stem[n - 2], 'e' | 'é') {
            stem[n - 2] = 'è';
        }
    }
    let mut out: String = stem.into_iter().collect();
    out.push_str(suffix);
    out
}

/// Slot 0..6 for 1s, 2s, 3s, 1p, 2p, 3p.
fn slot(person: Person, number: Number) -> usize {
    let p = match person {
        Person::First => 0,
        Person::Second => 1,
        Person::Third => 2,
    };
    if number == Number::Plural {
        p + 3
    } else {
        p
    }
}

fn build_present(base: &str, person: Person, number: Number) -> Result<String, MorphologyError> {
    let radical = present_radical(base, number)?;
    let suffix = match (number, person) {
        (Number::Plural, Person::First) => "ons",
        (Number::Plural, Person::Second) => "ez",
        (Number::Plural, Person::Third) => "ent",
        (_, Person::First | Person::Third) if radical.group == 1 => "e",
        (_, _) if radical.group == 1 => "es",
        (_, Person::First | Person::Second) => "s",
        (_, _) if radical.group == 2 => "t",
        _ => "",
    };
    Ok(add_suffix(&radical.stem, suffix))
}

fn build_subjunctive(base: &str, person: Person, number: Number) -> Result<String, MorphologyError> {
    let radical = present_radical(base, Number::Plural)?;
    let suffix = match (number, person) {
        (Number::Plural, Person::First) => "ions",
        (Number::Plural, Person::Second) => "iez",
        (Number::Plural, Person::Third) => "ent",
        (_, Person::Second) => "es",
        _ => "e",
    };
    Ok(add_suffix(&radical.stem, suffix))
}

fn future_ending(person: Person, number: Number) -> &'static str {
    match (number, person) {
        (Number::Plural, Person::First) => "ons",
        (Number::Plural, Person::Second) => "ez",
        (Number::Plural, Person::Third) => "ont",
        (_, Person::First) => "ai",
        (_, Person::Second) => "as",
        (_, Person::Third) => "a",
    }
}

/// Endings shared by the conditional and the imparfait.
fn imparfait_ending(person: Person, number: Number) -> &'static str {
    match (number, person) {
        (Number::Plural, Person::First) => "ions",
        (Number::Plural, Person::Second) => "iez",
        (Number::Plural, Person::Third) => "aient",
        (_, Person::Third) => "ait",
        _ => "ais",
    }
}

/// "acheter" → "achèter", "vendre" → "vendr", "payer" → "paier".
pub fn future_radical(base: &str) -> String {
    let chars: Vec<char> = base.chars().collect();
    let n = chars.len();
    if let Some(stem) = base.strip_suffix('e') {
        stem.to_string()
    } else if let Some(stem) = base.strip_suffix("yer") {
        format!("{}ier", stem)
    } else if n >= 4 && matches!(chars[n - 4], 'e' | 'é') {
        let head: String = chars[..n - 4].iter().collect();
        let tail: String = chars[n - 3..].iter().collect();
        format!("{}è{}", head, tail)
    } else {
        base.to_string()
    }
}

pub fn past_participle(base: &str) -> String {
    if let Some(stem) = base.strip_suffix("er") {
        format!("{}é", stem)
    } else if let Some(stem) = base.strip_suffix("oir") {
        format!("{}u", stem)
    } else if let Some(stem) = base.strip_suffix("ir") {
        format!("{}i", stem)
    } else if let Some(stem) = base.strip_suffix("mettre") {
        format!("{}mis", stem)
    } else if let Some(stem) = base.strip_suffix("re") {
        format!("{}u", stem)
    } else {
        base.to_string()
    }
}

fn present(token: &Token, base: &str, person: Person, number: Number) -> Result<String, MorphologyError> {
    let index = slot(person, number);
    match stored(token, |f| f.present[index].clone()) {
        Some(form) => Ok(form),
        None => build_present(base, person, number),
    }
}

fn imparfait_radical(token: &Token, base: &str) -> Result<String, MorphologyError> {
    if let Some(radical) = stored(token, |f| f.imparfait_radical.clone()) {
        return Ok(radical);
    }
    let first_plural = present(token, base, Person::First, Number::Plural)?;
    Ok(first_plural
        .strip_suffix("ons")
        .map(str::to_string)
        .unwrap_or(first_plural))
}

fn imperative(token: &Token, base: &str, person: Person, number: Number) -> Result<String, MorphologyError> {
    let listed = match (number, person) {
        (Number::Singular, Person::Second) => stored(token, |f| f.imperative2s.clone()),
        (Number::Plural, Person::First) => stored(token, |f| f.imperative1p.clone()),
        (Number::Plural, Person::Second) => stored(token, |f| f.imperative2p.clone()),
        _ => None,
    };
    if let Some(form) = listed {
        return Ok(form);
    }
    let form = present(token, base, person, number)?;
    if number == Number::Singular && person == Person::Second && form.ends_with("es") {
        Ok(form[..form.len() - 1].to_string())
    } else {
        Ok(form)
    }
}

fn verb(token: &Token) -> Result<String, MorphologyError> {
    let fs = &token.features;
    let base = token
        .entry
        .as_ref()
        .map(|e| e.base.clone())
        .unwrap_or_else(|| token.base.clone());
    let person = fs.person().unwrap_or(Person::Third);
    let number = match fs.number() {
        Some(Number::Plural) => Number::Plural,
        _ => Number::Singular,
    };
    let tense = fs.tense().unwrap_or(Tense::Present);
    let feminine = fs.gender() == Some(Gender::Feminine);
    let plural = fs.is_plural();

    let realised = match fs.form().unwrap_or(Form::Indicative) {
        Form::BareInfinitive | Form::Infinitive => base,
        Form::PresentParticiple | Form::Gerund => {
            let mut form = match stored(token, |f| f.present_participle.clone()) {
                Some(form) => form,
                None => format!("{}ant", imparfait_radical(token, &base)?),
            };
            if feminine {
                form.push('e');
            }
            if plural {
                form.push('s');
            }
            form
        }
        Form::PastParticiple => {
            let mut form = stored(token, |f| f.past_participle.clone())
                .unwrap_or_else(|| past_participle(&base));
            if feminine {
                form = stored(token, |f| f.feminine_past_participle.clone())
                    .unwrap_or_else(|| format!("{}e", form));
            }
            if plural && !form.ends_with('s') {
                form.push('s');
            }
            form
        }
        Form::Subjunctive => {
            let index = slot(person, number);
            match stored(token, |f| f.subjunctive[index].clone()) {
                Some(form) => form,
                None => build_subjunctive(&base, person, number)?,
            }
        }
        Form::Imperative => imperative(token, &base, person, number)?,
        _ => match tense {
            Tense::Present => present(token, &base, person, number)?,
            Tense::Future | Tense::Conditional => {
                let radical = stored(token, |f| f.future_radical.clone())
                    .unwrap_or_else(|| future_radical(&base));
                let ending = if tense == Tense::Future {
                    future_ending(person, number)
                } else {
                    imparfait_ending(person, number)
                };
                format!("{}{}", radical, ending)
            }
            Tense::Past => format!(
                "{}{}",
                imparfait_radical(token, &base)?,
                imparfait_ending(person, number)
            ),
        },
    };
    Ok(realised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexicon::Lexicon;
    use crate::schema::feature::FeatureSet;

    fn conjugate(lex: &Lexicon, base: &str, features: FeatureSet) -> String {
        let ctx = RealiseContext::new(lex);
        let mut token = Token::new(&ctx, base, Category::Verb);
        token.features = features;
        verb(&token).unwrap()
    }

    fn agreeing(number: Number, person: Person) -> FeatureSet {
        FeatureSet::new()
            .with(Feature::Number, number)
            .with(Feature::Person, person)
    }

    #[test]
    fn regular_plurals() {
        assert_eq!(pluralize("maison"), "maisons");
        assert_eq!(pluralize("jeu"), "jeux");
        assert_eq!(pluralize("cheval"), "chevaux");
        assert_eq!(pluralize("nez"), "nez");
    }

    #[test]
    fn feminine_by_ending() {
        let lex = Lexicon::french().unwrap();
        let ctx = RealiseContext::new(&lex);
        let cases = [
            ("cruel", "cruelle"),
            ("ancien", "ancienne"),
            ("heureux", "heureuse"),
            ("premier", "première"),
            ("actif", "active"),
            ("créateur", "créatrice"),
            ("menteur", "menteuse"),
            ("perdu", "perdue"),
        ];
        for (base, expected) in cases {
            assert_eq!(feminize_by_rule(&ctx, base), expected, "{}", base);
        }
        let belle = Token::new(&ctx, "beau", Category::Adjective);
        assert_eq!(feminize(&ctx, &belle, "beau"), "belle");
    }

    #[test]
    fn present_by_group() {
        let lex = Lexicon::french().unwrap();
        let cases = [
            ("manger", Number::Singular, Person::First, "mange"),
            ("manger", Number::Plural, Person::First, "mangeons"),
            ("finir", Number::Plural, Person::First, "finissons"),
            ("finir", Number::Singular, Person::Third, "finit"),
            ("vendre", Number::Singular, Person::Third, "vend"),
            ("mettre", Number::Singular, Person::First, "mets"),
            ("acheter", Number::Singular, Person::First, "achète"),
            ("payer", Number::Plural, Person::Third, "paient"),
            ("voir", Number::Plural, Person::Second, "voyez"),
            ("être", Number::Plural, Person::First, "sommes"),
        ];
        for (base, number, person, expected) in cases {
            assert_eq!(conjugate(&lex, base, agreeing(number, person)), expected, "{}", base);
        }
    }

    #[test]
    fn other_tenses() {
        let lex = Lexicon::french().unwrap();
        let future = FeatureSet::new().with(Feature::Tense, Tense::Future);
        assert_eq!(conjugate(&lex, "acheter", future.clone()), "achètera");
        assert_eq!(conjugate(&lex, "être", future), "sera");
        let imparfait = agreeing(Number::Singular, Person::First).with(Feature::Tense, Tense::Past);
        assert_eq!(conjugate(&lex, "commencer", imparfait), "commençais");
        let conditional = FeatureSet::new().with(Feature::Tense, Tense::Conditional);
        assert_eq!(conjugate(&lex, "vendre", conditional), "vendrait");
        let participle = FeatureSet::new().with(Feature::Form, Form::PastParticiple);
        assert_eq!(conjugate(&lex, "vendre", participle.clone()), "vendu");
        let agreeing_participle = participle
            .with(Feature::Gender, Gender::Feminine)
            .with(Feature::Number, Number::Plural);
        assert_eq!(conjugate(&lex, "arriver", agreeing_participle), "arrivées");
        let gerund = FeatureSet::new().with(Feature::Form, Form::PresentParticiple);
        assert_eq!(conjugate(&lex, "manger", gerund), "mangeant");
    }

    #[test]
    fn imperative_drops_s_of_first_group() {
        let lex = Lexicon::french().unwrap();
        let second = FeatureSet::new()
            .with(Feature::Form, Form::Imperative)
            .with(Feature::Person, Person::Second);
        assert_eq!(conjugate(&lex, "manger", second.clone()), "mange");
        assert_eq!(conjugate(&lex, "finir", second.clone()), "finis");
        assert_eq!(conjugate(&lex, "être", second), "sois");
    }

    #[test]
    fn unknown_group_is_an_error() {
        let lex = Lexicon::french().unwrap();
        let ctx = RealiseContext::new(&lex);
        let token = Token::new(&ctx, "xyz", Category::Verb);
        assert!(matches!(verb(&token), Err(MorphologyError::UnknownVerbGroup(_))));
        assert_eq!(conjugation_group("xyz"), None);
        assert_eq!(conjugation_group("parler"), Some(1));
        assert_eq!(conjugation_group("choisir"), Some(2));
        assert_eq!(conjugation_group("vendre"), Some(3));
    }

    #[test]
    fn suffix_spelling() {
        assert_eq!(add_suffix("commenc", "ons"), "commençons");
        assert_eq!(add_suffix("mang", "ons"), "mangeons");
        assert_eq!(add_suffix("pay", "ez"), "payez");
        assert_eq!(add_suffix("lev", "e"), "lève");
        assert_eq!(add_suffix("achet", "ent"), "achètent");
        assert_eq!(future_radical("acheter"), "achèter");
        assert_eq!(future_radical("vendre"), "vendr");
    }

    #[test]
    fn pronoun_forms() {
        assert_eq!(personal_form(Person::Third, Number::Singular, Gender::Feminine, PronounUse::Direct), "la");
        assert_eq!(personal_form(Person::Third, Number::Plural, Gender::Masculine, PronounUse::Indirect), "leur");
        assert_eq!(personal_form(Person::First, Number::Singular, Gender::Masculine, PronounUse::Detached), "moi");
        assert_eq!(personal_form(Person::Third, Number::Plural, Gender::Feminine, PronounUse::Reflexive), "se");
    }

    #[test]
    fn object_pronoun_resolves_entry() {
        let lex = Lexicon::french().unwrap();
        let ctx = RealiseContext::new(&lex);
        let tree = Tree::new();
        let mut token = Token::new(&ctx, "elle", Category::Pronoun)
            .with(Feature::DiscourseFunction, DiscourseFunction::Object);
        assert_eq!(pronoun(&ctx, &tree, &mut token), "la");
        assert!(token.entry.is_some_and(|e| e.flags.vowel_elision));
    }
}
