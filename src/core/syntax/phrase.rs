/// Noun phrases, generic phrases (prepositional, adjectival, adverbial) and
/// modifier placement.

use crate::core::context::RealiseContext;
use crate::core::lexicon::Lexicon;
use crate::schema::element::{ElementError, ElementKind, NodeId, Tree};
use crate::schema::feature::{
    Category, DiscourseFunction, Feature, Gender, Language, Number, Person, PronounType,
};

use super::{
    nominal_gender, realise, realise_list, word_token, SyntaxError, Token,
};

/// Features a noun phrase hands down to its head before the head is
/// realised.
const HEAD_FEATURES: &[Feature] = &[
    Feature::Number,
    Feature::Gender,
    Feature::Person,
    Feature::Case,
    Feature::Possessive,
    Feature::Passive,
    Feature::Detached,
    Feature::DiscourseFunction,
];

/// Premodifiers, head, complements, postmodifiers.
pub fn realise_phrase(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    phrase: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    let Some(core) = tree.kind(phrase).core().cloned() else {
        return realise(ctx, tree, phrase);
    };
    let fs = tree.features(phrase).clone();
    let mut out = realise_list(ctx, tree, &core.premodifiers, Some(DiscourseFunction::PreModifier))?;

    if tree.is_truthy(core.head) {
        let head = tree.features_mut(core.head);
        head.copy_from(&fs, Feature::Comparative);
        head.copy_from(&fs, Feature::Superlative);
        head.set(Feature::DiscourseFunction, DiscourseFunction::Head);
        out.extend(realise(ctx, tree, core.head)?);
    }

    let mut first = true;
    for complement in &core.complements {
        if !tree.is_truthy(*complement) {
            continue;
        }
        if !tree.features(*complement).has(Feature::DiscourseFunction) {
            tree.set_feature(*complement, Feature::DiscourseFunction, DiscourseFunction::Complement);
        }
        let tokens = realise(ctx, tree, *complement)?;
        if tokens.is_empty() {
            continue;
        }
        if !first {
            out.push(conjunction(ctx, Some(phrase)));
        }
        first = false;
        out.extend(tokens);
    }

    out.extend(realise_list(ctx, tree, &core.postmodifiers, Some(DiscourseFunction::PostModifier))?);
    Ok(out)
}

fn conjunction(ctx: &RealiseContext, parent: Option<NodeId>) -> Token {
    Token::new(ctx, ctx.language().conjunction(), Category::Conjunction)
        .with(Feature::DiscourseFunction, DiscourseFunction::Conjunction)
        .with_parent(parent)
}

pub fn realise_noun_phrase(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    np: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    let ElementKind::NounPhrase(parts) = tree.kind(np).clone() else {
        return realise_phrase(ctx, tree, np);
    };
    let fs = tree.features(np).clone();
    if fs.flag(Feature::Pronominal) {
        return Ok(vec![create_pronoun(ctx, tree, np)]);
    }

    let mut out = Vec::new();
    if let Some(spec) = parts.specifier {
        if tree.is_truthy(spec) && !fs.flag(Feature::Raised) {
            out.extend(realise_specifier(ctx, tree, np, spec)?);
        }
    }
    out.extend(realise_list(ctx, tree, &parts.core.premodifiers, Some(DiscourseFunction::PreModifier))?);

    let head = parts.core.head;
    if tree.is_truthy(head) {
        let target = tree.features_mut(head);
        for feature in HEAD_FEATURES {
            target.copy_from(&fs, *feature);
        }
        out.extend(realise(ctx, tree, head)?);
    }

    for complement in &parts.core.complements {
        if !tree.features(*complement).has(Feature::DiscourseFunction) {
            tree.set_feature(*complement, Feature::DiscourseFunction, DiscourseFunction::Complement);
        }
    }
    out.extend(realise_list(ctx, tree, &parts.core.complements, None)?);
    out.extend(realise_list(ctx, tree, &parts.core.postmodifiers, Some(DiscourseFunction::PostModifier))?);
    Ok(out)
}

/// Determiners agree in number with their phrase; pronoun specifiers become
/// possessives and keep their own person and number.
fn realise_specifier(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    np: NodeId,
    spec: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    tree.set_feature(spec, Feature::DiscourseFunction, DiscourseFunction::Specifier);
    let np_number = tree.features(np).number();

    let Some(word) = tree.word_of(spec).cloned() else {
        return realise(ctx, tree, spec);
    };
    let is_pronoun = word.category == Category::Pronoun
        || (word.category == Category::Any
            && ctx.lexicon().lookup(&word.base, Category::Any).map(|e| e.category)
                == Some(Category::Pronoun));
    if is_pronoun {
        tree.set_feature(spec, Feature::Possessive, true);
        return realise(ctx, tree, spec);
    }
    tree.features_mut(spec).set_opt(Feature::Number, np_number);

    if ctx.language() == Language::French {
        let negated_object = is_negated_object(tree, np);
        if word.base == "du" {
            let mut out = vec![Token::new(ctx, "de", Category::Preposition).with_parent(Some(np))];
            if !negated_object {
                let mut article = Token::new(ctx, "le", Category::Determiner).with_parent(Some(np));
                article.features.set_opt(Feature::Number, np_number);
                out.push(article);
            }
            return Ok(out);
        }
        if word.base == "un" && negated_object {
            return Ok(vec![Token::new(ctx, "de", Category::Preposition).with_parent(Some(np))]);
        }
    }
    Ok(vec![word_token(ctx, tree, spec, &word)])
}

/// Direct object of a negated verb phrase.
fn is_negated_object(tree: &Tree, np: NodeId) -> bool {
    if tree.features(np).discourse_function() != Some(DiscourseFunction::Object) {
        return false;
    }
    tree.parent(np)
        .is_some_and(|p| tree.features(p).flag(Feature::Negated))
}

/// Replace a noun phrase by the personal pronoun matching its features.
pub fn create_pronoun(ctx: &mut RealiseContext, tree: &Tree, np: NodeId) -> Token {
    let fs = tree.features(np);
    let person = fs.person().unwrap_or(Person::Third);
    let number = fs.number().unwrap_or(Number::Singular);
    let gender = nominal_gender(ctx, tree, np).unwrap_or(match ctx.language() {
        Language::English => Gender::Neuter,
        Language::French => Gender::Masculine,
    });

    let base = match ctx.language() {
        Language::English => english_pronoun(person, number, gender).to_string(),
        Language::French => ctx
            .lexicon()
            .find(Category::Pronoun, |e| {
                e.discourse_function == Some(DiscourseFunction::Subject)
                    && e.pronoun_type == Some(PronounType::Personal)
                    && e.person == Some(person)
                    && e.number == Some(if number == Number::Both {
                        Number::Plural
                    } else {
                        number
                    })
                    && (person != Person::Third || e.gender == Some(gender))
            })
            .map(|e| e.base)
            .unwrap_or_else(|| "il".to_string()),
    };

    let mut token = Token::new(ctx, &base, Category::Pronoun).with_parent(tree.parent(np));
    let features = &mut token.features;
    features.set(Feature::Person, person);
    features.set(Feature::Number, number);
    features.set(Feature::Gender, gender);
    features.set(
        Feature::DiscourseFunction,
        fs.discourse_function().unwrap_or(DiscourseFunction::Subject),
    );
    for feature in [
        Feature::Possessive,
        Feature::Passive,
        Feature::Detached,
        Feature::Reflexive,
        Feature::Case,
    ] {
        features.copy_from(fs, feature);
    }
    token
}

fn english_pronoun(person: Person, number: Number, gender: Gender) -> &'static str {
    match (number, person) {
        (Number::Both, _) => "both",
        (Number::Plural, Person::First) => "we",
        (Number::Plural, Person::Second) => "you",
        (Number::Plural, Person::Third) => "they",
        (Number::Singular, Person::First) => "I",
        (Number::Singular, Person::Second) => "you",
        (Number::Singular, Person::Third) => match gender {
            Gender::Feminine => "she",
            Gender::Masculine => "he",
            Gender::Neuter => "it",
        },
    }
}

/// Attach a modifier where it belongs. Adjectives premodify English nouns;
/// in French only preposed and ordinal adjectives do. Adverbs premodify verb
/// phrases. Everything else postmodifies. Clause modifiers go to the
/// predicate.
pub fn add_modifier(
    lexicon: &Lexicon,
    tree: &mut Tree,
    phrase: NodeId,
    modifier: NodeId,
) -> Result<(), ElementError> {
    let target = match tree.kind(phrase) {
        ElementKind::Clause(c) => c.core.head,
        _ => phrase,
    };
    let head_category = modifier_category(lexicon, tree, modifier);
    let premodify = match tree.kind(target) {
        ElementKind::NounPhrase(_) => match head_category {
            Some((Category::Adjective, base)) => match lexicon.language() {
                Language::English => true,
                Language::French => {
                    base.ends_with("ième")
                        || lexicon
                            .lookup(&base, Category::Adjective)
                            .is_some_and(|e| e.flags.preposed)
                }
            },
            _ => false,
        },
        ElementKind::VerbPhrase(_) => matches!(head_category, Some((Category::Adverb, _))),
        _ => matches!(head_category, Some((Category::Adverb, _))),
    };
    if premodify {
        tree.add_premodifier(target, modifier)
    } else {
        tree.add_postmodifier(target, modifier)
    }
}

/// Category and base of the word heading a modifier.
fn modifier_category(lexicon: &Lexicon, tree: &Tree, modifier: NodeId) -> Option<(Category, String)> {
    let word = match tree.kind(modifier) {
        ElementKind::Word(w) => w,
        ElementKind::AdjectivePhrase(core) | ElementKind::AdverbPhrase(core) => {
            tree.word_of(core.head)?
        }
        _ => return None,
    };
    let category = match word.category {
        Category::Any => lexicon.lookup(&word.base, Category::Any)?.category,
        c => c,
    };
    Some((category, word.base.clone()))
}
