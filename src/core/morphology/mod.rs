/// Morphology: concrete spellings for abstract word tokens.
///
/// Each language module inflects one token at a time from its category and
/// features. Irregular forms come from the token's own overrides first,
/// then the lexicon entry, then the regular rules.

pub mod english;
pub mod french;

use thiserror::Error;

use crate::core::context::RealiseContext;
use crate::core::syntax::{nominal_gender, nominal_number, Token};
use crate::schema::element::{ElementKind, NodeId, Tree};
use crate::schema::feature::{Feature, Gender, Language, Number};
use crate::schema::word::WordForms;

#[derive(Debug, Error)]
pub enum MorphologyError {
    #[error("cannot tell the conjugation group of '{0}'")]
    UnknownVerbGroup(String),
}

/// Inflect every token that has no realisation yet.
pub fn inflect_tokens(
    ctx: &RealiseContext,
    tree: &Tree,
    tokens: &mut [Token],
) -> Result<(), MorphologyError> {
    for token in tokens.iter_mut() {
        if token.realisation.is_some() {
            continue;
        }
        let realised = inflect(ctx, tree, token)?;
        token.realisation = Some(realised);
    }
    Ok(())
}

/// Surface form of one token. May record resolved agreement features on
/// the token for later stages.
pub fn inflect(
    ctx: &RealiseContext,
    tree: &Tree,
    token: &mut Token,
) -> Result<String, MorphologyError> {
    if token.canned || token.features.flag(Feature::NonMorph) {
        return Ok(token.base.clone());
    }
    match ctx.language() {
        Language::English => Ok(english::inflect(tree, token)),
        Language::French => french::inflect(ctx, tree, token),
    }
}

/// A stored form: the token's own override first, then its lexicon entry.
pub(crate) fn stored<F>(token: &Token, pick: F) -> Option<String>
where
    F: Fn(&WordForms) -> Option<String>,
{
    pick(&token.forms).or_else(|| token.entry.as_ref().and_then(|e| pick(&e.forms)))
}

/// The phrase a modifier agrees with: the nearest noun or verb phrase above
/// it, looking through adjective phrases, adverb phrases, coordinations and
/// placeholders.
pub(crate) fn agreement_phrase(tree: &Tree, token: &Token) -> Option<NodeId> {
    let mut current = token.parent?;
    loop {
        match tree.kind(current) {
            ElementKind::NounPhrase(_) | ElementKind::VerbPhrase(_) => return Some(current),
            ElementKind::AdjectivePhrase(_)
            | ElementKind::AdverbPhrase(_)
            | ElementKind::Coordination(_)
            | ElementKind::List(_)
            | ElementKind::Placeholder { .. } => current = tree.parent(current)?,
            _ => return None,
        }
    }
}

/// Gender and number a modifier should agree with. Noun phrases answer for
/// themselves; verb phrases carry their subject's agreement.
pub(crate) fn agreement(ctx: &RealiseContext, tree: &Tree, token: &Token) -> (Option<Gender>, Option<Number>) {
    let from_phrase = agreement_phrase(tree, token).map(|phrase| match tree.kind(phrase) {
        ElementKind::NounPhrase(_) => (
            nominal_gender(ctx, tree, phrase),
            nominal_number(ctx, tree, phrase),
        ),
        _ => (
            tree.features(phrase).gender(),
            tree.features(phrase).number(),
        ),
    });
    let (gender, number) = from_phrase.unwrap_or((None, None));
    (
        token.features.gender().or(gender),
        token.features.number().or(number),
    )
}
