/// Clauses: subject agreement, complementisers, questions and passive
/// reordering.

use crate::core::context::RealiseContext;
use crate::schema::element::{ElementKind, NodeId, PhraseCore, Tree};
use crate::schema::feature::{
    Category, ClauseStatus, DiscourseFunction, Feature, Form, InterrogativeType, Language, Number,
    Person, Tense,
};

use super::{
    is_copular, nominal_gender, nominal_number, nominal_person, realise, realise_list,
    SyntaxError, Token,
};

/// Clause features the verb phrase realises.
const VERB_FEATURES: &[Feature] = &[
    Feature::Modal,
    Feature::Tense,
    Feature::Negated,
    Feature::Passive,
    Feature::Perfect,
    Feature::Particle,
    Feature::Progressive,
    Feature::Form,
    Feature::InterrogativeType,
    Feature::RealiseAuxiliary,
    Feature::IgnoreModal,
    Feature::Reflexive,
];

pub fn realise_clause(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    clause: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    let ElementKind::Clause(parts) = tree.kind(clause).clone() else {
        return realise(ctx, tree, clause);
    };
    tree.features(clause)
        .try_interrogative_type()
        .map_err(|value| SyntaxError::MalformedFeature {
            node: clause,
            feature: Feature::InterrogativeType,
            value,
        })?;
    let vp = parts.core.head;

    move_modifiers_to_verb_phrase(tree, clause, vp, &parts.core)?;
    check_subject_number_person(ctx, tree, clause, parts.subject, vp);
    check_discourse_function(tree, clause, parts.subject);

    let fs = tree.features(clause).clone();
    for feature in VERB_FEATURES {
        tree.features_mut(vp).copy_from(&fs, *feature);
    }

    let form = fs.form();
    let mut front_modifiers = parts.front_modifiers.clone();
    if form == Some(Form::Infinitive) {
        tree.set_feature(clause, Feature::SuppressedComplementiser, true);
        if tree.kind(vp).core().is_some() {
            for modifier in front_modifiers.drain(..) {
                tree.add_postmodifier(vp, modifier)?;
            }
        }
    }
    let fs = tree.features(clause).clone();
    let interrogative = fs.interrogative_type();
    let passive = fs.flag(Feature::Passive);

    let mut out = Vec::new();
    if fs.clause_status() == Some(ClauseStatus::Subordinate)
        && !fs.flag(Feature::SuppressedComplementiser)
    {
        let complementiser = fs
            .text(Feature::Complementiser)
            .unwrap_or(ctx.language().complementiser());
        if !complementiser.is_empty() {
            out.push(
                Token::new(ctx, complementiser, Category::Complementiser)
                    .with(Feature::DiscourseFunction, DiscourseFunction::Complement)
                    .with_parent(Some(clause)),
            );
        }
    }
    if let Some(cue) = parts.cue_phrase {
        out.extend(realise_list(ctx, tree, &[cue], Some(DiscourseFunction::CuePhrase))?);
    }

    let mut split: Option<Vec<Token>> = None;
    let mut subject = Some(parts.subject).filter(|s| tree.is_truthy(*s));
    match interrogative {
        Some(kind) => {
            let question = match ctx.language() {
                Language::English => english_question(ctx, tree, clause, vp, subject, kind)?,
                Language::French => french_question(ctx, clause, kind),
            };
            out.extend(question.prefix);
            if question.consumes_subject {
                subject = None;
            }
            split = question.split;
        }
        None => {
            out.extend(realise_list(ctx, tree, &front_modifiers, Some(DiscourseFunction::FrontModifier))?);
        }
    }

    let subjectless = matches!(form, Some(Form::Infinitive | Form::Imperative));
    if !subjectless && !passive && split.is_none() {
        if let Some(s) = subject {
            out.extend(realise_subject(ctx, tree, clause, s)?);
        }
    }

    if passive {
        let objects = passive_complements(ctx, tree, clause, vp, interrogative)?;
        if !objects.is_empty() {
            if interrogative.is_some() {
                split = Some(objects);
            } else {
                out.extend(objects);
            }
        }
    }

    tree.set_feature(vp, Feature::DiscourseFunction, DiscourseFunction::VerbPhrase);
    let verb = realise(ctx, tree, vp)?;
    match split {
        None => out.extend(verb),
        Some(split) => {
            let wh_object = interrogative.is_some_and(|t| t.is_wh_object_like());
            if verb.len() > 1 {
                let mut verb = verb.into_iter();
                out.extend(verb.next());
                out.extend(split);
                out.extend(verb);
            } else if wh_object {
                out.extend(verb);
                out.extend(split);
            } else {
                out.extend(split);
                out.extend(verb);
            }
        }
    }

    if passive && (subject.is_some() || interrogative.is_some()) {
        out.push(
            Token::new(ctx, ctx.language().passive_preposition(), Category::Preposition)
                .with_parent(Some(clause)),
        );
        if let Some(s) = subject {
            // The agent sits after the preposition, away from the verb.
            tree.set_feature(s, Feature::Passive, true);
            tree.set_feature(s, Feature::Detached, true);
            out.extend(realise_subject(ctx, tree, clause, s)?);
        }
    }

    if interrogative.is_some() {
        out.extend(realise_list(ctx, tree, &front_modifiers, Some(DiscourseFunction::FrontModifier))?);
    }
    if interrogative == Some(InterrogativeType::WhoIndirectObject)
        && ctx.language() == Language::English
    {
        out.push(Token::new(ctx, "to", Category::Preposition).with_parent(Some(clause)));
    }
    Ok(out)
}

/// Clause-level premodifiers, complements and postmodifiers belong to the
/// verb phrase.
fn move_modifiers_to_verb_phrase(
    tree: &mut Tree,
    clause: NodeId,
    vp: NodeId,
    core: &PhraseCore,
) -> Result<(), SyntaxError> {
    if tree.kind(vp).core().is_none() {
        return Ok(());
    }
    for m in &core.premodifiers {
        tree.add_premodifier(vp, *m)?;
    }
    for c in &core.complements {
        tree.add_complement(vp, *c)?;
    }
    for m in &core.postmodifiers {
        tree.add_postmodifier(vp, *m)?;
    }
    if let Some(own) = tree.get_mut(clause).kind.core_mut() {
        own.premodifiers.clear();
        own.complements.clear();
        own.postmodifiers.clear();
    }
    Ok(())
}

/// The verb agrees with the subject in number and person (and, for French
/// participles, gender).
fn check_subject_number_person(
    ctx: &RealiseContext,
    tree: &mut Tree,
    clause: NodeId,
    subject: NodeId,
    vp: NodeId,
) {
    if !tree.is_truthy(subject) {
        let number = tree.features(clause).number();
        let person = tree.features(clause).person();
        let target = tree.features_mut(vp);
        target.set_opt(Feature::Number, number);
        target.set_opt(Feature::Person, person);
        return;
    }
    let number = match nominal_number(ctx, tree, subject) {
        Some(Number::Plural) | Some(Number::Both) => Number::Plural,
        _ => tree.features(clause).number().unwrap_or(Number::Singular),
    };
    let person = nominal_person(ctx, tree, subject);
    let gender = nominal_gender(ctx, tree, subject);
    let target = tree.features_mut(vp);
    target.set(Feature::Number, number);
    target.set_opt(Feature::Person, person);
    if ctx.language() == Language::French {
        target.set_opt(Feature::Gender, gender);
    }
}

/// Clauses used as objects or subjects adjust their form and drop the
/// complementiser.
fn check_discourse_function(tree: &mut Tree, clause: NodeId, subject: NodeId) {
    let fs = tree.features(clause);
    let form = fs.form();
    let has_subject = tree.is_truthy(subject);
    match fs.discourse_function() {
        Some(DiscourseFunction::Object | DiscourseFunction::IndirectObject) => match form {
            Some(Form::Imperative) => {
                tree.set_feature(clause, Feature::SuppressedComplementiser, true);
                tree.set_feature(clause, Feature::Form, Form::Infinitive);
            }
            Some(Form::Gerund) if !has_subject => {
                tree.set_feature(clause, Feature::SuppressedComplementiser, true);
            }
            _ => {}
        },
        Some(DiscourseFunction::Subject) => {
            tree.set_feature(clause, Feature::SuppressedComplementiser, true);
            tree.set_feature(clause, Feature::Form, Form::Gerund);
        }
        _ => {}
    }
}

fn realise_subject(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    clause: NodeId,
    subject: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    tree.set_feature(subject, Feature::DiscourseFunction, DiscourseFunction::Subject);
    if tree.features(clause).form() == Some(Form::Gerund) {
        tree.set_feature(subject, Feature::Possessive, true);
    }
    realise(ctx, tree, subject)
}

/// In a passive clause the direct objects move to subject position and the
/// verb agrees with them. An object question leaves them out: the wh-word
/// stands in for them.
fn passive_complements(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    clause: NodeId,
    vp: NodeId,
    interrogative: Option<InterrogativeType>,
) -> Result<Vec<Token>, SyntaxError> {
    if interrogative.is_some_and(|t| t.is_object()) {
        return Ok(Vec::new());
    }
    let complements = match tree.kind(vp).core() {
        Some(core) => core.complements.clone(),
        None => return Ok(Vec::new()),
    };
    let mut out = Vec::new();
    let mut count = 0;
    let mut number = None;
    let mut person = None;
    let mut gender = None;
    for complement in complements {
        if tree.features(complement).discourse_function() != Some(DiscourseFunction::Object) {
            continue;
        }
        count += 1;
        tree.set_feature(complement, Feature::Passive, true);
        if tree.features(clause).form() == Some(Form::Gerund) {
            tree.set_feature(complement, Feature::Possessive, true);
        }
        number = match number {
            None => Some(nominal_number(ctx, tree, complement).unwrap_or(Number::Singular)),
            Some(_) => Some(Number::Plural),
        };
        person = match (person, nominal_person(ctx, tree, complement)) {
            (_, Some(Person::First)) | (Some(Person::First), _) => Some(Person::First),
            (_, Some(Person::Second)) | (Some(Person::Second), _) => Some(Person::Second),
            _ => Some(Person::Third),
        };
        gender = gender.or_else(|| nominal_gender(ctx, tree, complement));
        out.extend(realise(ctx, tree, complement)?);
    }
    if count > 0 {
        let target = tree.features_mut(vp);
        target.set_opt(Feature::Number, number);
        target.set_opt(Feature::Person, person);
        if ctx.language() == Language::French {
            target.set_opt(Feature::Gender, gender);
        }
    }
    Ok(out)
}

struct Question {
    prefix: Vec<Token>,
    split: Option<Vec<Token>>,
    consumes_subject: bool,
}

/// Auxiliaries or copulas that can invert with the subject.
fn has_auxiliary(tree: &Tree, clause: NodeId) -> bool {
    let fs = tree.features(clause);
    fs.has(Feature::Modal)
        || fs.flag(Feature::Perfect)
        || fs.flag(Feature::Progressive)
        || matches!(fs.tense(), Some(Tense::Future | Tense::Conditional))
}

fn keyword(ctx: &RealiseContext, word: &str, category: Category, clause: NodeId) -> Token {
    Token::new(ctx, word, category).with_parent(Some(clause))
}

fn english_question(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    clause: NodeId,
    vp: NodeId,
    subject: Option<NodeId>,
    kind: InterrogativeType,
) -> Result<Question, SyntaxError> {
    let mut question = Question {
        prefix: Vec::new(),
        split: None,
        consumes_subject: false,
    };
    let passive = tree.features(clause).flag(Feature::Passive);
    let copular = is_copular(ctx, tree, vp);
    match kind {
        InterrogativeType::YesNo => {
            let coordinated_head = tree
                .kind(vp)
                .core()
                .is_some_and(|c| matches!(tree.kind(c.head), ElementKind::Coordination(_)));
            let needs_do = !coordinated_head
                && !copular
                && !has_auxiliary(tree, clause)
                && !tree.features(clause).flag(Feature::Negated)
                && !passive;
            if needs_do {
                question.prefix.push(do_auxiliary(ctx, tree, clause, vp));
            } else {
                question.split = Some(subjects_for_split(ctx, tree, clause, subject)?);
            }
        }
        InterrogativeType::WhoSubject | InterrogativeType::WhatSubject => {
            let word = if kind == InterrogativeType::WhoSubject { "who" } else { "what" };
            question.prefix.push(keyword(ctx, word, Category::Pronoun, clause));
            question.consumes_subject = true;
        }
        InterrogativeType::HowMany => {
            question.prefix.push(keyword(ctx, "how", Category::Adverb, clause));
            question.prefix.push(keyword(ctx, "many", Category::Adverb, clause));
        }
        _ => {
            let word = match kind {
                InterrogativeType::How | InterrogativeType::HowPredicate => "how",
                InterrogativeType::Why => "why",
                InterrogativeType::Where => "where",
                InterrogativeType::WhatObject => "what",
                _ => "who",
            };
            question.prefix.push(keyword(ctx, word, Category::Pronoun, clause));
            if !has_auxiliary(tree, clause) && !copular && !passive {
                question.prefix.push(do_auxiliary(ctx, tree, clause, vp));
            } else if !passive {
                question.split = Some(subjects_for_split(ctx, tree, clause, subject)?);
            }
        }
    }
    Ok(question)
}

/// "do"-support for questions, agreeing with the subject.
fn do_auxiliary(ctx: &RealiseContext, tree: &Tree, clause: NodeId, vp: NodeId) -> Token {
    let fs = tree.features(vp);
    let mut token = keyword(ctx, "do", Category::Verb, clause)
        .with(Feature::DiscourseFunction, DiscourseFunction::Auxiliary);
    token
        .features
        .set(Feature::Tense, tree.features(clause).tense().unwrap_or(Tense::Present));
    token.features.set_opt(Feature::Person, fs.person());
    token.features.set_opt(Feature::Number, fs.number());
    token
}

fn subjects_for_split(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    clause: NodeId,
    subject: Option<NodeId>,
) -> Result<Vec<Token>, SyntaxError> {
    match subject {
        Some(s) => realise_subject(ctx, tree, clause, s),
        None => Ok(Vec::new()),
    }
}

/// French questions use "est-ce que" periphrasis, so the subject never
/// inverts.
fn french_question(ctx: &RealiseContext, clause: NodeId, kind: InterrogativeType) -> Question {
    let est_ce_que = |prefix: &mut Vec<Token>| {
        prefix.push(Token::canned("est-ce"));
        prefix.push(keyword(ctx, "que", Category::Complementiser, clause));
    };
    let mut prefix = Vec::new();
    let mut consumes_subject = false;
    match kind {
        InterrogativeType::YesNo => est_ce_que(&mut prefix),
        InterrogativeType::WhoSubject => {
            prefix.push(keyword(ctx, "qui", Category::Pronoun, clause));
            consumes_subject = true;
        }
        InterrogativeType::WhatSubject => {
            prefix.push(Token::canned("qu'est-ce"));
            prefix.push(keyword(ctx, "qui", Category::Pronoun, clause));
            consumes_subject = true;
        }
        InterrogativeType::WhoObject => {
            prefix.push(keyword(ctx, "qui", Category::Pronoun, clause));
            est_ce_que(&mut prefix);
        }
        InterrogativeType::WhatObject => {
            prefix.push(Token::canned("qu'est-ce"));
            prefix.push(keyword(ctx, "que", Category::Complementiser, clause));
        }
        InterrogativeType::WhoIndirectObject => {
            prefix.push(keyword(ctx, "à", Category::Preposition, clause));
            prefix.push(keyword(ctx, "qui", Category::Pronoun, clause));
            est_ce_que(&mut prefix);
        }
        InterrogativeType::HowMany => {
            prefix.push(keyword(ctx, "combien", Category::Adverb, clause));
        }
        InterrogativeType::HowPredicate => {
            prefix.push(keyword(ctx, "comment", Category::Adverb, clause));
        }
        InterrogativeType::How | InterrogativeType::Why | InterrogativeType::Where => {
            let word = match kind {
                InterrogativeType::How => "comment",
                InterrogativeType::Why => "pourquoi",
                _ => "où",
            };
            prefix.push(keyword(ctx, word, Category::Adverb, clause));
            est_ce_que(&mut prefix);
        }
    }
    Question {
        prefix,
        split: None,
        consumes_subject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexicon::Lexicon;

    fn bases(lex: &Lexicon, tree: &mut Tree, node: NodeId) -> Vec<String> {
        let mut ctx = RealiseContext::new(lex);
        realise_clause(&mut ctx, tree, node)
            .unwrap()
            .into_iter()
            .map(|t| t.base)
            .collect()
    }

    fn mary_chases_monkey(tree: &mut Tree) -> NodeId {
        let mary = tree.proper_np("Mary");
        let chase = tree.verb("chase");
        let clause = tree.clause(mary, chase);
        let monkey = tree.np("the", "monkey");
        tree.set_object(clause, monkey).unwrap();
        clause
    }

    #[test]
    fn declarative_order() {
        let lex = Lexicon::english().unwrap();
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        assert_eq!(bases(&lex, &mut tree, clause), ["Mary", "chase", "the", "monkey"]);
    }

    #[test]
    fn yes_no_adds_do() {
        let lex = Lexicon::english().unwrap();
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        tree.set_feature(clause, Feature::InterrogativeType, InterrogativeType::YesNo);
        assert_eq!(
            bases(&lex, &mut tree, clause),
            ["do", "Mary", "chase", "the", "monkey"]
        );
    }

    #[test]
    fn who_object_drops_object() {
        let lex = Lexicon::english().unwrap();
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        tree.set_feature(clause, Feature::InterrogativeType, InterrogativeType::WhoObject);
        assert_eq!(bases(&lex, &mut tree, clause), ["who", "do", "Mary", "chase"]);
    }

    #[test]
    fn copular_question_inverts() {
        let lex = Lexicon::english().unwrap();
        let mut tree = Tree::new();
        let mary = tree.proper_np("Mary");
        let be = tree.verb("be");
        let clause = tree.clause(mary, be);
        let happy = tree.word("happy", Category::Adjective);
        tree.add_complement(clause, happy).unwrap();
        tree.set_feature(clause, Feature::InterrogativeType, InterrogativeType::YesNo);
        assert_eq!(bases(&lex, &mut tree, clause), ["be", "Mary", "happy"]);
    }

    #[test]
    fn passive_swaps_arguments() {
        let lex = Lexicon::english().unwrap();
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        tree.set_feature(clause, Feature::Passive, true);
        assert_eq!(
            bases(&lex, &mut tree, clause),
            ["the", "monkey", "be", "chase", "by", "Mary"]
        );
    }

    #[test]
    fn subordinate_clause_gets_complementiser() {
        let lex = Lexicon::english().unwrap();
        let mut tree = Tree::new();
        let clause = mary_chases_monkey(&mut tree);
        tree.set_feature(clause, Feature::ClauseStatus, ClauseStatus::Subordinate);
        assert_eq!(bases(&lex, &mut tree, clause)[0], "that");
        tree.set_feature(clause, Feature::SuppressedComplementiser, true);
        assert_eq!(bases(&lex, &mut tree, clause)[0], "Mary");
    }

    #[test]
    fn plural_subject_sets_verb_number() {
        let lex = Lexicon::english().unwrap();
        let ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.proper_np("Mary");
        let b = tree.np("your", "giraffe");
        let both = tree.coordination(vec![a, b]);
        let chase = tree.verb("chase");
        let clause = tree.clause(both, chase);
        let ElementKind::Clause(parts) = tree.kind(clause).clone() else {
            panic!("not a clause");
        };
        check_subject_number_person(&ctx, &mut tree, clause, parts.subject, parts.core.head);
        assert_eq!(tree.features(parts.core.head).number(), Some(Number::Plural));
    }

    #[test]
    fn french_question_uses_est_ce_que() {
        let lex = Lexicon::french().unwrap();
        let mut tree = Tree::new();
        let marie = tree.proper_np("Marie");
        let manger = tree.verb("manger");
        let clause = tree.clause(marie, manger);
        tree.set_feature(clause, Feature::InterrogativeType, InterrogativeType::YesNo);
        assert_eq!(
            bases(&lex, &mut tree, clause),
            ["est-ce", "que", "Marie", "manger"]
        );
    }
}
