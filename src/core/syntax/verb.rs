/// Verb phrases: the auxiliary stack, negation, particles and complement
/// ordering.
///
/// English builds the verb group bottom-up: the lexical verb is pushed
/// first, then each of passive "be", progressive "be", perfect "have",
/// the modal and "do"-support wraps whatever is on top. The finished stack
/// splits into auxiliaries (realised first) and the main verb group.
/// French keeps one finite verb and places "ne", clitic pronouns and "pas"
/// around it.

use crate::core::context::RealiseContext;
use crate::schema::element::{ElementKind, NodeId, PhraseCore, Tree};
use crate::schema::feature::{
    Category, DiscourseFunction, Feature, FeatureValue, Form, InterrogativeType, Language, Number,
    Person, Tense,
};

use super::{is_copular, nominal_number, nominal_person, realise, realise_list, word_token, SyntaxError, Token};

/// A slot in the verb group: either a word token built here, or a whole
/// element (a coordinated head, say) realised in place.
#[derive(Debug, Clone)]
enum Unit {
    Word(Token),
    Node(NodeId),
}

impl Unit {
    fn set(&mut self, tree: &mut Tree, feature: Feature, value: impl Into<FeatureValue>) {
        match self {
            Unit::Word(t) => t.features.set(feature, value),
            Unit::Node(n) => tree.set_feature(*n, feature, value),
        }
    }

    fn set_opt<V: Into<FeatureValue>>(&mut self, tree: &mut Tree, feature: Feature, value: Option<V>) {
        match self {
            Unit::Word(t) => t.features.set_opt(feature, value),
            Unit::Node(n) => tree.features_mut(*n).set_opt(feature, value),
        }
    }

    fn is_not(&self) -> bool {
        matches!(self, Unit::Word(t) if t.is("not"))
    }

    fn is_copular(&self) -> bool {
        matches!(self, Unit::Word(t) if t.is_copular())
    }

    fn into_tokens(
        self,
        ctx: &mut RealiseContext,
        tree: &mut Tree,
    ) -> Result<Vec<Token>, SyntaxError> {
        match self {
            Unit::Word(t) => Ok(vec![t]),
            Unit::Node(n) => realise(ctx, tree, n),
        }
    }
}

pub fn realise_verb_phrase(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    let ElementKind::VerbPhrase(core) = tree.kind(vp).clone() else {
        return realise(ctx, tree, vp);
    };
    let interrogative = tree
        .features(vp)
        .try_interrogative_type()
        .map_err(|value| SyntaxError::MalformedFeature {
            node: vp,
            feature: Feature::InterrogativeType,
            value,
        })?;
    match ctx.language() {
        Language::English => realise_english(ctx, tree, vp, &core, interrogative),
        Language::French => realise_french(ctx, tree, vp, &core, interrogative),
    }
}

/// The head verb as a verb-group unit, tagged with `tense`.
fn grab_head(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    head: NodeId,
    tense: Tense,
) -> Option<Unit> {
    if !tree.is_truthy(head) {
        return None;
    }
    let mut unit = match tree.kind(head).clone() {
        ElementKind::Word(w) => Unit::Word(word_token(ctx, tree, head, &w)),
        _ => Unit::Node(head),
    };
    unit.set(tree, Feature::Tense, tense);
    Some(unit)
}

fn verb_token(ctx: &RealiseContext, base: &str, parent: NodeId) -> Token {
    Token::new(ctx, base, Category::Verb).with_parent(Some(parent))
}

fn adverb(ctx: &RealiseContext, base: &str, parent: NodeId) -> Token {
    Token::new(ctx, base, Category::Adverb).with_parent(Some(parent))
}

fn realise_english(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
    core: &PhraseCore,
    interrogative: Option<InterrogativeType>,
) -> Result<Vec<Token>, SyntaxError> {
    let fs = tree.features(vp).clone();
    let (main, auxiliaries) = create_verb_group(ctx, tree, vp, core, interrogative)?;
    let realise_auxiliary = !matches!(fs.get(Feature::RealiseAuxiliary), Some(FeatureValue::Bool(false)));

    let mut out = Vec::new();
    if realise_auxiliary {
        for mut unit in auxiliaries.into_iter().rev() {
            unit.set(tree, Feature::DiscourseFunction, DiscourseFunction::Auxiliary);
            out.extend(unit.into_tokens(ctx, tree)?);
        }
    }

    let premodifiers = realise_list(ctx, tree, &core.premodifiers, Some(DiscourseFunction::PreModifier))?;
    let mut main_tokens = Vec::new();
    for mut unit in main.into_iter().rev() {
        unit.set_opt(tree, Feature::InterrogativeType, interrogative);
        main_tokens.extend(unit.into_tokens(ctx, tree)?);
    }
    if let Some(particle) = fs.text(Feature::Particle) {
        main_tokens.push(Token::new(ctx, particle, Category::Particle).with_parent(Some(vp)));
    }

    if !realise_auxiliary && is_copular(ctx, tree, vp) {
        out.extend(main_tokens);
        out.extend(premodifiers);
    } else {
        out.extend(premodifiers);
        out.extend(main_tokens);
    }

    out.extend(realise_complements(ctx, tree, core, fs.flag(Feature::Passive), interrogative)?);
    out.extend(realise_list(ctx, tree, &core.postmodifiers, Some(DiscourseFunction::PostModifier))?);
    Ok(out)
}

/// Build the English verb group. Returns the main-verb stack and the
/// auxiliary stack, both bottom first.
fn create_verb_group(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
    core: &PhraseCore,
    interrogative: Option<InterrogativeType>,
) -> Result<(Vec<Unit>, Vec<Unit>), SyntaxError> {
    let fs = tree.features(vp).clone();
    let form = fs.form().unwrap_or(Form::Normal);
    let mut tense = fs.tense().unwrap_or(Tense::Present);
    if matches!(form, Form::Gerund | Form::Infinitive) {
        tense = Tense::Present;
    }
    let modal = fs.text(Feature::Modal).map(str::to_string);
    let mut modal_past = false;

    let actual_modal = if form == Form::Infinitive {
        Some("to".to_string())
    } else if form == Form::Normal {
        match (&modal, tense) {
            (None, Tense::Future) => Some("will".to_string()),
            (None, Tense::Conditional) => Some("would".to_string()),
            (Some(m), t) => {
                modal_past = t == Tense::Past;
                Some(m.clone())
            }
            (None, _) => None,
        }
    } else {
        None
    };
    let has_modal = modal.is_some();

    let mut stack: Vec<Unit> = Vec::new();
    let mut front = grab_head(ctx, tree, core.head, tense);
    if has_modal {
        if let Some(f) = front.as_mut() {
            f.set(tree, Feature::Negated, false);
        }
    }
    if matches!(form, Form::Imperative | Form::Infinitive | Form::BareInfinitive) {
        if let Some(f) = front.as_mut() {
            f.set(tree, Feature::NonMorph, true);
        }
    }

    if fs.flag(Feature::Passive) {
        front = add_be(ctx, tree, vp, &mut stack, front, Form::PastParticiple);
    }
    if fs.flag(Feature::Progressive) {
        front = add_be(ctx, tree, vp, &mut stack, front, Form::PresentParticiple);
    }
    if fs.flag(Feature::Perfect) || modal_past {
        if let Some(mut f) = front.take() {
            f.set(tree, Feature::Form, Form::PastParticiple);
            stack.push(f);
        }
        let mut have = verb_token(ctx, "have", vp).with(Feature::Tense, tense);
        if has_modal {
            have.features.set(Feature::NonMorph, true);
        }
        front = Some(Unit::Word(have));
    }

    let ignore_modal = fs.flag(Feature::IgnoreModal);
    if actual_modal.is_some() && !ignore_modal {
        if let Some(mut f) = front.take() {
            f.set(tree, Feature::NonMorph, true);
            stack.push(f);
        }
    }

    if fs.flag(Feature::Negated) {
        front = create_not(ctx, tree, vp, &mut stack, front, has_modal, interrogative);
    }

    if let Some(f) = front {
        push_front_verb(ctx, tree, vp, &mut stack, f, form, interrogative);
    }

    if let Some(m) = actual_modal {
        if !ignore_modal {
            stack.push(Unit::Word(
                Token::new(ctx, &m, Category::Modal).with_parent(Some(vp)),
            ));
        }
    }

    // Everything up to and including the first non-"not" unit is the main
    // verb; the rest are auxiliaries.
    let mut main = Vec::new();
    let mut auxiliaries = Vec::new();
    let mut main_seen = false;
    for unit in stack {
        if main_seen {
            auxiliaries.push(unit);
        } else {
            if !unit.is_not() {
                main_seen = true;
            }
            main.push(unit);
        }
    }
    Ok((main, auxiliaries))
}

fn add_be(
    ctx: &RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
    stack: &mut Vec<Unit>,
    front: Option<Unit>,
    form: Form,
) -> Option<Unit> {
    if let Some(mut f) = front {
        f.set(tree, Feature::Form, form);
        stack.push(f);
    }
    Some(Unit::Word(verb_token(ctx, "be", vp)))
}

/// Negation: "not" goes above whatever is stacked; a bare lexical verb
/// needs "do"-support instead.
fn create_not(
    ctx: &RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
    stack: &mut Vec<Unit>,
    front: Option<Unit>,
    has_modal: bool,
    interrogative: Option<InterrogativeType>,
) -> Option<Unit> {
    let add_do = !interrogative.is_some_and(|t| t.is_object());
    let front_copular = front.as_ref().is_some_and(Unit::is_copular);
    if !stack.is_empty() || front_copular {
        stack.push(Unit::Word(adverb(ctx, "not", vp)));
        return front;
    }
    let mut front = front;
    if let Some(mut f) = front.take() {
        if !has_modal {
            f.set(tree, Feature::Negated, true);
            stack.push(f);
        }
    }
    stack.push(Unit::Word(adverb(ctx, "not", vp)));
    if add_do {
        let mut aux = verb_token(ctx, "do", vp);
        if is_bare_form(tree, vp) {
            aux.features.set(Feature::NonMorph, true);
        }
        Some(Unit::Word(aux))
    } else {
        front
    }
}

fn is_bare_form(tree: &Tree, vp: NodeId) -> bool {
    matches!(
        tree.features(vp).form(),
        Some(Form::Imperative | Form::Infinitive | Form::BareInfinitive)
    )
}

fn push_front_verb(
    ctx: &RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
    stack: &mut Vec<Unit>,
    mut front: Unit,
    form: Form,
    interrogative: Option<InterrogativeType>,
) {
    match form {
        Form::Gerund | Form::PresentParticiple => {
            front.set(tree, Feature::Form, Form::PresentParticiple);
            stack.push(front);
        }
        Form::PastParticiple => {
            front.set(tree, Feature::Form, Form::PastParticiple);
            stack.push(front);
        }
        _ if (form != Form::Normal || interrogative.is_some())
            && !is_copular(ctx, tree, vp)
            && stack.is_empty() =>
        {
            if !interrogative.is_some_and(|t| t.is_subject()) {
                front.set(tree, Feature::NonMorph, true);
            }
            stack.push(front);
        }
        _ => {
            let fs = tree.features(vp).clone();
            front.set_opt(tree, Feature::Tense, fs.tense());
            front.set_opt(tree, Feature::Person, fs.person());
            front.set(tree, Feature::Number, agreement_number(ctx, tree, vp));
            let negated_object_question =
                fs.flag(Feature::Negated) && interrogative.is_some_and(|t| t.is_object());
            if !negated_object_question {
                stack.push(front);
            }
        }
    }
}

/// Number for the finite verb. Copulas after an expletive subject or a
/// subject question agree with their complements instead.
fn agreement_number(ctx: &RealiseContext, tree: &Tree, vp: NodeId) -> Number {
    let number = tree.features(vp).number().unwrap_or(Number::Singular);
    let Some(clause) = tree.parent(vp) else {
        return number;
    };
    let ElementKind::Clause(c) = tree.kind(clause) else {
        return number;
    };
    let expletive = super::head_word(tree, c.subject)
        .and_then(|w| tree.word_of(w))
        .and_then(|w| ctx.lexicon().lookup(&w.base, Category::Pronoun))
        .is_some_and(|e| e.flags.expletive_subject);
    let subject_question = tree
        .features(clause)
        .interrogative_type()
        .is_some_and(|t| t.is_subject());
    if (expletive || subject_question) && is_copular(ctx, tree, vp) {
        let complements = tree.kind(vp).core().map(|c| c.complements.clone()).unwrap_or_default();
        let plural = complements
            .iter()
            .any(|n| nominal_number(ctx, tree, *n) == Some(Number::Plural));
        return if plural { Number::Plural } else { Number::Singular };
    }
    number
}

/// Indirect objects, then direct objects, then anything else. Object
/// questions drop the questioned object; passives drop direct objects,
/// which have become the subject.
fn realise_complements(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    core: &PhraseCore,
    passive: bool,
    interrogative: Option<InterrogativeType>,
) -> Result<Vec<Token>, SyntaxError> {
    let mut indirects = Vec::new();
    let mut directs = Vec::new();
    let mut others = Vec::new();
    for complement in &core.complements {
        if !tree.is_truthy(*complement) {
            continue;
        }
        let function = tree.features(*complement).discourse_function();
        if function.is_none() {
            tree.set_feature(*complement, Feature::DiscourseFunction, DiscourseFunction::Complement);
        }
        let tokens = realise(ctx, tree, *complement)?;
        match function {
            Some(DiscourseFunction::IndirectObject) => indirects.extend(tokens),
            Some(DiscourseFunction::Object) => directs.extend(tokens),
            _ => others.extend(tokens),
        }
    }
    let mut out = Vec::new();
    if interrogative != Some(InterrogativeType::WhoIndirectObject) {
        out.extend(indirects);
    }
    let object_question = interrogative.is_some_and(|t| {
        t.is_object() || t == InterrogativeType::HowPredicate
    });
    if !passive && !object_question {
        out.extend(directs);
    }
    out.extend(others);
    Ok(out)
}

/// Clitic pronoun objects, which precede the finite verb in French.
fn is_clitic(ctx: &RealiseContext, tree: &Tree, node: NodeId) -> bool {
    if !matches!(
        tree.features(node).discourse_function(),
        Some(DiscourseFunction::Object | DiscourseFunction::IndirectObject)
    ) {
        return false;
    }
    if tree.features(node).flag(Feature::Pronominal) {
        return true;
    }
    super::head_word(tree, node)
        .and_then(|w| tree.word_of(w))
        .filter(|w| matches!(w.category, Category::Pronoun | Category::Any))
        .and_then(|w| ctx.lexicon().lookup(&w.base, Category::Pronoun))
        .is_some_and(|e| e.is_personal_pronoun())
}

/// Clitic order: first and second person, then third-person direct, then
/// third-person indirect.
fn clitic_rank(ctx: &RealiseContext, tree: &Tree, node: NodeId) -> u8 {
    match nominal_person(ctx, tree, node) {
        Some(Person::First | Person::Second) => 0,
        _ if tree.features(node).discourse_function() == Some(DiscourseFunction::Object) => 1,
        _ => 2,
    }
}

fn realise_french(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    vp: NodeId,
    core: &PhraseCore,
    interrogative: Option<InterrogativeType>,
) -> Result<Vec<Token>, SyntaxError> {
    let fs = tree.features(vp).clone();
    let form = fs.form().unwrap_or(Form::Normal);
    let tense = fs.tense().unwrap_or(Tense::Present);
    let negated = fs.flag(Feature::Negated);

    // Non-finite verbs following the finite one, left to right.
    let mut chain: Vec<Unit> = Vec::new();
    let mut front = grab_head(ctx, tree, core.head, tense);

    let participle = |unit: &mut Unit, tree: &mut Tree| {
        unit.set(tree, Feature::Form, Form::PastParticiple);
        unit.set_opt(tree, Feature::Gender, fs.gender());
        unit.set_opt(tree, Feature::Number, fs.number());
    };

    if fs.flag(Feature::Passive) {
        if let Some(mut f) = front.take() {
            participle(&mut f, tree);
            chain.insert(0, f);
        }
        front = Some(Unit::Word(verb_token(ctx, "être", vp)));
    }
    if fs.flag(Feature::Perfect) {
        let takes_etre = match &front {
            Some(Unit::Word(t)) => {
                t.entry.as_ref().is_some_and(|e| e.flags.auxiliary_etre)
                    || fs.flag(Feature::Reflexive)
            }
            _ => false,
        };
        if let Some(mut f) = front.take() {
            if takes_etre {
                participle(&mut f, tree);
            } else {
                f.set(tree, Feature::Form, Form::PastParticiple);
            }
            chain.insert(0, f);
        }
        let aux = if takes_etre { "être" } else { "avoir" };
        front = Some(Unit::Word(verb_token(ctx, aux, vp)));
    }
    if let Some(modal) = fs.text(Feature::Modal) {
        if !fs.flag(Feature::IgnoreModal) {
            if let Some(mut f) = front.take() {
                f.set(tree, Feature::Form, Form::Infinitive);
                chain.insert(0, f);
            }
            front = Some(Unit::Word(verb_token(ctx, modal, vp)));
        }
    }

    if let Some(f) = front.as_mut() {
        f.set(tree, Feature::Tense, tense);
        f.set_opt(tree, Feature::Person, fs.person());
        f.set_opt(tree, Feature::Number, fs.number());
        f.set(tree, Feature::Form, form);
        if form == Form::Infinitive {
            f.set(tree, Feature::NonMorph, true);
        }
    }

    let mut clitic_nodes: Vec<NodeId> = core
        .complements
        .iter()
        .copied()
        .filter(|n| tree.is_truthy(*n) && is_clitic(ctx, tree, *n))
        .collect();
    clitic_nodes.sort_by_key(|n| clitic_rank(ctx, tree, *n));
    let mut clitics = Vec::new();
    for node in &clitic_nodes {
        clitics.extend(realise(ctx, tree, *node)?);
    }

    let mut out = Vec::new();
    let front_tokens = match front {
        Some(mut f) => {
            f.set(tree, Feature::DiscourseFunction, DiscourseFunction::VerbPhrase);
            f.into_tokens(ctx, tree)?
        }
        None => Vec::new(),
    };
    if negated && form == Form::Infinitive {
        out.push(adverb(ctx, "ne", vp));
        out.push(adverb(ctx, "pas", vp));
        out.extend(clitics);
        out.extend(front_tokens);
    } else {
        if negated {
            out.push(adverb(ctx, "ne", vp));
        }
        out.extend(clitics);
        out.extend(front_tokens);
        if negated {
            out.push(adverb(ctx, "pas", vp));
        }
    }
    out.extend(realise_list(ctx, tree, &core.premodifiers, Some(DiscourseFunction::PreModifier))?);
    for unit in chain {
        out.extend(unit.into_tokens(ctx, tree)?);
    }

    let rest = PhraseCore {
        head: core.head,
        premodifiers: Vec::new(),
        complements: core
            .complements
            .iter()
            .copied()
            .filter(|n| !clitic_nodes.contains(n))
            .collect(),
        postmodifiers: Vec::new(),
    };
    out.extend(realise_complements(ctx, tree, &rest, fs.flag(Feature::Passive), interrogative)?);
    out.extend(realise_list(ctx, tree, &core.postmodifiers, Some(DiscourseFunction::PostModifier))?);
    Ok(out)
}
