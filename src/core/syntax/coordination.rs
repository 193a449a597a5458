/// Coordinations: shared features pushed onto each coordinate, joined by
/// commas and a final conjunction.

use crate::core::context::{RealiseContext, RealiseWarning};
use crate::schema::element::{ElementKind, NodeId, Tree};
use crate::schema::feature::{Category, DiscourseFunction, Feature};

use super::{realise, SyntaxError, Token};

/// Features a coordination shares with every coordinate.
const SHARED_FEATURES: &[Feature] = &[
    Feature::Tense,
    Feature::Form,
    Feature::Modal,
    Feature::Negated,
    Feature::Passive,
    Feature::Perfect,
    Feature::Progressive,
    Feature::Person,
    Feature::Number,
    Feature::Gender,
    Feature::Case,
    Feature::DiscourseFunction,
    Feature::ClauseStatus,
    Feature::NonMorph,
    Feature::RealiseAuxiliary,
];

pub fn realise_coordination(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    coordination: NodeId,
) -> Result<Vec<Token>, SyntaxError> {
    let ElementKind::Coordination(parts) = tree.kind(coordination).clone() else {
        return realise(ctx, tree, coordination);
    };
    let fs = tree.features(coordination).clone();
    check_homogeneous(ctx, tree, &parts.coordinates);
    if fs.flag(Feature::RaiseSpecifier) {
        raise_specifier(tree, &parts.coordinates);
    }

    let last = parts.coordinates.len().saturating_sub(1);
    let mut groups = Vec::new();
    for (index, coordinate) in parts.coordinates.iter().copied().enumerate() {
        if !tree.is_truthy(coordinate) {
            continue;
        }
        let target = tree.features_mut(coordinate);
        for feature in SHARED_FEATURES {
            target.copy_from(&fs, *feature);
        }
        if fs.has(Feature::InterrogativeType) {
            target.set(Feature::IgnoreModal, true);
        }
        if index == last {
            target.copy_from(&fs, Feature::Possessive);
        }
        if index > 0 {
            if fs.flag(Feature::AggregateAuxiliary) {
                target.set(Feature::RealiseAuxiliary, false);
            }
            if matches!(tree.kind(coordinate), ElementKind::Clause(_)) {
                let suppressed = fs.flag(Feature::SuppressedComplementiser);
                tree.set_feature(coordinate, Feature::SuppressedComplementiser, suppressed);
            }
        }
        let tokens = realise(ctx, tree, coordinate)?;
        if !tokens.is_empty() {
            groups.push(tokens);
        }
    }

    let count = groups.len();
    let mut out = Vec::new();
    for (index, group) in groups.into_iter().enumerate() {
        if index > 0 {
            if index < count - 1 {
                out.push(Token::canned(",").with_parent(Some(coordination)));
            } else {
                out.extend(conjunction(ctx, tree, coordination, parts.conjunction)?);
            }
        }
        out.extend(group);
    }
    Ok(out)
}

fn conjunction(
    ctx: &mut RealiseContext,
    tree: &mut Tree,
    coordination: NodeId,
    explicit: Option<NodeId>,
) -> Result<Vec<Token>, SyntaxError> {
    match explicit {
        Some(conj) => {
            tree.set_feature(conj, Feature::DiscourseFunction, DiscourseFunction::Conjunction);
            realise(ctx, tree, conj)
        }
        None => Ok(vec![
            Token::new(ctx, ctx.language().conjunction(), Category::Conjunction)
                .with(Feature::DiscourseFunction, DiscourseFunction::Conjunction)
                .with_parent(Some(coordination)),
        ]),
    }
}

/// Kind label for the heterogeneity check: phrase kind, or word category.
fn coordinate_label(tree: &Tree, node: NodeId) -> Option<String> {
    match tree.kind(node) {
        ElementKind::Empty | ElementKind::Text(_) | ElementKind::Placeholder { .. } => None,
        ElementKind::Word(w) if w.category == Category::Any => None,
        ElementKind::Word(w) => Some(w.category.name().to_string()),
        kind => Some(kind.name().to_string()),
    }
}

fn check_homogeneous(ctx: &mut RealiseContext, tree: &Tree, coordinates: &[NodeId]) {
    let mut labels = coordinates.iter().filter_map(|n| coordinate_label(tree, *n));
    let Some(first) = labels.next() else {
        return;
    };
    if let Some(other) = labels.find(|l| *l != first) {
        ctx.add_warning(RealiseWarning::HeterogeneousCoordination(format!(
            "{} and {}",
            first, other
        )));
    }
}

/// When every coordinate has the same specifier, keep only the first one:
/// "the cat and dog".
fn raise_specifier(tree: &mut Tree, coordinates: &[NodeId]) {
    let specifiers: Vec<Option<String>> = coordinates
        .iter()
        .map(|n| match tree.kind(*n) {
            ElementKind::NounPhrase(np) => np.specifier.map(|s| tree.to_plain_string(s)),
            _ => None,
        })
        .collect();
    let Some(Some(first)) = specifiers.first() else {
        return;
    };
    let shared = specifiers.len() > 1 && specifiers.iter().all(|s| s.as_ref() == Some(first));
    if shared {
        for node in &coordinates[1..] {
            tree.set_feature(*node, Feature::Raised, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexicon::Lexicon;
    use crate::schema::feature::ClauseStatus;

    fn bases(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.base.as_str()).collect()
    }

    #[test]
    fn commas_then_conjunction() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.np("the", "monkey");
        let b = tree.proper_np("George");
        let c = tree.proper_np("Martha");
        let coord = tree.coordination(vec![a, b, c]);
        let tokens = realise_coordination(&mut ctx, &mut tree, coord).unwrap();
        assert_eq!(bases(&tokens), ["the", "monkey", ",", "George", "and", "Martha"]);
    }

    #[test]
    fn explicit_conjunction() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.proper_np("George");
        let b = tree.proper_np("Martha");
        let coord = tree.coordination_with(vec![a, b], "or");
        let tokens = realise_coordination(&mut ctx, &mut tree, coord).unwrap();
        assert_eq!(bases(&tokens), ["George", "or", "Martha"]);
    }

    #[test]
    fn subordinate_status_reaches_each_clause() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let mary = tree.proper_np("Mary");
        let chase = tree.verb("chase");
        let first = tree.clause(mary, chase);
        let john = tree.proper_np("John");
        let leave = tree.verb("leave");
        let second = tree.clause(john, leave);
        let coord = tree.coordination(vec![first, second]);
        tree.set_feature(coord, Feature::ClauseStatus, ClauseStatus::Subordinate);
        let tokens = realise_coordination(&mut ctx, &mut tree, coord).unwrap();
        assert_eq!(
            bases(&tokens),
            ["that", "Mary", "chase", "and", "that", "John", "leave"]
        );
    }

    #[test]
    fn shared_specifier_is_raised() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.np("the", "cat");
        let b = tree.np("the", "dog");
        let coord = tree.coordination(vec![a, b]);
        tree.set_feature(coord, Feature::RaiseSpecifier, true);
        let tokens = realise_coordination(&mut ctx, &mut tree, coord).unwrap();
        assert_eq!(bases(&tokens), ["the", "cat", "and", "dog"]);
    }

    #[test]
    fn different_specifiers_stay() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.np("the", "cat");
        let b = tree.np("a", "dog");
        let coord = tree.coordination(vec![a, b]);
        tree.set_feature(coord, Feature::RaiseSpecifier, true);
        let tokens = realise_coordination(&mut ctx, &mut tree, coord).unwrap();
        assert_eq!(bases(&tokens), ["the", "cat", "and", "a", "dog"]);
    }

    #[test]
    fn mixed_coordinates_warn() {
        let lex = Lexicon::english().unwrap();
        let mut ctx = RealiseContext::new(&lex);
        let mut tree = Tree::new();
        let a = tree.np("the", "cat");
        let b = tree.verb("run");
        let coord = tree.coordination(vec![a, b]);
        realise_coordination(&mut ctx, &mut tree, coord).unwrap();
        assert!(matches!(
            ctx.warnings(),
            [RealiseWarning::HeterogeneousCoordination(_)]
        ));
    }
}
