/// Bilingual example: the same clause shapes realised in English and French.
///
/// Run with: cargo run --example bilingual

use surface_realiser::core::realiser::Realiser;
use surface_realiser::schema::element::{NodeId, Tree};
use surface_realiser::schema::feature::{Category, Feature, InterrogativeType, Tense};

/// subject + verb + determiner/noun object.
fn simple_clause(tree: &mut Tree, subject: &str, verb: &str, det: &str, object: &str) -> NodeId {
    let subject = tree.proper_np(subject);
    let verb = tree.verb(verb);
    let clause = tree.clause(subject, verb);
    let object = tree.np(det, object);
    tree.set_object(clause, object).expect("clause has a verb phrase");
    clause
}

fn show(realiser: &Realiser, label: &str, tree: &Tree, clause: NodeId) {
    match realiser.realise_with_diagnostics(tree, clause) {
        Ok(out) => {
            println!("  {:<12} {}", label, out.text);
            for warning in out.warnings {
                println!("  {:<12}   (warning: {})", "", warning);
            }
        }
        Err(e) => println!("  {:<12} ERROR: {}", label, e),
    }
}

fn main() {
    let english = Realiser::english().expect("Failed to build English realiser");
    let french = Realiser::french().expect("Failed to build French realiser");

    // --- English ---
    println!("English");
    let mut tree = Tree::new();
    let s = simple_clause(&mut tree, "Mary", "chase", "the", "monkey");
    show(&english, "present", &tree, s);

    tree.set_feature(s, Feature::Tense, Tense::Past);
    show(&english, "past", &tree, s);

    tree.set_feature(s, Feature::Tense, Tense::Future);
    tree.set_feature(s, Feature::Negated, true);
    show(&english, "future neg", &tree, s);

    let mut tree = Tree::new();
    let s = simple_clause(&mut tree, "Mary", "chase", "the", "monkey");
    tree.set_feature(s, Feature::Passive, true);
    tree.set_feature(s, Feature::Perfect, true);
    show(&english, "passive", &tree, s);

    let mut tree = Tree::new();
    let s = simple_clause(&mut tree, "Mary", "chase", "a", "elephant");
    tree.set_feature(s, Feature::InterrogativeType, InterrogativeType::YesNo);
    let quickly = tree.word("quickly", Category::Adverb);
    english.add_modifier(&mut tree, s, quickly).expect("adverb attaches");
    show(&english, "question", &tree, s);

    // --- French ---
    println!("\nFrench");
    let mut tree = Tree::new();
    let s = simple_clause(&mut tree, "Marie", "manger", "le", "pomme");
    show(&french, "présent", &tree, s);

    tree.set_feature(s, Feature::Tense, Tense::Past);
    show(&french, "imparfait", &tree, s);

    tree.set_feature(s, Feature::Tense, Tense::Present);
    tree.set_feature(s, Feature::Negated, true);
    show(&french, "négation", &tree, s);

    let mut tree = Tree::new();
    let marie = tree.proper_np("Marie");
    let arriver = tree.verb("arriver");
    let s = tree.clause(marie, arriver);
    tree.set_feature(s, Feature::Perfect, true);
    let jardin = tree.np("le", "jardin");
    let au_jardin = tree.pp("à", jardin);
    french.add_modifier(&mut tree, s, au_jardin).expect("phrase attaches");
    show(&french, "passé comp.", &tree, s);

    let mut tree = Tree::new();
    let s = simple_clause(&mut tree, "Pierre", "voir", "un", "arbre");
    tree.set_feature(s, Feature::InterrogativeType, InterrogativeType::YesNo);
    show(&french, "question", &tree, s);
}
