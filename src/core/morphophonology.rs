/// Morphophonology: rewrites between neighbouring surface words.
///
/// French elides ("l'arbre"), contracts ("du", "aux") and uses liaison
/// forms ("bel arbre", "mon amie"); English picks "a" or "an". Rules run
/// over each pair of non-blank tokens, left to right, first match wins.
/// A blanked token has an empty realisation and is skipped by the
/// assembler.

use crate::core::context::RealiseContext;
use crate::core::syntax::Token;
use crate::schema::feature::{Category, Feature, Gender, Language, Number, Person, PronounType};

/// Apply the rules for the context language to an inflected sequence.
pub fn apply(ctx: &RealiseContext, tokens: &mut [Token]) {
    let mut left = next_word(tokens, 0);
    while let Some(l) = left {
        let Some(r) = next_word(tokens, l + 1) else {
            break;
        };
        let after = next_word(tokens, r + 1);
        let following_vowel = after.is_some_and(|a| starts_with_vowel(&tokens[a]));
        let (head, tail) = tokens.split_at_mut(r);
        let (lw, rw) = (&mut head[l], &mut tail[0]);
        match ctx.language() {
            Language::French => french_pair(ctx, lw, rw, following_vowel),
            Language::English => english_pair(lw, rw),
        }
        left = if tokens[r].is_blank() { Some(l) } else { Some(r) };
    }
}

fn next_word(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|i| !tokens[*i].is_blank())
}

fn rewrite(ctx: &RealiseContext, token: &mut Token, text: String) {
    token.entry = ctx.lexicon().lookup(&text, token.category).cloned();
    token.realisation = Some(text);
}

fn blank(token: &mut Token) {
    token.realisation = Some(String::new());
}

fn french_pair(ctx: &RealiseContext, left: &mut Token, right: &mut Token, following_vowel: bool) {
    let _ = contract(ctx, left, right, following_vowel)
        || undetach(ctx, left, right)
        || elide(ctx, left, right)
        || deduplicate(left, right)
        || liaison(ctx, left, right);
}

/// Vowel-initial for elision and liaison. Aspired-h words and ordinals in
/// "ième" count as consonant-initial.
pub fn starts_with_vowel(token: &Token) -> bool {
    let text = token.text();
    let vowel = text.chars().next().is_some_and(|c| {
        matches!(
            c.to_lowercase().next().unwrap_or(c),
            'a' | 'ä' | 'à' | 'â' | 'e' | 'ë' | 'é' | 'è' | 'ê' | 'i' | 'ï' | 'î' | 'o' | 'ô'
                | 'u' | 'û' | 'ü' | 'ù' | 'y' | 'ý' | 'ÿ' | 'h'
        )
    });
    let aspired = token.entry.as_ref().is_some_and(|e| e.flags.aspired_h);
    vowel && !aspired && !text.ends_with("ième")
}

fn is_plural(token: &Token) -> bool {
    token.features.is_plural()
}

/// de + le → du, à + les → aux, de + lequel → duquel.
fn contract(ctx: &RealiseContext, left: &mut Token, right: &mut Token, following_vowel: bool) -> bool {
    if !matches!(left.category, Category::Preposition | Category::Complementiser) {
        return false;
    }
    let relative = right.entry.as_ref().and_then(|e| e.pronoun_type) == Some(PronounType::Relative);
    if right.category != Category::Determiner && !relative {
        return false;
    }
    let left_text = left.text().to_string();
    let (stem, singular, plural) = if let Some(stem) = left_text.strip_suffix("de") {
        (stem, "du", "des")
    } else if let Some(stem) = left_text.strip_suffix('à') {
        (stem, "au", "aux")
    } else {
        return false;
    };
    let right_text = right.text();
    let joined = match right_text {
        "les" | "lesquels" | "lesquelles" => format!("{}{}{}", stem, plural, &right_text[3..]),
        // "de l'arbre": the article elides instead
        "le" if following_vowel => return false,
        "le" | "lequel" => format!("{}{}{}", stem, singular, &right_text[2..]),
        _ => return false,
    };
    rewrite(ctx, left, joined);
    blank(right);
    true
}

/// A detached "moi"/"toi" before "en" or "y" takes its clitic form.
fn undetach(ctx: &RealiseContext, left: &mut Token, right: &Token) -> bool {
    let Some(entry) = left.entry.as_ref() else {
        return false;
    };
    let special = right.entry.as_ref().and_then(|e| e.pronoun_type) == Some(PronounType::SpecialPersonal);
    let applies = left.category == Category::Pronoun
        && entry.flags.detached
        && entry.is_personal_pronoun()
        && entry.number == Some(Number::Singular)
        && matches!(entry.person, Some(Person::First | Person::Second))
        && special;
    if !applies {
        return false;
    }
    let clitic = if entry.person == Some(Person::First) { "m'" } else { "t'" };
    rewrite(ctx, left, clitic.to_string());
    true
}

/// "le arbre" → "l'arbre", "si il" → "s'il".
fn elide(ctx: &RealiseContext, left: &mut Token, right: &Token) -> bool {
    let text = left.text();
    let si_il = text == "si" && right.text().starts_with("il");
    let elidable = (left.entry.as_ref().is_some_and(|e| e.flags.vowel_elision) && !is_plural(left))
        || text.ends_with(" de")
        || text.ends_with(" que");
    if !(si_il || (elidable && starts_with_vowel(right))) {
        return false;
    }
    let mut chars = text.chars();
    chars.next_back();
    let elided = format!("{}'", chars.as_str());
    rewrite(ctx, left, elided);
    true
}

fn deduplicate(left: &Token, right: &mut Token) -> bool {
    let duplicate = match left.text() {
        "de" => matches!(right.text(), "de" | "du" | "d'"),
        "que" => matches!(right.text(), "que" | "qu'"),
        _ => false,
    };
    if duplicate {
        blank(right);
    }
    duplicate
}

/// "beau arbre" → "bel arbre", "ce arbre" → "cet arbre", "ma amie" → "mon amie".
fn liaison(ctx: &RealiseContext, left: &mut Token, right: &Token) -> bool {
    let Some(entry) = left.entry.as_ref() else {
        return false;
    };
    let Some(form) = left.forms.liaison.clone().or_else(|| entry.forms.liaison.clone()) else {
        return false;
    };
    if is_plural(left) || !starts_with_vowel(right) {
        return false;
    }
    let feminine = left.features.gender() == Some(Gender::Feminine);
    let applies = match left.category {
        Category::Determiner => entry.flags.possessive == feminine,
        Category::Adjective => right.category == Category::Noun && !feminine,
        _ => false,
    };
    if !applies || left.text() == form {
        return false;
    }
    rewrite(ctx, left, form);
    true
}

fn english_pair(left: &mut Token, right: &Token) {
    if left.category != Category::Determiner || !matches!(left.text(), "a" | "an") {
        return;
    }
    if left.features.flag(Feature::NonMorph) {
        return;
    }
    let article = if requires_an(right.text()) { "an" } else { "a" };
    left.realisation = Some(article.to_string());
}

/// Whether a word takes "an": vowel-initial ("an apple", but "a one-off"),
/// or a number read with a vowel sound ("an 8", "an 18% rise", "an 11,000").
pub fn requires_an(word: &str) -> bool {
    let lower = word.to_lowercase();
    let vowel = lower.starts_with(['a', 'e', 'i', 'o', 'u']);
    if vowel {
        return !["one", "180", "110"].iter().any(|e| lower.starts_with(e));
    }
    let digits: String = lower
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    if !(digits.starts_with('8') || digits.starts_with("11") || digits.starts_with("18")) {
        return false;
    }
    digits.parse::<u64>().is_ok_and(number_takes_an)
}

fn number_takes_an(n: u64) -> bool {
    if n == 8 || n == 11 || n == 18 || (80..90).contains(&n) {
        true
    } else if n > 1000 {
        number_takes_an((n + 500) / 1000)
    } else {
        false
    }
}
