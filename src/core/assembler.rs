/// Output assembly: surface words joined into one punctuated sentence.

use crate::core::syntax::Token;

const SENTENCE_ENDERS: &[char] = &['.', '?', '!'];

/// Join words with single spaces, without a space after an apostrophe or
/// before a comma.
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    let mut result = String::new();
    for word in words.iter().map(|w| w.as_ref()).filter(|w| !w.is_empty()) {
        let glued = result.is_empty() || result.ends_with('\'') || word == ",";
        if !glued {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

/// The final sentence: joined, capitalised and terminated.
pub fn assemble(tokens: &[Token], interrogative: bool) -> String {
    let words: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
    finish(&join_words(&words), interrogative)
}

/// Capitalise the first letter and add the closing mark unless one is
/// already there.
pub fn finish(text: &str, interrogative: bool) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let mut chars = text.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !out.ends_with(SENTENCE_ENDERS) {
        out.push(if interrogative { '?' } else { '.' });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_spaces() {
        assert_eq!(join_words(&["the", "monkey", ",", "George", "and", "Martha"]), "the monkey, George and Martha");
        assert_eq!(join_words(&["l'", "arbre"]), "l'arbre");
        assert_eq!(join_words(&["du", "", "pain"]), "du pain");
    }

    #[test]
    fn sentence_punctuation() {
        assert_eq!(finish("mary chases the monkey", false), "Mary chases the monkey.");
        assert_eq!(finish("does Mary chase the monkey", true), "Does Mary chase the monkey?");
        assert_eq!(finish("stop!", false), "Stop!");
        assert_eq!(finish("été", false), "Été.");
        assert_eq!(finish("", false), "");
    }

    #[test]
    fn assembles_tokens() {
        let tokens = vec![Token::canned("l'"), Token::canned("eau"), Token::canned("coule")];
        assert_eq!(assemble(&tokens, false), "L'eau coule.");
    }
}
