/// Realisation context: the lexicon in use plus diagnostics collected
/// during one realisation call.

use std::mem;
use thiserror::Error;

use crate::core::lexicon::Lexicon;
use crate::schema::feature::Language;

/// A non-fatal problem noticed while realising. Realisation carries on with
/// a degraded result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealiseWarning {
    #[error("placeholder '{0}' was never filled; realised by name")]
    UnfilledPlaceholder(String),
    #[error("'{base}' is not in the lexicon as a {category}; inflected by rule")]
    UnknownWord { base: String, category: String },
    #[error("coordination mixes {0}")]
    HeterogeneousCoordination(String),
    #[error("empty canned text skipped")]
    EmptyText,
}

/// State threaded through syntax and morphology. No globals: everything a
/// rule may consult is reachable from here.
pub struct RealiseContext<'a> {
    lexicon: &'a Lexicon,
    warnings: Vec<RealiseWarning>,
}

impl<'a> RealiseContext<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            warnings: Vec::new(),
        }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    pub fn language(&self) -> Language {
        self.lexicon.language()
    }

    /// Record a warning once.
    pub fn add_warning(&mut self, warning: RealiseWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    /// Drain all collected warnings.
    pub fn take_warnings(&mut self) -> Vec<RealiseWarning> {
        mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[RealiseWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_deduplicated() {
        let lex = Lexicon::new(Language::English);
        let mut ctx = RealiseContext::new(&lex);
        ctx.add_warning(RealiseWarning::UnfilledPlaceholder("x".into()));
        ctx.add_warning(RealiseWarning::UnfilledPlaceholder("x".into()));
        ctx.add_warning(RealiseWarning::EmptyText);
        assert_eq!(ctx.warnings().len(), 2);
        let taken = ctx.take_warnings();
        assert_eq!(taken.len(), 2);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn warnings_display() {
        let w = RealiseWarning::UnknownWord {
            base: "zorp".into(),
            category: "noun".into(),
        };
        assert_eq!(
            w.to_string(),
            "'zorp' is not in the lexicon as a noun; inflected by rule"
        );
    }
}
