//! Surface Realiser: rule-based sentence generation for English and French.
//!
//! Turns an abstract tree of clauses, phrases and words annotated with
//! grammatical features into inflected, punctuated text. The pipeline runs
//! syntax realisation, morphology, morphophonology and orthography in turn.

pub mod core;
pub mod schema;
