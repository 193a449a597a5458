pub mod assembler;
pub mod context;
pub mod lexicon;
pub mod morphology;
pub mod morphophonology;
pub mod realiser;
pub mod syntax;
