pub mod definition;
pub mod element;
pub mod feature;
pub mod word;
