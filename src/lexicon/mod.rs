pub mod frequency;
pub mod normalizer;
pub mod wordlist;

pub use frequency::ZipfTable;
pub use normalizer::{is_alphabetic_word, replace_numbers, standardize, tokenize, DIGIT_PLACEHOLDER};
pub use wordlist::WordSet;
