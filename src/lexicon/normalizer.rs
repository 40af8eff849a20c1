use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Character substituted for digits in terms containing a run of two or more digits.
pub const DIGIT_PLACEHOLDER: char = '#';

const INFINITIVE_MARKER: &str = "to";

/// Language-agnostic tokenizer: NFC, lowercase, then UAX #29 word boundaries.
///
/// Punctuation between letters or digits stays inside the token ("don't",
/// "e.g", "3.14"). Segments without a letter or digit are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let text_lower = text.nfc().collect::<String>().to_lowercase();

    text_lower.unicode_words().map(str::to_string).collect()
}

/// Map raw user input onto the canonical vocabulary key.
///
/// ```
/// use wordlink_engine::lexicon::standardize;
///
/// assert_eq!(standardize("Ice Cream"), "ice_cream");
/// assert_eq!(standardize("to run"), "run");
/// assert_eq!(standardize("route 66"), "route_##");
/// assert_eq!(standardize("b2b"), "b2b");
/// ```
pub fn standardize(term: &str) -> String {
    // Placeholders read back as digits, so a standardized term maps to itself.
    let term: String = term
        .chars()
        .map(|c| match c {
            '_' => ' ',
            DIGIT_PLACEHOLDER => '0',
            c => c,
        })
        .collect();
    let mut tokens = tokenize(&term);

    // Leading "to" marks an infinitive; a lone "to" is kept.
    let leading = tokens
        .iter()
        .take_while(|t| t.as_str() == INFINITIVE_MARKER)
        .count()
        .min(tokens.len().saturating_sub(1));
    tokens.drain(..leading);

    replace_numbers(&tokens.join("_"))
}

/// Replace every digit with the placeholder if any two digits are adjacent.
pub fn replace_numbers(s: &str) -> String {
    let has_digit_pair = s
        .as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_digit() && w[1].is_ascii_digit());

    if has_digit_pair {
        s.chars()
            .map(|c| if c.is_ascii_digit() { DIGIT_PLACEHOLDER } else { c })
            .collect()
    } else {
        s.to_string()
    }
}

/// A single token made only of letters.
pub fn is_alphabetic_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}
