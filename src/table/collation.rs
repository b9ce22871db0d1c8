//! Name ordering and matching.
//!
//! Names are compared the way a Polish-locale collator with base sensitivity
//! does it: case is ignored, letters with Polish diacritics sort directly
//! after their base letter (`a < ą < b`), and other accented Latin letters
//! compare equal to their base letter. Whitespace sorts first, then
//! punctuation and symbols, then digits, then letters.

use std::cmp::Ordering;

/// ASCII punctuation and symbols in collation order.
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

const WHITESPACE_WEIGHT: u32 = 1;
const SYMBOL_BASE: u32 = 2;
/// Non-ASCII punctuation lands after the known symbols.
const OTHER_SYMBOL_WEIGHT: u32 = SYMBOL_BASE + 64;
const DIGIT_BASE: u32 = 100;
const LETTER_BASE: u32 = 200;

/// Primary weight of a single character.
fn weight(ch: char) -> u32 {
    if ch.is_whitespace() {
        return WHITESPACE_WEIGHT;
    }
    if let Some(idx) = SYMBOL_ORDER.chars().position(|symbol| symbol == ch) {
        return SYMBOL_BASE + idx as u32;
    }
    if let Some(digit) = ch.to_digit(10) {
        return DIGIT_BASE + digit;
    }
    if !ch.is_alphanumeric() {
        return OTHER_SYMBOL_WEIGHT;
    }
    let (base, tier) = fold(ch);
    LETTER_BASE + (base as u32) * 4 + tier
}

/// Map a character to its base letter plus a tier that places Polish letters
/// after the plain one.
fn fold(ch: char) -> (char, u32) {
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    match lower {
        'ą' => ('a', 1),
        'ć' => ('c', 1),
        'ę' => ('e', 1),
        'ł' => ('l', 1),
        'ń' => ('n', 1),
        'ó' => ('o', 1),
        'ś' => ('s', 1),
        'ź' => ('z', 1),
        'ż' => ('z', 2),
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => ('a', 0),
        'ç' | 'č' => ('c', 0),
        'é' | 'è' | 'ê' | 'ë' | 'ě' => ('e', 0),
        'í' | 'ì' | 'î' | 'ï' => ('i', 0),
        'ñ' | 'ň' => ('n', 0),
        'ò' | 'ô' | 'ö' | 'õ' => ('o', 0),
        'ř' => ('r', 0),
        'š' => ('s', 0),
        'ú' | 'ù' | 'û' | 'ü' | 'ů' => ('u', 0),
        'ý' | 'ÿ' => ('y', 0),
        'ž' => ('z', 0),
        other => (other, 0),
    }
}

/// Locale-aware, case-insensitive comparison of two names.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    left.chars().map(weight).cmp(right.chars().map(weight))
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn name_matches(name: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case() {
        assert_eq!(compare_names("haircut", "HAIRCUT"), Ordering::Equal);
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn polish_letters_follow_their_base_letter() {
        assert_eq!(compare_names("ala", "ąla"), Ordering::Less);
        assert_eq!(compare_names("ąla", "bela"), Ordering::Less);
        assert_eq!(compare_names("zupa", "źródło"), Ordering::Less);
        assert_eq!(compare_names("źródło", "żaba"), Ordering::Less);
        assert_eq!(compare_names("Łata", "lato"), Ordering::Greater);
    }

    #[test]
    fn other_accents_compare_as_base_letters() {
        assert_eq!(compare_names("café", "CAFE"), Ordering::Equal);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(compare_names("Hair", "Haircut"), Ordering::Less);
    }

    #[test]
    fn punctuation_and_digits_sort_before_letters() {
        assert_eq!(compare_names("~Promo", "Apple"), Ordering::Less);
        assert_eq!(compare_names("{VIP}", "apple"), Ordering::Less);
        assert_eq!(compare_names("-10%", "(promo)"), Ordering::Less);
        assert_eq!(compare_names("(promo)", "[promo]"), Ordering::Less);
        assert_eq!(compare_names("~Promo", "$Promo"), Ordering::Less);
        assert_eq!(compare_names("$Promo", "1 Promo"), Ordering::Less);
        assert_eq!(compare_names("2 Promo", "10 Promo"), Ordering::Greater);
        assert_eq!(compare_names("Hair cut", "Hair-cut"), Ordering::Less);
        assert_eq!(compare_names("Hair-cut", "Haircut"), Ordering::Less);
    }

    #[test]
    fn matches_substrings_case_insensitively() {
        assert!(name_matches("Haircut", "cut"));
        assert!(name_matches("Haircut", "HAIR"));
        assert!(name_matches("Strzyżenie", "ŻENIE"));
        assert!(!name_matches("Coloring", "hair"));
        assert!(name_matches("anything", ""));
    }
}
