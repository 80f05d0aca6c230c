//! # Equivalence Module - When Does a Keystroke Count as Correct?
//!
//! Practice text comes from real documents, so it is full of characters that a
//! standard keyboard cannot produce directly: curly quotes, dashes, emoji, accented
//! letters in decomposed form, tabs where the user types spaces. This module decides
//! whether a typed character satisfies an expected one.
//!
//! Rules are checked in a fixed order and the first rule that applies wins:
//!
//! 1. [`Rule::Identity`]: both sides are equal
//! 2. [`Rule::Exempt`]: the expected character cannot reasonably be typed, so any input is accepted
//! 3. [`Rule::Canonical`]: both sides are equal after NFC normalization
//! 4. [`Rule::Whitespace`]: a tab stands in for a space or the other way around
//! 5. [`Rule::Quote`]: both sides belong to the same quote family
//! 6. [`Rule::Glyph`]: both sides belong to the same special-glyph family
//!
//! All lookups go through static tables: a sorted list of code point ranges searched
//! with a binary search, and hash maps from family member to family bitmask.
//!
//! ```rust
//! use retype::equivalence::{self, Rule};
//!
//! assert!(equivalence::is_match('\'', '\u{2019}'));
//! assert_eq!(equivalence::rule_for(" ", "\t"), Some(Rule::Whitespace));
//! assert_eq!(equivalence::rule_for("(tm)", "\u{2122}"), Some(Rule::Exempt));
//! assert_eq!(equivalence::rule_for("\u{2122}", "(tm)"), Some(Rule::Glyph));
//! assert!(!equivalence::is_match('a', 'b'));
//! ```

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

/// The rule that made a typed character acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Typed and expected are the same
    Identity,
    /// The expected character is exempt and accepts any input
    Exempt,
    /// Typed and expected share the same NFC form
    Canonical,
    /// Tab typed for a space, or space typed for a tab
    Whitespace,
    /// Straight and typographic quotes of the same family
    Quote,
    /// Hyphens/dashes, ellipsis, and the `(c)`, `(r)`, `(tm)` spellings
    Glyph,
}

/// Inclusive code point ranges whose characters accept any input.
///
/// Sorted by start and non-overlapping, so a binary search can be used.
const EXEMPT_RANGES: [(u32, u32); 18] = [
    (0x00A0, 0x00FF),   // Latin-1 Supplement
    (0x2000, 0x206F),   // General Punctuation
    (0x20A0, 0x20CF),   // Currency Symbols
    (0x2190, 0x21FF),   // Arrows
    (0x2200, 0x22FF),   // Mathematical Operators
    (0x2300, 0x23FF),   // Miscellaneous Technical
    (0x25A0, 0x25FF),   // Geometric Shapes
    (0x2600, 0x26FF),   // Miscellaneous Symbols
    (0x2700, 0x27BF),   // Dingbats
    (0x1F300, 0x1F5FF), // Miscellaneous Symbols and Pictographs
    (0x1F600, 0x1F64F), // Emoticons
    (0x1F680, 0x1F6FF), // Transport and Map Symbols
    (0x1F700, 0x1F77F), // Alchemical Symbols
    (0x1F780, 0x1F7FF), // Geometric Shapes Extended
    (0x1F800, 0x1F8FF), // Supplemental Arrows-C
    (0x1F900, 0x1F9FF), // Supplemental Symbols and Pictographs
    (0x1FA00, 0x1FA6F), // Chess Symbols
    (0x1FA70, 0x1FAFF), // Symbols and Pictographs Extended-A
];

/// Named symbols that accept any input, whether or not a range above covers them
const EXEMPT_SYMBOLS: [char; 18] = [
    '\u{00A9}', // copyright
    '\u{00AE}', // registered
    '\u{2122}', // trademark
    '\u{2026}', // ellipsis
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{201C}', // left double quote
    '\u{201D}', // right double quote
    '\u{2018}', // left single quote
    '\u{2019}', // right single quote
    '\u{00B0}', // degree
    '\u{00B1}', // plus-minus
    '\u{00D7}', // multiplication
    '\u{00F7}', // division
    '\u{221E}', // infinity
    '\u{2260}', // not equal
    '\u{2264}', // less than or equal
    '\u{2265}', // greater than or equal
];

const QUOTE_FAMILIES: [&[&str]; 3] = [
    &["\"", "\u{201C}", "\u{201D}"],
    &["'", "\u{2018}", "\u{2019}", "`"],
    &["`", "\u{2018}"],
];

const GLYPH_FAMILIES: [&[&str]; 5] = [
    &["-", "\u{2013}", "\u{2014}"],
    &["...", "\u{2026}"],
    &["(c)", "\u{00A9}"],
    &["(r)", "\u{00AE}"],
    &["(tm)", "\u{2122}"],
];

static EXEMPT_SYMBOL_SET: LazyLock<HashSet<char>> =
    LazyLock::new(|| EXEMPT_SYMBOLS.into_iter().collect());

static QUOTE_MASKS: LazyLock<HashMap<&'static str, u8>> =
    LazyLock::new(|| family_masks(&QUOTE_FAMILIES));

static GLYPH_MASKS: LazyLock<HashMap<&'static str, u8>> =
    LazyLock::new(|| family_masks(&GLYPH_FAMILIES));

/// Build a member -> bitmask map, where bit `n` is set when the member belongs to family `n`
fn family_masks(families: &[&[&'static str]]) -> HashMap<&'static str, u8> {
    let mut masks = HashMap::new();
    for (index, family) in families.iter().enumerate() {
        for member in family.iter() {
            *masks.entry(*member).or_insert(0) |= 1 << index;
        }
    }
    masks
}

fn share_family(masks: &HashMap<&'static str, u8>, typed: &str, expected: &str) -> bool {
    match (masks.get(typed), masks.get(expected)) {
        (Some(typed), Some(expected)) => typed & expected != 0,
        _ => false,
    }
}

/// Returns true if the character accepts any input
pub fn is_exempt(char: char) -> bool {
    let code = u32::from(char);
    let in_range = EXEMPT_RANGES
        .binary_search_by(|&(start, end)| {
            if end < code {
                Ordering::Less
            } else if start > code {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok();

    in_range || EXEMPT_SYMBOL_SET.contains(&char)
}

/// Returns the first rule under which `typed` satisfies `expected`, if any
///
/// Both sides are text units rather than single characters so the multi-character
/// spellings (`...`, `(c)`, `(r)`, `(tm)`) and decomposed sequences can take part.
/// Only the first character of `expected` is consulted for the exempt check.
pub fn rule_for(typed: &str, expected: &str) -> Option<Rule> {
    if typed == expected {
        return Some(Rule::Identity);
    }

    if expected.chars().next().is_some_and(is_exempt) {
        return Some(Rule::Exempt);
    }

    if typed.nfc().eq(expected.nfc()) {
        return Some(Rule::Canonical);
    }

    if matches!((typed, expected), ("\t", " ") | (" ", "\t")) {
        return Some(Rule::Whitespace);
    }

    if share_family(&QUOTE_MASKS, typed, expected) {
        return Some(Rule::Quote);
    }

    if share_family(&GLYPH_MASKS, typed, expected) {
        return Some(Rule::Glyph);
    }

    None
}

/// Returns true if the typed text unit satisfies the expected one
pub fn is_sequence_match(typed: &str, expected: &str) -> bool {
    rule_for(typed, expected).is_some()
}

/// Returns true if the typed character satisfies the expected character
pub fn is_match(typed: char, expected: char) -> bool {
    rule_for_chars(typed, expected).is_some()
}

/// Character flavour of [`rule_for`], without allocating
pub fn rule_for_chars(typed: char, expected: char) -> Option<Rule> {
    let mut typed_buf = [0; 4];
    let mut expected_buf = [0; 4];
    rule_for(
        typed.encode_utf8(&mut typed_buf),
        expected.encode_utf8(&mut expected_buf),
    )
}
