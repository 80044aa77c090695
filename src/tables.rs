//! Constant Unicode tables for bracket pairing (BD16) and mirroring (L4).
//!
//! These are module-level immutable tables with no runtime initialization,
//! shared freely across threads. Bracket data follows BidiBrackets.txt,
//! restricted to paired punctuation; the mirror lookup is derived from the
//! same pair data plus the handful of mirrored quotation characters.

use crate::types::BracketType;

/// Paired bracket data (from BidiBrackets.txt).
/// Format: (opening bracket, closing bracket), sorted by opening bracket.
static BRACKET_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('\u{0F3A}', '\u{0F3B}'), // Tibetan gug rtags
    ('\u{0F3C}', '\u{0F3D}'),
    ('\u{169B}', '\u{169C}'), // Ogham feather marks
    ('\u{2045}', '\u{2046}'),
    ('\u{207D}', '\u{207E}'), // superscript parens
    ('\u{208D}', '\u{208E}'), // subscript parens
    ('\u{2308}', '\u{2309}'), // ceiling
    ('\u{230A}', '\u{230B}'), // floor
    ('\u{2329}', '\u{232A}'), // deprecated angle brackets
    ('\u{2768}', '\u{2769}'),
    ('\u{276A}', '\u{276B}'),
    ('\u{276C}', '\u{276D}'),
    ('\u{276E}', '\u{276F}'),
    ('\u{2770}', '\u{2771}'),
    ('\u{2772}', '\u{2773}'),
    ('\u{2774}', '\u{2775}'),
    ('\u{27C5}', '\u{27C6}'), // s-shaped bag delimiters
    ('\u{27E6}', '\u{27E7}'), // mathematical white square brackets
    ('\u{27E8}', '\u{27E9}'), // mathematical angle brackets
    ('\u{27EA}', '\u{27EB}'),
    ('\u{27EC}', '\u{27ED}'),
    ('\u{27EE}', '\u{27EF}'),
    ('\u{2983}', '\u{2984}'),
    ('\u{2985}', '\u{2986}'),
    ('\u{2987}', '\u{2988}'),
    ('\u{2989}', '\u{298A}'),
    ('\u{298B}', '\u{298C}'),
    ('\u{298D}', '\u{2990}'), // tick-corner square brackets pair crosswise
    ('\u{298F}', '\u{298E}'),
    ('\u{2991}', '\u{2992}'),
    ('\u{2993}', '\u{2994}'),
    ('\u{2995}', '\u{2996}'),
    ('\u{2997}', '\u{2998}'),
    ('\u{29D8}', '\u{29D9}'),
    ('\u{29DA}', '\u{29DB}'),
    ('\u{29FC}', '\u{29FD}'),
    ('\u{2E22}', '\u{2E23}'), // half brackets
    ('\u{2E24}', '\u{2E25}'),
    ('\u{2E26}', '\u{2E27}'),
    ('\u{2E28}', '\u{2E29}'),
    ('\u{2E55}', '\u{2E56}'),
    ('\u{2E57}', '\u{2E58}'),
    ('\u{2E59}', '\u{2E5A}'),
    ('\u{2E5B}', '\u{2E5C}'),
    ('\u{3008}', '\u{3009}'), // CJK angle brackets
    ('\u{300A}', '\u{300B}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3010}', '\u{3011}'),
    ('\u{3014}', '\u{3015}'),
    ('\u{3016}', '\u{3017}'),
    ('\u{3018}', '\u{3019}'),
    ('\u{301A}', '\u{301B}'),
    ('\u{FE59}', '\u{FE5A}'), // small forms
    ('\u{FE5B}', '\u{FE5C}'),
    ('\u{FE5D}', '\u{FE5E}'),
    ('\u{FF08}', '\u{FF09}'), // fullwidth forms
    ('\u{FF3B}', '\u{FF3D}'),
    ('\u{FF5B}', '\u{FF5D}'),
    ('\u{FF5F}', '\u{FF60}'),
    ('\u{FF62}', '\u{FF63}'),
];

/// Mirrored characters that are not paired brackets.
static QUOTE_MIRRORS: &[(char, char)] = &[
    ('<', '>'),
    ('>', '<'),
    ('\u{00AB}', '\u{00BB}'), // guillemets
    ('\u{00BB}', '\u{00AB}'),
    ('\u{2039}', '\u{203A}'), // single guillemets
    ('\u{203A}', '\u{2039}'),
];

/// Fold the deprecated angle brackets onto their CJK canonical equivalents
/// (U+2329 -> U+3008, U+232A -> U+3009) so both spellings pair together.
pub fn canonical_bracket(ch: char) -> char {
    match ch {
        '\u{2329}' => '\u{3008}',
        '\u{232A}' => '\u{3009}',
        _ => ch,
    }
}

/// Look up the bracket category of a character for rule N0.
///
/// The payload of `Open`/`Close` is the canonical pair id (see
/// [`BracketType`]); characters that are not paired brackets map to
/// `BracketType::None`.
pub fn bracket_type(ch: char) -> BracketType {
    let idx = BRACKET_PAIRS.partition_point(|&(open, _)| open < ch);
    if idx < BRACKET_PAIRS.len() {
        let (open, close) = BRACKET_PAIRS[idx];
        if open == ch {
            return BracketType::Open(canonical_bracket(close));
        }
    }
    for &(_, close) in BRACKET_PAIRS {
        if close == ch {
            return BracketType::Close(canonical_bracket(ch));
        }
    }
    BracketType::None
}

/// Look up the mirrored counterpart of a character (rule L4).
/// Returns `None` if the character has no mirror.
pub fn mirror_char(ch: char) -> Option<char> {
    for &(from, to) in QUOTE_MIRRORS {
        if from == ch {
            return Some(to);
        }
    }
    for &(open, close) in BRACKET_PAIRS {
        if open == ch {
            return Some(close);
        }
        if close == ch {
            return Some(open);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_pairs_sorted_by_opening() {
        for w in BRACKET_PAIRS.windows(2) {
            assert!(w[0].0 < w[1].0, "{:?} before {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn ascii_brackets() {
        assert_eq!(bracket_type('('), BracketType::Open(')'));
        assert_eq!(bracket_type(')'), BracketType::Close(')'));
        assert_eq!(bracket_type('['), BracketType::Open(']'));
        assert_eq!(bracket_type('}'), BracketType::Close('}'));
        assert_eq!(bracket_type('a'), BracketType::None);
        assert_eq!(bracket_type('<'), BracketType::None); // not a BD16 bracket
    }

    #[test]
    fn canonical_equivalence_folds_to_cjk() {
        // Both angle-bracket spellings share one pair id.
        assert_eq!(bracket_type('\u{2329}'), BracketType::Open('\u{3009}'));
        assert_eq!(bracket_type('\u{3008}'), BracketType::Open('\u{3009}'));
        assert_eq!(bracket_type('\u{232A}'), BracketType::Close('\u{3009}'));
        assert_eq!(bracket_type('\u{3009}'), BracketType::Close('\u{3009}'));
    }

    #[test]
    fn tick_corner_brackets_pair_crosswise() {
        assert_eq!(bracket_type('\u{298D}'), BracketType::Open('\u{2990}'));
        assert_eq!(bracket_type('\u{2990}'), BracketType::Close('\u{2990}'));
        assert_eq!(bracket_type('\u{298F}'), BracketType::Open('\u{298E}'));
    }

    #[test]
    fn mirror_parentheses_and_quotes() {
        assert_eq!(mirror_char('('), Some(')'));
        assert_eq!(mirror_char(')'), Some('('));
        assert_eq!(mirror_char('<'), Some('>'));
        assert_eq!(mirror_char('\u{00AB}'), Some('\u{00BB}'));
        assert_eq!(mirror_char('\u{27E8}'), Some('\u{27E9}'));
        assert_eq!(mirror_char('\u{2309}'), Some('\u{2308}'));
        assert_eq!(mirror_char('A'), None);
    }
}
