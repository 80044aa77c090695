//! Core types for the Unicode Bidirectional Algorithm (UAX#9).

/// Bidi character class as defined in Unicode.
///
/// Assigned per character by the caller's classifier; the engine never
/// looks at raw characters except for bracket pairing and mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BidiType {
    // Strong types
    L = 0,    // Left-to-right
    R = 1,    // Right-to-left
    AL = 2,   // Arabic letter

    // Weak types
    EN = 3,   // European number
    ES = 4,   // European separator
    ET = 5,   // European terminator
    AN = 6,   // Arabic number
    CS = 7,   // Common separator
    NSM = 8,  // Non-spacing mark
    BN = 9,   // Boundary neutral

    // Neutral types
    B = 10,   // Paragraph separator
    S = 11,   // Segment separator
    WS = 12,  // Whitespace
    ON = 13,  // Other neutral

    // Explicit formatting
    LRE = 14, // Left-to-right embedding
    LRO = 15, // Left-to-right override
    RLE = 16, // Right-to-left embedding
    RLO = 17, // Right-to-left override
    PDF = 18, // Pop directional format

    // Isolates
    LRI = 19, // Left-to-right isolate
    RLI = 20, // Right-to-left isolate
    FSI = 21, // First strong isolate
    PDI = 22, // Pop directional isolate
}

impl BidiType {
    /// Whether this is a strong type (L, R, AL).
    pub fn is_strong(self) -> bool {
        matches!(self, BidiType::L | BidiType::R | BidiType::AL)
    }

    /// Whether this is an isolate initiator (LRI, RLI, FSI).
    pub fn is_isolate_initiator(self) -> bool {
        matches!(self, BidiType::LRI | BidiType::RLI | BidiType::FSI)
    }

    /// Whether this type is removed from further processing by rule X9
    /// (LRE, RLE, LRO, RLO, PDF, BN).
    pub fn is_removed_by_x9(self) -> bool {
        matches!(
            self,
            BidiType::LRE
                | BidiType::RLE
                | BidiType::LRO
                | BidiType::RLO
                | BidiType::PDF
                | BidiType::BN
        )
    }

    /// Whether this type counts as a neutral for rules N0-N2: the neutral
    /// classes proper plus isolate formatting characters.
    pub(crate) fn is_neutral_or_isolate(self) -> bool {
        matches!(
            self,
            BidiType::B
                | BidiType::S
                | BidiType::WS
                | BidiType::ON
                | BidiType::LRI
                | BidiType::RLI
                | BidiType::FSI
                | BidiType::PDI
        )
    }

    /// Strong-direction equivalent used when scanning context for N0-N2:
    /// numbers count as R, everything else stands for itself.
    pub(crate) fn strong_equivalent(self) -> BidiType {
        match self {
            BidiType::EN | BidiType::AN | BidiType::AL => BidiType::R,
            other => other,
        }
    }
}

/// Paragraph/base direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
    /// No strong direction: auto-detect on input, "no strong character
    /// found" on output.
    Neutral,
}

impl Direction {
    /// Base embedding level for this direction.
    pub fn level(self) -> Level {
        match self {
            Direction::Ltr | Direction::Neutral => 0,
            Direction::Rtl => 1,
        }
    }

    /// Direction of an embedding level (even = LTR, odd = RTL).
    pub fn of_level(level: Level) -> Direction {
        if level & 1 == 0 {
            Direction::Ltr
        } else {
            Direction::Rtl
        }
    }
}

/// Embedding level: nesting depth plus orientation (even = LTR, odd = RTL).
pub type Level = u8;

/// Maximum depth of explicit embedding/override/isolate nesting (UAX#9).
pub const MAX_EXPLICIT_LEVEL: Level = 125;

/// Internal marker for characters removed by rule X9, used between the
/// explicit pass and the final level backfill so the arrays keep their
/// length for position mapping.
pub(crate) const REMOVED_LEVEL: Level = MAX_EXPLICIT_LEVEL + 1;

/// Maximum number of bracket pairs open at once in rule N0 (BD16).
pub const MAX_BRACKET_PAIRS: usize = 63;

pub(crate) fn is_removed_level(level: Level) -> bool {
    level == REMOVED_LEVEL
}

/// Bracket category of a character for the paired bracket algorithm (N0).
///
/// The payload is the canonical pair id: the canonicalized closing bracket
/// of the pair, for opening and closing characters alike, so that Unicode
/// variants of the same bracket (U+2329 vs U+3008) match by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketType {
    #[default]
    None,
    Open(char),
    Close(char),
}

/// Flags controlling visual reordering.
#[derive(Debug, Clone, Copy)]
pub struct ReorderFlags {
    /// Keep non-spacing marks immediately after their base character when
    /// reversing right-to-left runs. On by default; turning it off gives
    /// plain rule-L2 reversal.
    pub reorder_nsm: bool,
}

impl Default for ReorderFlags {
    fn default() -> Self {
        ReorderFlags { reorder_nsm: true }
    }
}
