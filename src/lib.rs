//! Unicode Bidirectional Algorithm (UAX#9) reordering engine.
//!
//! Turns a paragraph of pre-classified characters into per-character
//! embedding levels and a visually ordered rendering sequence for mixed
//! left-to-right/right-to-left text:
//! - Paragraph direction detection (P2-P3)
//! - Explicit embedding level resolution (X1-X8)
//! - Isolating run sequences over an arena run list (X9-X10)
//! - Weak type resolution (W1-W7)
//! - Paired bracket resolution (N0/BD16)
//! - Neutral type resolution (N1-N2)
//! - Implicit level resolution (I1-I2)
//! - Whitespace reset per line (L1)
//! - Visual reordering with position mapping (L2-L3)
//! - Character mirroring (L4)
//!
//! Character classification is the caller's job: the engine consumes
//! parallel arrays of [`BidiType`] and [`BracketType`] (the
//! [`tables`] module has lookups for the bracket side) and owns no state
//! across calls, so paragraphs can be resolved from any number of threads
//! as long as each call gets its own buffers.
//!
//! # Usage
//!
//! ```rust
//! use bidi_engine::{
//!     paragraph_embedding_levels, reorder_line, BidiType, BracketType, Direction, ReorderFlags,
//! };
//!
//! // "ab XY" where X and Y are right-to-left letters.
//! let types = [BidiType::L, BidiType::L, BidiType::WS, BidiType::R, BidiType::R];
//! let bracket_types = [BracketType::None; 5];
//! let mut base_dir = Direction::Neutral;
//! let mut levels = [0; 5];
//! paragraph_embedding_levels(&types, &bracket_types, &mut base_dir, &mut levels).unwrap();
//! assert_eq!(base_dir, Direction::Ltr);
//! assert_eq!(levels, [0, 0, 0, 1, 1]);
//!
//! let mut visual = vec!['a', 'b', ' ', 'X', 'Y'];
//! reorder_line(
//!     ReorderFlags::default(),
//!     &types,
//!     &mut levels,
//!     0,
//!     5,
//!     base_dir,
//!     &mut visual,
//!     None,
//!     None,
//! )
//! .unwrap();
//! assert_eq!(visual, ['a', 'b', ' ', 'Y', 'X']);
//! ```

mod brackets;
mod explicit;
mod implicit;
mod neutral;
mod reorder;
mod runs;
mod stack;
pub mod tables;
mod types;
mod weak;

use thiserror::Error;

pub use explicit::paragraph_direction;
pub use reorder::{apply_mirroring, reorder_line};
pub use types::{
    BidiType, BracketType, Direction, Level, ReorderFlags, MAX_BRACKET_PAIRS, MAX_EXPLICIT_LEVEL,
};

use types::is_removed_level;

/// Errors from the paragraph and line entry points.
#[derive(Debug, Error)]
pub enum BidiError {
    /// The run arena or a per-sequence buffer could not be allocated; the
    /// caller should fall back to rendering the paragraph in logical
    /// order.
    #[error("bidi working buffers exceed available memory: {0}")]
    OutOfMemory(#[from] std::collections::TryReserveError),
}

/// Result type alias
pub type BidiResult<T> = Result<T, BidiError>;

/// Resolve the embedding levels of one paragraph (rules P2-P3 through
/// I1-I2).
///
/// `types` and `bracket_types` are the caller's classification of the
/// paragraph; `levels` must be the same length and receives one level per
/// character. `base_dir` seeds the paragraph direction: pass
/// [`Direction::Neutral`] to auto-detect, in which case it is updated to
/// the detected direction (and left untouched when the paragraph has no
/// strong character).
///
/// Returns the maximum resolved level plus one. The engine keeps no state
/// between calls.
pub fn paragraph_embedding_levels(
    types: &[BidiType],
    bracket_types: &[BracketType],
    base_dir: &mut Direction,
    levels: &mut [Level],
) -> BidiResult<Level> {
    debug_assert_eq!(levels.len(), types.len());
    debug_assert_eq!(bracket_types.len(), types.len());

    let n = types.len();
    if n == 0 {
        return Ok(base_dir.level() + 1);
    }

    if *base_dir == Direction::Neutral {
        match explicit::paragraph_direction(types) {
            Direction::Neutral => {}
            detected => *base_dir = detected,
        }
    }
    let base_level = base_dir.level();

    log::trace!("resolving paragraph: {n} chars, base level {base_level}");

    let mut resolved = Vec::new();
    resolved.try_reserve_exact(n)?;
    resolved.extend_from_slice(types);

    let matching_pdi = explicit::match_isolates(types)?;
    explicit::resolve_explicit(types, &matching_pdi, base_level, &mut resolved, levels);

    let sequences = runs::build_sequences(types, &resolved, levels, &matching_pdi, base_level)?;
    for seq in &sequences {
        weak::resolve_weak(&mut resolved, seq);
        brackets::resolve_brackets(&mut resolved, types, bracket_types, seq);
        neutral::resolve_neutrals(&mut resolved, seq);
    }

    implicit::resolve_implicit(&resolved, levels);

    // Characters removed by X9 take the level of the preceding character
    // so the output stays index-aligned with the input.
    let mut prev = base_level;
    for level in levels.iter_mut() {
        if is_removed_level(*level) {
            *level = prev;
        } else {
            prev = *level;
        }
    }

    let max_level = levels.iter().copied().max().unwrap_or(base_level);
    Ok(max_level + 1)
}
