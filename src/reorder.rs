//! Line-level adjustment and visual reordering (rules L1-L4).
//!
//! Unlike the per-paragraph resolution passes, these run per rendered
//! line: the caller picks a sub-range of the paragraph and gets the
//! characters of that range rearranged into visual order, with the level
//! array adjusted for trailing whitespace first.

use crate::tables::mirror_char;
use crate::types::{BidiType, Direction, Level, ReorderFlags};
use crate::BidiError;

/// L1: reset separators, and any whitespace or isolate formatting run
/// that trails a separator or the end of the line, to the paragraph
/// level. Uses the original types; the resolution passes must already
/// have run.
pub(crate) fn reset_line_levels(
    types: &[BidiType],
    levels: &mut [Level],
    base_level: Level,
    start: usize,
    end: usize,
) {
    let mut reset = true; // the end of the line counts as a boundary
    for i in (start..end).rev() {
        match types[i] {
            BidiType::B | BidiType::S => {
                levels[i] = base_level;
                reset = true;
            }
            BidiType::WS | BidiType::LRI | BidiType::RLI | BidiType::FSI | BidiType::PDI => {
                if reset {
                    levels[i] = base_level;
                }
            }
            t if t.is_removed_by_x9() => {
                if reset {
                    levels[i] = base_level;
                }
            }
            _ => reset = false,
        }
    }
}

fn reverse_segment(
    visual: &mut [char],
    position_map: &mut Option<&mut [usize]>,
    extra: &mut Option<&mut dyn FnMut(usize, usize)>,
    start: usize,
    end: usize,
) {
    visual[start..end].reverse();
    if let Some(map) = position_map.as_deref_mut() {
        map[start..end].reverse();
    }
    if let Some(f) = extra.as_mut() {
        f(start, end);
    }
}

/// L1-L3: reorder one line of the paragraph into visual order.
///
/// Operates on the sub-range `[offset, offset + len)` of the
/// paragraph-length arrays: `types` are the original bidi types, `levels`
/// the resolved levels (adjusted in place by rule L1), `visual` the
/// characters to rearrange. When `position_map` is given it must be
/// initialized so that `position_map[i]` names the input position
/// currently at `i` (identity for a fresh line); it is permuted in
/// lock-step. `extra` is called with every reversed subrange so a caller
/// can keep a parallel array (glyph indices, widths) in step.
///
/// With [`ReorderFlags::reorder_nsm`] set, non-spacing marks on a
/// right-to-left base character stay right after their base instead of
/// floating to the visual front of the run.
///
/// Returns the highest level on the line plus one.
#[allow(clippy::too_many_arguments)]
pub fn reorder_line(
    flags: ReorderFlags,
    types: &[BidiType],
    levels: &mut [Level],
    offset: usize,
    len: usize,
    base_dir: Direction,
    visual: &mut [char],
    mut position_map: Option<&mut [usize]>,
    mut extra: Option<&mut dyn FnMut(usize, usize)>,
) -> Result<Level, BidiError> {
    debug_assert_eq!(levels.len(), types.len());
    debug_assert_eq!(visual.len(), types.len());
    debug_assert!(offset + len <= types.len());
    if let Some(map) = position_map.as_deref() {
        debug_assert_eq!(map.len(), types.len());
    }

    let end = offset + len;
    if len == 0 {
        return Ok(base_dir.level() + 1);
    }

    reset_line_levels(types, levels, base_dir.level(), offset, end);

    log::trace!("reordering line [{offset}, {end})");

    // Keep combining marks glued to their right-to-left base before the
    // runs are reversed: pre-reversing [base..marks] makes the later full
    // reversal put the base first with its marks trailing it.
    if flags.reorder_nsm {
        let mut i = offset;
        while i < end {
            if types[i] == BidiType::NSM && levels[i] & 1 == 1 {
                let marks_start = i;
                while i < end && types[i] == BidiType::NSM && levels[i] == levels[marks_start] {
                    i += 1;
                }
                if marks_start > offset && levels[marks_start - 1] == levels[marks_start] {
                    reverse_segment(visual, &mut position_map, &mut extra, marks_start - 1, i);
                }
            } else {
                i += 1;
            }
        }
    }

    let mut max_level = 0;
    let mut lowest_odd = Level::MAX;
    for &level in &levels[offset..end] {
        max_level = max_level.max(level);
        if level & 1 == 1 {
            lowest_odd = lowest_odd.min(level);
        }
    }

    // L2: from the highest level down to the lowest odd level, reverse
    // every maximal span at or above the threshold.
    if lowest_odd <= max_level {
        for threshold in (lowest_odd..=max_level).rev() {
            let mut i = offset;
            while i < end {
                if levels[i] >= threshold {
                    let span_start = i;
                    while i < end && levels[i] >= threshold {
                        i += 1;
                    }
                    reverse_segment(visual, &mut position_map, &mut extra, span_start, i);
                } else {
                    i += 1;
                }
            }
        }
    }

    Ok(max_level + 1)
}

/// L4: replace mirrorable characters at odd levels with their mirrored
/// counterparts (parentheses swap in right-to-left runs).
pub fn apply_mirroring(chars: &[char], levels: &[Level]) -> Vec<char> {
    chars
        .iter()
        .zip(levels.iter())
        .map(|(&ch, &level)| {
            if level & 1 == 1 {
                mirror_char(ch).unwrap_or(ch)
            } else {
                ch
            }
        })
        .collect()
}
