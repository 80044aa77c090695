//! Paragraph direction (P2-P3) and explicit embedding levels (X1-X8).
//!
//! The explicit pass walks the paragraph once with a bounded directional
//! status stack. Formatting characters removed by rule X9 are marked BN
//! and given a sentinel level instead of being deleted, so every output
//! array stays index-aligned with the input.

use crate::stack::{DirStatus, DirStatusStack};
use crate::types::{BidiType, Direction, Level, MAX_EXPLICIT_LEVEL, REMOVED_LEVEL};
use crate::BidiError;

/// P2-P3: direction of the first strong character, skipping isolate
/// interiors. Returns `Neutral` when the paragraph has no strong
/// character outside an isolate.
pub fn paragraph_direction(types: &[BidiType]) -> Direction {
    first_strong(types, false)
}

/// Shared scanner for P2-P3 and the FSI lookahead of X5c. With
/// `stop_at_unmatched_pdi` the scan ends at the PDI that would match an
/// isolate initiator just before `types` (the FSI case).
fn first_strong(types: &[BidiType], stop_at_unmatched_pdi: bool) -> Direction {
    let mut isolate_depth = 0usize;
    for &t in types {
        match t {
            BidiType::LRI | BidiType::RLI | BidiType::FSI => isolate_depth += 1,
            BidiType::PDI => {
                if isolate_depth > 0 {
                    isolate_depth -= 1;
                } else if stop_at_unmatched_pdi {
                    break;
                }
            }
            BidiType::L if isolate_depth == 0 => return Direction::Ltr,
            BidiType::R | BidiType::AL if isolate_depth == 0 => return Direction::Rtl,
            _ => {}
        }
    }
    Direction::Neutral
}

/// BD9: pair isolate initiators with their matching PDI by position.
///
/// The returned vector holds, at an initiator's position, the position of
/// its matching PDI, and at a matched PDI's position, the position of its
/// initiator. Unmatched characters hold `None`.
pub(crate) fn match_isolates(types: &[BidiType]) -> Result<Vec<Option<usize>>, BidiError> {
    let mut matches = Vec::new();
    matches.try_reserve_exact(types.len())?;
    matches.resize(types.len(), None);

    let mut open_initiators: Vec<usize> = Vec::new();
    for (i, &t) in types.iter().enumerate() {
        if t.is_isolate_initiator() {
            open_initiators.try_reserve(1)?;
            open_initiators.push(i);
        } else if t == BidiType::PDI {
            if let Some(initiator) = open_initiators.pop() {
                matches[initiator] = Some(i);
                matches[i] = Some(initiator);
            }
        }
    }
    Ok(matches)
}

/// The least odd level greater than `level`.
fn next_odd(level: Level) -> Level {
    (level + 1) | 1
}

/// The least even level greater than `level`.
fn next_even(level: Level) -> Level {
    (level + 2) & !1
}

fn apply_override(slot: &mut BidiType, override_dir: Option<Direction>) {
    match override_dir {
        Some(Direction::Ltr) => *slot = BidiType::L,
        Some(Direction::Rtl) => *slot = BidiType::R,
        _ => {}
    }
}

/// X1-X8: resolve explicit embedding levels and apply directional
/// overrides.
///
/// `resolved` must start as a copy of `types`; it is rewritten in place
/// (overridden characters become L/R, X9-removed characters and isolate
/// initiators with no matching PDI become BN). `levels` receives the
/// explicit level per character, with [`REMOVED_LEVEL`] marking X9-removed
/// characters for the later backfill.
pub(crate) fn resolve_explicit(
    types: &[BidiType],
    matching_pdi: &[Option<usize>],
    base_level: Level,
    resolved: &mut [BidiType],
    levels: &mut [Level],
) {
    let mut stack = DirStatusStack::new(base_level);
    let mut overflow_isolates = 0u32;
    let mut overflow_embeddings = 0u32;
    let mut valid_isolates = 0u32;

    for i in 0..types.len() {
        match types[i] {
            // X2-X5: embeddings and overrides.
            t @ (BidiType::LRE | BidiType::RLE | BidiType::LRO | BidiType::RLO) => {
                resolved[i] = BidiType::BN;
                levels[i] = REMOVED_LEVEL;
                let new_level = if matches!(t, BidiType::RLE | BidiType::RLO) {
                    next_odd(stack.top().level)
                } else {
                    next_even(stack.top().level)
                };
                let override_dir = match t {
                    BidiType::LRO => Some(Direction::Ltr),
                    BidiType::RLO => Some(Direction::Rtl),
                    _ => None,
                };
                if new_level <= MAX_EXPLICIT_LEVEL
                    && overflow_isolates == 0
                    && overflow_embeddings == 0
                {
                    stack.push(DirStatus {
                        level: new_level,
                        override_dir,
                        isolate: false,
                    });
                } else if overflow_isolates == 0 {
                    overflow_embeddings += 1;
                }
            }

            // X5a-X5c: isolate initiators keep the current level; FSI
            // picks its direction from the text up to its matching PDI.
            t @ (BidiType::LRI | BidiType::RLI | BidiType::FSI) => {
                let top = stack.top();
                levels[i] = top.level;
                apply_override(&mut resolved[i], top.override_dir);
                if matching_pdi[i].is_none() {
                    // An initiator whose PDI never appears takes no part
                    // in the weak/neutral rules.
                    resolved[i] = BidiType::BN;
                }
                let rtl = match t {
                    BidiType::RLI => true,
                    BidiType::LRI => false,
                    _ => first_strong(&types[i + 1..], true) == Direction::Rtl,
                };
                let new_level = if rtl {
                    next_odd(top.level)
                } else {
                    next_even(top.level)
                };
                if new_level <= MAX_EXPLICIT_LEVEL
                    && overflow_isolates == 0
                    && overflow_embeddings == 0
                {
                    valid_isolates += 1;
                    stack.push(DirStatus {
                        level: new_level,
                        override_dir: None,
                        isolate: true,
                    });
                } else {
                    overflow_isolates += 1;
                }
            }

            // X6a: PDI pops back to the matching isolate entry, or is a
            // no-op when no isolate is open.
            BidiType::PDI => {
                if overflow_isolates > 0 {
                    overflow_isolates -= 1;
                } else if valid_isolates > 0 {
                    overflow_embeddings = 0;
                    while stack.depth() > 1 && !stack.top().isolate {
                        stack.pop();
                    }
                    stack.pop();
                    valid_isolates -= 1;
                }
                let top = stack.top();
                levels[i] = top.level;
                apply_override(&mut resolved[i], top.override_dir);
            }

            // X7: PDF pops one non-isolate entry, no-op otherwise.
            BidiType::PDF => {
                resolved[i] = BidiType::BN;
                levels[i] = REMOVED_LEVEL;
                if overflow_isolates > 0 {
                    // absorbed by the open overflow isolate
                } else if overflow_embeddings > 0 {
                    overflow_embeddings -= 1;
                } else if stack.depth() > 1 && !stack.top().isolate {
                    stack.pop();
                }
            }

            // X8: a paragraph separator inside the text resets all
            // explicit state.
            BidiType::B => {
                stack.reset(base_level);
                overflow_isolates = 0;
                overflow_embeddings = 0;
                valid_isolates = 0;
                levels[i] = base_level;
            }

            BidiType::BN => {
                levels[i] = REMOVED_LEVEL;
            }

            // X6: everything else takes the current level and override.
            _ => {
                let top = stack.top();
                levels[i] = top.level;
                apply_override(&mut resolved[i], top.override_dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BidiType::*;

    fn run_explicit(types: &[BidiType], base_level: Level) -> (Vec<BidiType>, Vec<Level>) {
        let matching = match_isolates(types).unwrap();
        let mut resolved = types.to_vec();
        let mut levels = vec![0; types.len()];
        resolve_explicit(types, &matching, base_level, &mut resolved, &mut levels);
        (resolved, levels)
    }

    #[test]
    fn direction_first_strong_wins() {
        assert_eq!(paragraph_direction(&[WS, EN, L, R]), Direction::Ltr);
        assert_eq!(paragraph_direction(&[WS, AL, L]), Direction::Rtl);
        assert_eq!(paragraph_direction(&[WS, EN, ON]), Direction::Neutral);
        assert_eq!(paragraph_direction(&[]), Direction::Neutral);
    }

    #[test]
    fn direction_skips_isolate_interiors() {
        // The R inside LRI..PDI must not decide the paragraph.
        assert_eq!(paragraph_direction(&[LRI, R, PDI, L]), Direction::Ltr);
        assert_eq!(paragraph_direction(&[FSI, L, PDI, R]), Direction::Rtl);
    }

    #[test]
    fn match_isolates_nested() {
        let types = [LRI, RLI, PDI, PDI, PDI];
        let matches = match_isolates(&types).unwrap();
        assert_eq!(matches[0], Some(3));
        assert_eq!(matches[1], Some(2));
        assert_eq!(matches[2], Some(1));
        assert_eq!(matches[3], Some(0));
        assert_eq!(matches[4], None); // extra PDI is unmatched
    }

    #[test]
    fn embedding_raises_level_and_is_removed() {
        let (resolved, levels) = run_explicit(&[L, LRE, L, PDF, L], 0);
        assert_eq!(resolved, vec![L, BN, L, BN, L]);
        assert_eq!(levels, vec![0, REMOVED_LEVEL, 2, REMOVED_LEVEL, 0]);
    }

    #[test]
    fn rle_from_ltr_base_gets_level_one() {
        let (_, levels) = run_explicit(&[L, RLE, L, PDF, L], 0);
        assert_eq!(levels[2], 1);
        assert_eq!(levels[4], 0);
    }

    #[test]
    fn override_rewrites_types() {
        let (resolved, levels) = run_explicit(&[L, RLO, L, EN, PDF, L], 0);
        assert_eq!(resolved[2], R);
        assert_eq!(resolved[3], R);
        assert_eq!(resolved[5], L);
        assert_eq!(levels[2], 1);
    }

    #[test]
    fn embedding_overflow_is_a_no_op() {
        // 70 RLEs exhaust the odd levels (1..=125); the rest overflow.
        let mut types = vec![RLE; 70];
        types.push(L);
        let (resolved, levels) = run_explicit(&types, 0);
        assert_eq!(levels[70], 125);
        assert_eq!(resolved[70], L);
    }

    #[test]
    fn unmatched_pdi_and_pdf_are_no_ops() {
        let (resolved, levels) = run_explicit(&[L, PDI, PDF, L], 0);
        assert_eq!(levels[0], 0);
        assert_eq!(levels[1], 0);
        assert_eq!(resolved[1], PDI);
        assert_eq!(resolved[2], BN);
        assert_eq!(levels[3], 0);
    }

    #[test]
    fn matched_isolate_keeps_initiator() {
        let (resolved, levels) = run_explicit(&[L, LRI, R, PDI, L], 0);
        assert_eq!(resolved[1], LRI);
        assert_eq!(levels[1], 0); // initiator stays at the outer level
        assert_eq!(levels[2], 2); // interior one even level deeper
        assert_eq!(levels[3], 0); // PDI back at the outer level
    }

    #[test]
    fn unmatched_initiator_is_marked_bn() {
        let (resolved, levels) = run_explicit(&[L, LRI, R], 0);
        assert_eq!(resolved[1], BN);
        assert_eq!(levels[1], 0);
        assert_eq!(levels[2], 2); // the orphan interior still raised the level
    }

    #[test]
    fn fsi_direction_from_content() {
        let (_, levels) = run_explicit(&[L, FSI, R, PDI, L], 0);
        assert_eq!(levels[2], 1); // RTL content: FSI acts as RLI
        let (_, levels) = run_explicit(&[L, FSI, L, PDI, L], 0);
        assert_eq!(levels[2], 2); // LTR content: FSI acts as LRI
    }

    #[test]
    fn paragraph_separator_resets_stack() {
        let (_, levels) = run_explicit(&[RLE, R, B, L], 0);
        assert_eq!(levels[1], 1);
        assert_eq!(levels[2], 0); // B takes the base level
        assert_eq!(levels[3], 0); // stack was reset
    }

    #[test]
    fn rtl_base_seeds_odd_level() {
        let (_, levels) = run_explicit(&[R, L, LRE, L, PDF], 1);
        assert_eq!(levels[0], 1);
        assert_eq!(levels[1], 1);
        assert_eq!(levels[3], 2); // LRE: next even above 1
    }
}
