//! Paired bracket resolution (rule N0 / BD16).
//!
//! Brackets are matched with a bounded stack of at most 63 open pairs;
//! when the stack fills up, no further pairs are identified in the
//! sequence (BD16) and the leftover brackets resolve as ordinary neutrals.

use crate::runs::IsolatingRunSequence;
use crate::stack::BracketStack;
use crate::types::{BidiType, BracketType};

/// Strong direction a character contributes inside or before a bracket
/// pair: numbers count as R.
fn strong_direction(t: BidiType) -> Option<BidiType> {
    match t.strong_equivalent() {
        BidiType::L => Some(BidiType::L),
        BidiType::R => Some(BidiType::R),
        _ => None,
    }
}

pub(crate) fn resolve_brackets(
    resolved: &mut [BidiType],
    original: &[BidiType],
    bracket_types: &[BracketType],
    seq: &IsolatingRunSequence,
) {
    let idx = &seq.indices;
    if idx.is_empty() {
        return;
    }

    // BD16: identify pairs. Positions here are sequence positions, so the
    // resolution below can scan the sequence directly.
    let mut stack = BracketStack::new();
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    'scan: for (s, &i) in idx.iter().enumerate() {
        if resolved[i] != BidiType::ON {
            continue;
        }
        match bracket_types[i] {
            BracketType::Open(pair_id) => {
                if !stack.push(s, pair_id) {
                    break 'scan; // stack full: no further pairs (BD16)
                }
            }
            BracketType::Close(pair_id) => {
                if let Some(open) = stack.find_and_pop(pair_id) {
                    pairs.push((open, s));
                }
            }
            BracketType::None => {}
        }
    }
    if pairs.is_empty() {
        return;
    }
    pairs.sort_unstable_by_key(|&(open, _)| open);

    let embedding = if seq.level & 1 == 0 {
        BidiType::L
    } else {
        BidiType::R
    };

    for &(open, close) in &pairs {
        // N0b/N0c: first strong type strictly inside the pair, preferring
        // one that matches the embedding direction.
        let mut inside = None;
        for &i in &idx[open + 1..close] {
            if let Some(dir) = strong_direction(resolved[i]) {
                inside = Some(dir);
                if dir == embedding {
                    break;
                }
            }
        }
        let Some(inside) = inside else {
            continue; // N0d: no strong type inside, brackets stay ON
        };

        let dir = if inside == embedding {
            embedding // N0b
        } else {
            // N0c: opposite strong type inside; it wins only when the
            // preceding context (nearest strong before the opening
            // bracket, or sos) already runs that way.
            let mut context = seq.sos;
            for &i in idx[..open].iter().rev() {
                if let Some(d) = strong_direction(resolved[i]) {
                    context = d;
                    break;
                }
            }
            if context == inside {
                inside // N0c1
            } else {
                embedding // N0c2
            }
        };

        resolved[idx[open]] = dir;
        resolved[idx[close]] = dir;

        // Combining marks on a resolved bracket follow the bracket.
        for &i in &idx[open + 1..] {
            if original[i] != BidiType::NSM {
                break;
            }
            resolved[i] = dir;
        }
        for &i in &idx[close + 1..] {
            if original[i] != BidiType::NSM {
                break;
            }
            resolved[i] = dir;
        }
    }
}
