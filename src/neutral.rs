//! Neutral type resolution (rules N1-N2).
//!
//! Whatever survives the weak and bracket passes as a neutral (B, S, WS,
//! ON, and any isolate formatting characters) takes the direction of its
//! surrounding strong context when both sides agree, and the embedding
//! direction otherwise.

use crate::runs::IsolatingRunSequence;
use crate::types::BidiType;

pub(crate) fn resolve_neutrals(resolved: &mut [BidiType], seq: &IsolatingRunSequence) {
    let idx = &seq.indices;
    if idx.is_empty() {
        return;
    }

    let embedding = if seq.level & 1 == 0 {
        BidiType::L
    } else {
        BidiType::R
    };

    let mut s = 0;
    while s < idx.len() {
        if !resolved[idx[s]].is_neutral_or_isolate() {
            s += 1;
            continue;
        }
        let run_start = s;
        while s < idx.len() && resolved[idx[s]].is_neutral_or_isolate() {
            s += 1;
        }

        // Strong context on each side; numbers count as R, the sequence
        // boundaries contribute sos/eos.
        let before = if run_start == 0 {
            seq.sos
        } else {
            resolved[idx[run_start - 1]].strong_equivalent()
        };
        let after = if s == idx.len() {
            seq.eos
        } else {
            resolved[idx[s]].strong_equivalent()
        };

        let dir = if before == after { before } else { embedding };
        for &i in &idx[run_start..s] {
            resolved[i] = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BidiType::*;

    fn seq(len: usize, level: u8, sos: BidiType, eos: BidiType) -> IsolatingRunSequence {
        IsolatingRunSequence {
            indices: (0..len).collect(),
            level,
            sos,
            eos,
        }
    }

    fn resolve(types: &[BidiType], level: u8, sos: BidiType, eos: BidiType) -> Vec<BidiType> {
        let mut resolved = types.to_vec();
        resolve_neutrals(&mut resolved, &seq(types.len(), level, sos, eos));
        resolved
    }

    #[test]
    fn n1_matching_context() {
        assert_eq!(resolve(&[L, WS, L], 0, L, L), vec![L, L, L]);
        assert_eq!(resolve(&[R, ON, WS, R], 1, R, R), vec![R, R, R, R]);
    }

    #[test]
    fn n2_mismatched_context_takes_embedding() {
        assert_eq!(resolve(&[L, WS, R], 0, L, L), vec![L, L, R]);
        assert_eq!(resolve(&[L, WS, R], 1, R, R), vec![L, R, R]);
    }

    #[test]
    fn numbers_act_as_r() {
        // EN R on both sides: neutral between them sees R/R.
        assert_eq!(resolve(&[EN, WS, R], 0, L, L), vec![EN, R, R]);
    }

    #[test]
    fn boundaries_use_sos_and_eos() {
        assert_eq!(resolve(&[WS, WS], 0, R, R), vec![R, R]);
        assert_eq!(resolve(&[WS, L], 0, R, L), vec![L, L]); // mismatch: embedding L
    }

    #[test]
    fn isolate_formatting_characters_resolve_like_neutrals() {
        assert_eq!(resolve(&[R, LRI, R], 1, R, R), vec![R, R, R]);
        assert_eq!(resolve(&[L, PDI, R], 0, L, L), vec![L, L, R]);
    }
}
