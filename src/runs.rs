//! Level runs and isolating run sequences (rules BD13 and X10).
//!
//! Runs live in an arena (`Vec<Run>`) and are chained with index links
//! instead of pointers. Index 0 is a sentinel run that closes the list at
//! both ends, so ordinary traversal never checks for a missing neighbor.
//! A second pair of links (`next_isolate`/`prev_isolate`) connects a run
//! that ends with an isolate initiator to the run beginning with its
//! matching PDI; following those links yields the isolating run sequences
//! that the weak, bracket, and neutral rules operate on.

use crate::types::{is_removed_level, BidiType, Level};
use crate::BidiError;

pub(crate) const SENTINEL: usize = 0;

/// One maximal run of consecutive characters at the same embedding level.
/// Characters removed by X9 belong to no run; they sit in the gaps
/// between runs (and inside a run's span without splitting it).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Run {
    /// Position of the run's first kept character.
    pub start: usize,
    /// Length up to and including the last kept character.
    pub len: usize,
    /// Resolved type of the run's first kept character.
    pub kind: BidiType,
    pub level: Level,
    /// Isolate nesting depth at the start of the run.
    pub isolate_level: u8,
    /// Whether the gap after this run swallows an isolate initiator that
    /// has no matching PDI (rule X10's end-of-sequence case).
    pub ends_unmatched_isolate: bool,
    pub next: usize,
    pub prev: usize,
    pub next_isolate: usize,
    pub prev_isolate: usize,
}

const SENTINEL_RUN: Run = Run {
    start: 0,
    len: 0,
    kind: BidiType::ON,
    level: 0,
    isolate_level: 0,
    ends_unmatched_isolate: false,
    next: SENTINEL,
    prev: SENTINEL,
    next_isolate: SENTINEL,
    prev_isolate: SENTINEL,
};

/// Arena-backed doubly-linked run list.
pub(crate) struct RunList {
    pub runs: Vec<Run>,
}

impl RunList {
    fn with_capacity(capacity: usize) -> Result<Self, BidiError> {
        let mut runs = Vec::new();
        runs.try_reserve_exact(capacity + 1)?;
        runs.push(SENTINEL_RUN);
        Ok(RunList { runs })
    }

    /// Append a run at the tail, just before the sentinel.
    fn push_back(&mut self, mut run: Run) -> usize {
        let idx = self.runs.len();
        let tail = self.runs[SENTINEL].prev;
        run.prev = tail;
        run.next = SENTINEL;
        self.runs[tail].next = idx;
        self.runs[SENTINEL].prev = idx;
        self.runs.push(run);
        idx
    }

    pub fn first(&self) -> usize {
        self.runs[SENTINEL].next
    }

    /// Find the run whose first kept character sits at `position`. Arena
    /// order is text order, so a binary search over the non-sentinel tail
    /// works.
    fn run_starting_at(&self, position: usize) -> Option<usize> {
        let slice = &self.runs[1..];
        let idx = slice.partition_point(|run| run.start < position);
        if idx < slice.len() && slice[idx].start == position {
            Some(idx + 1)
        } else {
            None
        }
    }
}

fn kept(resolved: &[BidiType], levels: &[Level], i: usize) -> bool {
    resolved[i] != BidiType::BN && !is_removed_level(levels[i])
}

/// BD13 plus the X10 linking step: cut the paragraph into level runs and
/// connect each run that ends with a matched isolate initiator to the run
/// beginning with its PDI.
pub(crate) fn build_run_list(
    original: &[BidiType],
    resolved: &[BidiType],
    levels: &[Level],
    matching_pdi: &[Option<usize>],
) -> Result<RunList, BidiError> {
    let n = original.len();
    let mut list = RunList::with_capacity(n)?;

    // Level runs over the kept characters. The isolate depth counter
    // charges initiators and PDIs to the enclosing scope.
    let mut isolate_depth = 0u8;
    let mut open: Option<(usize, usize, u8)> = None; // (start, last, depth at start)
    for i in 0..n {
        if original[i] == BidiType::PDI && matching_pdi[i].is_some() {
            isolate_depth = isolate_depth.saturating_sub(1);
        }
        let depth_here = isolate_depth;
        if original[i].is_isolate_initiator() && matching_pdi[i].is_some() {
            isolate_depth = isolate_depth.saturating_add(1);
        }
        if !kept(resolved, levels, i) {
            continue;
        }
        match open {
            Some((start, _, depth)) if levels[i] == levels[start] => {
                open = Some((start, i, depth));
            }
            Some((start, last, depth)) => {
                push_run(&mut list, resolved, levels, start, last, depth);
                open = Some((i, i, depth_here));
            }
            None => {
                open = Some((i, i, depth_here));
            }
        }
    }
    if let Some((start, last, depth)) = open {
        push_run(&mut list, resolved, levels, start, last, depth);
    }

    // Mark runs whose trailing gap contains an isolate initiator that
    // never finds its PDI.
    let mut cursor = list.first();
    while cursor != SENTINEL {
        let run = list.runs[cursor];
        let gap_start = run.start + run.len;
        let gap_end = if run.next == SENTINEL {
            n
        } else {
            list.runs[run.next].start
        };
        let orphan = (gap_start..gap_end)
            .any(|i| original[i].is_isolate_initiator() && matching_pdi[i].is_none());
        list.runs[cursor].ends_unmatched_isolate = orphan;
        cursor = run.next;
    }

    // Isolate links. The matching PDI of a valid initiator always begins
    // a run at the initiator's own level and isolate depth; an initiator
    // that overflowed never ends up last in its run with a run boundary
    // at its PDI, so no link forms for it.
    let mut cursor = list.first();
    while cursor != SENTINEL {
        let run = list.runs[cursor];
        let last = run.start + run.len - 1;
        if original[last].is_isolate_initiator() {
            if let Some(pdi) = matching_pdi[last] {
                if let Some(target) = list.run_starting_at(pdi) {
                    if target != cursor && list.runs[target].prev_isolate == SENTINEL {
                        debug_assert_eq!(list.runs[target].level, run.level);
                        debug_assert_eq!(list.runs[target].isolate_level, run.isolate_level);
                        list.runs[cursor].next_isolate = target;
                        list.runs[target].prev_isolate = cursor;
                    }
                }
            }
        }
        cursor = run.next;
    }

    Ok(list)
}

fn push_run(
    list: &mut RunList,
    resolved: &[BidiType],
    levels: &[Level],
    start: usize,
    last: usize,
    isolate_level: u8,
) {
    list.push_back(Run {
        start,
        len: last - start + 1,
        kind: resolved[start],
        level: levels[start],
        isolate_level,
        ends_unmatched_isolate: false,
        next: SENTINEL,
        prev: SENTINEL,
        next_isolate: SENTINEL,
        prev_isolate: SENTINEL,
    });
}

/// An isolating run sequence: the chain of same-level runs connected
/// across isolate boundaries, with its boundary context.
pub(crate) struct IsolatingRunSequence {
    /// Positions of the sequence's kept characters, in logical order.
    pub indices: Vec<usize>,
    pub level: Level,
    /// Start-of-sequence type: L or R.
    pub sos: BidiType,
    /// End-of-sequence type: L or R.
    pub eos: BidiType,
}

fn type_of_level(level: Level) -> BidiType {
    if level & 1 == 0 {
        BidiType::L
    } else {
        BidiType::R
    }
}

/// X10: gather every isolating run sequence with its sos/eos context.
pub(crate) fn build_sequences(
    original: &[BidiType],
    resolved: &[BidiType],
    levels: &[Level],
    matching_pdi: &[Option<usize>],
    base_level: Level,
) -> Result<Vec<IsolatingRunSequence>, BidiError> {
    let list = build_run_list(original, resolved, levels, matching_pdi)?;

    let mut sequences = Vec::new();
    sequences.try_reserve_exact(list.runs.len() - 1)?;

    let mut head = list.first();
    while head != SENTINEL {
        // A run reached through an isolate link belongs to the sequence
        // of its initiator, not to a sequence of its own.
        if list.runs[head].prev_isolate != SENTINEL {
            head = list.runs[head].next;
            continue;
        }

        let level = list.runs[head].level;
        let mut count = 0;
        let mut tail = head;
        let mut cursor = head;
        while cursor != SENTINEL {
            count += list.runs[cursor].len;
            tail = cursor;
            cursor = list.runs[cursor].next_isolate;
        }

        let mut indices = Vec::new();
        indices.try_reserve_exact(count)?;
        let mut cursor = head;
        while cursor != SENTINEL {
            let run = list.runs[cursor];
            for i in run.start..run.start + run.len {
                if kept(resolved, levels, i) {
                    indices.push(i);
                }
            }
            cursor = run.next_isolate;
        }

        // sos compares against the run before the chain's first run; eos
        // against the run after its last, or the paragraph level when the
        // chain ends at the paragraph or at an unmatched initiator.
        let prev_level = match list.runs[head].prev {
            SENTINEL => base_level,
            prev => list.runs[prev].level,
        };
        let tail_run = list.runs[tail];
        let next_level = if tail_run.ends_unmatched_isolate || tail_run.next == SENTINEL {
            base_level
        } else {
            list.runs[tail_run.next].level
        };

        sequences.push(IsolatingRunSequence {
            indices,
            level,
            sos: type_of_level(level.max(prev_level)),
            eos: type_of_level(level.max(next_level)),
        });
        head = list.runs[head].next;
    }

    log::trace!(
        "isolating run sequences: {} runs, {} sequences",
        list.runs.len() - 1,
        sequences.len()
    );
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explicit::{match_isolates, resolve_explicit};
    use BidiType::*;

    fn prepare(types: &[BidiType], base_level: Level) -> (Vec<BidiType>, Vec<Level>, Vec<Option<usize>>) {
        let matching = match_isolates(types).unwrap();
        let mut resolved = types.to_vec();
        let mut levels = vec![0; types.len()];
        resolve_explicit(types, &matching, base_level, &mut resolved, &mut levels);
        (resolved, levels, matching)
    }

    fn sequences_for(types: &[BidiType], base_level: Level) -> Vec<IsolatingRunSequence> {
        let (resolved, levels, matching) = prepare(types, base_level);
        build_sequences(types, &resolved, &levels, &matching, base_level).unwrap()
    }

    #[test]
    fn arena_runs_and_isolate_links() {
        let types = [L, LRI, R, PDI, L];
        let (resolved, levels, matching) = prepare(&types, 0);
        let list = build_run_list(&types, &resolved, &levels, &matching).unwrap();

        assert_eq!(list.runs.len(), 4); // sentinel + three runs

        let first = list.first();
        let r1 = list.runs[first];
        assert_eq!((r1.start, r1.len, r1.level), (0, 2, 0));
        assert_eq!(r1.kind, L);
        assert_eq!(r1.isolate_level, 0);

        let r2 = list.runs[r1.next];
        assert_eq!((r2.start, r2.len, r2.level), (2, 1, 2));
        assert_eq!(r2.kind, R);
        assert_eq!(r2.isolate_level, 1);

        let r3 = list.runs[r2.next];
        assert_eq!((r3.start, r3.len, r3.level), (3, 2, 0));
        assert_eq!(r3.kind, PDI);
        assert_eq!(r3.isolate_level, 0);

        // The initiator run chains to the PDI run.
        assert_eq!(r1.next_isolate, r2.next);
        assert_eq!(r3.prev_isolate, first);
        assert_eq!(r2.next_isolate, SENTINEL);

        // The sentinel closes the list at both ends.
        assert_eq!(r3.next, SENTINEL);
        assert_eq!(list.runs[SENTINEL].next, first);
        assert_eq!(list.runs[SENTINEL].prev, r2.next);
    }

    #[test]
    fn single_run_for_uniform_text() {
        let seqs = sequences_for(&[L, L, WS, L], 0);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].indices, vec![0, 1, 2, 3]);
        assert_eq!(seqs[0].level, 0);
        assert_eq!(seqs[0].sos, L);
        assert_eq!(seqs[0].eos, L);
    }

    #[test]
    fn removed_characters_do_not_split_runs() {
        // The LRE/PDF pair collapses to nothing at level 0.
        let seqs = sequences_for(&[L, LRE, PDF, L], 0);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].indices, vec![0, 3]);
    }

    #[test]
    fn embedded_run_has_strong_boundaries() {
        let seqs = sequences_for(&[L, RLE, R, PDF, L], 0);
        // A level 1 run between two level 0 runs.
        assert_eq!(seqs.len(), 3);
        let inner = seqs.iter().find(|s| s.level == 1).unwrap();
        assert_eq!(inner.indices, vec![2]);
        assert_eq!(inner.sos, R);
        assert_eq!(inner.eos, R);
    }

    #[test]
    fn isolate_chains_across_interior() {
        // The outer level-0 characters and the isolate brackets form one
        // sequence; the interior R is its own.
        let seqs = sequences_for(&[L, LRI, R, PDI, L], 0);
        assert_eq!(seqs.len(), 2);
        let outer = seqs.iter().find(|s| s.level == 0).unwrap();
        assert_eq!(outer.indices, vec![0, 1, 3, 4]);
        let inner = seqs.iter().find(|s| s.level == 2).unwrap();
        assert_eq!(inner.indices, vec![2]);
    }

    #[test]
    fn unmatched_initiator_ends_sequence_at_paragraph_level() {
        // The RLI never finds a PDI (and is removed); the level-0 run's
        // eos must compare against the paragraph level, not the orphan
        // interior.
        let seqs = sequences_for(&[L, RLI, R], 0);
        let outer = seqs.iter().find(|s| s.level == 0).unwrap();
        assert_eq!(outer.indices, vec![0]);
        assert_eq!(outer.eos, L);
    }

    #[test]
    fn empty_isolate_shares_one_run() {
        // LRI directly followed by its PDI: both sit in the same level
        // run, no isolate link needed.
        let seqs = sequences_for(&[L, LRI, PDI, L], 0);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].indices, vec![0, 1, 2, 3]);
    }
}
