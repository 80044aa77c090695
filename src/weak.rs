//! Weak type resolution (rules W1-W7).
//!
//! Each sub-rule is one left-to-right pass over an isolating run
//! sequence's kept characters, in rule order. The scan state of each pass
//! (previous type, last strong type) starts from the sequence's sos
//! boundary and never leaks across sequences.

use crate::runs::IsolatingRunSequence;
use crate::types::BidiType;

pub(crate) fn resolve_weak(resolved: &mut [BidiType], seq: &IsolatingRunSequence) {
    let idx = &seq.indices;
    if idx.is_empty() {
        return;
    }

    // W1: NSM takes the type of the previous character; after an isolate
    // formatting character it becomes ON, at the start of the sequence it
    // takes sos.
    let mut prev = seq.sos;
    for &i in idx {
        if resolved[i] == BidiType::NSM {
            resolved[i] = match prev {
                BidiType::LRI | BidiType::RLI | BidiType::FSI | BidiType::PDI => BidiType::ON,
                other => other,
            };
        }
        prev = resolved[i];
    }

    // W2: EN becomes AN when the nearest preceding strong type is AL.
    let mut last_strong = seq.sos;
    for &i in idx {
        match resolved[i] {
            BidiType::L | BidiType::R | BidiType::AL => last_strong = resolved[i],
            BidiType::EN if last_strong == BidiType::AL => resolved[i] = BidiType::AN,
            _ => {}
        }
    }

    // W3: AL becomes R.
    for &i in idx {
        if resolved[i] == BidiType::AL {
            resolved[i] = BidiType::R;
        }
    }

    // W4: a single ES between two EN becomes EN; a single CS between two
    // numbers of the same kind becomes that kind.
    for w in 1..idx.len().saturating_sub(1) {
        let (before, here, after) = (resolved[idx[w - 1]], resolved[idx[w]], resolved[idx[w + 1]]);
        match here {
            BidiType::ES if before == BidiType::EN && after == BidiType::EN => {
                resolved[idx[w]] = BidiType::EN;
            }
            BidiType::CS if before == BidiType::EN && after == BidiType::EN => {
                resolved[idx[w]] = BidiType::EN;
            }
            BidiType::CS if before == BidiType::AN && after == BidiType::AN => {
                resolved[idx[w]] = BidiType::AN;
            }
            _ => {}
        }
    }

    // W5: a run of ET adjacent to EN becomes EN.
    let mut w = 0;
    while w < idx.len() {
        if resolved[idx[w]] == BidiType::ET {
            let run_start = w;
            while w < idx.len() && resolved[idx[w]] == BidiType::ET {
                w += 1;
            }
            let en_before = run_start > 0 && resolved[idx[run_start - 1]] == BidiType::EN;
            let en_after = w < idx.len() && resolved[idx[w]] == BidiType::EN;
            if en_before || en_after {
                for &i in &idx[run_start..w] {
                    resolved[i] = BidiType::EN;
                }
            }
        } else {
            w += 1;
        }
    }

    // W6: remaining separators and terminators become ON.
    for &i in idx {
        if matches!(resolved[i], BidiType::ES | BidiType::ET | BidiType::CS) {
            resolved[i] = BidiType::ON;
        }
    }

    // W7: EN becomes L when the nearest preceding strong type is L.
    let mut last_strong = seq.sos;
    for &i in idx {
        match resolved[i] {
            BidiType::L | BidiType::R => last_strong = resolved[i],
            BidiType::EN if last_strong == BidiType::L => resolved[i] = BidiType::L,
            _ => {}
        }
    }
}
