//! Implicit level resolution (rules I1-I2).

use crate::types::{is_removed_level, BidiType, Level, MAX_EXPLICIT_LEVEL};

/// Bump each character's level by the parity rules: on even levels R goes
/// up one and numbers go up two; on odd levels L and numbers go up one.
/// Characters removed by X9 are skipped and backfilled by the caller.
pub(crate) fn resolve_implicit(resolved: &[BidiType], levels: &mut [Level]) {
    for (i, level) in levels.iter_mut().enumerate() {
        if is_removed_level(*level) {
            continue;
        }
        let bump: Level = if *level & 1 == 0 {
            match resolved[i] {
                BidiType::R => 1,
                BidiType::AN | BidiType::EN => 2,
                _ => 0,
            }
        } else {
            match resolved[i] {
                BidiType::L | BidiType::AN | BidiType::EN => 1,
                _ => 0,
            }
        };
        // At the top of the explicit range the bump would leave the valid
        // levels; keep the run's own level there.
        if *level + bump <= MAX_EXPLICIT_LEVEL {
            *level += bump;
        }
    }
}
