use core::cmp::Ordering;

use tracing::warn;

use crate::{generator::WorkerConfig, id::SnowflakeId};

/// Outcome of applying one clock reading to the last issued ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance<ID> {
    /// Store this ID as the new state and hand it out.
    Issue(ID),
    /// Sequence exhausted; leave the state untouched.
    Exhausted { yield_for: u64 },
}

/// The generation step shared by every generator flavour.
///
/// `last` is `None` until the first ID has been issued. Callers are
/// responsible for making the read of `last` and the store of the issued ID
/// atomic with respect to each other.
#[inline]
pub(crate) fn advance<ID>(last: Option<ID>, now: u64, config: &WorkerConfig<ID>) -> Advance<ID>
where
    ID: SnowflakeId,
{
    let Some(last) = last else {
        return Advance::Issue(config.first_id_at(now));
    };

    let last_ts = last.timestamp();
    match now.cmp(&last_ts) {
        Ordering::Greater => Advance::Issue(last.rollover_to_timestamp(now)),
        Ordering::Equal => {
            if last.has_sequence_room() {
                Advance::Issue(last.increment_sequence())
            } else {
                Advance::Exhausted { yield_for: 1 }
            }
        }
        Ordering::Less => cold_clock_behind(last, now),
    }
}

/// The clock reads earlier than the last issued ID. Keep issuing under the
/// last timestamp instead of moving the state backwards.
#[cold]
#[inline(never)]
fn cold_clock_behind<ID>(last: ID, now: u64) -> Advance<ID>
where
    ID: SnowflakeId,
{
    let last_ts = last.timestamp();
    let behind_ms = last_ts - now;

    warn!(
        now,
        last_timestamp = last_ts,
        behind_ms,
        sequence_exhausted = !last.has_sequence_room(),
        "clock moved backwards, reusing last timestamp"
    );

    if last.has_sequence_room() {
        Advance::Issue(last.increment_sequence())
    } else {
        Advance::Exhausted {
            yield_for: behind_ms + 1,
        }
    }
}
