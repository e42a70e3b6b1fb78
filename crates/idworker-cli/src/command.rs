use core::time::Duration;
use std::{
    io::{self, BufWriter, Write},
    thread,
    time::Instant,
};

use idworker::{IdWorkerId, LockIdGenerator, SnowflakeId, SystemClock, WorkerConfig};
use tracing::{info, warn};

/// Generates `count` IDs across `threads` threads sharing one generator and
/// writes them to `out` in issue order.
pub fn generate<W: Write>(
    worker: WorkerConfig<IdWorkerId>,
    epoch: Duration,
    count: usize,
    threads: usize,
    out: Option<W>,
) -> anyhow::Result<()> {
    let generator = LockIdGenerator::new(worker, SystemClock::with_epoch(epoch));
    let threads = threads.clamp(1, count.max(1));
    let per_thread = count / threads;
    let remainder = count % threads;

    let start = Instant::now();
    let mut ids: Vec<IdWorkerId> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let generator = &generator;
                let n = per_thread + usize::from(i < remainder);
                s.spawn(move || (0..n).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });
    let elapsed = start.elapsed();

    info!(
        count = ids.len(),
        threads,
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        "generated ids"
    );

    if let Some(out) = out {
        // Per-generator IDs are strictly increasing, so sorting restores the
        // order they were issued in.
        ids.sort_unstable();
        let mut out = BufWriter::new(out);
        for id in &ids {
            writeln!(out, "{id}")?;
        }
        out.flush()?;
    }

    Ok(())
}

/// Writes the fields packed into each raw ID.
pub fn decode<W: Write>(ids: &[u64], epoch: Duration, out: W) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    for &raw in ids {
        if raw >> 63 != 0 {
            warn!(raw, "reserved bit is set, decoding the remaining fields");
        }
        let id = IdWorkerId::from_raw(raw);
        writeln!(out, "id:            {raw}")?;
        writeln!(out, "timestamp:     {}", id.timestamp())?;
        writeln!(out, "unix_millis:   {}", id.to_unix_millis(epoch))?;
        writeln!(out, "datacenter_id: {}", id.datacenter_id())?;
        writeln!(out, "worker_id:     {}", id.worker_id())?;
        writeln!(out, "sequence:      {}", id.sequence())?;
        writeln!(out)?;
    }
    out.flush()
}
