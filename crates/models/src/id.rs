//! Record identifiers: milliseconds since the Unix epoch at creation.
//!
//! Within one process ids are strictly increasing, so two records created in
//! the same millisecond still get distinct ids. Nothing prevents a collision
//! with ids written by another process sharing the same store file.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

pub fn next_id() -> i64 {
    next_id_at(Utc::now().timestamp_millis())
}

fn next_id_at(now_ms: i64) -> i64 {
    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now_ms.max(prev + 1);
        match LAST_ID.compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(actual) => prev = actual,
        }
    }
}
