//! # Ticket Identifier Generation
//!
//! Produces the unique, monotonic-enough ticket strings that serve as the
//! sole check-out key.
//!
//! ## Format
//! ```text
//! T-260301-081500-0041-739
//! │  │       │      │    └── subsecond entropy (clock nanos mod 1000)
//! │  │       │      └─────── process-wide sequence (mod 10000)
//! │  │       └────────────── HHMMSS of issue time (UTC)
//! │  └────────────────────── yyMMdd of issue time (UTC)
//! └───────────────────────── fixed prefix
//! ```
//!
//! The timestamp prefix makes tickets sortable by issue time for humans;
//! the sequence makes concurrent issues within one second distinct; the
//! entropy suffix guards against sequence wrap across process restarts.
//! The ledger still verifies uniqueness on insert and retries - collisions
//! are detected, never silently accepted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;

/// Process-wide ticket id generator.
#[derive(Debug, Default)]
pub struct TicketIdGenerator {
    seq: AtomicU64,
}

impl TicketIdGenerator {
    /// Creates a generator starting at sequence zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket string.
    pub fn next(&self) -> String {
        let now = Utc::now();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) % 10_000;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        format!(
            "T-{}-{:04}-{:03}",
            now.format("%y%m%d-%H%M%S"),
            seq,
            nanos % 1000
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ticket_format() {
        let gen = TicketIdGenerator::new();
        let ticket = gen.next();
        assert!(ticket.starts_with("T-"));
        // T-yyMMdd-HHmmss-seqq-nnn
        assert_eq!(ticket.len(), "T-260301-081500-0000-000".len());
    }

    #[test]
    fn test_sequential_tickets_are_distinct() {
        let gen = TicketIdGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(gen.next()), "duplicate ticket issued");
        }
    }
}
