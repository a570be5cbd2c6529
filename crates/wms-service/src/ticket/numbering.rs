//! Ticket number generation.
//!
//! Staff tickets read `TK-YYYYMMDD-XXXXX`; customer portal requests read
//! `SR-{unix millis}-XXXXX`. The suffix is five uppercase alphanumerics
//! drawn from a random UUID.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 5;

/// Where a ticket was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOrigin {
    /// Opened by a staff member.
    Staff,
    /// Submitted through the customer portal.
    Portal,
}

impl TicketOrigin {
    /// Generate a fresh ticket number for this origin.
    pub fn next_number(&self) -> String {
        self.number_at(Utc::now(), Uuid::new_v4())
    }

    /// Build the ticket number for `now`, taking the suffix from `seed`.
    pub fn number_at(&self, now: DateTime<Utc>, seed: Uuid) -> String {
        let suffix = suffix(seed);
        match self {
            Self::Staff => format!("TK-{}-{suffix}", now.format("%Y%m%d")),
            Self::Portal => format!("SR-{}-{suffix}", now.timestamp_millis()),
        }
    }
}

fn suffix(seed: Uuid) -> String {
    seed.as_bytes()
        .iter()
        .take(SUFFIX_LEN)
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn staff_numbers_carry_the_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();
        let number = TicketOrigin::Staff.number_at(now, Uuid::nil());
        assert_eq!(number, "TK-20240307-AAAAA");
    }

    #[test]
    fn portal_numbers_carry_millis() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap();
        let number = TicketOrigin::Portal.number_at(now, Uuid::nil());
        assert_eq!(number, format!("SR-{}-AAAAA", now.timestamp_millis()));
    }

    #[test]
    fn suffix_is_uppercase_alphanumeric() {
        for _ in 0..50 {
            let number = TicketOrigin::Staff.next_number();
            let suffix = number.rsplit('-').next().unwrap();
            assert_eq!(suffix.len(), SUFFIX_LEN);
            assert!(suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}
