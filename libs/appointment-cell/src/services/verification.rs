// libs/appointment-cell/src/services/verification.rs
use chrono::{DateTime, Utc};
use rand::Rng;

pub const CODE_LENGTH: usize = 8;

/// How long a code stays fresh after the appointment record was last
/// touched. Measured in milliseconds to keep the boundary exact.
pub const CODE_TTL_MS: i64 = 120_000;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An 8-character code drawn uniformly from digits and uppercase letters.
/// No collision avoidance: codes are short-lived and scoped to a single
/// appointment record.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();

    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// True when the elapsed time between issuance and `now` exceeds the TTL.
/// The difference is taken as an absolute value so a slightly-ahead client
/// clock does not produce a negative window.
pub fn is_expired(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let elapsed_ms = (now - issued_at).num_milliseconds().abs();
    elapsed_ms > CODE_TTL_MS
}
