//! External codes for enrollments and payments.
//!
//! Codes look like `ENR-1718000000000-K3J9QX2LM`: a prefix, the creation time
//! in milliseconds, and a 9 character base36 suffix. Collisions are not
//! retried; the unique index on the column is the only guard.

use rand::Rng;

pub const ENROLLMENT_PREFIX: &str = "ENR";
pub const PAYMENT_PREFIX: &str = "PAY";

const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[must_use]
pub fn generate(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();

    format!("{prefix}-{millis}-{suffix}")
}

#[must_use]
pub fn enrollment_code() -> String {
    generate(ENROLLMENT_PREFIX)
}

#[must_use]
pub fn payment_code() -> String {
    generate(PAYMENT_PREFIX)
}
