//! License code generation.
//!
//! Codes look like `ZOLO-30D-h2kQ9xZbT1mA`. The suffix is drawn from the
//! operating system CSPRNG so codes cannot be guessed or enumerated.

use crate::plan::Plan;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Prefix shared by every license code.
pub const CODE_PREFIX: &str = "ZOLO";

/// Length of the random suffix (62^12, roughly 71 bits).
pub const CODE_SUFFIX_LEN: usize = 12;

/// Generates a fresh license code for `plan`.
///
/// Uniqueness is not checked here; the store rejects collisions.
#[must_use]
pub fn generate_code(plan: &Plan) -> String {
    let suffix: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(CODE_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{CODE_PREFIX}-{plan}-{suffix}")
}
