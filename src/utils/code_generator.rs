//! Short code generation and validation utilities.
//!
//! Provides cryptographically secure random code generation, a deterministic
//! timestamp-based fallback for the pathological all-collisions case, and
//! validation for custom user-provided codes.

use crate::error::AppError;
use serde_json::json;

/// The 64-character code alphabet: lowercase, uppercase, digits, `_`, `-`.
///
/// Exactly 64 entries so a random byte maps uniformly via `byte % 64`
/// (256 / 64 = 4). Changing the alphabet to a size that does not divide 256
/// would require rejection sampling to stay unbiased.
pub const CODE_ALPHABET: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Minimum accepted short code length.
pub const MIN_CODE_LENGTH: usize = 4;

/// Maximum accepted short code length.
pub const MAX_CODE_LENGTH: usize = 10;

/// Code length used when the caller does not request one.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// How many random candidates are tried before falling back to
/// [`fallback_code`].
pub const MAX_GENERATE_ATTEMPTS: usize = 50;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a random short code of `length` characters.
///
/// Draws `length` independent bytes from the OS entropy source and maps each
/// onto [`CODE_ALPHABET`].
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
///
/// # Examples
///
/// ```ignore
/// let code = random_code(6);
/// assert_eq!(code.len(), 6);
/// ```
pub fn random_code(length: usize) -> String {
    let mut buffer = vec![0u8; length];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    buffer
        .into_iter()
        .map(|b| CODE_ALPHABET[(b % 64) as usize] as char)
        .collect()
}

/// Builds the fallback code used when every random candidate collided.
///
/// Concatenates the current UNIX timestamp (milliseconds, base-36) with six
/// random base-36 characters, then keeps the last `max(length, 8)` characters.
/// Keeping the suffix preserves the fastest-changing timestamp digits, so two
/// fallback invocations in the same process almost never agree. The random
/// characters come from the same OS entropy source as [`random_code`].
pub fn fallback_code(length: usize) -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut code = to_base36(millis);

    for _ in 0..6 {
        code.push(random_base36_digit() as char);
    }

    let target = length.max(8);
    while code.len() < target {
        code.push(random_base36_digit() as char);
    }

    let start = code.len() - target;
    code.split_off(start)
}

/// Draws one base-36 digit from the OS entropy source.
///
/// 256 is not a multiple of 36, so bytes >= 252 are rejection-sampled to
/// keep the mapping unbiased.
fn random_base36_digit() -> u8 {
    loop {
        let mut byte = [0u8; 1];
        getrandom::fill(&mut byte).expect("Failed to generate random bytes");
        if byte[0] < 252 {
            return BASE36_DIGITS[(byte[0] % 36) as usize];
        }
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();

    String::from_utf8(digits).expect("base36 digits are ASCII")
}

/// Reserved codes that cannot be used as short links.
///
/// These codes are reserved for system endpoints to prevent routing conflicts.
const RESERVED_CODES: &[&str] = &["api", "health", "stats", "shorten", "admin"];

/// Validates a short code (custom or generated) against the format rules.
///
/// # Rules
///
/// - Length: 4-10 characters
/// - Allowed characters: letters, digits, underscore, hyphen
/// - Cannot be a reserved system code
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_code("promo-24").is_ok());
/// assert!(validate_code("ab").is_err());        // too short
/// assert!(validate_code("my code").is_err());   // space
/// assert!(validate_code("health").is_err());    // reserved
/// ```
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Short code must be 4-10 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return Err(AppError::bad_request(
            "Short code can only contain letters, digits, underscores, and hyphens",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
