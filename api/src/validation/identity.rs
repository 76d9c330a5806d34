//! National identity number (CPF) validation
//!
//! A CPF is 11 digits: 9 base digits followed by two check digits. Each check
//! digit is derived from a descending-weight sum over the digits before it,
//! reduced modulo 11. Remainders below 2 map to a check digit of 0.

use serde::Serialize;

/// Number of digits in a well-formed identity number
pub const IDENTITY_NUMBER_LENGTH: usize = 11;

/// Number of leading digits the check digits are computed from
const BASE_DIGITS: usize = 9;

/// Keep only ASCII digits, in their original order
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn check_digit(digits: &[u8], top_weight: u32) -> u8 {
    let total: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| u32::from(*d) * (top_weight - i as u32))
        .sum();
    let remainder = total % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

/// Expected check digits for 9 leading digits (each 0-9).
///
/// The second digit is computed over the 9 base digits plus the first check
/// digit.
pub fn check_digits(base: &[u8; BASE_DIGITS]) -> (u8, u8) {
    let first = check_digit(base, 10);

    let mut extended = [0u8; BASE_DIGITS + 1];
    extended[..BASE_DIGITS].copy_from_slice(base);
    extended[BASE_DIGITS] = first;
    let second = check_digit(&extended, 11);

    (first, second)
}

/// Whether `raw` is a structurally valid identity number.
///
/// Formatting characters are ignored. Inputs that do not reduce to exactly 11
/// digits are invalid. Repeated-digit numbers such as `11111111111` satisfy the
/// check digits and are accepted.
pub fn is_valid_identity_number(raw: &str) -> bool {
    let digits: Vec<u8> = raw
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.len() != IDENTITY_NUMBER_LENGTH {
        return false;
    }

    let expected_first = check_digit(&digits[..BASE_DIGITS], 10);
    let expected_second = check_digit(&digits[..BASE_DIGITS + 1], 11);

    digits[9] == expected_first && digits[10] == expected_second
}

/// An identity number that passed [`is_valid_identity_number`]: digits only,
/// exactly 11 long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IdentityNumber(String);

impl IdentityNumber {
    /// Strip formatting and validate. `None` when the check digits do not match.
    pub fn parse(raw: &str) -> Option<Self> {
        if is_valid_identity_number(raw) {
            Some(Self(strip_non_digits(raw)))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for IdentityNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
