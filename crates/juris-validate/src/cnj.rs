//! CNJ process-number check-digit arithmetic.
//!
//! The canonical 20-digit number is laid out as
//! `sequential(7) + check(2) + year(4) + segment(1) + tribunal(2) + origin(4)`.
//! The check pair is computed over the other 18 digits in that concatenation
//! order. Pure functions, no I/O.

/// Number of digits in a canonical process number.
pub const CNJ_LEN: usize = 20;

/// Cyclic weights applied left to right over the 18 non-check digits.
const WEIGHTS: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

/// Strips every non-digit character.
pub fn canonical_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Computes the 2-digit check pair for an 18-digit body
/// (`sequential + year + segment + tribunal + origin`).
///
/// Returns `None` when the input is not exactly 18 digits.
pub fn check_digits(body: &str) -> Option<String> {
    if body.len() != 18 || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = body
        .bytes()
        .zip(WEIGHTS.iter().cycle())
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();

    let check = 98 - (sum % 97);
    Some(format!("{check:02}"))
}

/// Validates a full process number.
///
/// Any input whose digit-only form is not exactly 20 digits is invalid; the
/// stored check pair (positions 8–9) must match the recomputed value.
pub fn is_valid(full: &str) -> bool {
    let digits = canonical_digits(full);
    if digits.len() != CNJ_LEN {
        return false;
    }

    let stored = &digits[7..9];
    match check_digits(&body_of(&digits)) {
        Some(check) => check == stored,
        None => false,
    }
}

/// The 18 non-check digits of a canonical 20-digit number, in checksum order.
pub fn body_of(digits: &str) -> String {
    format!("{}{}", &digits[..7], &digits[9..])
}

/// Rebuilds a canonical number from an 18-digit body and its check pair.
pub fn assemble(body: &str, check: &str) -> String {
    format!("{}{}{}", &body[..7], check, &body[7..])
}

/// Renders a canonical 20-digit number as `NNNNNNN-DD.AAAA.J.TR.OOOO`.
///
/// Non-canonical input is returned unchanged.
pub fn format_cnj(value: &str) -> String {
    let digits = canonical_digits(value);
    if digits.len() != CNJ_LEN {
        return value.to_string();
    }
    format!(
        "{}-{}.{}.{}.{}.{}",
        &digits[..7],
        &digits[7..9],
        &digits[9..13],
        &digits[13..14],
        &digits[14..16],
        &digits[16..20]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A body with its check pair appended through `assemble`.
    fn valid_cnj(body: &str) -> String {
        assemble(body, &check_digits(body).unwrap())
    }

    #[test]
    fn check_digits_requires_18_digits() {
        assert!(check_digits("123").is_none());
        assert!(check_digits("12345678901234567X").is_none());
        assert!(check_digits("123456789012345678").is_some());
    }

    #[test]
    fn check_digits_is_zero_padded() {
        // Every body maps into 01..=98, two rendered digits always.
        let check = check_digits("000000000000000000").unwrap();
        assert_eq!(check.len(), 2);
        assert_eq!(check, "98");
    }

    #[test]
    fn assembled_number_validates() {
        let cnj = valid_cnj("000123420245010001");
        assert_eq!(cnj.len(), CNJ_LEN);
        assert!(is_valid(&cnj));
    }

    #[test]
    fn validation_accepts_formatted_input() {
        let cnj = valid_cnj("000123420245010001");
        assert!(is_valid(&format_cnj(&cnj)));
    }

    #[test]
    fn wrong_check_pair_is_invalid() {
        let body = "000123420245010001";
        let check: u32 = check_digits(body).unwrap().parse().unwrap();
        let wrong = format!("{:02}", (check % 98) + 1);
        assert!(!is_valid(&assemble(body, &wrong)));
    }

    #[test]
    fn wrong_length_is_invalid() {
        assert!(!is_valid(""));
        assert!(!is_valid("123"));
        assert!(!is_valid("123456789012345678901"));
        assert!(!is_valid("abcdefghijklmnopqrst"));
    }

    #[test]
    fn format_cnj_segments() {
        let cnj = valid_cnj("000123420245010001");
        let pretty = format_cnj(&cnj);
        assert_eq!(pretty.matches(['-', '.']).count(), 5);
        assert_eq!(canonical_digits(&pretty), cnj);
    }
}
