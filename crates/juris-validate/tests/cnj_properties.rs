//! Property tests for the check-digit arithmetic.

use juris_validate::cnj::{assemble, check_digits, is_valid};
use proptest::prelude::*;

fn body_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(0u8..10, 18)
        .prop_map(|digits| digits.iter().map(|d| (b'0' + d) as char).collect())
}

proptest! {
    /// Appending a body's own check pair always yields a valid number.
    #[test]
    fn assembled_numbers_validate(body in body_strategy()) {
        let check = check_digits(&body).expect("18-digit body");
        prop_assert!(is_valid(&assemble(&body, &check)));
    }

    /// Flipping any single body digit breaks validation: across the full
    /// weight cycle, no single-digit perturbation collides.
    #[test]
    fn single_digit_perturbation_invalidates(
        body in body_strategy(),
        position in 0usize..18,
        delta in 1u8..10,
    ) {
        let check = check_digits(&body).expect("18-digit body");

        let mut flipped: Vec<u8> = body.bytes().collect();
        flipped[position] = b'0' + ((flipped[position] - b'0') + delta) % 10;
        let flipped = String::from_utf8(flipped).unwrap();
        prop_assume!(flipped != body);

        prop_assert!(!is_valid(&assemble(&flipped, &check)));
    }

    /// The check pair is always two digits, zero-padded.
    #[test]
    fn check_pair_is_two_digits(body in body_strategy()) {
        let check = check_digits(&body).expect("18-digit body");
        prop_assert_eq!(check.len(), 2);
        prop_assert!(check.bytes().all(|b| b.is_ascii_digit()));
    }
}
