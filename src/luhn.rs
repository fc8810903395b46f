// 🔢 Luhn Checksum - check digit computation and validation
//
// Pure functions, no state. Inputs are expected to be ASCII digits; callers
// validate at the boundary (see `card::validate_bin`).

/// Compute the Luhn check digit for `digits` (the number WITHOUT its check digit).
///
/// Walks right-to-left doubling the 1st, 3rd, 5th... digit, since in the final
/// number the rightmost payload digit sits one position left of the check digit.
pub fn compute_check_digit(digits: &str) -> char {
    let sum = luhn_sum(digits, true);
    let check = (10 - (sum % 10)) % 10;
    char::from(b'0' + check as u8)
}

/// Validate a complete number (check digit included).
///
/// Returns `false` for empty input or anything containing a non-digit.
pub fn is_valid(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    luhn_sum(number, false) % 10 == 0
}

fn luhn_sum(digits: &str, double_first: bool) -> u32 {
    let mut total = 0;
    let mut should_double = double_first;

    for c in digits.chars().rev() {
        let mut n = c.to_digit(10).unwrap_or(0);

        if should_double {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }

        total += n;
        should_double = !should_double;
    }

    total
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_check_digits() {
        // 7992739871 -> 3 is the textbook example
        assert_eq!(compute_check_digit("7992739871"), '3');
        assert_eq!(compute_check_digit("411111111111111"), '1');
        assert_eq!(compute_check_digit("37828224631000"), '5');
    }

    #[test]
    fn test_known_valid_numbers() {
        assert!(is_valid("79927398713"));
        assert!(is_valid("4111111111111111"));
        assert!(is_valid("378282246310005"));
        assert!(is_valid("5555555555554444"));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(!is_valid("79927398710"));
        assert!(!is_valid("4111111111111112"));
    }

    #[test]
    fn test_non_digit_input_rejected() {
        assert!(!is_valid(""));
        assert!(!is_valid("4111 1111 1111 1111"));
        assert!(!is_valid("41111111111111a1"));
    }

    #[test]
    fn test_single_digit_payload() {
        // "0" + check digit must validate
        let check = compute_check_digit("0");
        assert_eq!(check, '0');
        assert!(is_valid("00"));
    }

    proptest! {
        #[test]
        fn appended_check_digit_always_validates(payload in "[0-9]{1,18}") {
            let check = compute_check_digit(&payload);
            let full = format!("{}{}", payload, check);
            prop_assert!(is_valid(&full));
        }

        #[test]
        fn check_digit_is_deterministic(payload in "[0-9]{1,18}") {
            prop_assert_eq!(compute_check_digit(&payload), compute_check_digit(&payload));
        }

        #[test]
        fn wrong_check_digit_never_validates(payload in "[0-9]{1,18}", delta in 1u8..10) {
            let check = compute_check_digit(&payload).to_digit(10).unwrap() as u8;
            let wrong = (check + delta) % 10;
            let full = format!("{}{}", payload, wrong);
            prop_assert!(!is_valid(&full));
        }
    }
}
