// 🎲 Digit Sequence Model - first-order Markov chain over decimal digits
//
// Static configuration: row = previous digit, column = next digit.
// Rows are near-uniform with a slight bias so generated segments don't look
// like a flat uniform draw.

use rand::Rng;

/// Row-stochastic transition matrix (each row sums to 1.0).
pub const TRANSITION_MATRIX: [[f64; 10]; 10] = [
    [0.08, 0.11, 0.12, 0.10, 0.09, 0.11, 0.08, 0.10, 0.11, 0.10],
    [0.10, 0.08, 0.11, 0.12, 0.09, 0.10, 0.11, 0.09, 0.10, 0.10],
    [0.11, 0.10, 0.08, 0.11, 0.12, 0.09, 0.10, 0.11, 0.09, 0.09],
    [0.09, 0.11, 0.10, 0.08, 0.11, 0.12, 0.09, 0.10, 0.11, 0.09],
    [0.10, 0.09, 0.11, 0.10, 0.08, 0.11, 0.12, 0.09, 0.10, 0.10],
    [0.11, 0.10, 0.09, 0.11, 0.10, 0.08, 0.11, 0.12, 0.09, 0.09],
    [0.09, 0.11, 0.10, 0.09, 0.11, 0.10, 0.08, 0.11, 0.12, 0.09],
    [0.10, 0.09, 0.11, 0.10, 0.09, 0.11, 0.10, 0.08, 0.11, 0.11],
    [0.11, 0.10, 0.09, 0.11, 0.10, 0.09, 0.11, 0.10, 0.08, 0.11],
    [0.10, 0.11, 0.10, 0.09, 0.11, 0.10, 0.09, 0.11, 0.10, 0.09],
];

/// Draw the digit that follows `preceding`.
///
/// Only the last character conditions the draw. An empty sequence (or a
/// trailing non-digit) gets a uniform draw over 0-9.
pub fn next_digit<R: Rng + ?Sized>(preceding: &str, rng: &mut R) -> u8 {
    let last = preceding.chars().last().and_then(|c| c.to_digit(10));

    match last {
        Some(row) => sample_row(&TRANSITION_MATRIX[row as usize], rng.gen::<f64>()),
        None => rng.gen_range(0..10),
    }
}

/// Inverse-CDF lookup: first column whose cumulative mass exceeds `u`.
/// Falls back to 0 if float accumulation never gets past `u`.
pub(crate) fn sample_row(row: &[f64; 10], u: f64) -> u8 {
    let mut cumulative = 0.0;

    for (digit, p) in row.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return digit as u8;
        }
    }

    0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rows_are_stochastic() {
        for (i, row) in TRANSITION_MATRIX.iter().enumerate() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", i, sum);
        }
    }

    #[test]
    fn test_empty_sequence_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 10];

        for _ in 0..1000 {
            let d = next_digit("", &mut rng);
            assert!(d <= 9);
            seen[d as usize] = true;
        }

        assert!(seen.iter().all(|s| *s), "uniform draw should hit every digit");
    }

    #[test]
    fn test_sample_row_boundaries() {
        let row = &TRANSITION_MATRIX[0];
        assert_eq!(sample_row(row, 0.0), 0);
        assert_eq!(sample_row(row, 0.079), 0);
        assert_eq!(sample_row(row, 0.08), 1);
        assert_eq!(sample_row(row, 0.999), 9);
    }

    #[test]
    fn test_rounding_fallthrough_defaults_to_zero() {
        let short = [0.1; 10];
        // ten 0.1 steps accumulate to just under 1.0
        assert_eq!(sample_row(&short, 1.0), 0);
        let starved = [0.0; 10];
        assert_eq!(sample_row(&starved, 0.5), 0);
    }

    #[test]
    fn test_conditioned_frequencies_match_row() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 100_000;

        for prev in ["3", "12", "9998"] {
            let row_index = prev.chars().last().unwrap().to_digit(10).unwrap() as usize;
            let mut counts = [0usize; 10];

            for _ in 0..trials {
                counts[next_digit(prev, &mut rng) as usize] += 1;
            }

            for (digit, count) in counts.iter().enumerate() {
                let observed = *count as f64 / trials as f64;
                let expected = TRANSITION_MATRIX[row_index][digit];
                assert!(
                    (observed - expected).abs() < 0.01,
                    "prev={} digit={} observed={:.4} expected={:.2}",
                    prev,
                    digit,
                    observed,
                    expected
                );
            }
        }
    }
}
