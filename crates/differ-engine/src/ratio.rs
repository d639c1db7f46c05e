// Similarity scoring between two sequences.

use std::collections::HashMap;
use std::hash::Hash;

use differ_core::{DiffError, Similarity};

use crate::aligner::Aligner;

/// `2 * M / (len(a) + len(b))`, `M` being the number of aligned elements.
///
/// Two empty sequences are identical, so `ratio(&[], &[])` is `1.0` rather
/// than `0 / 0`.
pub fn ratio<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * Aligner::new(a, b).matched_len() as f64 / total as f64
}

/// Upper bound on [`ratio`] from the multiset intersection of both sides.
pub fn quick_ratio<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let mut available: HashMap<&T, usize> = HashMap::new();
    for elt in b {
        *available.entry(elt).or_insert(0) += 1;
    }
    let mut matches = 0;
    for elt in a {
        if let Some(n) = available.get_mut(elt) {
            if *n > 0 {
                *n -= 1;
                matches += 1;
            }
        }
    }
    2.0 * matches as f64 / total as f64
}

/// Upper bound on [`ratio`] from the lengths alone.
pub fn real_quick_ratio(len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 1.0;
    }
    2.0 * len_a.min(len_b) as f64 / total as f64
}

/// Reject a score that a [`Similarity`] implementation should never produce.
pub fn checked(value: f64) -> Result<f64, DiffError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DiffError::InvalidRatio(value))
    }
}

/// Character-level [`Similarity`], the scorer used unless the caller plugs in
/// their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharRatio;

impl Similarity for CharRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        ratio(&a, &b)
    }

    fn quick_ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        quick_ratio(&a, &b)
    }

    fn real_quick_ratio(&self, a: &str, b: &str) -> f64 {
        real_quick_ratio(a.chars().count(), b.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "x\n",
        "foo bar\n",
        "foo baz\n",
        "totally different\n",
        "xyz\n",
        "    let x = 1;\n",
        "let x = 1;\n",
        "abcabcabc",
        "cbacbacba",
        "héllo wörld\n",
    ];

    #[test]
    fn identical_inputs_score_one() {
        for s in SAMPLES {
            assert_eq!(CharRatio.ratio(s, s), 1.0, "ratio({:?}, itself)", s);
        }
    }

    #[test]
    fn ratios_stay_in_unit_interval() {
        for a in SAMPLES {
            for b in SAMPLES {
                let r = CharRatio.ratio(a, b);
                assert!((0.0..=1.0).contains(&r), "ratio({:?}, {:?}) = {}", a, b, r);
            }
        }
    }

    #[test]
    fn estimates_never_undercut_ratio() {
        for a in SAMPLES {
            for b in SAMPLES {
                let r = CharRatio.ratio(a, b);
                assert!(CharRatio.quick_ratio(a, b) >= r, "quick_ratio({:?}, {:?})", a, b);
                assert!(CharRatio.real_quick_ratio(a, b) >= r, "real_quick_ratio({:?}, {:?})", a, b);
            }
        }
    }

    #[test]
    fn one_char_change_ratio() {
        let r = CharRatio.ratio("foo bar\n", "foo baz\n");
        assert!((r - 0.875).abs() < 1e-9);
    }

    #[test]
    fn unrelated_lines_score_low() {
        assert!(CharRatio.ratio("totally different\n", "xyz\n") < 0.75);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 'é' and 'ö' are two bytes each; only one char differs in each.
        let r = CharRatio.ratio("héllo\n", "hallo\n");
        assert!((r - 10.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert_eq!(checked(0.5), Ok(0.5));
        assert_eq!(checked(1.5), Err(DiffError::InvalidRatio(1.5)));
        assert!(checked(f64::NAN).is_err());
    }
}
