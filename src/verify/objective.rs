use crate::lp::LpOutcome;

/// How close the reported objective has to be, and where "infinity" starts.
///
/// The stepping-stone solver prices forbidden routes at a large constant instead of
/// removing them, so any total above `infinity` stands for an infeasible plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
    pub infinity: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            infinity: 5_000_000.,
        }
    }
}

impl Tolerance {
    fn is_infinite(&self, value: f64) -> bool {
        value > self.infinity
    }

    fn is_infinite_outcome(&self, outcome: LpOutcome) -> bool {
        match outcome {
            LpOutcome::Optimal(value) => self.is_infinite(value),
            LpOutcome::Infeasible | LpOutcome::Unbounded => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// The reported objective is the optimum.
    Match { found: i64, correct: LpOutcome },
    /// Both sides are past the big-M sentinel, so both agree there is no finite plan.
    BothInfinite { found: i64, correct: LpOutcome },
    Mismatch { found: i64, correct: LpOutcome },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        !matches!(self, Verdict::Mismatch { .. })
    }

    pub fn found(&self) -> i64 {
        match self {
            Verdict::Match { found, .. }
            | Verdict::BothInfinite { found, .. }
            | Verdict::Mismatch { found, .. } => *found,
        }
    }

    pub fn correct(&self) -> LpOutcome {
        match self {
            Verdict::Match { correct, .. }
            | Verdict::BothInfinite { correct, .. }
            | Verdict::Mismatch { correct, .. } => *correct,
        }
    }

    /// Lines printed to stdout for the operator.
    ///
    /// Any verdict note trails the optimum on the `Correct:` line.
    pub fn diagnostics(&self) -> Vec<String> {
        let note = match self {
            Verdict::Match { .. } => None,
            Verdict::BothInfinite { .. } => {
                Some("Both objectives exceed the infeasibility threshold")
            }
            Verdict::Mismatch { .. } => Some("Custom solver did not reach the optimal solution"),
        };
        let correct = match note {
            Some(note) => format!("Correct: {} {}", self.correct(), note),
            None => format!("Correct: {}", self.correct()),
        };
        vec![String::new(), format!("Found: {}", self.found()), correct]
    }
}

pub fn compare(tolerance: &Tolerance, correct: LpOutcome, found: i64) -> Verdict {
    let found_f64 = found as f64;
    if let LpOutcome::Optimal(value) = correct {
        if (value - found_f64).abs() <= tolerance.epsilon {
            return Verdict::Match { found, correct };
        }
    }
    match tolerance.is_infinite_outcome(correct) && tolerance.is_infinite(found_f64) {
        true => Verdict::BothInfinite { found, correct },
        false => Verdict::Mismatch { found, correct },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_optimum_matches() {
        let verdict = compare(&Tolerance::default(), LpOutcome::Optimal(70.), 70);
        assert_eq!(
            verdict,
            Verdict::Match {
                found: 70,
                correct: LpOutcome::Optimal(70.)
            }
        );
        assert!(verdict.is_pass());
        assert_eq!(
            verdict.diagnostics(),
            vec!["".to_owned(), "Found: 70".to_owned(), "Correct: 70".to_owned()]
        );
    }

    #[test]
    fn solver_round_off_is_tolerated() {
        let verdict = compare(&Tolerance::default(), LpOutcome::Optimal(85.000_000_4), 85);
        assert!(verdict.is_pass());
    }

    #[test]
    fn off_by_one_is_a_mismatch() {
        let verdict = compare(&Tolerance::default(), LpOutcome::Optimal(70.), 71);
        assert!(!verdict.is_pass());
        assert_eq!(
            verdict.diagnostics(),
            vec![
                "".to_owned(),
                "Found: 71".to_owned(),
                "Correct: 70 Custom solver did not reach the optimal solution".to_owned(),
            ]
        );
    }

    #[test]
    fn both_above_sentinel_agree_regardless_of_value() {
        let verdict = compare(&Tolerance::default(), LpOutcome::Optimal(10_000_000.), 6_000_000);
        assert!(matches!(verdict, Verdict::BothInfinite { .. }));
        assert!(verdict.is_pass());
        assert_eq!(
            verdict.diagnostics()[2],
            "Correct: 10000000 Both objectives exceed the infeasibility threshold"
        );
    }

    #[test]
    fn only_one_side_above_sentinel_is_a_mismatch() {
        let tolerance = Tolerance::default();
        assert!(!compare(&tolerance, LpOutcome::Optimal(10_000_000.), 100).is_pass());
        assert!(!compare(&tolerance, LpOutcome::Optimal(100.), 6_000_000).is_pass());
    }

    #[test]
    fn sentinel_itself_is_finite() {
        let verdict = compare(&Tolerance::default(), LpOutcome::Optimal(5_000_000.), 5_000_001);
        assert!(!verdict.is_pass());
    }

    #[test]
    fn infeasible_lp_agrees_with_infinite_report() {
        let tolerance = Tolerance::default();
        assert!(compare(&tolerance, LpOutcome::Infeasible, 7_000_000).is_pass());
        assert!(compare(&tolerance, LpOutcome::Unbounded, 7_000_000).is_pass());
        assert!(!compare(&tolerance, LpOutcome::Infeasible, 12).is_pass());
    }

    #[test]
    fn custom_tolerance() {
        let tolerance = Tolerance {
            epsilon: 0.5,
            infinity: 100.,
        };
        assert!(compare(&tolerance, LpOutcome::Optimal(10.4), 10).is_pass());
        assert!(compare(&tolerance, LpOutcome::Optimal(150.), 101).is_pass());
    }
}
