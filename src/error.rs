use crate::{document::ParseError, lp::LpOutcome, lp::SolverError, verify::plan::PlanIssue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("solution plan is inconsistent: {}", join_issues(.0))]
    Plan(Vec<PlanIssue>),
    #[error("custom solver did not reach the optimal solution (found {found}, correct {correct})")]
    Mismatch { found: i64, correct: LpOutcome },
}

fn join_issues(issues: &[PlanIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// The input was read but isn't a solver state document.
    pub fn is_unparsable_input(&self) -> bool {
        matches!(
            self,
            Error::Parse(ParseError::Json(_)) | Error::Parse(ParseError::Shape(_))
        )
    }

    /// Process exit status for this failure.
    ///
    /// Everything the verifier can judge exits with 1. A broken LP backend means nothing
    /// was judged at all, so it gets its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Parse(_) | Error::Plan(_) | Error::Mismatch { .. } => 1,
            Error::Solver(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backend_failure_has_its_own_exit_code() {
        let err = Error::from(SolverError("numerical trouble".to_owned()));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "LP backend failed: numerical trouble");
    }

    #[test]
    fn judged_failures_exit_with_one() {
        let mismatch = Error::Mismatch {
            found: 71,
            correct: LpOutcome::Optimal(70.),
        };
        assert_eq!(mismatch.exit_code(), 1);
        let plan = Error::Plan(vec![
            PlanIssue::GridShape { expected: 2 },
            PlanIssue::BasisSize {
                found: 0,
                expected: 3,
            },
        ]);
        assert_eq!(plan.exit_code(), 1);
        assert_eq!(
            plan.to_string(),
            "solution plan is inconsistent: grid is not 2x2; basis has 0 cells, expected 3"
        );
    }
}
