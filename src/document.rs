use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("couldn't read the input: {0}")]
    Io(#[from] std::io::Error),
    #[error("couldn't parse the json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed problem: {0}")]
    Shape(String),
}

/// A single cell of the transportation plan.
///
/// Basic cells hold their allocation, non-basic cells hold the reduced cost left over
/// from the last potentials pass, so `val` can be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub val: i64,
    pub base: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    pub objective: i64,
    pub iterations: usize,
    pub avg_chain_len: f64,
    pub n: usize,
}

/// Problem exactly as it appears in the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawProblem {
    costs: Vec<Vec<i64>>,
    supply: Vec<i64>,
    demand: Vec<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawState {
    problem: RawProblem,
    grid: Vec<Vec<GridCell>>,
    base: Vec<(usize, usize)>,
    stats: SolverStats,
    n: usize,
}

/// A transportation problem with an n x n cost matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub costs: Array2<i64>,
    pub supply: Vec<i64>,
    pub demand: Vec<i64>,
}

impl Problem {
    pub fn new(
        costs: Array2<i64>,
        supply: Vec<i64>,
        demand: Vec<i64>,
    ) -> Result<Self, ParseError> {
        let n = supply.len();
        if costs.dim() != (n, n) {
            return Err(ParseError::Shape(format!(
                "cost matrix is {}x{}, expected {n}x{n}",
                costs.nrows(),
                costs.ncols()
            )));
        }
        if demand.len() != n {
            return Err(ParseError::Shape(format!(
                "demand has {} entries, expected {n}",
                demand.len()
            )));
        }
        for s in &supply {
            check_range("supply", *s)?;
        }
        for d in &demand {
            check_range("demand", *d)?;
        }
        for c in &costs {
            check_range("cost", *c)?;
        }
        Ok(Self {
            costs,
            supply,
            demand,
        })
    }

    pub fn n(&self) -> usize {
        self.supply.len()
    }

    pub fn total_supply(&self) -> i128 {
        self.supply.iter().map(|s| *s as i128).sum()
    }

    pub fn total_demand(&self) -> i128 {
        self.demand.iter().map(|d| *d as i128).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_supply() == self.total_demand()
    }
}

/// Problem entries are non-negative and fit in an `i32`, the width the solver works in.
fn check_range(what: &str, value: i64) -> Result<(), ParseError> {
    if value < 0 {
        return Err(ParseError::Shape(format!("negative {what} {value}")));
    }
    if value > i32::MAX as i64 {
        return Err(ParseError::Shape(format!(
            "{what} {value} exceeds {}",
            i32::MAX
        )));
    }
    Ok(())
}

impl TryFrom<RawProblem> for Problem {
    type Error = ParseError;

    fn try_from(raw: RawProblem) -> Result<Self, Self::Error> {
        let n = raw.supply.len();
        if let Some(row) = raw.costs.iter().find(|row| row.len() != n) {
            return Err(ParseError::Shape(format!(
                "cost row has {} entries, expected {n}",
                row.len()
            )));
        }
        let rows = raw.costs.len();
        let costs = Array2::from_shape_vec((rows, n), raw.costs.into_iter().flatten().collect())
            .map_err(|e| ParseError::Shape(e.to_string()))?;
        Problem::new(costs, raw.supply, raw.demand)
    }
}

/// Final state of the stepping-stone solver, as it was serialized on exit.
///
/// Only the problem is validated on construction. The grid and basis are kept verbatim
/// so [crate::verify::plan] can report on them.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverState {
    pub problem: Problem,
    pub grid: Vec<Vec<GridCell>>,
    pub base: Vec<(usize, usize)>,
    pub stats: SolverStats,
    pub n: usize,
}

impl SolverState {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let raw: RawState = serde_json::from_reader(reader)?;
        raw.try_into()
    }
}

impl TryFrom<RawState> for SolverState {
    type Error = ParseError;

    fn try_from(raw: RawState) -> Result<Self, Self::Error> {
        Ok(Self {
            problem: raw.problem.try_into()?,
            grid: raw.grid,
            base: raw.base,
            stats: raw.stats,
            n: raw.n,
        })
    }
}
