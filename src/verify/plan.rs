use crate::document::SolverState;
use rustc_hash::FxHashSet as HashSet;
use thiserror::Error;

/// Something about the reported plan that doesn't add up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlanIssue {
    #[error("`{field}` is {found}, but the problem has size {expected}")]
    SizeMismatch {
        field: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("grid is not {expected}x{expected}")]
    GridShape { expected: usize },
    #[error("basis cell ({0}, {1}) is out of range")]
    BasisOutOfRange(usize, usize),
    #[error("basis cell ({0}, {1}) is listed twice")]
    DuplicateBasisCell(usize, usize),
    #[error("basis cell ({0}, {1}) is not flagged basic in the grid")]
    NotFlaggedBasic(usize, usize),
    #[error("grid cell ({0}, {1}) is flagged basic but missing from the basis")]
    UnlistedBasicCell(usize, usize),
    #[error("basis has {found} cells, expected {expected}")]
    BasisSize { found: usize, expected: usize },
    #[error("basic cell ({row}, {col}) has negative allocation {val}")]
    NegativeAllocation { row: usize, col: usize, val: i64 },
    #[error("row {row} ships {shipped}, supply is {supply}")]
    SupplyViolated {
        row: usize,
        shipped: i128,
        supply: i64,
    },
    #[error("column {col} receives {received}, demand is {demand}")]
    DemandViolated {
        col: usize,
        received: i128,
        demand: i64,
    },
    #[error("basic cells cost {recomputed}, but the reported objective is {reported}")]
    StaleObjective { recomputed: i128, reported: i64 },
}

/// Check that the basis, the grid and the stats describe the same basic feasible solution.
///
/// A spanning basis of an n x n transportation problem has `2n - 1` cells; degenerate
/// solutions still keep zero-valued cells in the basis to stay spanning.
pub fn audit(state: &SolverState) -> Vec<PlanIssue> {
    let problem = &state.problem;
    let n = problem.n();
    let mut issues = vec![];

    for (field, found) in [("n", state.n), ("stats.n", state.stats.n)] {
        if found != n {
            issues.push(PlanIssue::SizeMismatch {
                field,
                found,
                expected: n,
            });
        }
    }

    let grid_ok = state.grid.len() == n && state.grid.iter().all(|row| row.len() == n);
    if !grid_ok {
        issues.push(PlanIssue::GridShape { expected: n });
    }

    let mut listed = HashSet::default();
    listed.reserve(state.base.len());
    for &(i, j) in &state.base {
        if i >= n || j >= n {
            issues.push(PlanIssue::BasisOutOfRange(i, j));
        } else if !listed.insert((i, j)) {
            issues.push(PlanIssue::DuplicateBasisCell(i, j));
        } else if grid_ok && !state.grid[i][j].base {
            issues.push(PlanIssue::NotFlaggedBasic(i, j));
        }
    }

    let expected_size = (2 * n).saturating_sub(1);
    if state.base.len() != expected_size {
        issues.push(PlanIssue::BasisSize {
            found: state.base.len(),
            expected: expected_size,
        });
    }

    // Everything below reads the grid by index
    if !grid_ok {
        return issues;
    }

    // Costs fit in an i32 and allocations in an i64, so no grid that fits in memory can
    // overflow these.
    let mut shipped = vec![0i128; n];
    let mut received = vec![0i128; n];
    let mut recomputed = 0i128;
    for (i, row) in state.grid.iter().enumerate() {
        for (j, cell) in row.iter().enumerate().filter(|(_, cell)| cell.base) {
            if !listed.contains(&(i, j)) {
                issues.push(PlanIssue::UnlistedBasicCell(i, j));
            }
            if cell.val < 0 {
                issues.push(PlanIssue::NegativeAllocation {
                    row: i,
                    col: j,
                    val: cell.val,
                });
            }
            shipped[i] += cell.val as i128;
            received[j] += cell.val as i128;
            recomputed += cell.val as i128 * problem.costs[[i, j]] as i128;
        }
    }

    for (row, (shipped, supply)) in shipped.iter().zip(&problem.supply).enumerate() {
        if *shipped != *supply as i128 {
            issues.push(PlanIssue::SupplyViolated {
                row,
                shipped: *shipped,
                supply: *supply,
            });
        }
    }
    for (col, (received, demand)) in received.iter().zip(&problem.demand).enumerate() {
        if *received != *demand as i128 {
            issues.push(PlanIssue::DemandViolated {
                col,
                received: *received,
                demand: *demand,
            });
        }
    }

    if recomputed != state.stats.objective as i128 {
        issues.push(PlanIssue::StaleObjective {
            recomputed,
            reported: state.stats.objective,
        });
    }

    issues
}
