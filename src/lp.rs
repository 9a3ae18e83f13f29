use crate::document::Problem;
use good_lp::{
    default_solver, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
#[error("LP backend failed: {0}")]
pub struct SolverError(pub(crate) String);

/// Relation used for the supply rows.
///
/// Demand rows are always equalities. Supply rows are equalities for a balanced problem;
/// [SupplySense::Le] lets an origin ship less than it holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SupplySense {
    #[default]
    Eq,
    Le,
}

/// Result of an exact LP solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LpOutcome {
    Optimal(f64),
    Infeasible,
    Unbounded,
}

impl fmt::Display for LpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LpOutcome::Optimal(value) => write!(f, "{}", value),
            LpOutcome::Infeasible => write!(f, "infeasible"),
            LpOutcome::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// The transportation problem as a linear program, one variable per cell in row-major order.
pub struct TransportationModel {
    n: usize,
    variables: ProblemVariables,
    cells: Vec<Variable>,
    objective: Expression,
    constraints: Vec<Constraint>,
}

impl TransportationModel {
    /// Minimise total shipping cost subject to `n` supply rows and `n` demand columns.
    pub fn build(problem: &Problem, supply_sense: SupplySense) -> Self {
        let n = problem.n();
        let mut variables = ProblemVariables::new();
        let cells = variables.add_vector(variable().min(0.0), n * n);

        let mut objective = Expression::with_capacity(n * n);
        for ((i, j), cost) in problem.costs.indexed_iter() {
            objective.add_mul(*cost as f64, cells[i * n + j]);
        }

        let mut constraints = Vec::with_capacity(2 * n);
        for (i, supply) in problem.supply.iter().enumerate() {
            let mut shipped = Expression::with_capacity(n);
            for j in 0..n {
                shipped.add_mul(1.0, cells[i * n + j]);
            }
            constraints.push(match supply_sense {
                SupplySense::Eq => shipped.eq(*supply as f64),
                SupplySense::Le => shipped.leq(*supply as f64),
            });
        }
        for (j, demand) in problem.demand.iter().enumerate() {
            let mut received = Expression::with_capacity(n);
            for i in 0..n {
                received.add_mul(1.0, cells[i * n + j]);
            }
            constraints.push(received.eq(*demand as f64));
        }

        Self {
            n,
            variables,
            cells,
            objective,
            constraints,
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_variables(&self) -> usize {
        self.cells.len()
    }

    /// Solve to optimality. Infeasible and unbounded programs are outcomes, not errors.
    pub fn solve(self) -> Result<LpOutcome, SolverError> {
        if self.n == 0 {
            return Ok(LpOutcome::Optimal(0.));
        }
        debug!(
            "Solving LP with {} variables and {} constraints",
            self.num_variables(),
            self.num_constraints()
        );

        let objective = self.objective.clone();
        let mut model = self.variables.minimise(self.objective).using(default_solver);
        for constraint in self.constraints {
            model = model.with(constraint);
        }

        match model.solve() {
            Ok(solution) => {
                for (idx, cell) in self.cells.iter().enumerate() {
                    let value = solution.value(*cell);
                    if value.abs() > f64::EPSILON {
                        trace!("x[{}][{}] = {}", idx / self.n, idx % self.n, value);
                    }
                }
                Ok(LpOutcome::Optimal(solution.eval(objective)))
            }
            Err(ResolutionError::Infeasible) => Ok(LpOutcome::Infeasible),
            Err(ResolutionError::Unbounded) => Ok(LpOutcome::Unbounded),
            Err(other) => Err(SolverError(other.to_string())),
        }
    }
}
