/// Compare the reported objective against the exact optimum
pub mod objective;
/// Check the reported basic feasible solution for internal consistency
pub mod plan;
