use clap::{ArgAction, Parser};
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{debug, info, warn, Level};

mod document;
mod error;
mod lp;
mod verify;

use document::{ParseError, SolverState};
use error::Error;
use lp::{SupplySense, TransportationModel};
use verify::objective::{compare, Tolerance, Verdict};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Opt {
    /// A path to the solver state JSON, else reads from stdin
    file: Option<PathBuf>,

    /// Largest accepted difference between the reported objective and the optimum
    #[arg(long, default_value_t = 1e-6)]
    epsilon: f64,

    /// Objectives above this value are treated as infeasible
    #[arg(long, default_value_t = 5_000_000.)]
    infinity: f64,

    /// Relation used for supply rows of the LP
    #[arg(long, value_enum, default_value_t)]
    supply_sense: SupplySense,

    /// Fail when the reported plan is inconsistent, instead of only warning
    #[arg(long)]
    strict: bool,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Opt {
    fn tolerance(&self) -> Tolerance {
        Tolerance {
            epsilon: self.epsilon,
            infinity: self.infinity,
        }
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    tracing_subscriber::fmt()
        .with_max_level(opt.log_level())
        .with_writer(io::stderr)
        .init();

    let result = match &opt.file {
        Some(path) => File::open(path)
            .map_err(|e| Error::from(ParseError::from(e)))
            .and_then(|file| check(&opt, BufReader::new(file))),
        None => {
            info!("Reading from stdin");
            check(&opt, io::stdin().lock())
        }
    };

    if let Ok(verdict) = &result {
        for line in verdict.diagnostics() {
            println!("{}", line);
        }
    }
    match result.and_then(into_result) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_unparsable_input() {
                println!("Couldn't parse the json");
            }
            warn!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Parse one solver state, solve its LP and judge the reported objective.
///
/// A mismatch is still a [Verdict]; only failures to reach a verdict are errors.
fn check<R: Read>(opt: &Opt, reader: R) -> Result<Verdict, Error> {
    let state = SolverState::from_reader(reader)?;
    let stats = &state.stats;
    info!(
        "Solver reported objective {} after {} iterations (n = {}, average chain length {:.2})",
        stats.objective, stats.iterations, stats.n, stats.avg_chain_len
    );
    if !state.problem.is_balanced() {
        warn!(
            "Problem is unbalanced: total supply {}, total demand {}",
            state.problem.total_supply(),
            state.problem.total_demand()
        );
    }

    let issues = verify::plan::audit(&state);
    for issue in &issues {
        warn!("{}", issue);
    }
    if opt.strict && !issues.is_empty() {
        return Err(Error::Plan(issues));
    }

    let model = TransportationModel::build(&state.problem, opt.supply_sense);
    let correct = model.solve()?;
    debug!("LP outcome: {}", correct);

    Ok(compare(&opt.tolerance(), correct, stats.objective))
}

fn into_result(verdict: Verdict) -> Result<(), Error> {
    match verdict.is_pass() {
        true => Ok(()),
        false => Err(Error::Mismatch {
            found: verdict.found(),
            correct: verdict.correct(),
        }),
    }
}
