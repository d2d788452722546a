//! Generate-validate-retry orchestration.
//!
//! Candidates are generated at random, classified by the solver, and
//! accepted only when their minimum move count falls inside the caller's
//! window. Rejected candidates (unsolvable, outside the window, or over an
//! opt-in search budget) are discarded silently and a fresh one is drawn.
//!
//! By default the retry loop is unbounded: if the window is unreachable for
//! the given parameters the loop runs forever. That is the intended liveness
//! contract; `max_attempts` exists for callers that prefer an error.

use std::error::Error;
use std::fmt;

use log::debug;
use rand::Rng;

use crate::generator::{generate_prototype, InputError, LevelSpec};
use crate::output::{LevelRecord, LevelSink, PersistenceError};
use crate::solver::{solve, SearchLimits, SolveOutcome};

/// Inclusive move-count acceptance range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveWindow {
    pub min_moves: usize,
    pub max_moves: usize,
}

impl MoveWindow {
    pub fn contains(&self, moves: usize) -> bool {
        self.min_moves <= moves && moves <= self.max_moves
    }
}

impl Default for MoveWindow {
    fn default() -> Self {
        Self {
            min_moves: 0,
            max_moves: 999,
        }
    }
}

/// Everything one generation run needs.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub spec: LevelSpec,
    pub window: MoveWindow,
    /// Budget for each individual solvability search; unbounded by default.
    pub limits: SearchLimits,
    /// Number of levels to produce.
    pub num_levels: usize,
    /// Give up on a level after this many rejected candidates. `None` (the
    /// default) retries forever.
    pub max_attempts: Option<u64>,
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        self.spec.validate()?;
        if self.num_levels == 0 {
            return Err(InputError::ZeroLevels);
        }
        if self.window.min_moves > self.window.max_moves {
            return Err(InputError::EmptyWindow {
                min_moves: self.window.min_moves,
                max_moves: self.window.max_moves,
            });
        }
        Ok(())
    }
}

/// Failure of a generation run.
#[derive(Debug)]
pub enum GenerateError {
    /// Parameters rejected before any work was done.
    Input(InputError),
    /// The sink failed to write an accepted level.
    Persistence(PersistenceError),
    /// The opt-in attempt cap ran out before a level was accepted.
    AttemptsExhausted { level: usize, attempts: u64 },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Input(e) => write!(f, "invalid parameters: {e}"),
            GenerateError::Persistence(e) => write!(f, "{e}"),
            GenerateError::AttemptsExhausted { level, attempts } => write!(
                f,
                "gave up on level {level} after {attempts} rejected candidates"
            ),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GenerateError::Input(e) => Some(e),
            GenerateError::Persistence(e) => Some(e),
            GenerateError::AttemptsExhausted { .. } => None,
        }
    }
}

impl From<InputError> for GenerateError {
    fn from(e: InputError) -> Self {
        GenerateError::Input(e)
    }
}

impl From<PersistenceError> for GenerateError {
    fn from(e: PersistenceError) -> Self {
        GenerateError::Persistence(e)
    }
}

/// Counters from a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub levels_generated: usize,
    /// Candidates drawn across all levels, accepted ones included.
    pub total_attempts: u64,
}

/// Produce `num_levels` certified levels, handing each accepted one to the
/// sink as soon as it is found.
pub fn generate_levels<R: Rng>(
    config: &GenerationConfig,
    rng: &mut R,
    sink: &mut dyn LevelSink,
) -> Result<GenerationStats, GenerateError> {
    config.validate()?;

    let mut total_attempts: u64 = 0;
    for level in 1..=config.num_levels {
        let mut attempts: u64 = 0;
        loop {
            if let Some(cap) = config.max_attempts {
                if attempts >= cap {
                    return Err(GenerateError::AttemptsExhausted { level, attempts });
                }
            }
            attempts += 1;

            let candidate = generate_prototype(&config.spec, rng);
            let result = solve(&candidate, config.spec.height, &config.limits);

            match result.outcome {
                SolveOutcome::Solved(moves) if config.window.contains(moves) => {
                    let record = LevelRecord::new(&candidate, moves);
                    sink.persist(level, &record)?;
                    debug!("level {level} accepted after {attempts} candidates ({moves} moves)");
                    break;
                }
                outcome => {
                    debug!(
                        "level {level} candidate {attempts} rejected: {outcome:?} \
                         ({} states)",
                        result.states_explored
                    );
                }
            }
        }
        total_attempts += attempts;
    }

    Ok(GenerationStats {
        levels_generated: config.num_levels,
        total_attempts,
    })
}
