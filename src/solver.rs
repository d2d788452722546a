//! Breadth-first solvability search over puzzle configurations.
//!
//! Nodes are configurations, edges are single legal moves with uniform
//! weight, so BFS depth equals the true minimum move count. The visited set
//! keys on the canonical form of each state, which makes the search
//! tractable for small puzzles; it is still exponential in tube and color
//! count, so only a handful of tubes is practical.
//!
//! No move path is reconstructed or retained, only the integer distance.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use log::debug;

use crate::canonical::CanonicalKey;
use crate::puzzle::Configuration;

/// Optional budgets for one search.
///
/// The default is fully unbounded on both axes: the search runs to a solved
/// state or to exhaustion of the reachable state space. Both caps are
/// strictly opt-in.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Give up after dequeuing this many states.
    pub max_states: Option<usize>,
    /// Give up after this much wall-clock time.
    pub timeout: Option<Duration>,
}

/// Classification of a start configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Minimum number of moves to reach a solved state.
    Solved(usize),
    /// The reachable state space contains no solved state.
    Unsolvable,
    /// An opt-in budget from [`SearchLimits`] ran out first.
    LimitReached,
}

/// Result of one solvability search.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    /// States dequeued before the search ended.
    pub states_explored: usize,
    pub time_elapsed_ms: u64,
}

/// Find the minimum move count from `start`, or prove it unsolvable.
pub fn solve(start: &Configuration, height: usize, limits: &SearchLimits) -> SolveReport {
    let start_time = Instant::now();
    let deadline = limits.timeout.map(|t| start_time + t);

    let mut states_explored: usize = 0;

    let mut visited: HashSet<CanonicalKey> = HashSet::new();
    visited.insert(CanonicalKey::from_configuration(start));

    let mut frontier: VecDeque<(Configuration, usize)> = VecDeque::new();
    frontier.push_back((start.clone(), 0));

    while let Some((config, move_count)) = frontier.pop_front() {
        if let Some(deadline) = deadline {
            if Instant::now() > deadline {
                return report(SolveOutcome::LimitReached, states_explored, start_time);
            }
        }
        if let Some(cap) = limits.max_states {
            if states_explored >= cap {
                return report(SolveOutcome::LimitReached, states_explored, start_time);
            }
        }

        states_explored += 1;

        if config.is_solved(height) {
            return report(SolveOutcome::Solved(move_count), states_explored, start_time);
        }

        for mv in config.legal_moves(height) {
            let successor = config.apply(mv);
            let key = CanonicalKey::from_configuration(&successor);
            // A state seen before was reached by an equal-or-shorter path.
            if visited.insert(key) {
                frontier.push_back((successor, move_count + 1));
            }
        }
    }

    // Frontier exhausted without reaching a solved state.
    report(SolveOutcome::Unsolvable, states_explored, start_time)
}

fn report(outcome: SolveOutcome, states_explored: usize, start_time: Instant) -> SolveReport {
    debug!("search ended: {outcome:?} after {states_explored} states");
    SolveReport {
        outcome,
        states_explored,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    }
}
