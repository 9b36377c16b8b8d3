// Monte Carlo simulation driver: N independent draft-and-matchup trials.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::draft::pool::DraftPool;
use crate::draft::script::{run_script, DraftError, DraftStep};
use crate::sim::matchup::{score, CategoryTotals, MatchupWinner};

/// Accumulated outcome of a simulation run. The guard-heavy ("small-ball")
/// side is the designated strategy: `small_ball_wins` over `trials` is the
/// (W, N) pair handed to the downstream hypothesis test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    /// Trials where the small-ball roster took >= 5 of 9 categories.
    pub small_ball_wins: u64,
    /// Trials where the big-man roster took >= 5 of 9 categories.
    pub big_man_wins: u64,
    /// Trials where category ties left neither side with a majority.
    pub undecided: u64,
    /// Total category ties observed across all trials. Informational only:
    /// ties never count toward the win threshold.
    pub category_ties: u64,
    /// Number of completed trials.
    pub trials: u64,
}

impl SimulationOutcome {
    fn merge(self, other: SimulationOutcome) -> SimulationOutcome {
        SimulationOutcome {
            small_ball_wins: self.small_ball_wins + other.small_ball_wins,
            big_man_wins: self.big_man_wins + other.big_man_wins,
            undecided: self.undecided + other.undecided,
            category_ties: self.category_ties + other.category_ties,
            trials: self.trials + other.trials,
        }
    }
}

/// Run `trials` independent draft-and-matchup trials.
///
/// Each trial derives its own rng from `seed` and the trial index and drafts
/// from its own fresh undrafted view, so trials are independent and the
/// accumulated outcome is identical whether trials run sequentially or
/// across worker threads. A draft failure in any trial aborts the run: the
/// pool is static, so the same shortage would keep recurring at random, and
/// silently dropping failed trials would bias W/N.
pub fn run_simulation(
    pool: &DraftPool,
    steps: &[DraftStep],
    trials: u64,
    seed: u64,
) -> Result<SimulationOutcome, DraftError> {
    let outcome = (0..trials)
        .into_par_iter()
        .map(|trial| run_trial(pool, steps, seed.wrapping_add(trial)))
        .try_reduce(SimulationOutcome::default, |a, b| Ok(a.merge(b)))?;

    info!(
        "simulation complete: {} small-ball wins, {} big-man wins, {} undecided over {} trials",
        outcome.small_ball_wins, outcome.big_man_wins, outcome.undecided, outcome.trials
    );
    Ok(outcome)
}

/// One trial: fresh pool view, draft both rosters, score the matchup.
fn run_trial(
    pool: &DraftPool,
    steps: &[DraftStep],
    trial_seed: u64,
) -> Result<SimulationOutcome, DraftError> {
    let mut rng = StdRng::seed_from_u64(trial_seed);
    let rosters = run_script(pool, steps, &mut rng)?;

    let small = CategoryTotals::for_roster(&rosters.small, pool);
    let big = CategoryTotals::for_roster(&rosters.big, pool);
    let result = score(&small, &big);

    Ok(SimulationOutcome {
        small_ball_wins: matches!(result.winner(), Some(MatchupWinner::SideA)) as u64,
        big_man_wins: matches!(result.winner(), Some(MatchupWinner::SideB)) as u64,
        undecided: result.winner().is_none() as u64,
        category_ties: result.ties as u64,
        trials: 1,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
