// The drafting script: strategy expressed as a declarative sequence of
// constrained draft steps, plus the sampler that executes them.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::draft::pool::{DraftPool, PoolPlayer, Tier};
use crate::draft::roster::{Roster, TrialPool, ROSTER_SIZE};
use crate::player::Position;

// ---------------------------------------------------------------------------
// Draft steps
// ---------------------------------------------------------------------------

/// Which roster(s) a step's picks land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Shared picks appended to both rosters (the opening phase).
    BothRosters,
    /// Appended to the guard-heavy roster only.
    SmallOnly,
    /// Appended to the big-man-heavy roster only.
    BigOnly,
}

/// One constrained draft step: sample `count` undrafted players from `tier`
/// whose position is in `positions`, and append them to `destination`.
#[derive(Debug, Clone)]
pub struct DraftStep {
    pub tier: Tier,
    pub positions: Vec<Position>,
    pub count: usize,
    pub destination: Destination,
}

impl DraftStep {
    pub fn new(
        tier: Tier,
        positions: &[Position],
        count: usize,
        destination: Destination,
    ) -> Self {
        DraftStep {
            tier,
            positions: positions.to_vec(),
            count,
            destination,
        }
    }

    /// Whether an undrafted player satisfies this step's constraints.
    pub fn matches(&self, player: &PoolPlayer) -> bool {
        player.tier == self.tier && self.positions.contains(&player.record.position)
    }

    /// Human-readable constraint description for error context.
    pub fn describe(&self) -> String {
        let positions = self
            .positions
            .iter()
            .map(|p| p.display_str())
            .collect::<Vec<_>>()
            .join("/");
        format!("{} x {} tier at {}", self.count, self.tier, positions)
    }
}

/// The fixed two-strategy script: both rosters share a top-tier starting
/// five plus a tier-specific sixth man, then fill out with four utility
/// picks from their namesake tier.
pub fn standard_script() -> Vec<DraftStep> {
    let mut steps = Vec::with_capacity(10);

    // Shared first five: one top-tier player per primary position.
    for position in Position::ALL {
        steps.push(DraftStep::new(
            Tier::Top,
            &[position],
            1,
            Destination::BothRosters,
        ));
    }

    // Sixth men: a top-tier forward for the small roster, a top-tier guard
    // for the big roster.
    steps.push(DraftStep::new(
        Tier::Top,
        &[Position::SmallForward, Position::PowerForward],
        1,
        Destination::SmallOnly,
    ));
    steps.push(DraftStep::new(
        Tier::Top,
        &[Position::PointGuard, Position::ShootingGuard],
        1,
        Destination::BigOnly,
    ));

    // Utility fills. The small roster avoids PF/C; the big roster takes one
    // non-center big, then three non-guards.
    steps.push(DraftStep::new(
        Tier::SmallBall,
        &[
            Position::PointGuard,
            Position::ShootingGuard,
            Position::SmallForward,
        ],
        4,
        Destination::SmallOnly,
    ));
    steps.push(DraftStep::new(
        Tier::BigMan,
        &[
            Position::PointGuard,
            Position::ShootingGuard,
            Position::SmallForward,
            Position::PowerForward,
        ],
        1,
        Destination::BigOnly,
    ));
    steps.push(DraftStep::new(
        Tier::BigMan,
        &[Position::SmallForward, Position::PowerForward, Position::Center],
        3,
        Destination::BigOnly,
    ));

    steps
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft step '{step}' needs {needed} players but only {available} remain eligible")]
    InsufficientCandidates {
        step: String,
        needed: usize,
        available: usize,
    },

    #[error("roster '{roster}' finished the draft with {actual} players, expected {expected}")]
    InvalidRosterSize {
        roster: &'static str,
        expected: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Script execution
// ---------------------------------------------------------------------------

/// The two rosters built by one trial's draft.
#[derive(Debug, Clone)]
pub struct TrialRosters {
    pub small: Roster,
    pub big: Roster,
}

/// Execute a draft script against a fresh undrafted view of the pool.
///
/// Each step samples uniformly without replacement among the players that
/// satisfy its constraints, then removes them from the undrafted view, so a
/// player drafted in step N is unavailable from step N+1 onward. A step that
/// cannot fill its count aborts the trial; short rosters are never returned.
pub fn run_script<R: Rng>(
    pool: &DraftPool,
    steps: &[DraftStep],
    rng: &mut R,
) -> Result<TrialRosters, DraftError> {
    let mut trial = TrialPool::new(pool);
    let mut small = Roster::new();
    let mut big = Roster::new();

    for step in steps {
        let candidates = trial.candidates(|p| step.matches(p));
        if candidates.len() < step.count {
            return Err(DraftError::InsufficientCandidates {
                step: step.describe(),
                needed: step.count,
                available: candidates.len(),
            });
        }

        let picked: Vec<usize> = candidates
            .choose_multiple(rng, step.count)
            .copied()
            .collect();
        trial.remove_all(&picked);

        for &idx in &picked {
            match step.destination {
                Destination::BothRosters => {
                    small.push(idx);
                    big.push(idx);
                }
                Destination::SmallOnly => small.push(idx),
                Destination::BigOnly => big.push(idx),
            }
        }
    }

    validate_roster("small", &small)?;
    validate_roster("big", &big)?;

    Ok(TrialRosters { small, big })
}

fn validate_roster(name: &'static str, roster: &Roster) -> Result<(), DraftError> {
    if roster.len() != ROSTER_SIZE || !roster.all_distinct() {
        return Err(DraftError::InvalidRosterSize {
            roster: name,
            expected: ROSTER_SIZE,
            actual: roster.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
