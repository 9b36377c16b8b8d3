// 9-category roster aggregation and head-to-head matchup scoring.

use crate::draft::pool::DraftPool;
use crate::draft::roster::Roster;
use crate::player::Category;

/// Category wins needed to take the matchup: a strict majority of the 9
/// categories. Ties award neither side, so reaching the threshold is the
/// only way to win.
pub const CATEGORY_WIN_THRESHOLD: u32 = 5;

// ---------------------------------------------------------------------------
// Roster aggregation
// ---------------------------------------------------------------------------

/// A roster's aggregate line across the 9 categories.
///
/// Percentage categories keep their numerators and denominators: a roster's
/// FG% is total makes over total attempts, never the mean of individual
/// percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub fgm: u32,
    pub fga: u32,
    pub ftm: u32,
    pub fta: u32,
    pub three_pm: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub points: u32,
}

impl CategoryTotals {
    /// Sum a roster's players into one aggregate line.
    pub fn for_roster(roster: &Roster, pool: &DraftPool) -> Self {
        let mut totals = CategoryTotals::default();
        for player in roster.iter(pool) {
            let r = &player.record;
            totals.fgm += r.fgm;
            totals.fga += r.fga;
            totals.ftm += r.ftm;
            totals.fta += r.fta;
            totals.three_pm += r.three_pm;
            totals.rebounds += r.rebounds;
            totals.assists += r.assists;
            totals.steals += r.steals;
            totals.blocks += r.blocks;
            totals.turnovers += r.turnovers;
            totals.points += r.points;
        }
        totals
    }

    pub fn fg_pct(&self) -> f64 {
        if self.fga == 0 {
            0.0
        } else {
            self.fgm as f64 / self.fga as f64
        }
    }

    pub fn ft_pct(&self) -> f64 {
        if self.fta == 0 {
            0.0
        } else {
            self.ftm as f64 / self.fta as f64
        }
    }

    /// This roster's value in one scoring category.
    pub fn value(&self, category: Category) -> f64 {
        match category {
            Category::FgPct => self.fg_pct(),
            Category::ThreePointers => self.three_pm as f64,
            Category::FtPct => self.ft_pct(),
            Category::Rebounds => self.rebounds as f64,
            Category::Assists => self.assists as f64,
            Category::Steals => self.steals as f64,
            Category::Blocks => self.blocks as f64,
            Category::Turnovers => self.turnovers as f64,
            Category::Points => self.points as f64,
        }
    }
}

// ---------------------------------------------------------------------------
// Matchup scoring
// ---------------------------------------------------------------------------

/// Which side took a matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupWinner {
    SideA,
    SideB,
}

/// Category-win counts for one scored matchup. Category ties are tracked
/// separately and never feed either side's count or the win threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchupResult {
    pub wins_a: u32,
    pub wins_b: u32,
    pub ties: u32,
}

impl MatchupResult {
    /// The side with a strict majority of category wins, if either reached
    /// it. With enough category ties neither side reaches 5, and the trial
    /// has no winner.
    pub fn winner(&self) -> Option<MatchupWinner> {
        if self.wins_a >= CATEGORY_WIN_THRESHOLD {
            Some(MatchupWinner::SideA)
        } else if self.wins_b >= CATEGORY_WIN_THRESHOLD {
            Some(MatchupWinner::SideB)
        } else {
            None
        }
    }
}

/// Compare two aggregate lines category-by-category.
///
/// Higher value wins every category except turnovers, where lower wins.
/// Equal values are a tie for that category and award neither side.
pub fn score(a: &CategoryTotals, b: &CategoryTotals) -> MatchupResult {
    let mut result = MatchupResult::default();
    for category in Category::ALL {
        let (va, vb) = (a.value(category), b.value(category));
        let a_wins = if category.lower_is_better() {
            va < vb
        } else {
            va > vb
        };
        let b_wins = if category.lower_is_better() {
            vb < va
        } else {
            vb > va
        };
        if a_wins {
            result.wins_a += 1;
        } else if b_wins {
            result.wins_b += 1;
        } else {
            result.ties += 1;
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
