// Integration tests for the season analysis pipeline.
//
// These tests exercise the full system end-to-end using the library crate's
// public API: standardization, clustering, tier inference, pool
// construction, the drafting script, matchup scoring, and the Monte Carlo
// driver working together on synthetic season data.

use std::collections::HashSet;

use hooptiers::cluster::kmeans::kmeans;
use hooptiers::cluster::standardize::standardize;
use hooptiers::draft::pool::{ClusterAssignment, DraftPool, Tier, TierMap};
use hooptiers::draft::roster::ROSTER_SIZE;
use hooptiers::draft::script::{run_script, standard_script, DraftError};
use hooptiers::player::{PlayerRecord, Position, StatVector};
use hooptiers::sim::driver::{run_simulation, SimulationOutcome};
use hooptiers::sim::matchup::{score, CategoryTotals, MatchupWinner};

use rand::rngs::StdRng;
use rand::SeedableRng;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Build one synthetic player from archetype base stats, jittered a few
/// percent by index so no column is degenerate.
fn synthetic_player(
    name: &str,
    position: Position,
    i: usize,
    fga: f64,
    fg_pct: f64,
    three_pm: f64,
    fta: f64,
    ft_pct: f64,
    rebounds: f64,
    assists: f64,
    steals: f64,
    blocks: f64,
    turnovers: f64,
    points: f64,
) -> PlayerRecord {
    let scale = 0.95 + 0.013 * (i as f64);
    let fga = (fga * scale).round();
    let fgm = (fga * fg_pct).round();
    let fta = (fta * scale).round();
    let ftm = (fta * ft_pct).round();
    PlayerRecord {
        name: name.into(),
        position,
        team: "SYN".into(),
        games: 72,
        minutes: 2200,
        fgm: fgm as u32,
        fga: fga as u32,
        fg_pct: fg_pct * (0.99 + 0.004 * (i as f64)),
        three_pm: (three_pm * scale).round() as u32,
        ftm: ftm as u32,
        fta: fta as u32,
        ft_pct: ft_pct * (0.99 + 0.003 * (i as f64)),
        rebounds: (rebounds * scale).round() as u32,
        assists: (assists * scale).round() as u32,
        steals: (steals * scale).round() as u32,
        blocks: (blocks * scale).round() as u32,
        turnovers: (turnovers * scale).round() as u32,
        points: (points * scale).round() as u32,
    }
}

/// Top-tier archetype: strong across the board, highest scoring volume.
fn star(name: &str, position: Position, i: usize) -> PlayerRecord {
    synthetic_player(
        name, position, i, 1400.0, 0.52, 150.0, 480.0, 0.85, 700.0, 400.0, 120.0, 80.0,
        220.0, 1750.0,
    )
}

/// Guard archetype: assists/steals/threes heavy, light on rebounds/blocks.
fn guard(name: &str, position: Position, i: usize) -> PlayerRecord {
    synthetic_player(
        name, position, i, 800.0, 0.43, 210.0, 220.0, 0.87, 250.0, 520.0, 130.0, 15.0,
        160.0, 950.0,
    )
}

/// Big archetype: rebounds/blocks heavy, barely shoots threes.
fn big(name: &str, position: Position, i: usize) -> PlayerRecord {
    synthetic_player(
        name, position, i, 750.0, 0.55, 15.0, 300.0, 0.65, 820.0, 120.0, 50.0, 140.0,
        130.0, 1000.0,
    )
}

/// A synthetic season: 15 stars (3 per position), 12 guard-profile players
/// over PG/SG/SF, 12 big-profile players over SF/PF/C. Deep enough for every
/// draft step to fill.
fn synthetic_season() -> Vec<PlayerRecord> {
    let mut players = Vec::new();
    for position in Position::ALL {
        for i in 0..3 {
            players.push(star(&format!("star-{position}-{i}"), position, i));
        }
    }
    let guard_positions = [
        Position::PointGuard,
        Position::ShootingGuard,
        Position::SmallForward,
    ];
    for i in 0..12 {
        players.push(guard(&format!("guard-{i}"), guard_positions[i % 3], i));
    }
    let big_positions = [Position::SmallForward, Position::PowerForward, Position::Center];
    for i in 0..12 {
        players.push(big(&format!("big-{i}"), big_positions[i % 3], i));
    }
    players
}

/// Standardize, cluster at k = 3, infer tiers, and join the pool.
fn clustered_pool(players: Vec<PlayerRecord>, seed: u64) -> DraftPool {
    let rows: Vec<StatVector> = players.iter().map(|p| p.clustering_row()).collect();
    let standardized = standardize(&rows).expect("standardization should succeed");
    let fit = kmeans(&standardized.rows, 3, 20, 100, seed).expect("k-means should fit");
    let tiers = TierMap::infer(&fit.centroids).expect("tier inference should succeed");
    let assignment = ClusterAssignment::from_fit(&players, &fit);
    DraftPool::build(players, &assignment, &tiers).expect("pool join should succeed")
}

// ===========================================================================
// Clustering pipeline end-to-end
// ===========================================================================

#[test]
fn pipeline_recovers_the_three_archetypes() {
    let pool = clustered_pool(synthetic_season(), 11);

    for p in pool.iter() {
        let expected = if p.record.name.starts_with("star") {
            Tier::Top
        } else if p.record.name.starts_with("guard") {
            Tier::SmallBall
        } else {
            Tier::BigMan
        };
        assert_eq!(
            p.tier, expected,
            "player {} landed in {:?}",
            p.record.name, p.tier
        );
    }
}

#[test]
fn clustering_is_reproducible_across_runs() {
    let players = synthetic_season();
    let rows: Vec<StatVector> = players.iter().map(|p| p.clustering_row()).collect();
    let standardized = standardize(&rows).unwrap();

    let a = kmeans(&standardized.rows, 3, 20, 100, 77).unwrap();
    let b = kmeans(&standardized.rows, 3, 20, 100, 77).unwrap();
    assert_eq!(a.labels, b.labels);
}

// ===========================================================================
// Drafting end-to-end
// ===========================================================================

#[test]
fn drafted_rosters_are_complete_and_overlap_only_in_the_first_five() {
    let pool = clustered_pool(synthetic_season(), 11);
    let steps = standard_script();

    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let rosters = run_script(&pool, &steps, &mut rng).unwrap();

        assert_eq!(rosters.small.len(), ROSTER_SIZE);
        assert_eq!(rosters.big.len(), ROSTER_SIZE);
        assert!(rosters.small.all_distinct());
        assert!(rosters.big.all_distinct());

        let small: HashSet<usize> = rosters.small.picks().iter().copied().collect();
        let big: HashSet<usize> = rosters.big.picks().iter().copied().collect();
        assert_eq!(small.intersection(&big).count(), 5);
        assert_eq!(small.union(&big).count(), 15);

        // Small-ball utility picks respect the no-PF/C exclusion.
        for &idx in &rosters.small.picks()[6..] {
            let p = pool.player(idx);
            assert_eq!(p.tier, Tier::SmallBall);
            assert!(!matches!(
                p.record.position,
                Position::PowerForward | Position::Center
            ));
        }
    }
}

#[test]
fn thin_small_ball_tier_aborts_instead_of_short_rosters() {
    // Only 3 guard-profile players: the 4-pick utility step cannot fill.
    let mut players = Vec::new();
    for position in Position::ALL {
        for i in 0..3 {
            players.push(star(&format!("star-{position}-{i}"), position, i));
        }
    }
    for i in 0..3 {
        players.push(guard(&format!("guard-{i}"), Position::PointGuard, i));
    }
    let big_positions = [Position::SmallForward, Position::PowerForward, Position::Center];
    for i in 0..12 {
        players.push(big(&format!("big-{i}"), big_positions[i % 3], i));
    }

    let pool = clustered_pool(players, 5);
    let err = run_simulation(&pool, &standard_script(), 50, 1).unwrap_err();
    match err {
        DraftError::InsufficientCandidates {
            needed, available, ..
        } => {
            assert_eq!(needed, 4);
            assert_eq!(available, 3);
        }
        other => panic!("expected InsufficientCandidates, got {other:?}"),
    }
}

// ===========================================================================
// Matchup scoring scenarios
// ===========================================================================

#[test]
fn scenario_small_wins_five_categories_to_four() {
    // small: fg% .50, 3pt 40, ft% .80, reb 300, ast 250, stl 60, blk 20,
    //        pts 900, tov 150
    let small = CategoryTotals {
        fgm: 500,
        fga: 1000,
        three_pm: 40,
        ftm: 80,
        fta: 100,
        rebounds: 300,
        assists: 250,
        steals: 60,
        blocks: 20,
        points: 900,
        turnovers: 150,
    };
    // big: fg% .55, 3pt 10, ft% .70, reb 450, ast 150, stl 40, blk 70,
    //      pts 850, tov 120
    let big = CategoryTotals {
        fgm: 550,
        fga: 1000,
        three_pm: 10,
        ftm: 70,
        fta: 100,
        rebounds: 450,
        assists: 150,
        steals: 40,
        blocks: 70,
        points: 850,
        turnovers: 120,
    };

    let result = score(&small, &big);
    assert_eq!(result.wins_a, 5); // 3pt, ft%, ast, stl, pts
    assert_eq!(result.wins_b, 4); // fg%, reb, blk, tov
    assert_eq!(result.ties, 0);
    assert_eq!(result.winner(), Some(MatchupWinner::SideA));
}

#[test]
fn scenario_identical_totals_produce_no_winner() {
    let line = CategoryTotals {
        fgm: 500,
        fga: 1000,
        three_pm: 40,
        ftm: 80,
        fta: 100,
        rebounds: 300,
        assists: 250,
        steals: 60,
        blocks: 20,
        points: 900,
        turnovers: 150,
    };
    let result = score(&line, &line);
    assert_eq!(result.wins_a, 0);
    assert_eq!(result.wins_b, 0);
    assert_eq!(result.ties, 9);
    assert_eq!(result.winner(), None);
}

// ===========================================================================
// Simulation driver end-to-end
// ===========================================================================

#[test]
fn simulation_is_reproducible_and_coherent() {
    let pool = clustered_pool(synthetic_season(), 11);
    let steps = standard_script();

    let a = run_simulation(&pool, &steps, 2000, 42).unwrap();
    let b = run_simulation(&pool, &steps, 2000, 42).unwrap();
    assert_eq!(a, b);

    assert_eq!(a.trials, 2000);
    assert!(a.small_ball_wins <= a.trials);
    assert_eq!(
        a.small_ball_wins + a.big_man_wins + a.undecided,
        a.trials
    );
}

#[test]
fn zero_trials_runs_without_error() {
    let pool = clustered_pool(synthetic_season(), 11);
    let outcome = run_simulation(&pool, &standard_script(), 0, 42).unwrap();
    assert_eq!(outcome, SimulationOutcome::default());
}
