// Season analysis entry point.
//
// Pipeline:
// 1. Initialize tracing (stderr, env-filtered)
// 2. Load config
// 3. Load season-totals CSV
// 4. Standardize the 9 clustering columns
// 5. Cluster-count diagnostics sweep (optional, advisory)
// 6. K-means fit at the configured k
// 7. Name tiers (config override or centroid inference)
// 8. Build the draft pool, write the labeled player table
// 9. Monte Carlo draft simulation
// 10. Report (wins, trials)

use hooptiers::cluster::diagnostics::selection_diagnostics;
use hooptiers::cluster::kmeans::kmeans;
use hooptiers::cluster::standardize::standardize;
use hooptiers::config;
use hooptiers::draft::pool::{ClusterAssignment, DraftPool, TierMap};
use hooptiers::draft::script::standard_script;
use hooptiers::player::{self, Category, StatVector};
use hooptiers::sim::driver::{run_simulation, SimulationOutcome};

use std::path::Path;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config (path may be given as the first argument)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/analysis.toml".to_string());
    let config = config::load_config(Path::new(&config_path))
        .context("failed to load configuration")?;
    info!("Config loaded from {}", config_path);

    std::fs::create_dir_all(&config.data.output_dir)
        .context("failed to create output directory")?;

    // 3. Load players
    let players = player::load_players(&config.data.players_csv, config.data.min_minutes)
        .context("failed to load season totals")?;
    info!("Loaded {} players", players.len());

    // 4. Standardize clustering columns
    let raw_rows: Vec<StatVector> = players.iter().map(|p| p.clustering_row()).collect();
    let standardized = standardize(&raw_rows).context("failed to standardize stats")?;

    // 5. Diagnostics sweep (advisory; k itself comes from config)
    if config.clustering.run_diagnostics {
        let diags = selection_diagnostics(
            &standardized.rows,
            config.clustering.k_max,
            config.clustering.restarts,
            config.clustering.max_iterations,
            config.clustering.gap_bootstrap,
            config.clustering.seed,
        )
        .context("cluster diagnostics failed")?;
        for d in &diags {
            info!(
                "k={}: inertia={:.1} silhouette={:.3} gap={:.3}",
                d.k, d.inertia, d.mean_silhouette, d.gap
            );
        }
        let diag_path = config.data.output_dir.join("cluster_diagnostics.json");
        std::fs::write(&diag_path, serde_json::to_string_pretty(&diags)?)
            .context("failed to write cluster diagnostics")?;
        info!("Diagnostics written to {}", diag_path.display());
    }

    // 6. Final clustering fit
    let fit = kmeans(
        &standardized.rows,
        config.clustering.k,
        config.clustering.restarts,
        config.clustering.max_iterations,
        config.clustering.seed,
    )
    .context("clustering failed")?;
    info!(
        "Clustered {} players into {} tiers (inertia {:.1}, converged: {})",
        players.len(),
        config.clustering.k,
        fit.inertia,
        fit.converged
    );

    // 7. Tier naming: operator override wins, otherwise centroid inference
    let tiers = match &config.tiers {
        Some(t) => TierMap::from_labels(t.top, t.small_ball, t.big_man, config.clustering.k)
            .context("invalid [tiers] override")?,
        None => TierMap::infer(&fit.centroids).context("tier inference failed")?,
    };

    // 8. Build the pool and write the labeled table
    let assignment = ClusterAssignment::from_fit(&players, &fit);
    let pool = DraftPool::build(players, &assignment, &tiers)
        .context("failed to build draft pool")?;
    let labeled_path = config.data.output_dir.join("labeled_players.csv");
    write_labeled_players(&pool, &labeled_path)
        .context("failed to write labeled player table")?;
    info!("Labeled players written to {}", labeled_path.display());

    // 9. Simulation
    let steps = standard_script();
    let outcome = run_simulation(
        &pool,
        &steps,
        config.simulation.trials,
        config.simulation.seed,
    )
    .context("simulation failed")?;

    let result_path = config.data.output_dir.join("simulation.json");
    std::fs::write(&result_path, serde_json::to_string_pretty(&outcome)?)
        .context("failed to write simulation result")?;
    info!("Simulation result written to {}", result_path.display());

    // 10. The (W, N) handoff to the hypothesis test
    report(&outcome);
    Ok(())
}

/// Print the simulation summary consumed by the hypothesis-testing step.
fn report(outcome: &SimulationOutcome) {
    println!(
        "small-ball wins: {} of {} trials ({} big-man wins, {} undecided)",
        outcome.small_ball_wins, outcome.trials, outcome.big_man_wins, outcome.undecided
    );
}

/// Write the pool with cluster labels and tier names as a CSV artifact.
fn write_labeled_players(pool: &DraftPool, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec![
        "Player".to_string(),
        "Pos".to_string(),
        "Tm".to_string(),
        "Cluster".to_string(),
        "Tier".to_string(),
    ];
    header.extend(Category::ALL.iter().map(|c| c.display_str().to_string()));
    writer.write_record(&header)?;

    for p in pool.iter() {
        let mut row = vec![
            p.record.name.clone(),
            p.record.position.display_str().to_string(),
            p.record.team.clone(),
            p.label.to_string(),
            p.tier.display_str().to_string(),
        ];
        row.extend(
            Category::ALL
                .iter()
                .map(|&c| format_category(p.record.category_value(c), c)),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Percentages keep three decimals; counting stats print as integers.
fn format_category(value: f64, category: Category) -> String {
    match category {
        Category::FgPct | Category::FtPct => format!("{value:.3}"),
        _ => format!("{}", value as u64),
    }
}

/// Initialize tracing to stderr, leaving stdout for the final report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hooptiers=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
