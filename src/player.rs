// Player records, positions, and season-totals CSV ingest.
//
// Reads a Basketball-Reference-style season totals CSV. The upstream export
// is assumed to be mostly clean (one row per player, season totals only);
// this loader enforces the invariants the rest of the pipeline relies on
// rather than repairing dirty data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// The five primary basketball positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl Position {
    /// All positions in conventional lineup order.
    pub const ALL: [Position; 5] = [
        Position::PointGuard,
        Position::ShootingGuard,
        Position::SmallForward,
        Position::PowerForward,
        Position::Center,
    ];

    /// Parse a position label into a Position enum.
    ///
    /// Hybrid labels ("SG-PG", "PF-C") consolidate to the primary listing,
    /// i.e. the first token.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        let primary = s.trim().split('-').next().unwrap_or("");
        match primary.to_uppercase().as_str() {
            "PG" => Some(Position::PointGuard),
            "SG" => Some(Position::ShootingGuard),
            "SF" => Some(Position::SmallForward),
            "PF" => Some(Position::PowerForward),
            "C" => Some(Position::Center),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
        }
    }

    /// Deterministic ordering index (point guard through center).
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::PointGuard => 0,
            Position::ShootingGuard => 1,
            Position::SmallForward => 2,
            Position::PowerForward => 3,
            Position::Center => 4,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Scoring categories
// ---------------------------------------------------------------------------

/// Number of head-to-head scoring categories.
pub const CATEGORY_COUNT: usize = 9;

/// A per-player row in clustering-input space, one value per category.
pub type StatVector = [f64; CATEGORY_COUNT];

/// The nine head-to-head categories. Order is fixed: it defines the column
/// layout of every `StatVector` and of the k-means centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    FgPct,
    ThreePointers,
    FtPct,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    Points,
}

impl Category {
    /// All categories in column order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::FgPct,
        Category::ThreePointers,
        Category::FtPct,
        Category::Rebounds,
        Category::Assists,
        Category::Steals,
        Category::Blocks,
        Category::Turnovers,
        Category::Points,
    ];

    /// Column index of this category in a `StatVector`.
    pub fn index(&self) -> usize {
        match self {
            Category::FgPct => 0,
            Category::ThreePointers => 1,
            Category::FtPct => 2,
            Category::Rebounds => 3,
            Category::Assists => 4,
            Category::Steals => 5,
            Category::Blocks => 6,
            Category::Turnovers => 7,
            Category::Points => 8,
        }
    }

    /// Whether a lower value wins this category head-to-head.
    /// Turnovers are the only inverted category.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Category::Turnovers)
    }

    /// Return the display string for this category.
    pub fn display_str(&self) -> &'static str {
        match self {
            Category::FgPct => "FG%",
            Category::ThreePointers => "3P",
            Category::FtPct => "FT%",
            Category::Rebounds => "REB",
            Category::Assists => "AST",
            Category::Steals => "STL",
            Category::Blocks => "BLK",
            Category::Turnovers => "TOV",
            Category::Points => "PTS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// One player's season totals.
///
/// Percentages are retained alongside makes/attempts because roster
/// aggregation must recombine numerators and denominators; a roster's FG% is
/// never the mean of individual FG% values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub games: u32,
    pub minutes: u32,
    pub fgm: u32,
    pub fga: u32,
    pub fg_pct: f64,
    pub three_pm: u32,
    pub ftm: u32,
    pub fta: u32,
    pub ft_pct: f64,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub points: u32,
}

impl PlayerRecord {
    /// The clustering-input value for one category.
    ///
    /// Percentage categories use the raw rate; counting categories use the
    /// season total. Standardization happens downstream.
    pub fn category_value(&self, category: Category) -> f64 {
        match category {
            Category::FgPct => self.fg_pct,
            Category::ThreePointers => self.three_pm as f64,
            Category::FtPct => self.ft_pct,
            Category::Rebounds => self.rebounds as f64,
            Category::Assists => self.assists as f64,
            Category::Steals => self.steals as f64,
            Category::Blocks => self.blocks as f64,
            Category::Turnovers => self.turnovers as f64,
            Category::Points => self.points as f64,
        }
    }

    /// This player's full clustering-input row, in `Category::ALL` order.
    pub fn clustering_row(&self) -> StatVector {
        let mut row = [0.0; CATEGORY_COUNT];
        for cat in Category::ALL {
            row[cat.index()] = self.category_value(cat);
        }
        row
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerCsvError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private) — Basketball-Reference totals format
// ---------------------------------------------------------------------------

/// Basketball-Reference season-totals row. Counting stats are f64 so the
/// loader also accepts per-game or projected exports with fractional values.
/// Extra columns (Age, GS, ORB, DRB, PF, ...) are ignored.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawSeasonTotals {
    Player: String,
    Pos: String,
    #[serde(default, alias = "Team")]
    Tm: String,
    G: f64,
    MP: f64,
    FG: f64,
    FGA: f64,
    #[serde(rename = "FG%", default)]
    FgPct: Option<f64>,
    #[serde(rename = "3P")]
    ThreeP: f64,
    FT: f64,
    FTA: f64,
    #[serde(rename = "FT%", default)]
    FtPct: Option<f64>,
    TRB: f64,
    AST: f64,
    STL: f64,
    BLK: f64,
    TOV: f64,
    PTS: f64,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Rate fallback when a percentage column is blank: recompute from totals.
fn pct_or_ratio(pct: Option<f64>, made: f64, attempted: f64) -> f64 {
    match pct {
        Some(p) if p.is_finite() => p,
        _ if attempted > 0.0 => made / attempted,
        _ => 0.0,
    }
}

/// Reader-based loader (enables testing without temp files).
///
/// Malformed rows are skipped with a warning, matching the tolerance of the
/// upstream export. Integrity violations (duplicate names, unknown
/// positions) are hard errors: the pipeline's join and draft logic key on
/// them.
pub fn load_players_from_reader<R: Read>(
    rdr: R,
    min_minutes: u32,
) -> Result<Vec<PlayerRecord>, PlayerCsvError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut filtered = 0usize;

    for result in reader.deserialize::<RawSeasonTotals>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
                continue;
            }
        };

        let name = raw.Player.trim().to_string();
        if name.is_empty() {
            warn!("skipping row with empty player name");
            continue;
        }

        let position = Position::from_str_pos(&raw.Pos).ok_or_else(|| {
            PlayerCsvError::Validation(format!(
                "player '{}' has unrecognized position '{}'",
                name, raw.Pos
            ))
        })?;

        if !seen_names.insert(name.clone()) {
            return Err(PlayerCsvError::Validation(format!(
                "duplicate player row for '{}': expected season totals deduplicated upstream",
                name
            )));
        }

        let minutes = raw.MP.round() as u32;
        if minutes < min_minutes {
            filtered += 1;
            continue;
        }

        players.push(PlayerRecord {
            name,
            position,
            team: raw.Tm.trim().to_string(),
            games: raw.G.round() as u32,
            minutes,
            fgm: raw.FG.round() as u32,
            fga: raw.FGA.round() as u32,
            fg_pct: pct_or_ratio(raw.FgPct, raw.FG, raw.FGA),
            three_pm: raw.ThreeP.round() as u32,
            ftm: raw.FT.round() as u32,
            fta: raw.FTA.round() as u32,
            ft_pct: pct_or_ratio(raw.FtPct, raw.FT, raw.FTA),
            rebounds: raw.TRB.round() as u32,
            assists: raw.AST.round() as u32,
            steals: raw.STL.round() as u32,
            blocks: raw.BLK.round() as u32,
            turnovers: raw.TOV.round() as u32,
            points: raw.PTS.round() as u32,
        });
    }

    if filtered > 0 {
        info!(
            "filtered {} low-usage players (< {} minutes)",
            filtered, min_minutes
        );
    }

    Ok(players)
}

/// Load the player pool from a season-totals CSV on disk.
pub fn load_players(path: &Path, min_minutes: u32) -> Result<Vec<PlayerRecord>, PlayerCsvError> {
    let file = std::fs::File::open(path).map_err(|e| PlayerCsvError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file, min_minutes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Player,Pos,Tm,G,MP,FG,FGA,FG%,3P,FT,FTA,FT%,TRB,AST,STL,BLK,TOV,PTS";

    fn load(csv: &str) -> Result<Vec<PlayerRecord>, PlayerCsvError> {
        load_players_from_reader(csv.as_bytes(), 0)
    }

    #[test]
    fn position_parsing_handles_hybrids() {
        assert_eq!(Position::from_str_pos("PG"), Some(Position::PointGuard));
        assert_eq!(Position::from_str_pos("SG-PG"), Some(Position::ShootingGuard));
        assert_eq!(Position::from_str_pos("PF-C"), Some(Position::PowerForward));
        assert_eq!(Position::from_str_pos("c"), Some(Position::Center));
        assert_eq!(Position::from_str_pos("F"), None);
        assert_eq!(Position::from_str_pos(""), None);
    }

    #[test]
    fn category_indices_match_all_order() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn only_turnovers_invert() {
        for cat in Category::ALL {
            assert_eq!(cat.lower_is_better(), cat == Category::Turnovers);
        }
    }

    #[test]
    fn loads_well_formed_rows() {
        let csv = format!(
            "{HEADER}\n\
             Ava Guard,PG,BOS,70,2400,500,1100,0.455,150,280,320,0.875,300,550,110,20,180,1430\n\
             Bea Center,C,LAL,68,2200,600,1050,0.571,5,250,400,0.625,850,150,50,140,160,1455\n"
        );
        let players = load(&csv).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Ava Guard");
        assert_eq!(players[0].position, Position::PointGuard);
        assert_eq!(players[0].fgm, 500);
        assert!((players[0].fg_pct - 0.455).abs() < 1e-12);
        assert_eq!(players[1].rebounds, 850);
    }

    #[test]
    fn blank_percentage_recomputed_from_totals() {
        let csv = format!(
            "{HEADER}\n\
             No Pct,SF,NYK,60,1500,300,750,,40,90,120,,400,200,60,30,100,730\n"
        );
        let players = load(&csv).unwrap();
        // FG% = 300/750 = 0.4, FT% = 90/120 = 0.75
        assert!((players[0].fg_pct - 0.4).abs() < 1e-12);
        assert!((players[0].ft_pct - 0.75).abs() < 1e-12);
    }

    #[test]
    fn duplicate_name_is_a_hard_error() {
        let csv = format!(
            "{HEADER}\n\
             Twice Drafted,PG,BOS,70,2400,500,1100,0.455,150,280,320,0.875,300,550,110,20,180,1430\n\
             Twice Drafted,SG,LAL,60,1800,400,900,0.444,100,200,240,0.833,250,300,80,10,120,1100\n"
        );
        let err = load(&csv).unwrap_err();
        assert!(matches!(err, PlayerCsvError::Validation(_)));
        assert!(err.to_string().contains("Twice Drafted"));
    }

    #[test]
    fn unknown_position_is_a_hard_error() {
        let csv = format!(
            "{HEADER}\n\
             Mystery Player,X,BOS,70,2400,500,1100,0.455,150,280,320,0.875,300,550,110,20,180,1430\n"
        );
        let err = load(&csv).unwrap_err();
        assert!(err.to_string().contains("Mystery Player"));
    }

    #[test]
    fn minutes_floor_filters_low_usage() {
        let csv = format!(
            "{HEADER}\n\
             Starter,PG,BOS,70,2400,500,1100,0.455,150,280,320,0.875,300,550,110,20,180,1430\n\
             Benchwarmer,SG,BOS,20,150,30,80,0.375,10,15,20,0.750,25,30,8,2,15,85\n"
        );
        let players = load_players_from_reader(csv.as_bytes(), 500).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Starter");
    }

    #[test]
    fn clustering_row_uses_category_order() {
        let csv = format!(
            "{HEADER}\n\
             Ava Guard,PG,BOS,70,2400,500,1100,0.455,150,280,320,0.875,300,550,110,20,180,1430\n"
        );
        let players = load(&csv).unwrap();
        let row = players[0].clustering_row();
        assert!((row[Category::FgPct.index()] - 0.455).abs() < 1e-12);
        assert!((row[Category::ThreePointers.index()] - 150.0).abs() < 1e-12);
        assert!((row[Category::Turnovers.index()] - 180.0).abs() < 1e-12);
        assert!((row[Category::Points.index()] - 1430.0).abs() < 1e-12);
    }
}
