// Simulation engine: 9-category matchup scoring and the Monte Carlo driver.

pub mod driver;
pub mod matchup;
