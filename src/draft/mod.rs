// Draft pool and roster drafting: tier mapping, constrained sampling,
// declarative draft scripts.

pub mod pool;
pub mod roster;
pub mod script;
