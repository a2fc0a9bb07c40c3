//! Core library for JDEX, a JSON data explorer paired with a small
//! urban-growth demo. Provides an ordered record store with global and
//! per-field filtering, single-session inline editing, JSON import/export,
//! and closed-form LCR/PGR growth indicators over GeoJSON fixtures.

mod filter;
mod fixtures;
mod gui;
mod rates;
pub mod statics;
mod store;
mod value;

pub use filter::{FieldFilter, FilterState, MatchMode, value_matches};
pub use fixtures::{default_fixtures_dir, load_crosswalk, load_growth_fixtures};
pub use gui::run_gui;
pub use rates::{
    AreaStats, GrowthFixtures, GrowthSummary, PopulationWindow, compute_rates, summarize_growth,
    total_area_m2,
};
pub use store::{ImportError, Record, RecordStore, StoreError};
pub use value::{JdNumber, JdValue};
