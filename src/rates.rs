use geo::ChamberlainDuquetteArea;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// The population fixture: `{t, t_n, population_t, population_tn}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationWindow {
    pub t: i32,
    pub t_n: i32,
    pub population_t: f64,
    pub population_tn: f64,
}

/// Annualized urban-growth indicators. Fields are `None` (not zero) when
/// their inputs are non-positive or the ratio would divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaStats {
    pub years: i32,
    pub lcr: Option<f64>,
    pub pgr: Option<f64>,
    pub ratio: Option<f64>,
}

/// Closed-form LCR/PGR computation. Never errors: non-positive inputs
/// degrade to absent fields so the caller can render a dash.
pub fn compute_rates(
    area_t: f64,
    area_tn: f64,
    t: i32,
    t_n: i32,
    pop_t: f64,
    pop_tn: f64,
) -> AreaStats {
    // Floor of one year; a clamp, not an error path.
    let years = (t_n - t).max(1);
    let span = f64::from(years);

    let lcr = (area_t > 0.0 && area_tn > 0.0).then(|| (area_tn / area_t).ln() / span);
    let pgr = (pop_t > 0.0 && pop_tn > 0.0).then(|| (pop_tn / pop_t).ln() / span);

    let ratio = match (lcr, pgr) {
        (Some(l), Some(p)) if p != 0.0 => Some(l / p),
        _ => None,
    };

    AreaStats {
        years,
        lcr,
        pgr,
        ratio,
    }
}

/// Total Chamberlain-Duquette unsigned area (m² on the WGS84 sphere) of
/// every feature geometry in the collection. Features without geometry or
/// with non-areal geometry contribute zero.
pub fn total_area_m2(collection: &FeatureCollection) -> f64 {
    collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .filter_map(|geometry| geo::Geometry::<f64>::try_from(geometry.clone()).ok())
        .map(|geometry| geometry.chamberlain_duquette_unsigned_area())
        .sum()
}

/// The four parsed growth-demo fixtures.
#[derive(Debug, Clone)]
pub struct GrowthFixtures {
    pub built_up_t: FeatureCollection,
    pub built_up_tn: FeatureCollection,
    pub admin_unit: FeatureCollection,
    pub populations: PopulationWindow,
}

/// Everything the growth page displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthSummary {
    pub area_t_m2: f64,
    pub area_tn_m2: f64,
    pub admin_features: usize,
    pub window: PopulationWindow,
    pub stats: AreaStats,
}

pub fn summarize_growth(fixtures: &GrowthFixtures) -> GrowthSummary {
    let area_t_m2 = total_area_m2(&fixtures.built_up_t);
    let area_tn_m2 = total_area_m2(&fixtures.built_up_tn);
    let window = fixtures.populations;

    GrowthSummary {
        area_t_m2,
        area_tn_m2,
        admin_features: fixtures.admin_unit.features.len(),
        window,
        stats: compute_rates(
            area_t_m2,
            area_tn_m2,
            window.t,
            window.t_n,
            window.population_t,
            window.population_tn,
        ),
    }
}
