use crate::rates::{GrowthFixtures, PopulationWindow};
use crate::store::{Record, RecordStore};
use crate::statics;
use anyhow::Context;
use geojson::{FeatureCollection, GeoJson};
use std::{fs, path::Path};

/// Load the explorer's default collection: a JSON array of arbitrary
/// objects.
pub fn load_crosswalk(path: &Path) -> anyhow::Result<Vec<Record>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let records = RecordStore::import_text(&text).with_context(|| format!("parsing {path:?}"))?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load the four growth-demo inputs from `dir`. The reads are independent
/// but joined: the first failure fails the whole load, and callers fall
/// back to an error state rather than partial data.
pub fn load_growth_fixtures(dir: &Path) -> anyhow::Result<GrowthFixtures> {
    let built_up_t = read_feature_collection(&dir.join(statics::FIXTURE_BUILT_UP_T))?;
    let built_up_tn = read_feature_collection(&dir.join(statics::FIXTURE_BUILT_UP_TN))?;
    let admin_unit = read_feature_collection(&dir.join(statics::FIXTURE_ADMIN_UNIT))?;
    let populations = read_populations(&dir.join(statics::FIXTURE_POPULATIONS))?;

    Ok(GrowthFixtures {
        built_up_t,
        built_up_tn,
        admin_unit,
        populations,
    })
}

fn read_feature_collection(path: &Path) -> anyhow::Result<FeatureCollection> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let geojson = text
        .parse::<GeoJson>()
        .with_context(|| format!("parsing {path:?}"))?;
    FeatureCollection::try_from(geojson)
        .with_context(|| format!("{path:?} is not a FeatureCollection"))
}

fn read_populations(path: &Path) -> anyhow::Result<PopulationWindow> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    json5::from_str::<PopulationWindow>(&text).with_context(|| format!("parsing {path:?}"))
}

/// The bundled demo data: `fixtures/` in the working directory when
/// present, else next to the crate manifest (dev runs).
pub fn default_fixtures_dir() -> std::path::PathBuf {
    let local = Path::new(statics::FIXTURES_DIR);
    if local.is_dir() {
        return local.to_path_buf();
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(statics::FIXTURES_DIR)
}
