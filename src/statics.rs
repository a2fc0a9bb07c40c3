// Central place for UI strings and data-shape constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// External links
pub const GITHUB_URL: &str = "https://github.com/jdex-app/jdex";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "JDEX: JSON Data Explorer";

pub const EN_PAGE_EXPLORER: &str = "Explorer";
pub const EN_PAGE_GROWTH: &str = "Growth Demo";

pub const EN_BTN_IMPORT: &str = "Import...";
pub const EN_BTN_EXPORT: &str = "Export...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_RELOAD_FIXTURE: &str = "Reload Fixture";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_ABOUT_HEADING: &str = "JDEX: JSON Data Explorer";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_BLURB: &str =
    "Explore heterogeneous JSON collections and a small urban-growth demo.";
pub const EN_PROJECT_REPO: &str = "GitHub Repo";

pub const EN_LABEL_SEARCH: &str = "Search:";
pub const EN_HINT_SEARCH: &str = "any field";
pub const EN_BTN_CLEAR_FILTERS: &str = "Clear Filters";
pub const EN_MENU_COLUMNS: &str = "Columns";

pub const EN_LABEL_FILTER: &str = "Filter:";
pub const EN_HINT_FILTER: &str = "pattern";
pub const EN_CHECKBOX_EXACT: &str = "Exact";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_GLYPH_FILTER: &str = "v";
pub const EN_GLYPH_FILTER_ACTIVE: &str = "v*";

pub const EN_BTN_EDIT: &str = "Edit";
pub const EN_BTN_APPLY: &str = "Apply";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BADGE_MODIFIED: &str = "Modified";

pub const EN_STATUS_NO_RECORDS: &str = "No records.";
pub const EN_STATUS_ROWS_SHOWN: &str = "shown";
pub const EN_STATUS_ROWS_OF: &str = "of";

pub const EN_HEADING_GROWTH: &str = "Urban Growth Indicators";
pub const EN_GROWTH_INTRO: &str =
    "Computed from the bundled built-up area and population fixtures.";
pub const EN_LABEL_AREA_T: &str = "Built-up area (t)";
pub const EN_LABEL_AREA_TN: &str = "Built-up area (t+n)";
pub const EN_LABEL_ADMIN_FEATURES: &str = "Admin boundary features";
pub const EN_LABEL_WINDOW: &str = "Time window";
pub const EN_LABEL_YEARS: &str = "Years elapsed";
pub const EN_LABEL_POP_T: &str = "Population (t)";
pub const EN_LABEL_POP_TN: &str = "Population (t+n)";
pub const EN_LABEL_LCR: &str = "Land Consumption Rate";
pub const EN_LABEL_PGR: &str = "Population Growth Rate";
pub const EN_LABEL_RATIO: &str = "LCR / PGR";
pub const EN_UNIT_SQM: &str = "m^2";
pub const EN_LITERAL_UNDEFINED: &str = "-";

pub const EN_ERR_IMPORT_PREFIX: &str = "Import failed:";
pub const EN_ERR_EXPORT_PREFIX: &str = "Export failed:";
pub const EN_ERR_FIXTURE_PREFIX: &str = "Could not load fixtures:";
pub const EN_ERR_EDIT_PREFIX: &str = "Edit failed:";

pub const EN_EMPTY: &str = "";

// Known field names of the bundled crosswalk collection (CW_ prefix).
pub const CW_FIELD_UNSD_CODE: &str = "unsd_code";
pub const CW_FIELD_ID: &str = "id";
pub const CW_FIELD_INDICATOR: &str = "indicator";
pub const CW_FIELD_TITLE: &str = "title";
pub const CW_FIELD_TIER: &str = "tier";
pub const CW_FIELD_LADM_LINK: &str = "ladmLink";
pub const CW_FIELD_EXTERNAL_DATA: &str = "externalData";

/// Fields probed, in order, for a record's derived identity key.
pub const IDENTITY_PRIORITY_FIELDS: [&str; 3] =
    [CW_FIELD_UNSD_CODE, CW_FIELD_ID, CW_FIELD_INDICATOR];

/// Separator between the derived key and the positional index.
pub const IDENTITY_SEPARATOR: char = '#';

/// Columns visible by default when any of them exist in the collection.
pub const VISIBLE_PRIORITY_FIELDS: [&str; 5] = [
    CW_FIELD_INDICATOR,
    CW_FIELD_TITLE,
    CW_FIELD_TIER,
    CW_FIELD_LADM_LINK,
    CW_FIELD_EXTERNAL_DATA,
];

/// Fallback: how many leading fields default to visible when no priority
/// field exists.
pub const DEFAULT_VISIBLE_COUNT: usize = 6;

// Fixture files (relative to the fixtures directory).
pub const FIXTURES_DIR: &str = "fixtures";
pub const FIXTURE_CROSSWALK: &str = "crosswalk.v1.json";
pub const FIXTURE_BUILT_UP_T: &str = "built_up_t.geojson";
pub const FIXTURE_BUILT_UP_TN: &str = "built_up_tn.geojson";
pub const FIXTURE_ADMIN_UNIT: &str = "admin_unit.geojson";
pub const FIXTURE_POPULATIONS: &str = "populations.json";

// Export naming: exported-data-<ISO-date>.json
pub const EXPORT_FILE_PREFIX: &str = "exported-data-";
pub const EXPORT_FILE_EXT: &str = "json";
