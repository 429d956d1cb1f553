//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `native_plants` table (reference data, one botanical name per row)
/// - `gbif_data` table (append-only observations, one row per fetched occurrence)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Native California plants (bulk imported, read-only at runtime)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS native_plants (
    id INTEGER PRIMARY KEY NOT NULL,
    botanical_name TEXT NOT NULL UNIQUE,
    common_name TEXT NULL,
    other_names TEXT NULL,
    alternative_common_names TEXT NULL,
    obsolete_names TEXT NULL,
    plant_type TEXT NULL,
    form TEXT NULL,
    is_cultivar INTEGER NOT NULL DEFAULT 0,
    rarity TEXT NULL,
    butterflies_and_moths_supported TEXT NULL,
    attracts_wildlife TEXT NULL,
    height TEXT NULL,
    width TEXT NULL,
    height_min REAL NULL,
    height_max REAL NULL,
    width_min REAL NULL,
    width_max REAL NULL,
    growth_rate TEXT NULL,
    seasonality TEXT NULL,
    flower_color TEXT NULL,
    flowering_season TEXT NULL,
    fragrance TEXT NULL,
    sun TEXT NULL,
    soil_drainage TEXT NULL,
    water_requirement TEXT NULL,
    summer_irrigation TEXT NULL,
    ease_of_care TEXT NULL,
    soil TEXT NULL,
    soil_texture TEXT NULL,
    soil_ph TEXT NULL,
    soil_toxicity TEXT NULL,
    mulch TEXT NULL,
    site_type TEXT NULL,
    elevation_min INTEGER NULL,
    elevation_max INTEGER NULL,
    rainfall_min REAL NULL,
    rainfall_max REAL NULL,
    hardiness TEXT NULL,
    sunset_zones TEXT NULL,
    communities_simplified TEXT NULL,
    communities TEXT NULL,
    nursery_availability TEXT NULL,
    companions TEXT NULL,
    special_uses TEXT NULL,
    tips TEXT NULL,
    pests TEXT NULL,
    propagation TEXT NULL,
    jepson_link TEXT NULL,
    plant_url TEXT NULL,
    qr_codes TEXT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL  -- RFC3339
);

-- ---------------------------------------------------------------------------
-- GBIF observations (append-only, one batch per job run)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS gbif_data (
    id INTEGER PRIMARY KEY NOT NULL,
    scientific_name TEXT NOT NULL,
    common_name TEXT NULL,
    occurrence_id TEXT NULL,
    observation_count INTEGER NOT NULL DEFAULT 1,
    observation_type TEXT NOT NULL DEFAULT '',
    native INTEGER NOT NULL DEFAULT 0,
    decimal_latitude REAL NULL,
    decimal_longitude REAL NULL,
    fetch_date TEXT NOT NULL, -- RFC3339
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL  -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_gbif_data_native ON gbif_data(native);
CREATE INDEX IF NOT EXISTS idx_gbif_data_fetch_date ON gbif_data(fetch_date);
"#;
