//! Matching GBIF scientific names against the native plant reference table.
//!
//! GBIF names often carry the taxonomic authority ("Quercus lobata Née",
//! "Artemisia californica Less.") while the reference table stores the bare
//! binomial. Lookup is an exact match first, then a case-sensitive prefix match
//! on the first two tokens (genus + species).
//!
//! The prefix match is a heuristic: "Quercus lobata" also prefixes a cultivar
//! row such as "Quercus lobata 'Big Oak'". When several rows share the prefix
//! the shortest botanical name wins, then the lowest id.

use crate::db::models::NativePlantMatch;
use sqlx::SqliteConnection;

/// First two whitespace-separated tokens of `scientific_name`, joined by one space.
pub fn genus_species(scientific_name: &str) -> Option<String> {
    let mut words = scientific_name.split_whitespace();
    let genus = words.next()?;
    let species = words.next()?;
    Some(format!("{genus} {species}"))
}

pub async fn find_native_plant(
    conn: &mut SqliteConnection,
    scientific_name: &str,
) -> Result<Option<NativePlantMatch>, sqlx::Error> {
    let exact = sqlx::query_as::<_, NativePlantMatch>(
        r#"
        SELECT id, botanical_name, common_name
        FROM native_plants
        WHERE botanical_name = ?
        LIMIT 1
        "#,
    )
    .bind(scientific_name)
    .fetch_optional(&mut *conn)
    .await?;

    if exact.is_some() {
        return Ok(exact);
    }

    let Some(prefix) = genus_species(scientific_name) else {
        return Ok(None);
    };

    sqlx::query_as::<_, NativePlantMatch>(
        r#"
        SELECT id, botanical_name, common_name
        FROM native_plants
        WHERE substr(botanical_name, 1, length(?)) = ?
        ORDER BY length(botanical_name), id
        LIMIT 1
        "#,
    )
    .bind(&prefix)
    .bind(&prefix)
    .fetch_optional(&mut *conn)
    .await
}
