mod common;

use common::{cleanup_sqlite, execute_sql, sample_native_plants, spawn_test_db};
use speciestrack::db::{ImportSummary, NativePlantCreate};

#[tokio::test]
async fn import_upserts_by_botanical_name() {
    let (db, path) = spawn_test_db("db-import-upsert").await;

    let summary = db
        .import_native_plants(sample_native_plants())
        .await
        .expect("import should succeed");
    assert_eq!(
        summary,
        ImportSummary {
            imported: 3,
            skipped: 0
        }
    );

    let first = db
        .get_native_plant("Quercus lobata")
        .await
        .expect("lookup should succeed")
        .expect("row should exist");
    assert_eq!(first.common_name.as_deref(), Some("Valley Oak"));

    db.import_native_plants(vec![NativePlantCreate::new(
        "Quercus lobata",
        Some("Valley White Oak"),
    )])
    .await
    .expect("re-import should succeed");

    let updated = db
        .get_native_plant("Quercus lobata")
        .await
        .expect("lookup should succeed")
        .expect("row should exist");
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.common_name.as_deref(), Some("Valley White Oak"));
    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at >= first.updated_at);

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn import_skips_rows_without_botanical_name() {
    let (db, path) = spawn_test_db("db-import-blank").await;

    let summary = db
        .import_native_plants(vec![
            NativePlantCreate::new("", Some("Nameless")),
            NativePlantCreate::new("  ", None),
            NativePlantCreate::new(" Arctostaphylos glauca ", Some("Bigberry Manzanita")),
        ])
        .await
        .expect("import should succeed");
    assert_eq!(
        summary,
        ImportSummary {
            imported: 1,
            skipped: 2
        }
    );

    let row = db
        .get_native_plant("Arctostaphylos glauca")
        .await
        .expect("lookup should succeed");
    assert!(row.is_some(), "botanical name should be stored trimmed");

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn get_native_plant_returns_reference_attributes() {
    let (db, path) = spawn_test_db("db-get-plant").await;
    db.import_native_plants(sample_native_plants())
        .await
        .expect("import should succeed");

    let plant = db
        .get_native_plant("Aesculus californica")
        .await
        .expect("lookup should succeed")
        .expect("row should exist");
    assert_eq!(plant.common_name.as_deref(), Some("California Buckeye"));
    assert_eq!(plant.plant_type.as_deref(), Some("Tree"));
    assert_eq!(plant.butterflies_and_moths_supported.as_deref(), Some("45"));
    assert_eq!(plant.sunset_zones.as_deref(), Some("4-10, 12-24"));
    assert!(!plant.is_cultivar);
    assert!(plant.jepson_link.is_none());

    let missing = db
        .get_native_plant("Aesculus")
        .await
        .expect("lookup should succeed");
    assert!(missing.is_none());

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn find_native_plant_tries_exact_then_prefix() {
    let (db, path) = spawn_test_db("db-find-plant").await;
    db.import_native_plants(sample_native_plants())
        .await
        .expect("import should succeed");

    let exact = db
        .find_native_plant("Eschscholzia californica")
        .await
        .expect("lookup should succeed")
        .expect("exact match expected");
    assert_eq!(exact.botanical_name, "Eschscholzia californica");
    assert_eq!(exact.common_name.as_deref(), Some("California Poppy"));

    let prefixed = db
        .find_native_plant("Eschscholzia californica Cham.")
        .await
        .expect("lookup should succeed")
        .expect("prefix match expected");
    assert_eq!(prefixed.id, exact.id);

    let case_mismatch = db
        .find_native_plant("eschscholzia californica Cham.")
        .await
        .expect("lookup should succeed");
    assert!(case_mismatch.is_none());

    let genus_only = db
        .find_native_plant("Eschscholzia")
        .await
        .expect("lookup should succeed");
    assert!(genus_only.is_none());

    let unknown = db
        .find_native_plant("Eucalyptus globulus Labill.")
        .await
        .expect("lookup should succeed");
    assert!(unknown.is_none());

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn prefix_match_prefers_the_shortest_botanical_name() {
    let (db, path) = spawn_test_db("db-find-tiebreak").await;
    db.import_native_plants(vec![
        NativePlantCreate::new("Arctostaphylos glauca 'Los Osos'", Some("Los Osos Manzanita")),
        NativePlantCreate::new("Arctostaphylos glauca", Some("Bigberry Manzanita")),
    ])
    .await
    .expect("import should succeed");

    let found = db
        .find_native_plant("Arctostaphylos glauca Lindl.")
        .await
        .expect("lookup should succeed")
        .expect("prefix match expected");
    assert_eq!(found.botanical_name, "Arctostaphylos glauca");
    assert_eq!(found.common_name.as_deref(), Some("Bigberry Manzanita"));

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn list_native_escapes_like_wildcards() {
    let (db, path) = spawn_test_db("db-like-escape").await;
    db.import_native_plants(sample_native_plants())
        .await
        .expect("import should succeed");
    db.store_observations(
        vec![speciestrack::OccurrenceRecord::named("Quercus lobata")],
        chrono::Utc::now(),
    )
    .await
    .expect("store should succeed");

    let filter = speciestrack::db::ObservationFilter {
        common_name: Some("%".to_string()),
        ..Default::default()
    };
    let rows = db
        .list_native_observations(filter)
        .await
        .expect("list should succeed");
    assert!(rows.is_empty());

    cleanup_sqlite(&path);
}

#[tokio::test]
async fn import_losing_its_transaction_keeps_no_rows() {
    let (db, path) = spawn_test_db("db-import-rollback").await;
    execute_sql(
        &path,
        "CREATE TRIGGER drop_import_on_marked_name BEFORE INSERT ON native_plants \
         WHEN NEW.botanical_name = 'Kill batch' \
         BEGIN SELECT RAISE(ROLLBACK, 'tx gone'); END",
    )
    .await;

    let res = db
        .import_native_plants(vec![
            NativePlantCreate::new("Quercus lobata", Some("Valley Oak")),
            NativePlantCreate::new("Kill batch", None),
            NativePlantCreate::new("Aesculus californica", Some("California Buckeye")),
        ])
        .await;
    assert!(res.is_err(), "lost transaction should fail the import");

    for name in ["Quercus lobata", "Aesculus californica"] {
        let row = db.get_native_plant(name).await.expect("lookup should succeed");
        assert!(row.is_none(), "{name} should not have been committed");
    }

    let summary = db
        .import_native_plants(sample_native_plants())
        .await
        .expect("actor should recover for the next import");
    assert_eq!(summary.imported, 3);

    cleanup_sqlite(&path);
}
