use serde_json::json;
use stormdb::engine::local_file::LocalFileEngine;
use stormdb::errors::StormResult;
use stormdb::StormDb;
use stormdb_int_test::test_util::TempFile;

fn main() -> StormResult<()> {
    println!("Starting stress test...");
    let file = TempFile::new();
    let db = StormDb::open(LocalFileEngine::new(file.path()))?;
    db.default(json!({"records": []}))?;

    let count = 100_000;
    let records = db.get("records");
    let start = std::time::Instant::now();
    for _ in 0..count {
        records.push(json!({
            "first_name": uuid::Uuid::new_v4().to_string(),
            "last_name": uuid::Uuid::new_v4().to_string(),
            "processed": false,
        }))?;
    }
    println!("Pushed {} records in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    db.save()?;
    println!("Saved {} records in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let reopened = StormDb::open(LocalFileEngine::new(file.path()))?;
    println!(
        "Reopened {} records in {:?}",
        reopened.get("records").length()?,
        start.elapsed()
    );
    Ok(())
}
