//! Minimal demo: share a counter with every other process pointed at the
//! same aggregator.
//!
//! Run an aggregator on localhost:5000, then start this example in two or
//! more terminals and watch the merged view grow.

use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use syncmap::{FieldMap, FilterSet, Patch, SyncConfig, SyncedMap};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let identifier = format!("game-{}", rand::thread_rng().gen_range(1000..10_000));
    let filter: FilterSet = [identifier.as_str()].into_iter().collect();

    let status = SyncedMap::over_http(
        "http://localhost:5000/update",
        filter,
        SyncConfig::default(),
    )?;
    status.start();

    println!("this is game {identifier}");
    for i in 0..10 {
        let mut fields = FieldMap::new();
        fields.insert("value".to_string(), i.into());
        status.update(Patch::single(identifier.as_str(), fields));

        tokio::time::sleep(Duration::from_secs(1)).await;
        println!("{:#?}", status.all());
    }

    status.stop().await;
    Ok(())
}
