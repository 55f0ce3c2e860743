use anyhow::Result;
use oui_lookup::LookupEngine;

use super::lookup::OutputMode;

pub async fn run(engine: &LookupEngine, mode: OutputMode) -> Result<()> {
    let count = engine.update_database(None).await?;

    if mode != OutputMode::Terse {
        let updated = engine
            .last_updated()
            .await
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "Vendor database updated: {} entries, {} ({})",
            count,
            engine.cache_path().display(),
            updated
        );
    }

    Ok(())
}
