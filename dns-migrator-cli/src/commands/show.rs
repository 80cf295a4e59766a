//! `show`: list hosted zones and their existing record sets

use std::sync::Arc;

use dns_migrator_core::{ProviderSync, SyncOptions};
use dns_migrator_provider::HostedZoneProvider;

use crate::config::{Config, Target};

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate(Target::Provider)?;
    let provider = dns_migrator_provider::create_provider(
        config.credentials()?,
        config.provider.max_retries,
    )?;
    show(provider).await
}

async fn show(provider: Arc<dyn HostedZoneProvider>) -> anyhow::Result<()> {
    let sync = ProviderSync::new(provider, SyncOptions::default());
    let zones = sync.list_zones().await?;

    for zone in &zones {
        let Some(zone_id) = zone.id.as_deref() else {
            continue;
        };
        println!("{} ({zone_id})", zone.name);
        match sync.fetch_existing_records(zone_id).await {
            Ok(record_sets) => {
                for rs in record_sets {
                    let ttl = rs.ttl.map_or_else(|| "-".to_string(), |t| t.to_string());
                    println!(
                        "    {:<6} {:<45} {:>6}  {}",
                        rs.record_type,
                        rs.name,
                        ttl,
                        rs.values.join(" | ")
                    );
                }
            }
            Err(e) => tracing::warn!("Failed to get record sets of {}: {e}", zone.name),
        }
    }
    Ok(())
}
