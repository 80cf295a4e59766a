//! `sync`: upsert tinydns records into the provider's hosted zones

use clap::Args;
use dns_migrator_core::{ProviderSync, SyncOptions};

use crate::config::{Config, Target};

#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Log planned change batches without submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Log existing record sets of every zone first
    #[arg(long)]
    pub show_existing: bool,

    /// Change batches in flight at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
}

pub async fn run(mut config: Config, args: SyncArgs) -> anyhow::Result<()> {
    if let Some(concurrency) = args.concurrency {
        config.sync.concurrency = concurrency;
    }
    if args.show_existing {
        config.sync.show_existing = true;
    }
    config.validate(Target::Provider)?;

    let store = super::load_store(&config.data_path)?;
    let provider = dns_migrator_provider::create_provider(
        config.credentials()?,
        config.provider.max_retries,
    )?;
    let sync = ProviderSync::new(
        provider,
        SyncOptions {
            concurrency: config.sync.concurrency,
            dry_run: args.dry_run,
            ..SyncOptions::default()
        },
    );

    // 没有 zone 列表就没有目标，直接失败
    let zones = sync.list_zones().await?;
    if config.sync.show_existing {
        sync.inspect_zones(&zones).await;
    }

    let report = sync.import_records(&zones, &store).await;
    print!("{report}");
    if !report.is_clean() {
        tracing::warn!(
            "{} upsert(s) failed; see the log for details",
            report.total_failed()
        );
    }
    Ok(())
}
