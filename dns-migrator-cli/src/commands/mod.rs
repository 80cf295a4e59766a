//! 子命令实现

pub mod bind;
pub mod show;
pub mod sync;

use std::path::Path;

use anyhow::Context;
use dns_migrator_core::RecordStore;

/// Read and parse the tinydns data file.
///
/// Malformed lines are skipped and logged; an unreadable file is an error.
pub fn load_store(path: &Path) -> anyhow::Result<RecordStore> {
    let store = RecordStore::from_file(path)
        .with_context(|| format!("Cannot load tinydns data from {}", path.display()))?;
    tracing::info!(
        "Loaded {} record(s) from {}, skipped {} line(s)",
        store.len(),
        path.display(),
        store.skipped_count()
    );
    Ok(store)
}
