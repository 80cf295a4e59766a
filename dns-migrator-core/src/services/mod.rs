//! 业务逻辑服务层

mod bind_zone_renderer;
mod provider_sync;
mod sync_planner;

pub use bind_zone_renderer::{BindZoneOptions, BindZoneRenderer, RenderedZone};
pub use provider_sync::{ProviderSync, SyncOptions};
pub use sync_planner::{
    TXT_CHUNK_LEN, change_comment, encode_txt_value, merge_mx_value, plan_changes,
};
