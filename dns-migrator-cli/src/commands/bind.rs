//! `bind`: tinydns → BIND zone files

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use dns_migrator_core::{BindZoneRenderer, RecordStore};

use crate::config::{Config, Target};

#[derive(Debug, Clone, Args)]
pub struct BindArgs {
    /// Zone to render (repeatable); replaces `[bind] zones`
    #[arg(short = 'z', long = "zone", value_name = "ZONE")]
    pub zones: Vec<String>,

    /// Directory receiving one file per zone
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// One zone file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenZone {
    pub zone: String,
    pub path: PathBuf,
    pub record_lines: usize,
}

pub fn run(mut config: Config, args: BindArgs) -> anyhow::Result<()> {
    if !args.zones.is_empty() {
        config.bind.zones = args.zones;
    }
    if let Some(dir) = args.output_dir {
        config.bind.output_dir = dir;
    }
    config.validate(Target::Bind)?;

    let store = super::load_store(&config.data_path)?;
    let renderer = BindZoneRenderer::new(config.bind.renderer_options());
    let written = write_zone_files(&renderer, &config.bind.zones, &store, &config.bind.output_dir)?;

    for zone in &written {
        println!(
            "{:<30} {:>6} record line(s)  -> {}",
            zone.zone,
            zone.record_lines,
            zone.path.display()
        );
    }
    println!("{} source line(s) skipped", store.skipped_count());
    Ok(())
}

/// Render every zone and write it to `<output_dir>/<zone>`.
pub fn write_zone_files(
    renderer: &BindZoneRenderer,
    zones: &[String],
    store: &RecordStore,
    output_dir: &Path,
) -> anyhow::Result<Vec<WrittenZone>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

    renderer
        .render_zones(zones, store)
        .into_iter()
        .map(|rendered| {
            let path = output_dir.join(&rendered.zone);
            std::fs::write(&path, &rendered.text)
                .with_context(|| format!("Cannot write zone file {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
            Ok(WrittenZone {
                zone: rendered.zone,
                path,
                record_lines: rendered.record_lines,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dns_migrator_core::BindZoneOptions;

    const DATA: &str = "\
+www.artofliving.org:192.0.2.10:300
+artofliving.org:192.0.2.1:600
@artofliving.org::mx1.artofliving.org:10:3600
'srisriravishankar.org:v=spf1 -all:300
+www.artofliving.org.de:192.0.2.99:300
";

    #[test]
    fn writes_one_file_per_zone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("zones");
        let store = RecordStore::parse(DATA);
        let renderer = BindZoneRenderer::new(BindZoneOptions::default());
        let zones = vec![
            "artofliving.org".to_string(),
            "srisriravishankar.org".to_string(),
        ];

        let written = write_zone_files(&renderer, &zones, &store, &out).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(written[0].path, out.join("artofliving.org"));
        assert_eq!(written[0].record_lines, 3);
        assert_eq!(written[1].record_lines, 1);

        let text = std::fs::read_to_string(out.join("artofliving.org")).unwrap();
        assert!(text.starts_with("$TTL 3600\n"));
        assert!(text.contains("IN  NS    ns1.artofliving.org."));
        assert!(!text.contains("192.0.2.99"));
        assert!(out.join("srisriravishankar.org").exists());
    }

    #[test]
    fn run_uses_cli_zones_and_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::write(&data, DATA).unwrap();

        let config = Config {
            data_path: data,
            ..Config::default()
        };
        run(
            config,
            BindArgs {
                zones: vec!["artofliving.org".to_string()],
                output_dir: Some(dir.path().to_path_buf()),
            },
        )
        .unwrap();

        assert!(dir.path().join("artofliving.org").exists());
        assert!(!dir.path().join("srisriravishankar.org").exists());
    }

    #[test]
    fn missing_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_path: dir.path().join("absent"),
            ..Config::default()
        };
        let result = run(
            config,
            BindArgs {
                zones: vec!["artofliving.org".to_string()],
                output_dir: Some(dir.path().to_path_buf()),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn no_zones_is_a_config_error() {
        let result = run(
            Config::default(),
            BindArgs {
                zones: Vec::new(),
                output_dir: None,
            },
        );
        assert!(result.is_err());
    }
}
