use crate::cli::conf::compile;
use crate::runtime::ConfigurationSummary;
use serde::Serialize;
use std::path::PathBuf;

/// Prints the compiled routing table. JSON unless `yaml` is set.
pub fn dump(path: PathBuf, port: Option<u16>, json: bool, yaml: bool) -> anyhow::Result<()> {
    let conf = compile(&path, port)?;
    let summary = ConfigurationSummary::from(&conf);

    match (json, yaml) {
        (_, true) => dump_yaml(&summary),
        _ => dump_json(&summary),
    }
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

fn dump_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_yaml::to_string(value)?;
    println!("{s}");
    Ok(())
}
