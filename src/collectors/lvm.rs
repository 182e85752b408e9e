use crate::models::volume::{LogicalVolume, VolumeGroup, VolumeType};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::process::Command;

const DEFAULT_COMMAND: &str = "lvm";

const VG_FIELDS: &str = "vg_name,vg_size,vg_free";
const LV_FIELDS: &str =
    "lv_name,vg_name,lv_full_name,lv_attr,lv_time,lv_size,data_percent,metadata_percent";

/// Read-only view of LVM state.
pub trait LvmSource {
    fn volume_groups(&self) -> Result<Vec<VolumeGroup>>;
    fn logical_volumes(&self) -> Result<Vec<LogicalVolume>>;
}

/// Runs the `lvm` binary (or a configured wrapper such as `sudo lvm`)
/// and parses its JSON report output.
#[derive(Debug, Clone, PartialEq)]
pub struct LvmCommand {
    program: String,
    leading: Vec<String>,
}

impl LvmCommand {
    /// `custom` is split on whitespace: `"/bin/sudo /sbin/lvm"` runs sudo
    /// with `/sbin/lvm` as its first argument.
    pub fn new(custom: Option<&str>) -> Self {
        let mut words = custom.unwrap_or(DEFAULT_COMMAND).split_whitespace().map(String::from);
        match words.next() {
            Some(program) => Self { program, leading: words.collect() },
            None          => Self { program: DEFAULT_COMMAND.to_string(), leading: Vec::new() },
        }
    }

    /// Full argument vector for one report subcommand (`vgs` / `lvs`).
    pub fn argv(&self, report: &str, fields: &str) -> Vec<String> {
        let mut args = self.leading.clone();
        args.push(report.to_string());
        args.extend(
            ["--reportformat", "json", "--units", "b", "--nosuffix", "-o", fields]
                .iter()
                .map(|s| s.to_string()),
        );
        args
    }

    pub fn program(&self) -> &str { &self.program }

    fn run(&self, report: &str, fields: &str) -> Result<Value> {
        let args = self.argv(report, fields);
        tracing::debug!(program = %self.program, ?args, "running lvm report");

        let out = Command::new(&self.program)
            .args(&args)
            .output()
            .with_context(|| format!("failed to execute {}", self.program))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            bail!("{} {} exited with {}: {}", self.program, report, out.status, stderr.trim());
        }

        serde_json::from_slice(&out.stdout)
            .with_context(|| format!("{} {} produced invalid JSON", self.program, report))
    }
}

impl LvmSource for LvmCommand {
    fn volume_groups(&self) -> Result<Vec<VolumeGroup>> {
        Ok(parse_vgs(&self.run("vgs", VG_FIELDS)?))
    }

    fn logical_volumes(&self) -> Result<Vec<LogicalVolume>> {
        Ok(parse_lvs(&self.run("lvs", LV_FIELDS)?))
    }
}

/// Rows of the first report section carrying `key` ("vg" or "lv").
fn report_rows<'a>(v: &'a Value, key: &str) -> Vec<&'a Value> {
    v["report"]
        .as_array()
        .map(|sections| {
            sections.iter()
                .filter_map(|s| s[key].as_array())
                .flatten()
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_vgs(v: &Value) -> Vec<VolumeGroup> {
    report_rows(v, "vg")
        .into_iter()
        .filter_map(|row| {
            let name = str_opt(&row["vg_name"])?;
            Some(VolumeGroup {
                name,
                size_bytes: num_u64(&row["vg_size"]),
                free_bytes: num_u64(&row["vg_free"]),
            })
        })
        .collect()
}

pub fn parse_lvs(v: &Value) -> Vec<LogicalVolume> {
    report_rows(v, "lv")
        .into_iter()
        .filter_map(|row| {
            let name    = str_opt(&row["lv_name"])?;
            let vg_name = str_opt(&row["vg_name"])?;
            let full_name = str_opt(&row["lv_full_name"])
                .unwrap_or_else(|| format!("{}/{}", vg_name, name));
            if !full_name.split('/').any(|part| part == vg_name) {
                tracing::debug!(%full_name, %vg_name, "skipping lv whose full name lacks its vg");
                return None;
            }
            let attr = row["lv_attr"].as_str().unwrap_or("");
            Some(LogicalVolume {
                volume_type:      VolumeType::from_attr(attr),
                time:             str_opt(&row["lv_time"]),
                size_bytes:       num_u64(&row["lv_size"]),
                data_percent:     num_f64(&row["data_percent"]),
                metadata_percent: num_f64(&row["metadata_percent"]),
                name,
                vg_name,
                full_name,
            })
        })
        .collect()
}

fn str_opt(v: &Value) -> Option<String> {
    v.as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// LVM emits every field as a string, even with --nosuffix.
fn num_u64(v: &Value) -> u64 {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0)
}

fn num_f64(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}
