//! Bulk route loading from the toolkit's dump output.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
use vrfsync_types::{Route, RoutePrefix, VrfId};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

/// Human-readable header lines at the top of a dump.
const DUMP_HEADER_LINES: usize = 3;
/// Field count of a well-formed dump row.
const DUMP_ROW_FIELDS: usize = 6;
/// Position of the prefix in a dump row.
const DUMP_PREFIX_FIELD: usize = 0;
/// Position of the next-hop id in a dump row.
const DUMP_NEXTHOP_FIELD: usize = 4;

/// Source of bulk routing-table dumps, one domain at a time.
#[async_trait]
pub trait RouteDump: Send + Sync {
    /// Returns the raw dump output for `vrf_id`.
    async fn dump(&self, vrf_id: VrfId) -> Result<String>;
}

/// Dump source backed by the route toolkit binary (`<rt> --dump <id>`).
#[derive(Debug, Clone)]
pub struct RtDump {
    rt_path: String,
}

impl RtDump {
    pub fn new(config: &SyncConfig) -> Self {
        RtDump {
            rt_path: config.rt_path.clone(),
        }
    }
}

#[async_trait]
impl RouteDump for RtDump {
    async fn dump(&self, vrf_id: VrfId) -> Result<String> {
        let command = format!("{} --dump {}", self.rt_path, vrf_id);
        debug!(%command, "requesting routing table dump");

        let output = Command::new(&self.rt_path)
            .arg("--dump")
            .arg(vrf_id.to_string())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| SyncError::spawn(&command, e))?;

        if !output.status.success() {
            return Err(SyncError::command_failed(
                &command,
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parses dump output into a deduplicated route list.
///
/// The first three lines are a header. Each remaining line must split into
/// exactly six whitespace-separated fields: field 0 is the prefix, field 4
/// the decimal next-hop id. Rows that do not parse are skipped. Next-hop
/// ids 0 and 1 are the dataplane's "no next hop" and "discard" sentinels
/// and never become routes.
pub fn parse_dump(output: &str) -> Vec<Route> {
    let mut routes: Vec<Route> = Vec::new();

    for line in output.lines().skip(DUMP_HEADER_LINES) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != DUMP_ROW_FIELDS {
            continue;
        }

        let prefix: RoutePrefix = match fields[DUMP_PREFIX_FIELD].parse() {
            Ok(prefix) => prefix,
            Err(e) => {
                debug!(line = %line, error = %e, "skipping dump row with bad prefix");
                continue;
            }
        };
        let nexthop_id: u32 = match fields[DUMP_NEXTHOP_FIELD].parse() {
            Ok(id) => id,
            Err(_) => {
                debug!(line = %line, "skipping dump row with non-numeric next-hop");
                continue;
            }
        };
        // 0 and 1 mean "no next hop" and "discard"
        if nexthop_id == 0 || nexthop_id == 1 {
            continue;
        }

        let route = Route::new(prefix, nexthop_id);
        if !routes.contains(&route) {
            routes.push(route);
        }
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DUMP: &str = "\
Match routes in vRouter inet4 table 0/2/unicast
Flags: L=Label Valid, P=Proxy ARP

Destination PPL Flags Label Nexthop Stitched(MAC)
10.0.0.0/24 32 P - 21 -
10.4.4.0/24 32 P - 0 -
10.4.5.0/24 32 P - 1 -
169.254.0.3/32 32 P - 24 2:85:bf:53:0b:65(201)
0.0.0.0/0 0 - 8 -
10.9.9.0/24 32 LP - abc -
10.0.0.0/24 32 P - 21 -
";

    #[test]
    fn test_parse_dump_extracts_well_formed_rows() {
        let routes = parse_dump(SAMPLE_DUMP);
        let nexthops: Vec<u32> = routes.iter().map(|r| r.nexthop_id).collect();
        assert_eq!(nexthops, vec![21, 24]);
        assert_eq!(routes[0].prefix.to_string(), "10.0.0.0/24");
        assert_eq!(routes[1].prefix.to_string(), "169.254.0.3/32");
    }

    #[test]
    fn test_parse_dump_filters_sentinel_nexthops() {
        let routes = parse_dump(SAMPLE_DUMP);
        assert!(routes.iter().all(|r| r.nexthop_id > 1));
    }

    #[test]
    fn test_parse_dump_skips_column_caption_and_short_rows() {
        // the caption row does not parse as a prefix, and the default-route
        // row has only five fields
        let routes = parse_dump(SAMPLE_DUMP);
        assert!(routes.iter().all(|r| r.prefix.length() > 0));
    }

    #[test]
    fn test_parse_dump_deduplicates() {
        let routes = parse_dump(SAMPLE_DUMP);
        assert_eq!(
            routes
                .iter()
                .filter(|r| r.prefix.to_string() == "10.0.0.0/24")
                .count(),
            1
        );
    }

    #[test]
    fn test_parse_dump_header_only() {
        let output = "line one\nline two\nline three\n";
        assert!(parse_dump(output).is_empty());
        assert!(parse_dump("").is_empty());
    }

    #[cfg(unix)]
    fn fake_rt(script_body: &str) -> (tempfile::TempDir, SyncConfig) {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt");
        std::fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();

        let config = SyncConfig::new().with_rt_path(path.to_string_lossy());
        (dir, config)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rt_dump_captures_stdout() {
        let (_dir, config) = fake_rt("echo \"args: $@\"");
        let output = RtDump::new(&config).dump(42).await.unwrap();
        assert_eq!(output.trim(), "args: --dump 42");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rt_dump_nonzero_exit_is_error() {
        let (_dir, config) = fake_rt("echo oops >&2\nexit 3");
        let err = RtDump::new(&config).dump(1).await.unwrap_err();
        match err {
            SyncError::CommandFailed { stderr, .. } => assert!(stderr.contains("oops")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rt_dump_missing_binary_is_spawn_error() {
        let config = SyncConfig::new().with_rt_path("/nonexistent/rt-binary");
        let err = RtDump::new(&config).dump(1).await.unwrap_err();
        assert!(matches!(err, SyncError::Spawn { .. }));
    }
}
