//! Monitor-stream decoding into update records.

use serde::Deserialize;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, error, warn};
use vrfsync_types::{AddressFamily, ParseError, Route, RoutePrefix, VrfId};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::update::{RouteUpdate, SyncHandle};

/// One decoded line of the monitor stream, using the toolkit's wire names.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorRecord {
    #[serde(rename = "Operation")]
    pub operation: String,
    #[serde(rename = "Family")]
    pub family: String,
    pub vrf_id: VrfId,
    #[serde(rename = "Prefix")]
    pub prefix_len: u8,
    #[serde(rename = "Address")]
    pub address: String,
    pub nh_id: u32,
}

impl MonitorRecord {
    /// Builds the route this record describes.
    fn route(&self) -> std::result::Result<Route, ParseError> {
        let address = self
            .address
            .parse()
            .map_err(|_| ParseError::InvalidAddress(self.address.clone()))?;
        let prefix = RoutePrefix::new(address, self.prefix_len)?;
        Ok(Route::new(prefix, self.nh_id))
    }
}

/// Normalizes one decoded record into an update record.
///
/// Returns `None` when the record is filtered: wrong address family,
/// unknown operation, or a prefix that does not assemble.
pub fn normalize(record: &MonitorRecord, family: AddressFamily) -> Option<RouteUpdate> {
    if record.family != family.as_str() {
        debug!(family = %record.family, "ignoring record for unsupported family");
        return None;
    }

    let route = match record.route() {
        Ok(route) => route,
        Err(e) => {
            warn!(error = %e, vrf_id = record.vrf_id, "ignoring record with malformed prefix");
            return None;
        }
    };

    match record.operation.as_str() {
        "add" => Some(RouteUpdate::AddRoute {
            vrf_id: record.vrf_id,
            route,
        }),
        "delete" => Some(RouteUpdate::DelRoute {
            vrf_id: record.vrf_id,
            route,
        }),
        op => {
            debug!(operation = %op, "ignoring record with unknown operation");
            None
        }
    }
}

/// Reads the monitor stream line by line, enqueueing the updates it yields.
///
/// Runs until the stream ends or a read fails. Either way the stream is
/// gone for good: route events stop flowing while the rest of the daemon
/// keeps running on lifecycle records.
pub async fn run_monitor<R>(reader: R, handle: SyncHandle, family: AddressFamily) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let record: MonitorRecord = match serde_json::from_str(&line) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(error = %e, line = %line, "undecodable monitor line");
                        continue;
                    }
                };
                if let Some(update) = normalize(&record, family) {
                    handle.send(update);
                }
            }
            Ok(None) => {
                warn!("monitor stream closed");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "monitor stream read failed");
                return Err(e.into());
            }
        }
    }
}

/// Spawns `<rt> --monitor` and returns the child plus its buffered stdout.
///
/// The child is killed when dropped, so the caller must keep it alive for
/// as long as the stream should run.
pub fn spawn_monitor(config: &SyncConfig) -> Result<(Child, BufReader<ChildStdout>)> {
    let command = format!("{} --monitor", config.rt_path);
    let mut child = Command::new(&config.rt_path)
        .arg("--monitor")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SyncError::spawn(&command, e))?;

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            return Err(SyncError::spawn(
                &command,
                std::io::Error::other("monitor stdout not captured"),
            ));
        }
    };

    Ok((child, BufReader::new(stdout)))
}
