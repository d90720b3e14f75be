//! JSON-lines host binding.
//!
//! Drives a `Runner` from a line-oriented stream, one JSON object per line.
//! This is what a process wrapper registered with the search host talks to.
//!
//! # Protocol
//!
//! Requests:
//!
//! ```json
//! {"type": "actions"}
//! {"type": "match", "query": "file new", "requestId": "7"}
//! {"type": "run", "matchId": ":1.42|/MenuBar/1|1|2", "actionId": ""}
//! ```
//!
//! Responses, with `requestId` echoed when the request carried one:
//!
//! ```json
//! {"type": "actions", "actions": []}
//! {"type": "matches", "requestId": "7", "matches": [{"actionId": "...", "text": "File » New", ...}]}
//! {"type": "ran"}
//! {"type": "error", "message": "..."}
//! ```

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::logging;
use crate::matching::QueryMatch;
use crate::menu::MenuTransport;
use crate::runner::{HostAction, Runner};

/// Requests accepted from the host.
///
/// All requests support an optional `requestId` field that is echoed back
/// in the response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostRequest {
    /// List secondary actions
    Actions {
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    Match {
        query: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Activate a previously returned match
    Run {
        #[serde(rename = "matchId")]
        match_id: String,
        #[serde(default, rename = "actionId")]
        action_id: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
}

impl HostRequest {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            HostRequest::Actions { request_id }
            | HostRequest::Match { request_id, .. }
            | HostRequest::Run { request_id, .. } => request_id.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostResponse {
    Actions {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        actions: Vec<HostAction>,
    },
    Matches {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        matches: Vec<QueryMatch>,
    },
    Ran {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    Error {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        message: String,
    },
}

pub fn handle_request<T: MenuTransport>(
    runner: &mut Runner<T>,
    request: HostRequest,
) -> HostResponse {
    match request {
        HostRequest::Actions { request_id } => HostResponse::Actions {
            request_id,
            actions: runner.list_actions(),
        },
        HostRequest::Match { query, request_id } => HostResponse::Matches {
            request_id,
            matches: runner.match_query(&query),
        },
        HostRequest::Run {
            match_id,
            action_id,
            request_id,
        } => match runner.run_action(&match_id, &action_id) {
            Ok(()) => HostResponse::Ran { request_id },
            Err(e) => {
                logging::log_error("HOST", &e.to_string(), Some(&match_id));
                HostResponse::Error {
                    request_id,
                    message: e.user_message(),
                }
            }
        },
    }
}

/// Parse and answer a single request line
pub fn handle_line<T: MenuTransport>(runner: &mut Runner<T>, line: &str) -> HostResponse {
    match serde_json::from_str::<HostRequest>(line) {
        Ok(request) => {
            debug!(request_id = request.request_id(), ?request, "Parsed host request");
            handle_request(runner, request)
        }
        Err(e) => {
            logging::log_error("HOST", &e.to_string(), Some(line));
            HostResponse::Error {
                request_id: None,
                message: format!("Invalid request: {}", e),
            }
        }
    }
}

/// Answer requests from `reader` on `writer` until EOF.
///
/// Request faults become error responses; only I/O errors end the loop.
pub fn serve<T, R, W>(runner: &mut Runner<T>, reader: R, mut writer: W) -> io::Result<()>
where
    T: MenuTransport,
    R: BufRead,
    W: Write,
{
    logging::log("HOST", "Host binding listening");
    for raw in reader.split(b'\n') {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let response = match String::from_utf8(raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(runner, &line),
            Err(e) => {
                logging::log_error("HOST", &e.to_string(), None);
                HostResponse::Error {
                    request_id: None,
                    message: format!("Invalid request: {}", e),
                }
            }
        };
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    info!("Host binding input closed");
    Ok(())
}
