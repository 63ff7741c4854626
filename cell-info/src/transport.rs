//! Line-delimited JSON framing of method calls over a byte stream.
//!
//! Each request line is a [`Request`], each reply line an [`Envelope`]. The
//! shell talks to the provider over the process' stdin/stdout.

use std::io::{BufRead, Write};

use color_eyre::{eyre::WrapErr as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::channel::{MethodCall, MethodHandler, Reply};

pub const MALFORMED_CALL: &str = "MALFORMED_CALL";

#[derive(Debug, Deserialize)]
pub struct Request {
    /// Opaque correlation id, echoed back.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub call: MethodCall,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub id: Option<Value>,
    pub reply: Reply,
}

/// Serves calls until the reader hits EOF. One call is handled to completion
/// before the next line is read.
pub fn serve(
    handler: &dyn MethodHandler,
    mut reader: impl BufRead,
    mut writer: impl Write,
) -> Result<()> {
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .wrap_err("failed to read request line")?;
        if read == 0 {
            break;
        }
        let Some(envelope) = respond(handler, &line) else {
            continue;
        };
        serde_json::to_writer(&mut writer, &envelope)
            .wrap_err("failed to write reply")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    debug!("request stream closed");

    Ok(())
}

/// `None` for blank lines, which get no reply.
fn respond(handler: &dyn MethodHandler, line: &[u8]) -> Option<Envelope> {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line,
        Err(err) => {
            warn!(%err, "request line is not utf-8");
            return Some(malformed(&err));
        }
    };
    if line.trim().is_empty() {
        return None;
    }
    let envelope = match serde_json::from_str::<Request>(line) {
        Ok(req) => {
            debug!(method = %req.call.method, "received call");
            Envelope {
                id: req.id,
                reply: handler.handle(&req.call),
            }
        }
        Err(err) => {
            warn!(%err, "malformed call");
            malformed(&err)
        }
    };

    Some(envelope)
}

fn malformed(err: &dyn std::fmt::Display) -> Envelope {
    Envelope {
        id: None,
        reply: Reply::error(MALFORMED_CALL, &err.to_string()),
    }
}
