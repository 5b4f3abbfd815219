//! Line-oriented supervisor event-listener protocol.
//!
//! The supervisor feeds one notification at a time on our stdin: a header
//! line of `key:value` tokens announcing a payload length, then that many
//! payload bytes in the same token format. We answer `READY` before each
//! event and `RESULT 2\nOK` after it. Stdout carries protocol traffic only;
//! diagnostics go to the log.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// Event name reported when a process enters the RUNNING state
pub const PROCESS_STATE_RUNNING: &str = "PROCESS_STATE_RUNNING";

pub type Result<T> = std::result::Result<T, ListenerError>;

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("event channel closed")]
    ChannelClosed,
    #[error("malformed token {0:?}, expected key:value")]
    MalformedToken(String),
    #[error("event header has no {0} field")]
    MissingField(&'static str),
    #[error("bad payload length {0:?}")]
    BadLength(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// One supervisor notification: header fields plus payload fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Event {
    pub headers: HashMap<String, String>,
    pub payload: HashMap<String, String>,
}

impl Event {
    pub fn event_name(&self) -> Option<&str> {
        self.headers.get("eventname").map(String::as_str)
    }

    pub fn process_name(&self) -> Option<&str> {
        self.payload.get("processname").map(String::as_str)
    }
}

fn parse_tokens(raw: &str) -> Result<HashMap<String, String>> {
    raw.split_whitespace()
        .map(|token| {
            token
                .split_once(':')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| ListenerError::MalformedToken(token.to_string()))
        })
        .collect()
}

/// Read a single event: header line, then the declared number of payload bytes.
pub fn read_event(input: &mut impl BufRead) -> Result<Event> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ListenerError::ChannelClosed);
    }
    let headers = parse_tokens(&line)?;

    let len = headers.get("len").ok_or(ListenerError::MissingField("len"))?;
    let len: usize = len
        .parse()
        .map_err(|_| ListenerError::BadLength(len.clone()))?;

    let mut raw = vec![0u8; len];
    input.read_exact(&mut raw)?;
    let payload = parse_tokens(&String::from_utf8_lossy(&raw))?;

    Ok(Event { headers, payload })
}

/// Run the listener loop until the event channel fails.
///
/// `set_state` receives `true` when the tracked process reports RUNNING and
/// `false` for every other state transition of that process. Events for
/// other processes are acknowledged without a state change.
pub fn run(
    mut input: impl BufRead,
    mut output: impl Write,
    process_name: &str,
    set_state: &mut dyn FnMut(bool) -> io::Result<()>,
) -> Result<()> {
    loop {
        output.write_all(b"READY\n")?;
        output.flush()?;

        let event = read_event(&mut input)?;

        if event.process_name() == Some(process_name) {
            let name = event
                .event_name()
                .ok_or(ListenerError::MissingField("eventname"))?;
            let running = name == PROCESS_STATE_RUNNING;
            if running {
                log::info!("process {process_name} is running");
            } else {
                log::info!("process {process_name} is stopped or failed");
            }
            set_state(running)?;
        }

        output.write_all(b"RESULT 2\nOK")?;
        output.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(event_name: &str, payload: &str) -> String {
        format!(
            "ver:3.0 server:supervisor serial:21 pool:listener poolserial:10 eventname:{} len:{}\n{}",
            event_name,
            payload.len(),
            payload
        )
    }

    #[test]
    fn running_event_drives_pin_high() {
        let input = notification(
            "PROCESS_STATE_RUNNING",
            "processname:octod groupname:octod from_state:STARTING pid:4211",
        );
        let mut out = Vec::new();
        let mut writes = Vec::new();
        let err = run(input.as_bytes(), &mut out, "octod", &mut |high| {
            writes.push(high);
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, ListenerError::ChannelClosed));
        assert_eq!(writes, [true]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "READY\nRESULT 2\nOKREADY\n"
        );
    }

    #[test]
    fn non_running_events_drive_pin_low() {
        for name in [
            "PROCESS_STATE_STOPPED",
            "PROCESS_STATE_BACKOFF",
            "PROCESS_STATE_FATAL",
            "PROCESS_STATE_EXITED",
        ] {
            let input = notification(
                name,
                "processname:octod groupname:octod from_state:RUNNING pid:4211",
            );
            let mut writes = Vec::new();
            run(input.as_bytes(), &mut Vec::new(), "octod", &mut |high| {
                writes.push(high);
                Ok(())
            })
            .unwrap_err();
            assert_eq!(writes, [false], "{name}");
        }
    }

    #[test]
    fn other_process_is_ignored_but_acknowledged() {
        let input = notification(
            "PROCESS_STATE_RUNNING",
            "processname:other groupname:other from_state:STARTING pid:1",
        );
        let mut out = Vec::new();
        let mut writes = Vec::new();
        run(input.as_bytes(), &mut out, "octod", &mut |high| {
            writes.push(high);
            Ok(())
        })
        .unwrap_err();
        assert!(writes.is_empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "READY\nRESULT 2\nOKREADY\n"
        );
    }

    #[test]
    fn consecutive_events_are_processed_in_order() {
        let mut input = notification("PROCESS_STATE_RUNNING", "processname:octod pid:1");
        input.push_str(&notification("PROCESS_STATE_EXITED", "processname:octod pid:1"));
        let mut writes = Vec::new();
        run(input.as_bytes(), &mut Vec::new(), "octod", &mut |high| {
            writes.push(high);
            Ok(())
        })
        .unwrap_err();
        assert_eq!(writes, [true, false]);
    }

    #[test]
    fn empty_channel_reports_closed() {
        assert!(matches!(
            run(&b""[..], &mut Vec::new(), "octod", &mut |_| Ok(())),
            Err(ListenerError::ChannelClosed)
        ));
    }

    #[test]
    fn malformed_header_token_is_fatal() {
        let err = run(
            &b"eventname PROCESS_STATE_RUNNING len:0\n"[..],
            &mut Vec::new(),
            "octod",
            &mut |_| Ok(()),
        )
        .unwrap_err();
        assert!(matches!(err, ListenerError::MalformedToken(_)));
    }

    #[test]
    fn missing_len_is_fatal() {
        let err = run(
            &b"eventname:TICK_5\n"[..],
            &mut Vec::new(),
            "octod",
            &mut |_| Ok(()),
        )
        .unwrap_err();
        assert!(matches!(err, ListenerError::MissingField("len")));
    }

    #[test]
    fn parses_header_and_payload_fields() {
        let raw = notification("PROCESS_STATE_RUNNING", "processname:octod groupname:octod");
        let event = read_event(&mut raw.as_bytes()).unwrap();
        assert_eq!(event.event_name(), Some("PROCESS_STATE_RUNNING"));
        assert_eq!(event.process_name(), Some("octod"));
        assert_eq!(event.headers.get("serial").map(String::as_str), Some("21"));
    }
}
