//! Global `tracing` subscriber.
//!
//! Formatted events go to the in-memory debug log once one is installed and
//! to stderr before that, so nothing lands on the alternate screen.

use std::io::{self, Write};

use tracing::Level;

use crate::debug_log::{DebugLogHandle, global_debug_log};

fn sink_for(log: Option<DebugLogHandle>) -> Box<dyn Write + Send> {
    match log {
        Some(handle) => Box::new(handle.writer()),
        None => Box::new(io::stderr()),
    }
}

fn make_writer() -> Box<dyn Write + Send> {
    sink_for(global_debug_log())
}

/// Install the global subscriber at `level`. Later calls are no-ops.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(make_writer)
        .with_target(false)
        .try_init();
}

pub fn init_default() {
    init(Level::DEBUG);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_land_in_the_debug_log() {
        let log = DebugLogHandle::new(8);
        {
            let mut sink = sink_for(Some(log.clone()));
            sink.write_all(b"panel detached\n").expect("write");
            sink.flush().expect("flush");
        }
        assert_eq!(log.lines(), vec!["panel detached".to_string()]);
    }
}
