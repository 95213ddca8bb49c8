use async_trait::async_trait;
use serial_console::{Progress, Session, Timing, Transport};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct State {
    lines: VecDeque<Vec<u8>>,
    snapshots: VecDeque<Vec<Vec<u8>>>,
    writes: Vec<Vec<u8>>,
    line_reads: usize,
    closed: bool,
}

/// An in-memory console that replays queued output.
///
/// `read_line` pops the next queued line and reports silence once the queue
/// is empty; `read_all_buffered` pops the next queued snapshot, or returns
/// nothing. Every write is recorded.
#[derive(Clone, Default)]
pub struct ScriptedConsole {
    state: Arc<Mutex<State>>,
}

#[allow(dead_code)]
impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(self, line: &[u8]) -> Self {
        self.state.lock().unwrap().lines.push_back(line.to_vec());
        self
    }

    pub fn silence(self, cycles: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for _ in 0..cycles {
                state.lines.push_back(Vec::new());
            }
        }
        self
    }

    pub fn snapshot(self, lines: &[&[u8]]) -> Self {
        let snapshot = lines.iter().map(|line| line.to_vec()).collect();
        self.state.lock().unwrap().snapshots.push_back(snapshot);
        self
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn line_reads(&self) -> usize {
        self.state.lock().unwrap().line_reads
    }

    pub fn pending_snapshots(&self) -> usize {
        self.state.lock().unwrap().snapshots.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[async_trait]
impl Transport for ScriptedConsole {
    async fn read_line(&mut self, _timeout: Duration) -> io::Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.line_reads += 1;
        Ok(state.lines.pop_front().unwrap_or_default())
    }

    async fn read_all_buffered(&mut self) -> io::Result<Vec<Vec<u8>>> {
        Ok(self.state.lock().unwrap().snapshots.pop_front().unwrap_or_default())
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.state.lock().unwrap().writes.push(data.to_vec());
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().unwrap().closed = true;
    }
}

/// A session over `console` that records every progress event.
#[allow(dead_code)]
pub fn session(console: &ScriptedConsole) -> (Session, Arc<Mutex<Vec<Progress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let session = Session::new(console.clone())
        .with_timing(Timing::default())
        .with_progress_handler(move |event| sink.lock().unwrap().push(event.clone()));
    (session, events)
}

#[allow(dead_code)]
pub fn writes(lines: &[&[u8]]) -> Vec<Vec<u8>> {
    lines.iter().map(|line| line.to_vec()).collect()
}
