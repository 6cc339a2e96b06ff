#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use clilog::{CliHandler, HandlerBuilder};

// Serializes tests that touch process-wide state (environment variables)
pub fn test_lock() -> &'static Mutex<()> {
    static L: OnceLock<Mutex<()>> = OnceLock::new();
    L.get_or_init(|| Mutex::new(()))
}

#[derive(Clone, Default)]
pub struct Mem(pub Arc<Mutex<Vec<u8>>>);
impl Write for Mem {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Mem {
    /// Everything written so far
    /// # Panics
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// Extract lines from buffer
    /// # Panics
    pub fn lines(&self) -> Vec<String> {
        self.text()
            .lines()
            .map(std::string::ToString::to_string)
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Finish `b` with an in-memory writer
/// # Panics
pub fn build_mem(b: HandlerBuilder) -> (CliHandler, Mem) {
    let mem = Mem::default();
    let h = b.writer(mem.clone()).build().unwrap();
    (h, mem)
}

/// Default handler over an in-memory writer (colors off: writers are not terminals)
pub fn mem_handler() -> (CliHandler, Mem) {
    build_mem(CliHandler::builder())
}

pub fn has_ansi(s: &str) -> bool {
    s.contains("\u{1b}[")
}
