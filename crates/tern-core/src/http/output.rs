use std::fmt::Debug;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::http::response::Response;
use crate::kernel::error::{Error, Result};

/// Where responses are written
pub trait OutputChannel: Send + Sync + Debug {
    fn emit(&self, response: &Response) -> Result<()>;
}

/// Shared handle to an output channel, as bound inside the registry
pub type SharedOutput = Arc<dyn OutputChannel>;

/// Writes the status line, headers and body to standard output
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl OutputChannel for StdoutOutput {
    fn emit(&self, response: &Response) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let write = |out: &mut std::io::StdoutLock<'_>| -> std::io::Result<()> {
            writeln!(out, "Status: {} {}", response.status(), response.reason())?;
            for (name, value) in response.headers() {
                writeln!(out, "{}: {}", name, value)?;
            }
            writeln!(out)?;
            writeln!(out, "{}", response.body())?;
            out.flush()
        };
        write(&mut out).map_err(|e| Error::io(e, "emit_response", PathBuf::from("<stdout>")))
    }
}

/// Keeps emitted responses in memory
#[derive(Debug, Default)]
pub struct BufferedOutput {
    responses: Mutex<Vec<Response>>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, oldest first
    pub fn responses(&self) -> Vec<Response> {
        self.responses
            .lock()
            .map(|responses| responses.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Response> {
        self.responses().pop()
    }
}

impl OutputChannel for BufferedOutput {
    fn emit(&self, response: &Response) -> Result<()> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| Error::Other("output buffer lock poisoned".to_string()))?;
        responses.push(response.clone());
        Ok(())
    }
}
