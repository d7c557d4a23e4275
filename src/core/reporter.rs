// src/core/reporter.rs

use std::io::{self, Write};

use crate::core::models::Finding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per finding: `[<check>] <url>` plus optional `: <detail>`.
    /// This exact shape is consumed by downstream tooling.
    Text,
    /// A JSON array of findings, emitted once at the end of the run.
    Json,
}

/// Formats findings on the output stream and accumulates the exit status.
///
/// The orchestrator hands findings over already in deterministic order, so the
/// reporter only writes and flushes. Text mode streams; JSON mode necessarily
/// buffers until `finish`.
pub struct Reporter {
    format: OutputFormat,
    out: Box<dyn Write + Send>,
    buffered: Vec<Finding>,
    any_finding: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, Box::new(io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, out: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            out,
            buffered: Vec::new(),
            any_finding: false,
        }
    }

    /// Emit one finding. Text output is flushed immediately so results stream
    /// while the scan is still running.
    pub fn emit(&mut self, finding: &Finding) -> io::Result<()> {
        self.any_finding = true;
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{finding}")?;
                self.out.flush()
            }
            OutputFormat::Json => {
                self.buffered.push(finding.clone());
                Ok(())
            }
        }
    }

    /// Flush any buffered output and derive the process exit code:
    /// 0 when nothing was found and every target answered, 1 otherwise.
    pub fn finish(mut self, any_unreachable: bool) -> io::Result<u8> {
        if self.format == OutputFormat::Json {
            let json = serde_json::to_string_pretty(&self.buffered)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(self.out, "{json}")?;
            self.out.flush()?;
        }
        Ok(u8::from(self.any_finding || any_unreachable))
    }
}
