//! User interaction operations (confirmation prompts and alerts).

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    message: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{} [y/N] ", message)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let response = line.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

pub(crate) fn alert_with_io<W: Write>(message: &str, output: &mut W) -> Result<()> {
    writeln!(output, "{}", message)?;
    output.flush()?;
    Ok(())
}

/// Run a blocking call, moving the current worker's other tasks elsewhere
/// when called from a multi-threaded tokio runtime.
pub(crate) fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, message: &str) -> Result<bool> {
        run_blocking(|| {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let mut stdin_lock = stdin.lock();
            confirm_with_io(message, &mut stdin_lock, &mut stdout)
        })
    }

    pub(crate) fn alert_impl(&self, message: &str) -> Result<()> {
        alert_with_io(message, &mut io::stdout())
    }
}
