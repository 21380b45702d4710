use std::io::Write;
use std::sync::Mutex;

use crate::core::interfaces::ports::ResultPresenter;
use crate::global_constants::{NO_TEXT_DETAIL, NO_TEXT_TITLE};

/// Writes recognized text, or the no-text notice, to a terminal stream.
pub struct ConsoleResultPresenter<W: Write + Send> {
    output: Mutex<W>,
}

impl ConsoleResultPresenter<std::io::Stdout> {
    pub fn to_stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleResultPresenter<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: Mutex::new(output),
        }
    }

    pub fn into_inner(self) -> W {
        match self.output.into_inner() {
            Ok(output) => output,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_result(output: &mut W, text: &str) -> std::io::Result<()> {
        if text.is_empty() {
            writeln!(output, "{}", NO_TEXT_TITLE)?;
            writeln!(output, "{}", NO_TEXT_DETAIL)?;
        } else {
            writeln!(output, "{}", text)?;
        }
        output.flush()
    }
}

impl<W: Write + Send> ResultPresenter for ConsoleResultPresenter<W> {
    fn deliver_result(&self, text: &str) {
        let mut output = match self.output.lock() {
            Ok(output) => output,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(error) = Self::write_result(&mut output, text) {
            log::error!("[PRESENTER] Failed to write result: {}", error);
        }
    }
}
