use std::io::{self, Write};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const FRAME_RULE: &str = "----------------------------------------";

/// Where rendered frames and alerts go.
pub trait Surface {
    /// Replaces whatever was drawn before with `lines`.
    fn draw(&mut self, lines: &[String]) -> io::Result<()>;

    /// Blocking notification for the user.
    fn alert(&mut self, message: &str) -> io::Result<()>;
}

/// Frames on stdout, alerts on stderr.
pub struct TerminalSurface {
    clear_screen: bool,
}

impl TerminalSurface {
    pub fn new(clear_screen: bool) -> Self {
        Self { clear_screen }
    }
}

impl Surface for TerminalSurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.clear_screen {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        } else {
            writeln!(out, "{FRAME_RULE}")?;
        }
        for line in lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    fn alert(&mut self, message: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{message}")?;
        err.flush()
    }
}
