//! ANSI colour wrapping, enabled per call site instead of per process.

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const MAGENTA: &str = "\x1b[35m";
const BOLD_YELLOW: &str = "\x1b[1;33m";

/// Colour capability flag handed to every renderer.
///
/// A disabled palette returns text unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    pub fn success(self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    pub fn error(self, text: &str) -> String {
        self.paint(RED, text)
    }

    pub fn info(self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    pub fn title(self, text: &str) -> String {
        self.paint(BOLD_YELLOW, text)
    }

    pub fn menu(self, text: &str) -> String {
        self.paint(MAGENTA, text)
    }

    fn paint(self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
