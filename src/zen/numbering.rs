//! Numbering markers
//!
//!     Inside a multiplied node every run of `$` is replaced with the number of the copy being
//!     generated. Numbers are 1-based: copy `i` of `n` (0-based index) renders `i + 1`. A run
//!     longer than one pads with zeros (`$$$` -> `001`).
//!
//!     A run may carry a modifier:
//!
//!         `$@-`   count down: copy `i` renders `n - i`
//!         `$@3`   start at 3: copy `i` renders `i + 3`
//!         `$@-3`  count down ending at 3: copy `i` renders `n - 1 - i + 3`
//!
//!     Outside any multiplier the numbering is copy 0 of 1, so `$` renders `1`.
//!
//!     `\$` writes a literal dollar sign: `p{costs \$5}` renders `costs $5`. Wrapped text never
//!     goes through numbering, so dollar signs in a selection are kept as they are.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\\$|(\$+)(?:@(-)?(\d+)?)?").expect("numbering marker pattern")
});

/// Position of one generated copy within its nearest multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Numbering {
    /// 0-based copy index
    pub index: usize,
    /// Number of copies
    pub total: usize,
}

impl Numbering {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// Numbering outside of any multiplier
    pub fn single() -> Self {
        Self::new(0, 1)
    }

    /// The 1-based number of this copy
    pub fn number(&self) -> usize {
        self.index + 1
    }

    fn render(&self, reverse: bool, start: Option<usize>) -> usize {
        let start = start.unwrap_or(1);
        if reverse {
            self.total.saturating_sub(1).saturating_sub(self.index) + start
        } else {
            self.index + start
        }
    }

    /// Replace every numbering marker in `text`
    pub fn apply(&self, text: &str) -> String {
        if !text.contains('$') {
            return text.to_string();
        }
        MARKER
            .replace_all(text, |caps: &Captures| {
                let Some(run) = caps.get(1) else {
                    return "$".to_string();
                };
                let width = run.len();
                let reverse = caps.get(2).is_some();
                let start = caps.get(3).and_then(|m| m.as_str().parse().ok());
                format!("{:0width$}", self.render(reverse, start), width = width)
            })
            .into_owned()
    }
}

impl Default for Numbering {
    fn default() -> Self {
        Self::single()
    }
}
