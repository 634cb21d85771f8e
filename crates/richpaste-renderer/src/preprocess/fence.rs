//! Fenced code block state for the line-based passes.
//!
//! Wikilink conversion and paragraph spacing both walk the source line by
//! line and must not touch anything between a fence and its closing line.

/// An opening fence: its marker (`` ` `` or `~`) and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Parse an opening fence: three or more identical markers, optionally
    /// indented and followed by an info string.
    fn open(line: &str) -> Option<Self> {
        let line = line.trim_start();
        let marker = line.chars().next().filter(|&c| matches!(c, '`' | '~'))?;
        let len = marker_run(line, marker);
        (len >= 3).then_some(Self { marker, len })
    }

    /// A closing line uses the same marker, is at least as long and carries
    /// no info string.
    fn is_closed_by(self, line: &str) -> bool {
        let line = line.trim_start();
        let len = marker_run(line, self.marker);
        // Markers are ASCII, so the run length is a byte offset.
        len >= self.len && line[len..].trim().is_empty()
    }
}

fn marker_run(line: &str, marker: char) -> usize {
    line.chars().take_while(|&c| c == marker).count()
}

/// Line-by-line fence state.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` when the line is itself a fence
    /// delimiter (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        match self.open {
            Some(fence) if fence.is_closed_by(line) => {
                self.open = None;
                true
            }
            Some(_) => false,
            None => {
                self.open = Fence::open(line);
                self.open.is_some()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lines: &[&str]) -> Vec<(bool, bool)> {
        let mut tracker = FenceTracker::new();
        lines
            .iter()
            .map(|line| {
                let delimiter = tracker.update(line);
                (delimiter, tracker.in_fence())
            })
            .collect()
    }

    #[test]
    fn test_backtick_and_tilde_fences() {
        assert_eq!(
            feed(&["```js", "let a = 1;", "```", "text"]),
            [(true, true), (false, true), (true, false), (false, false)]
        );
        assert_eq!(feed(&["~~~", "~~~"]), [(true, true), (true, false)]);
    }

    #[test]
    fn test_other_marker_does_not_close() {
        assert_eq!(
            feed(&["```", "~~~", "```"]),
            [(true, true), (false, true), (true, false)]
        );
    }

    #[test]
    fn test_closing_run_must_be_long_enough() {
        assert_eq!(
            feed(&["````md", "```", "`````"]),
            [(true, true), (false, true), (true, false)]
        );
    }

    #[test]
    fn test_info_string_on_closing_line_keeps_fence_open() {
        assert_eq!(feed(&["```", "```python"]), [(true, true), (false, true)]);
    }

    #[test]
    fn test_indented_fences() {
        assert_eq!(feed(&["  ```", "   ```"]), [(true, true), (true, false)]);
    }

    #[test]
    fn test_short_runs_are_not_fences() {
        assert_eq!(feed(&["``code``", "~~strike~~"]), [(false, false), (false, false)]);
    }
}
