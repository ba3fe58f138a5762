/// Interaction mode of the prompt 🎛️
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Root,
    /// Free-text queue building, one path or URL per line
    QueueEntry,
    /// Picking one of several search results
    ResultBrowse,
    /// Picking an album from an artist's songs
    AlbumBrowse,
    /// Picking a song from an album
    SongBrowse,
}

impl Mode {
    pub fn prompt(self) -> &'static str {
        match self {
            Mode::Root => "vyom> ",
            Mode::QueueEntry => "queue> ",
            Mode::ResultBrowse => "select> ",
            Mode::AlbumBrowse => "album> ",
            Mode::SongBrowse => "song> ",
        }
    }
}

/// Stack of modes. Never empty: the first element is the base mode the session
/// falls back to once a sub-dialogue ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeStack {
    modes: Vec<Mode>,
}

impl ModeStack {
    pub fn new(base: Mode) -> Self {
        Self { modes: vec![base] }
    }

    pub fn current(&self) -> Mode {
        self.modes[self.modes.len() - 1]
    }

    pub fn base(&self) -> Mode {
        self.modes[0]
    }

    pub fn push(&mut self, mode: Mode) {
        tracing::debug!(?mode, depth = self.modes.len() + 1, "push mode");
        self.modes.push(mode);
    }

    /// Drop every sub-dialogue, keeping only the base
    pub fn reset(&mut self) {
        self.modes.truncate(1);
    }

    /// Swap the base mode. Anything stacked above it is dropped too.
    pub fn replace(&mut self, mode: Mode) {
        tracing::debug!(from = ?self.base(), to = ?mode, "replace base mode");
        self.modes.clear();
        self.modes.push(mode);
    }

    pub fn is_at_base(&self) -> bool {
        self.modes.len() == 1
    }

    pub fn prompt(&self) -> &'static str {
        self.current().prompt()
    }
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new(Mode::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_only_base() {
        for base in [Mode::Root, Mode::QueueEntry] {
            let mut stack = ModeStack::new(base);
            stack.push(Mode::AlbumBrowse);
            stack.push(Mode::SongBrowse);
            assert_eq!(stack.current(), Mode::SongBrowse);

            stack.reset();
            assert!(stack.is_at_base());
            assert_eq!(stack.current(), base);
            assert_eq!(stack.base(), base);

            // Resetting twice is harmless
            stack.reset();
            assert!(stack.is_at_base());
            assert_eq!(stack.current(), base);
        }
    }

    #[test]
    fn test_replace_swaps_base() {
        let mut stack = ModeStack::default();
        stack.push(Mode::ResultBrowse);
        stack.replace(Mode::QueueEntry);
        assert!(stack.is_at_base());
        assert_eq!(stack.base(), Mode::QueueEntry);
        assert_eq!(stack.prompt(), "queue> ");

        stack.replace(Mode::Root);
        assert_eq!(stack.current(), Mode::Root);
    }
}
