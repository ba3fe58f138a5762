use crate::player::{LookupEntry, SearchResult};
use crate::ui::utils::{pad, truncate};

pub const SELECT_ALL: &str = "select all";
pub const BACK: &str = "back";
/// Label shown for songs without an album tag
pub const UNTITLED: &str = "(untitled)";

/// What picking a suggestion actually does
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A filesystem path (or library path) to queue as is
    Path(String),
    /// A search hit still to be looked up
    Search(SearchResult),
    /// A resolved song
    Entry(LookupEntry),
    /// Every entry of the current browse set
    SelectAll(Vec<LookupEntry>),
    /// Leave the sub-dialogue
    Back,
}

/// One completion candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// Inserted into the line, and matched against typed input
    pub text: String,
    /// What the completion list shows
    pub display: String,
    pub description: Option<String>,
    /// `None` means plain navigation (album names)
    pub payload: Option<Payload>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, payload: Option<Payload>) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            text,
            description: None,
            payload,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.display = format!("{}  {}", self.text, description);
        self.description = Some(description);
        self
    }

    /// Lay text and description out in two columns of fixed width
    pub fn with_columns(mut self, title_width: usize, desc_width: usize) -> Self {
        let title = pad(&truncate(&self.text, title_width), title_width);
        self.display = match &self.description {
            Some(desc) => format!("{}  {}", title, truncate(desc, desc_width)),
            None => title.trim_end().to_string(),
        };
        self
    }

    pub fn select_all(entries: Vec<LookupEntry>) -> Self {
        let count = entries.len();
        Self::new(SELECT_ALL, Some(Payload::SelectAll(entries)))
            .with_description(format!("{} songs", count))
    }

    pub fn back() -> Self {
        Self::new(BACK, Some(Payload::Back))
    }

    pub fn search_result(result: SearchResult) -> Self {
        let description = result.description.clone();
        Self::new(result.label.clone(), Some(Payload::Search(result))).with_description(description)
    }

    pub fn entry(entry: LookupEntry) -> Self {
        let text = entry.display_title();
        let description = match (&entry.track, &entry.artist) {
            (Some(track), Some(artist)) => Some(format!("#{} by {}", track, artist)),
            (Some(track), None) => Some(format!("#{}", track)),
            (None, Some(artist)) => Some(format!("by {}", artist)),
            (None, None) => None,
        };
        let suggestion = Self::new(text, Some(Payload::Entry(entry)));
        match description {
            Some(d) => suggestion.with_description(d),
            None => suggestion,
        }
    }

    pub fn album(name: &str) -> Self {
        Self::new(album_label(name), None)
    }
}

/// Album tag of an entry with blank or missing tags folded into `""`
pub fn album_key(entry: &LookupEntry) -> &str {
    entry
        .album
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("")
}

/// Display label for an album name; blank albums become `(untitled)`
pub fn album_label(name: &str) -> &str {
    if name.trim().is_empty() {
        UNTITLED
    } else {
        name
    }
}

/// Inverse of [`album_label`]
pub fn album_from_label(label: &str) -> &str {
    if label == UNTITLED {
        ""
    } else {
        label
    }
}

/// Split the available width 1:2 between titles and descriptions
pub fn column_widths(total_width: usize) -> (usize, usize) {
    // two spaces between the columns, plus some slack for the list's own padding
    let available = total_width.saturating_sub(4).max(3);
    let title = available / 3;
    (title, available - title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_ratio() {
        assert_eq!(column_widths(94), (30, 60));
        assert_eq!(column_widths(0), (1, 2));
    }

    #[test]
    fn test_with_columns_truncates_both_parts() {
        let s = Suggestion::new("The Dark Side of the Moon", None)
            .with_description("Album by Pink Floyd")
            .with_columns(10, 10);
        assert_eq!(s.display, "The Dark …  Album by …");
        // Matching text is never truncated
        assert_eq!(s.text, "The Dark Side of the Moon");
    }

    #[test]
    fn test_album_key_folds_blank_tags() {
        let mut entry = LookupEntry::from_path("a.flac");
        assert_eq!(album_key(&entry), "");
        entry.album = Some("   ".to_string());
        assert_eq!(album_key(&entry), "");
        entry.album = Some(" Animals ".to_string());
        assert_eq!(album_key(&entry), "Animals");
    }

    #[test]
    fn test_album_labels() {
        assert_eq!(album_label(""), UNTITLED);
        assert_eq!(album_label("Animals"), "Animals");
        assert_eq!(album_from_label(UNTITLED), "");
        assert_eq!(album_from_label("Animals"), "Animals");
    }
}
