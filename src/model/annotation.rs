use serde::{Deserialize, Serialize};

/// Markup class prefix carrying the highlight color on notebook pages.
pub(crate) const HIGHLIGHT_CLASS_PREFIX: &str = "kp-notebook-highlight-";

/// Highlight color. Unknown or missing values resolve to [`AnnotationColor::Yellow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AnnotationColor {
    /// Default highlight color.
    #[default]
    Yellow,
    /// Red highlight.
    Red,
    /// Blue highlight.
    Blue,
    /// Green highlight.
    Green,
    /// Purple highlight.
    Purple,
}

impl AnnotationColor {
    /// Parses a color name case-insensitively, falling back to yellow.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Self::Red,
            "blue" => Self::Blue,
            "green" => Self::Green,
            "purple" => Self::Purple,
            _ => Self::Yellow,
        }
    }

    /// Parses a notebook class token such as `kp-notebook-highlight-blue`.
    ///
    /// Returns `None` when the token does not carry the color prefix.
    #[must_use]
    pub fn from_markup_class(class: &str) -> Option<Self> {
        class
            .strip_prefix(HIGHLIGHT_CLASS_PREFIX)
            .map(Self::parse_lenient)
    }
}

impl From<String> for AnnotationColor {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

/// What kind of mark the reader left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Highlight with an attached note.
    Note,
    /// Plain highlight.
    Highlight,
    /// Bookmark.
    Bookmark,
}

/// An annotation from the JSON service API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Highlighted text.
    pub highlight: String,
    /// Note text, when the reader wrote one.
    pub note: Option<String>,
    /// Highlight color.
    pub color: AnnotationColor,
    /// Annotation kind.
    pub kind: AnnotationKind,
    /// Content position.
    pub position: u64,
    /// Start offset of the highlighted range.
    pub start_offset: u64,
    /// End offset of the highlighted range.
    pub end_offset: u64,
}

/// An annotation parsed from the HTML notebook page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotebookAnnotation {
    /// Identifier taken from the container element id. Never empty.
    pub id: String,
    /// Highlighted text.
    pub highlight: String,
    /// Note text. Present exactly when `kind` is [`AnnotationKind::Note`].
    pub note: Option<String>,
    /// Highlight color.
    pub color: AnnotationColor,
    /// [`AnnotationKind::Note`] or [`AnnotationKind::Highlight`].
    pub kind: AnnotationKind,
    /// Printed page number, when the header shows one.
    pub page: Option<u32>,
    /// Location, when the page carries the hidden location input.
    pub position: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_lenient_known_and_unknown() {
        assert_eq!(AnnotationColor::parse_lenient("Blue"), AnnotationColor::Blue);
        assert_eq!(AnnotationColor::parse_lenient(" purple "), AnnotationColor::Purple);
        assert_eq!(AnnotationColor::parse_lenient("orange"), AnnotationColor::Yellow);
        assert_eq!(AnnotationColor::parse_lenient(""), AnnotationColor::Yellow);
    }

    #[test]
    fn test_color_from_markup_class_requires_prefix() {
        assert_eq!(
            AnnotationColor::from_markup_class("kp-notebook-highlight-green"),
            Some(AnnotationColor::Green)
        );
        assert_eq!(
            AnnotationColor::from_markup_class("kp-notebook-highlight-teal"),
            Some(AnnotationColor::Yellow)
        );
        assert_eq!(AnnotationColor::from_markup_class("kp-notebook-highlight"), None);
        assert_eq!(AnnotationColor::from_markup_class("a-row"), None);
    }

    #[test]
    fn test_color_deserializes_leniently_and_serializes_lowercase() {
        let color: AnnotationColor = serde_json::from_str("\"RED\"").unwrap();
        assert_eq!(color, AnnotationColor::Red);
        let color: AnnotationColor = serde_json::from_str("\"magenta\"").unwrap();
        assert_eq!(color, AnnotationColor::Yellow);
        assert_eq!(serde_json::to_string(&AnnotationColor::Purple).unwrap(), "\"purple\"");
    }

    #[test]
    fn test_kind_round_trips_lowercase() {
        let kind: AnnotationKind = serde_json::from_str("\"bookmark\"").unwrap();
        assert_eq!(kind, AnnotationKind::Bookmark);
        assert_eq!(serde_json::to_string(&AnnotationKind::Note).unwrap(), "\"note\"");
    }
}
