//! Annotated text runs.

/// A phonetic-guide decoration: a base run with one or more ruby segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ruby {
    pub base: String,
    pub rt: Vec<String>,
}

impl Ruby {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            rt: Vec::new(),
        }
    }

    pub fn with_rt(mut self, rt: impl Into<String>) -> Self {
        self.rt.push(rt.into());
        self
    }
}

/// Inline text plus the ruby decorations found inside it.
///
/// The parser cannot keep the original position of a decoration within its
/// surrounding text, so decorations are stored separately and rendered after
/// the full base text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub content: String,
    pub ruby: Vec<Ruby>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ruby: Vec::new(),
        }
    }

    pub fn with_ruby(mut self, ruby: Ruby) -> Self {
        self.ruby.push(ruby);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.ruby.is_empty()
    }

    /// Plain text for table-of-contents labels and metadata.
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::new(s)
    }
}

/// A run of sentences interleaved with inline columns, as found in
/// `ParagraphSentence`, `ItemSentence`, `ListSentence` and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentences {
    pub sentences: Vec<Text>,
    pub columns: Vec<Column>,
}

impl Sentences {
    pub fn single(text: impl Into<Text>) -> Self {
        Self {
            sentences: vec![text.into()],
            columns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty() && self.columns.is_empty()
    }
}

/// An inline column: sentences with an optional forced line break after them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub sentences: Vec<Text>,
    pub line_break: bool,
}
