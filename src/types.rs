use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A position within the host buffer.
///
/// Positions are one-indexed to match what editors display, and column values
/// are counted in grapheme clusters, not bytes or chars. This keeps wide and
/// combining characters on the column the host renders them at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// One-based line number.
    pub line: u32,
    /// One-based column in grapheme clusters.
    pub col: u32,
}

impl Position {
    /// The first cell of a buffer.
    pub const ORIGIN: Position = Position { line: 1, col: 1 };

    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Stable handle for a host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u32);

/// Stable handle for a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u32);

/// The buffer and window the cursor currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub buffer: BufferId,
    pub window: WindowId,
}

/// The visible slice of a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// One-based number of the first visible line.
    pub first_line: u32,
    /// One-based number of the last visible line.
    pub last_line: u32,
    /// Text of every visible line, without trailing newlines.
    pub lines: Vec<String>,
}

impl Viewport {
    /// Builds a viewport whose `last_line` is derived from the line count.
    pub fn new(first_line: u32, lines: Vec<String>) -> Self {
        let first_line = first_line.max(1);
        let last_line = first_line + (lines.len() as u32).saturating_sub(1);
        Self {
            first_line,
            last_line,
            lines,
        }
    }
}

/// A candidate jump destination detected in the viewport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// The matched word.
    pub text: String,
    /// One-based line of the first grapheme.
    pub line: u32,
    /// One-based column of the first grapheme.
    pub col: u32,
    /// Length of `text` in grapheme clusters.
    pub width: u32,
}

impl Target {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Column of the last grapheme of the word.
    pub fn end_col(&self) -> u32 {
        self.col + self.width.saturating_sub(1)
    }
}

/// A key sequence the user types to select a target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HintKey(String);

impl HintKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters the user has to type.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for HintKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HintKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for HintKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl PartialEq<str> for HintKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for HintKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Where hints are anchored relative to their word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// On the first grapheme of the word.
    #[default]
    Start,
    /// On the last grapheme of the word.
    End,
    /// Drawn over the start of the word, hiding the text underneath.
    Overlay,
    /// On both ends of long enough words, consuming two keys.
    Both,
}

/// Which end of a target a hint is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Start,
    End,
}

/// A hint key paired with the target it selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HintMapping {
    pub target: Target,
    pub key: HintKey,
    /// One-based column the key is rendered at.
    pub anchor_col: u32,
    pub anchor: Anchor,
}

/// Opaque handles of hints currently rendered by the display sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandleSet(pub Vec<u64>);

/// Actions emitted by the engine for the host to carry out.
///
/// Display side effects already went through the
/// [`DisplaySink`](crate::traits::DisplaySink); the action tells the host what
/// happened so it can decide whether to swallow the keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// The keystroke is not for the engine.
    Ignore,
    /// A new set of hints was displayed.
    ShowHints(Arc<[HintMapping]>),
    /// The hints were narrowed to those whose key starts with the typed input.
    UpdatePartial(Vec<HintKey>),
    /// The cursor was moved to this target.
    Jump(Target),
    /// Hints were hidden and all hint state was reset.
    Cancel,
}

/// Result of feeding a motion key to the repeat detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionOutcome {
    /// The repeat threshold was reached and hints were requested.
    pub trigger: bool,
    /// The event was classified as an OS key repeat and not counted.
    pub suppressed: bool,
}
