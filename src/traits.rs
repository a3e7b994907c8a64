use crate::error::HostError;
use crate::types::{HandleSet, HintKey, HintMapping, Location, Position, Viewport};

/// Read access to the host buffer, plus the one write the engine needs.
pub trait ViewportSource {
    // Visible lines of the current window
    fn visible_lines(&self) -> Viewport;

    fn cursor(&self) -> Position;
    fn move_cursor(&mut self, pos: Position) -> Result<(), HostError>;

    // Buffer and window the cursor is in right now
    fn location(&self) -> Location;
}

/// Renders hint keys on screen.
pub trait DisplaySink {
    fn show(&mut self, mappings: &[HintMapping]) -> Result<HandleSet, HostError>;
    fn hide(&mut self, handles: HandleSet);

    // Keep only the hints whose key starts with the typed input
    fn update_partial(&mut self, handles: &HandleSet, matching: &[HintKey]);

    /// Surface a warning to the user. Hosts without a message area can ignore it.
    fn warn(&mut self, _message: &str) {}
}

/// Repositions the viewport around the cursor after a continuous-mode jump.
pub trait Recenter {
    fn recenter(&mut self) -> Result<(), HostError>;
}

impl<F> Recenter for F
where
    F: FnMut() -> Result<(), HostError>,
{
    fn recenter(&mut self) -> Result<(), HostError> {
        self()
    }
}
