use hint_engine::error::HostError;
use hint_engine::traits::ViewportSource;
use hint_engine::types::{BufferId, Location, Position, Viewport, WindowId};
use ropey::Rope;

pub struct MockViewport {
    rope: Rope,
    pub first_line: u32,
    pub height: u32,
    pub cursor: Position,
    pub location: Location,
    // Where the cursor ends up after a move, to simulate cross-window jumps
    pub land_in: Option<Location>,
    pub fail_moves: bool,
    pub moves: Vec<Position>,
}

impl MockViewport {
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let height = rope.len_lines() as u32;
        Self {
            rope,
            first_line: 1,
            height,
            cursor: Position::ORIGIN,
            location: Location {
                buffer: BufferId(1),
                window: WindowId(1000),
            },
            land_in: None,
            fail_moves: false,
            moves: Vec::new(),
        }
    }

    pub fn scrolled(mut self, first_line: u32, height: u32) -> Self {
        self.first_line = first_line;
        self.height = height;
        self
    }

    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    fn line_str(&self, line: u32) -> Option<String> {
        let idx = line.checked_sub(1)? as usize;
        if idx >= self.rope.len_lines() {
            return None;
        }
        let mut s = self.rope.line(idx).to_string();
        // Remove trailing newline if present
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }
}

impl ViewportSource for MockViewport {
    fn visible_lines(&self) -> Viewport {
        let lines = (self.first_line..self.first_line + self.height)
            .map_while(|line| self.line_str(line))
            .collect();
        Viewport::new(self.first_line, lines)
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn move_cursor(&mut self, pos: Position) -> Result<(), HostError> {
        if self.fail_moves {
            return Err(HostError::Cursor("buffer is locked".into()));
        }
        self.cursor = pos;
        self.moves.push(pos);
        if let Some(location) = self.land_in {
            self.location = location;
        }
        Ok(())
    }

    fn location(&self) -> Location {
        self.location
    }
}
