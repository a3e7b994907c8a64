//! Word detection over the visible lines.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{DetectionConfig, DetectionStrategy};
use crate::error::ConfigError;
use crate::types::{Target, Viewport};

/// Finds jump targets in a [`Viewport`].
///
/// Detection is a pure function of the viewport and the configuration:
/// targets come back in reading order (line, then column), at most one per
/// matched span.
#[derive(Debug, Clone)]
pub struct WordDetector {
    config: DetectionConfig,
    pattern: Regex,
}

impl WordDetector {
    pub fn new(config: &DetectionConfig) -> Result<Self, ConfigError> {
        let pattern =
            Regex::new(&config.pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: config.pattern.clone(),
                source: Box::new(source),
            })?;
        Ok(Self {
            config: config.clone(),
            pattern,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detects words of at least `min_length` graphemes.
    pub fn detect(&self, viewport: &Viewport, min_length: usize) -> Vec<Target> {
        let mut targets = Vec::new();
        for (offset, text) in viewport.lines.iter().enumerate() {
            let line = viewport.first_line + offset as u32;
            self.detect_line(text, line, min_length, &mut targets);
        }
        targets
    }

    fn detect_line(&self, text: &str, line: u32, min_length: usize, out: &mut Vec<Target>) {
        if text.is_empty() {
            return;
        }
        let columns = GraphemeColumns::new(text);
        let mut spans = Vec::new();
        match self.config.strategy {
            DetectionStrategy::Pattern => {
                spans.extend(self.pattern.find_iter(text).map(|m| (m.start(), m.end())));
            }
            DetectionStrategy::Segmenter => segment(text, 0, &mut spans),
            DetectionStrategy::Hybrid => {
                for m in self.pattern.find_iter(text) {
                    let width = columns.width(m.start(), m.end());
                    if width > self.config.segmentation_threshold {
                        segment(m.as_str(), m.start(), &mut spans);
                    } else {
                        spans.push((m.start(), m.end()));
                    }
                }
            }
        }

        let mut last_col = 0;
        for (start, end) in spans {
            let width = columns.width(start, end);
            if width == 0 || width < min_length {
                continue;
            }
            if self.config.max_word_length.is_some_and(|max| width > max) {
                continue;
            }
            let col = columns.column(start);
            // Spans arrive in order; a second span at the same column adds nothing
            if col <= last_col {
                continue;
            }
            last_col = col;
            out.push(Target {
                text: text[start..end].to_string(),
                line,
                col,
                width: width as u32,
            });
        }
    }
}

// Unicode word boundaries, keeping only word-like segments
fn segment(text: &str, base: usize, spans: &mut Vec<(usize, usize)>) {
    spans.extend(
        text.unicode_word_indices()
            .map(|(start, word)| (base + start, base + start + word.len())),
    );
}

/// Maps byte offsets of one line to one-based grapheme columns.
struct GraphemeColumns {
    starts: Vec<usize>,
}

impl GraphemeColumns {
    fn new(text: &str) -> Self {
        Self {
            starts: text.grapheme_indices(true).map(|(i, _)| i).collect(),
        }
    }

    fn index(&self, byte: usize) -> usize {
        self.starts.binary_search(&byte).unwrap_or_else(|i| i)
    }

    fn column(&self, byte: usize) -> u32 {
        self.index(byte) as u32 + 1
    }

    fn width(&self, start: usize, end: usize) -> usize {
        self.index(end).saturating_sub(self.index(start))
    }
}
