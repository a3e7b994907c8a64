#![allow(dead_code)]

pub mod mock_display;
pub mod mock_viewport;

use hint_engine::types::{HintKey, Target};
use unicode_segmentation::UnicodeSegmentation;

pub fn keys(list: &[&str]) -> Vec<HintKey> {
    list.iter().map(|k| HintKey::from(*k)).collect()
}

/// Targets laid out left to right on line 1, separated by one space.
pub fn targets(words: &[&str]) -> Vec<Target> {
    let mut col = 1;
    words
        .iter()
        .map(|word| {
            let width = word.graphemes(true).count() as u32;
            let target = Target {
                text: word.to_string(),
                line: 1,
                col,
                width,
            };
            col += width + 1;
            target
        })
        .collect()
}
