use hint_engine::config::{DetectionConfig, DetectionStrategy};
use hint_engine::error::ConfigError;
use hint_engine::types::Viewport;
use hint_engine::WordDetector;

fn viewport(first_line: u32, text: &str) -> Viewport {
    Viewport::new(first_line, text.lines().map(str::to_string).collect())
}

fn detector(strategy: DetectionStrategy, pattern: &str) -> WordDetector {
    let config = DetectionConfig {
        strategy,
        pattern: pattern.to_string(),
        ..DetectionConfig::default()
    };
    WordDetector::new(&config).expect("valid pattern")
}

fn found(det: &WordDetector, view: &Viewport, min: usize) -> Vec<(String, u32, u32)> {
    det.detect(view, min)
        .into_iter()
        .map(|t| (t.text, t.line, t.col))
        .collect()
}

fn owned(list: &[(&str, u32, u32)]) -> Vec<(String, u32, u32)> {
    list.iter().map(|(s, l, c)| (s.to_string(), *l, *c)).collect()
}

#[test]
fn pattern_targets_in_reading_order() {
    let det = detector(DetectionStrategy::Pattern, r"\w+");
    let view = viewport(1, "foo bar\n  baz qux");

    assert_eq!(
        found(&det, &view, 1),
        owned(&[("foo", 1, 1), ("bar", 1, 5), ("baz", 2, 3), ("qux", 2, 7)])
    );
}

#[test]
fn short_words_are_skipped() {
    let det = detector(DetectionStrategy::Pattern, r"\w+");
    let view = viewport(1, "a bb ccc");
    assert_eq!(found(&det, &view, 2), owned(&[("bb", 1, 3), ("ccc", 1, 6)]));
}

#[test]
fn long_words_are_skipped_with_max_length() {
    let config = DetectionConfig {
        strategy: DetectionStrategy::Pattern,
        max_word_length: Some(4),
        ..DetectionConfig::default()
    };
    let det = WordDetector::new(&config).unwrap();
    let view = viewport(1, "tiny enormous word");
    assert_eq!(found(&det, &view, 1), owned(&[("tiny", 1, 1), ("word", 1, 15)]));
}

#[test]
fn line_numbers_follow_the_viewport() {
    let det = detector(DetectionStrategy::Pattern, r"\w+");
    let view = viewport(40, "first\nsecond");
    assert_eq!(found(&det, &view, 1), owned(&[("first", 40, 1), ("second", 41, 1)]));
}

#[test]
fn columns_count_graphemes() {
    let det = detector(DetectionStrategy::Pattern, r"\w+");
    let view = viewport(1, "日本 café done");

    let targets = det.detect(&view, 1);
    let cols: Vec<_> = targets.iter().map(|t| (t.text.as_str(), t.col, t.width)).collect();
    assert_eq!(cols, [("日本", 1, 2), ("café", 4, 4), ("done", 9, 4)]);
}

#[test]
fn segmenter_keeps_contractions() {
    let view = viewport(1, "can't stop");

    let pattern = detector(DetectionStrategy::Pattern, r"\w+");
    assert_eq!(
        found(&pattern, &view, 1),
        owned(&[("can", 1, 1), ("t", 1, 5), ("stop", 1, 7)])
    );

    let segmenter = detector(DetectionStrategy::Segmenter, r"\w+");
    assert_eq!(found(&segmenter, &view, 1), owned(&[("can't", 1, 1), ("stop", 1, 7)]));
}

#[test]
fn hybrid_splits_only_long_spans() {
    let det = detector(DetectionStrategy::Hybrid, r"\S+");
    let view = viewport(1, "a,b foo,bar");

    // "a,b" is under the threshold and stays whole
    assert_eq!(
        found(&det, &view, 1),
        owned(&[("a,b", 1, 1), ("foo", 1, 5), ("bar", 1, 9)])
    );

    let pattern = detector(DetectionStrategy::Pattern, r"\S+");
    assert_eq!(
        found(&pattern, &view, 1),
        owned(&[("a,b", 1, 1), ("foo,bar", 1, 5)])
    );
}

#[test]
fn empty_viewport_has_no_targets() {
    let det = WordDetector::new(&DetectionConfig::default()).unwrap();
    assert!(det.detect(&Viewport::new(1, vec![]), 1).is_empty());
    assert!(det.detect(&viewport(1, "\n   \n"), 1).is_empty());
}

#[test]
fn detection_is_deterministic() {
    let det = WordDetector::new(&DetectionConfig::default()).unwrap();
    let view = viewport(3, "fn main() {\n    println!(\"hello, world\");\n}");
    assert_eq!(det.detect(&view, 2), det.detect(&view, 2));
}

#[test]
fn invalid_pattern_is_rejected() {
    let config = DetectionConfig {
        pattern: "(unclosed".to_string(),
        ..DetectionConfig::default()
    };
    let err = WordDetector::new(&config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
}

#[test]
fn per_key_min_length_overrides_default() {
    let mut config = DetectionConfig::default();
    config.per_key_min_length.insert('w', 4);

    assert_eq!(config.min_length_for(Some('w')), 4);
    assert_eq!(config.min_length_for(Some('j')), config.min_word_length);
    assert_eq!(config.min_length_for(None), config.min_word_length);
}
