//! Engine configuration.
//!
//! Every section is optional in TOML; missing keys take the values in
//! [`defaults`]. Parsed configuration is validated before the engine sees it.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::AnchorPolicy;

/// Default values as constants
pub mod defaults {
    pub const MARKERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    pub const WORD_PATTERN: &str = r"\w+";
    pub const MIN_WORD_LENGTH: usize = 2;
    pub const SEGMENTATION_THRESHOLD: usize = 4;
    pub const MOTION_KEYS: &str = "hjklwbe";
    pub const MOTION_THRESHOLD: u32 = 3;
    pub const MOTION_TIMEOUT_MS: u64 = 2000;
    pub const KEY_REPEAT_THRESHOLD_MS: u64 = 50;
    pub const KEY_REPEAT_RESET_DELAY_MS: u64 = 300;
    pub const MAX_CONTINUOUS_JUMPS: u32 = 50;
    pub const WORD_CACHE_CAPACITY: usize = 100;
    pub const HINT_KEY_CACHE_CAPACITY: usize = 50;
    pub const ASSIGNMENT_CACHE_CAPACITY: usize = 100;
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub keys: KeyPoolConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    /// Where hints are drawn relative to their word.
    #[serde(default)]
    pub hint_position: AnchorPolicy,

    #[serde(default)]
    pub motion: MotionConfig,

    #[serde(default)]
    pub continuous: ContinuousConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Key pools hint keys are generated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPoolConfig {
    /// Keys used as single-character hints, easiest to reach first.
    #[serde(default)]
    pub single_char_keys: Vec<char>,

    /// Keys combined into two-character hints.
    #[serde(default)]
    pub multi_char_keys: Vec<char>,

    /// Upper bound on single-character hints; unset means the whole pool.
    #[serde(default)]
    pub max_single_char_hints: Option<usize>,

    /// Append zero-padded numeric hints when the pools run out.
    #[serde(default)]
    pub use_numeric_fallback: bool,

    /// Minimum word length for two hints under [`AnchorPolicy::Both`].
    /// Unset means every word qualifies.
    #[serde(default)]
    pub both_ends_min_word_length: Option<usize>,

    /// Fallback alphabet used when a pool is missing.
    #[serde(default = "default_markers")]
    pub markers: Vec<char>,
}

impl Default for KeyPoolConfig {
    fn default() -> Self {
        Self {
            single_char_keys: Vec::new(),
            multi_char_keys: Vec::new(),
            max_single_char_hints: None,
            use_numeric_fallback: false,
            both_ends_min_word_length: None,
            markers: default_markers(),
        }
    }
}

/// How words are found in the visible text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Regular expression match only.
    Pattern,
    /// Unicode word segmentation only.
    Segmenter,
    /// Pattern match, re-split long spans with the segmenter.
    #[default]
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub strategy: DetectionStrategy,

    /// Regular expression a word must match.
    #[serde(default = "default_word_pattern")]
    pub pattern: String,

    /// Words shorter than this many graphemes get no hint.
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Words longer than this many graphemes get no hint.
    #[serde(default)]
    pub max_word_length: Option<usize>,

    /// Hybrid only: spans longer than this are re-split by the segmenter.
    #[serde(default = "default_segmentation_threshold")]
    pub segmentation_threshold: usize,

    /// Minimum word length used when a given motion key triggered the hints.
    #[serde(default)]
    pub per_key_min_length: BTreeMap<char, usize>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::default(),
            pattern: default_word_pattern(),
            min_word_length: defaults::MIN_WORD_LENGTH,
            max_word_length: None,
            segmentation_threshold: defaults::SEGMENTATION_THRESHOLD,
            per_key_min_length: BTreeMap::new(),
        }
    }
}

impl DetectionConfig {
    /// Minimum word length for hints triggered by `trigger`.
    pub fn min_length_for(&self, trigger: Option<char>) -> usize {
        trigger
            .and_then(|key| self.per_key_min_length.get(&key).copied())
            .unwrap_or(self.min_word_length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Count motion repeats at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Keys the repeat detector accepts.
    #[serde(default = "default_motion_keys")]
    pub keys: Vec<char>,

    /// Repeats of the same key needed to show hints.
    #[serde(default = "default_motion_threshold")]
    pub threshold: u32,

    /// Per-key overrides of `threshold`.
    #[serde(default)]
    pub per_key_threshold: BTreeMap<char, u32>,

    /// Maximum gap between two counted presses.
    #[serde(default = "default_motion_timeout_ms")]
    pub timeout_ms: u64,

    /// Ignore OS auto-repeat of a held key.
    #[serde(default = "default_true")]
    pub suppress_key_repeat: bool,

    /// Presses of the same key closer than this are treated as auto-repeat.
    #[serde(default = "default_key_repeat_threshold_ms")]
    pub key_repeat_threshold_ms: u64,

    /// Inactivity after which the auto-repeat flag clears.
    #[serde(default = "default_key_repeat_reset_delay_ms")]
    pub key_repeat_reset_delay_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keys: default_motion_keys(),
            threshold: defaults::MOTION_THRESHOLD,
            per_key_threshold: BTreeMap::new(),
            timeout_ms: defaults::MOTION_TIMEOUT_MS,
            suppress_key_repeat: true,
            key_repeat_threshold_ms: defaults::KEY_REPEAT_THRESHOLD_MS,
            key_repeat_reset_delay_ms: defaults::KEY_REPEAT_RESET_DELAY_MS,
        }
    }
}

impl MotionConfig {
    pub fn threshold_for(&self, key: char) -> u32 {
        self.per_key_threshold
            .get(&key)
            .copied()
            .unwrap_or(self.threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousConfig {
    /// Redisplay hints after every jump until an exit condition.
    #[serde(default)]
    pub enabled: bool,

    /// Jumps after which the loop stops on its own.
    #[serde(default = "default_max_continuous_jumps")]
    pub max_jumps: u32,
}

impl Default for ContinuousConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_jumps: defaults::MAX_CONTINUOUS_JUMPS,
        }
    }
}

/// Capacities of the result cache partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_word_cache_capacity")]
    pub word_detection: usize,

    #[serde(default = "default_hint_key_cache_capacity")]
    pub hint_keys: usize,

    #[serde(default = "default_assignment_cache_capacity")]
    pub hint_assignment: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            word_detection: defaults::WORD_CACHE_CAPACITY,
            hint_keys: defaults::HINT_KEY_CACHE_CAPACITY,
            hint_assignment: defaults::ASSIGNMENT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// The word pattern is checked when the detector compiles it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unique("single_char_keys", &self.keys.single_char_keys)?;
        check_unique("multi_char_keys", &self.keys.multi_char_keys)?;
        check_unique("markers", &self.keys.markers)?;
        check_unique("motion.keys", &self.motion.keys)?;
        if self.keys.markers.is_empty() {
            return Err(ConfigError::EmptyMarkers);
        }

        check_nonzero("motion.threshold", self.motion.threshold as usize)?;
        for threshold in self.motion.per_key_threshold.values() {
            check_nonzero("motion.per_key_threshold", *threshold as usize)?;
        }
        check_motion_keys(
            "motion.per_key_threshold",
            self.motion.per_key_threshold.keys(),
            &self.motion.keys,
        )?;
        check_motion_keys(
            "detection.per_key_min_length",
            self.detection.per_key_min_length.keys(),
            &self.motion.keys,
        )?;
        check_nonzero("continuous.max_jumps", self.continuous.max_jumps as usize)?;
        check_nonzero("cache.word_detection", self.cache.word_detection)?;
        check_nonzero("cache.hint_keys", self.cache.hint_keys)?;
        check_nonzero("cache.hint_assignment", self.cache.hint_assignment)?;
        Ok(())
    }
}

fn check_unique(pool: &'static str, keys: &[char]) -> Result<(), ConfigError> {
    let mut seen = FxHashSet::default();
    for &key in keys {
        if !seen.insert(key) {
            return Err(ConfigError::DuplicateKey { pool, key });
        }
    }
    Ok(())
}

fn check_motion_keys<'a>(
    field: &'static str,
    keys: impl IntoIterator<Item = &'a char>,
    motion_keys: &[char],
) -> Result<(), ConfigError> {
    match keys.into_iter().find(|key| !motion_keys.contains(key)) {
        Some(&key) => Err(ConfigError::UnknownMotionKey { field, key }),
        None => Ok(()),
    }
}

fn check_nonzero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_markers() -> Vec<char> {
    defaults::MARKERS.chars().collect()
}

fn default_word_pattern() -> String {
    defaults::WORD_PATTERN.to_string()
}

fn default_min_word_length() -> usize {
    defaults::MIN_WORD_LENGTH
}

fn default_segmentation_threshold() -> usize {
    defaults::SEGMENTATION_THRESHOLD
}

fn default_motion_keys() -> Vec<char> {
    defaults::MOTION_KEYS.chars().collect()
}

fn default_motion_threshold() -> u32 {
    defaults::MOTION_THRESHOLD
}

fn default_motion_timeout_ms() -> u64 {
    defaults::MOTION_TIMEOUT_MS
}

fn default_key_repeat_threshold_ms() -> u64 {
    defaults::KEY_REPEAT_THRESHOLD_MS
}

fn default_key_repeat_reset_delay_ms() -> u64 {
    defaults::KEY_REPEAT_RESET_DELAY_MS
}

fn default_max_continuous_jumps() -> u32 {
    defaults::MAX_CONTINUOUS_JUMPS
}

fn default_word_cache_capacity() -> usize {
    defaults::WORD_CACHE_CAPACITY
}

fn default_hint_key_cache_capacity() -> usize {
    defaults::HINT_KEY_CACHE_CAPACITY
}

fn default_assignment_cache_capacity() -> usize {
    defaults::ASSIGNMENT_CACHE_CAPACITY
}
