//! Hint key generation.
//!
//! Keys come from the configured pools through a fixed list of strategies.
//! The strategies are tried in descending priority and the first one that can
//! handle the request produces the keys; [`Strategy::Hybrid`] handles every
//! request. All strategies emit through [`KeyEmitter`], which keeps the result
//! free of duplicates and of keys that prefix one another.

use rustc_hash::FxHashSet;

use crate::config::KeyPoolConfig;
use crate::types::HintKey;

/// Number of slots in the two-digit numeric sequence `01..99, 00`.
pub const NUMERIC_SLOTS: usize = 100;

/// A hint generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    SingleChar,
    NumericFallback,
    MultiChar,
    Hybrid,
}

impl Strategy {
    /// Every strategy, highest priority first.
    pub const ORDERED: [Strategy; 4] = [
        Strategy::SingleChar,
        Strategy::NumericFallback,
        Strategy::MultiChar,
        Strategy::Hybrid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::SingleChar => "single_char",
            Strategy::NumericFallback => "numeric_fallback",
            Strategy::MultiChar => "multi_char",
            Strategy::Hybrid => "hybrid",
        }
    }

    pub fn priority(self) -> u8 {
        match self {
            Strategy::SingleChar => 100,
            Strategy::NumericFallback => 90,
            Strategy::MultiChar => 80,
            Strategy::Hybrid => 0,
        }
    }

    pub fn can_handle(self, count: usize, config: &KeyPoolConfig) -> bool {
        let singles = &config.single_char_keys;
        let multis = &config.multi_char_keys;
        match self {
            Strategy::SingleChar => {
                !singles.is_empty()
                    && count <= singles.len()
                    && config.max_single_char_hints.is_none_or(|max| count <= max)
            }
            Strategy::NumericFallback => {
                config.use_numeric_fallback && singles.is_empty() && multis.is_empty()
            }
            Strategy::MultiChar => {
                singles.is_empty() && !multis.is_empty() && count <= pair_capacity(multis)
            }
            Strategy::Hybrid => true,
        }
    }

    pub fn generate(self, count: usize, config: &KeyPoolConfig) -> Vec<HintKey> {
        let mut out = KeyEmitter::new(count);
        match self {
            Strategy::SingleChar => out.singles(&config.single_char_keys),
            Strategy::NumericFallback => out.numeric(),
            Strategy::MultiChar => out.pairs(&config.multi_char_keys),
            Strategy::Hybrid => hybrid(&mut out, config),
        }
        out.finish()
    }
}

/// Picks the strategy that serves `count` keys under `config`.
pub fn select_strategy(count: usize, config: &KeyPoolConfig) -> Strategy {
    let mut strategies = Strategy::ORDERED;
    strategies.sort_by_key(|s| std::cmp::Reverse(s.priority()));
    strategies
        .into_iter()
        .find(|s| s.can_handle(count, config))
        .unwrap_or(Strategy::Hybrid)
}

/// Generates up to `count` distinct, prefix-free hint keys.
///
/// The output is deterministic: the same arguments always yield the same keys
/// in the same order.
pub fn generate(count: usize, config: &KeyPoolConfig) -> Vec<HintKey> {
    if count == 0 {
        return Vec::new();
    }
    let strategy = select_strategy(count, config);
    let keys = strategy.generate(count, config);
    log::trace!(
        "generated {} of {} hint keys with {} strategy",
        keys.len(),
        count,
        strategy.name()
    );
    keys
}

/// The largest number of keys `config` can ever produce.
pub fn maximum_addressable(config: &KeyPoolConfig) -> usize {
    select_strategy(usize::MAX, config)
        .generate(usize::MAX, config)
        .len()
}

// Composition used when no single strategy fits: singles first, then pairs,
// then numbers.
fn hybrid(out: &mut KeyEmitter, config: &KeyPoolConfig) {
    let singles = &config.single_char_keys;
    let multis = &config.multi_char_keys;

    if singles.is_empty() && multis.is_empty() {
        let markers = &config.markers;
        if out.wanted() <= markers.len() {
            out.singles(markers);
        } else {
            out.pairs(markers);
        }
    } else {
        let limit = config
            .max_single_char_hints
            .unwrap_or(singles.len())
            .min(singles.len());
        out.singles(&singles[..limit]);
        if multis.is_empty() {
            out.pairs(&config.markers);
        } else {
            out.pairs(multis);
        }
    }

    if config.use_numeric_fallback {
        out.numeric();
    }
}

fn is_numeric_pool(pool: &[char]) -> bool {
    !pool.is_empty() && pool.iter().all(char::is_ascii_digit)
}

fn pair_capacity(pool: &[char]) -> usize {
    if is_numeric_pool(pool) {
        NUMERIC_SLOTS
    } else {
        pool.len() * pool.len()
    }
}

/// Collects keys up to a limit, rejecting duplicates and prefix collisions.
struct KeyEmitter {
    limit: usize,
    keys: Vec<HintKey>,
    seen: FxHashSet<String>,
    single_chars: FxHashSet<char>,
    has_multi: bool,
}

impl KeyEmitter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            keys: Vec::new(),
            seen: FxHashSet::default(),
            single_chars: FxHashSet::default(),
            has_multi: false,
        }
    }

    fn is_full(&self) -> bool {
        self.keys.len() >= self.limit
    }

    fn wanted(&self) -> usize {
        self.limit - self.keys.len()
    }

    fn push(&mut self, key: String) {
        if self.is_full() || self.seen.contains(&key) {
            return;
        }
        let mut chars = key.chars();
        let Some(first) = chars.next() else {
            return;
        };
        let single = chars.next().is_none();
        if single {
            // A lone key would prefix an emitted longer key starting with it
            if self.has_multi && self.seen.iter().any(|k| k.starts_with(first)) {
                return;
            }
            self.single_chars.insert(first);
        } else {
            if self.single_chars.contains(&first) {
                return;
            }
            self.has_multi = true;
        }
        self.seen.insert(key.clone());
        self.keys.push(HintKey::new(key));
    }

    fn singles(&mut self, pool: &[char]) {
        for &c in pool {
            if self.is_full() {
                break;
            }
            self.push(c.to_string());
        }
    }

    // Row-major pairs, or the numeric sequence for an all-digit pool
    fn pairs(&mut self, pool: &[char]) {
        if is_numeric_pool(pool) {
            self.numeric();
            return;
        }
        for &a in pool {
            for &b in pool {
                if self.is_full() {
                    return;
                }
                let mut key = String::with_capacity(a.len_utf8() + b.len_utf8());
                key.push(a);
                key.push(b);
                self.push(key);
            }
        }
    }

    fn numeric(&mut self) {
        for n in (1..NUMERIC_SLOTS).chain(std::iter::once(0)) {
            if self.is_full() {
                return;
            }
            self.push(format!("{n:02}"));
        }
    }

    fn finish(self) -> Vec<HintKey> {
        self.keys
    }
}
