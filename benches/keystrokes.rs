//! Benchmarks for hint_engine keystroke latency.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hint_engine::config::{ContinuousConfig, EngineConfig};
use hint_engine::error::HostError;
use hint_engine::traits::{DisplaySink, ViewportSource};
use hint_engine::types::*;
use hint_engine::{Engine, KeyCode, KeyEvent, KeyPoolConfig, WordDetector, assign, generate};
use ropey::Rope;
use std::time::Duration;

/// Rope-backed viewport for benchmarking
struct BenchViewport {
    rope: Rope,
    first_line: u32,
    height: u32,
    cursor: Position,
}

impl BenchViewport {
    fn new(text: &str, height: u32) -> Self {
        Self {
            rope: Rope::from_str(text),
            first_line: 1,
            height,
            cursor: Position::ORIGIN,
        }
    }
}

impl ViewportSource for BenchViewport {
    fn visible_lines(&self) -> Viewport {
        let last = (self.first_line + self.height).min(self.rope.len_lines() as u32 + 1);
        let lines = (self.first_line..last)
            .map(|line| {
                let mut s = self.rope.line(line as usize - 1).to_string();
                if s.ends_with('\n') {
                    s.pop();
                }
                s
            })
            .collect();
        Viewport::new(self.first_line, lines)
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn move_cursor(&mut self, pos: Position) -> Result<(), HostError> {
        self.cursor = pos;
        Ok(())
    }

    fn location(&self) -> Location {
        Location {
            buffer: BufferId(1),
            window: WindowId(1),
        }
    }
}

/// Display that only hands out handles
#[derive(Default)]
struct NullDisplay {
    next: u64,
}

impl DisplaySink for NullDisplay {
    fn show(&mut self, mappings: &[HintMapping]) -> Result<HandleSet, HostError> {
        let start = self.next;
        self.next += mappings.len() as u64;
        Ok(HandleSet((start..self.next).collect()))
    }

    fn hide(&mut self, handles: HandleSet) {
        black_box(handles);
    }

    fn update_partial(&mut self, _handles: &HandleSet, matching: &[HintKey]) {
        black_box(matching);
    }
}

fn generate_sample_text(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!(
            "let value_{i} = compute(input, {i}) + offset; // line {} of sample text\n",
            i + 1
        ));
    }
    text
}

fn benchmark_cold_cycle(c: &mut Criterion) {
    let text = generate_sample_text(60);
    let view = BenchViewport::new(&text, 50);
    let viewport = view.visible_lines();
    let config = EngineConfig::default();
    let detector = WordDetector::new(&config.detection).unwrap();

    c.bench_function("detect, generate, assign (uncached)", |b| {
        b.iter(|| {
            let targets = detector.detect(black_box(&viewport), config.detection.min_word_length);
            let keys = generate(targets.len(), &config.keys);
            let mappings = assign(&targets, &keys, config.hint_position, None);
            black_box(mappings);
        });
    });
}

fn benchmark_cached_show(c: &mut Criterion) {
    let text = generate_sample_text(60);
    let view = BenchViewport::new(&text, 50);
    let mut display = NullDisplay::default();
    let mut engine = Engine::new(EngineConfig::default()).unwrap();

    c.bench_function("show hints (cached)", |b| {
        b.iter(|| {
            black_box(engine.show_hints(&view, &mut display, None));
        });
    });
}

fn benchmark_key_generation(c: &mut Criterion) {
    let pools = KeyPoolConfig {
        single_char_keys: "asdfghjkl".chars().collect(),
        multi_char_keys: "qwertyuiop".chars().collect(),
        max_single_char_hints: Some(6),
        use_numeric_fallback: true,
        ..KeyPoolConfig::default()
    };

    c.bench_function("generate 200 hint keys", |b| {
        b.iter(|| black_box(generate(black_box(200), &pools)));
    });
}

fn benchmark_hint_selection(c: &mut Criterion) {
    let text = generate_sample_text(60);
    let mut view = BenchViewport::new(&text, 50);
    let mut display = NullDisplay::default();
    let mut recenter = || Ok::<(), HostError>(());
    let mut engine = Engine::new(EngineConfig::default()).unwrap();

    c.bench_function("show, narrow, jump", |b| {
        b.iter(|| {
            engine.show_hints(&view, &mut display, None);
            for ch in ['B', 'C'] {
                let action =
                    engine.on_keystroke(&mut view, &mut display, &mut recenter, KeyEvent::char(ch));
                black_box(action);
            }
        });
    });
}

fn benchmark_continuous_jumps(c: &mut Criterion) {
    let text = generate_sample_text(60);
    let mut view = BenchViewport::new(&text, 50);
    let mut display = NullDisplay::default();
    let mut recenter = || Ok::<(), HostError>(());
    let mut engine = Engine::new(EngineConfig {
        continuous: ContinuousConfig {
            enabled: true,
            max_jumps: 10,
        },
        ..EngineConfig::default()
    })
    .unwrap();

    c.bench_function("continuous loop (10 jumps)", |b| {
        b.iter(|| {
            engine.show_hints(&view, &mut display, None);
            for _ in 0..10 {
                for ch in ['A', 'D'] {
                    black_box(engine.on_keystroke(
                        &mut view,
                        &mut display,
                        &mut recenter,
                        KeyEvent::char(ch),
                    ));
                }
            }
            engine.on_keystroke(
                &mut view,
                &mut display,
                &mut recenter,
                KeyEvent::new(KeyCode::Esc),
            );
        });
    });
}

fn benchmark_motion_keys(c: &mut Criterion) {
    let text = generate_sample_text(60);
    let view = BenchViewport::new(&text, 50);
    let mut display = NullDisplay::default();
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let mut now = 0u64;

    c.bench_function("motion repeat to trigger", |b| {
        b.iter(|| {
            for _ in 0..3 {
                now += 120;
                let outcome = engine.on_motion_key(&view, &mut display, 'j', now).unwrap();
                black_box(outcome);
            }
            engine.cancel(&mut display);
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = benchmark_cold_cycle,
              benchmark_cached_show,
              benchmark_key_generation,
              benchmark_hint_selection,
              benchmark_continuous_jumps,
              benchmark_motion_keys
}
criterion_main!(benches);
