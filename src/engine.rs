use std::sync::Arc;

use crate::assign::assign;
use crate::cache::{CacheKind, CacheRegistry, CacheStats, Fingerprint};
use crate::config::EngineConfig;
use crate::continuous::{ContinuousLoop, ExitReason, JumpStep, LoopState};
use crate::detector::WordDetector;
use crate::error::Result;
use crate::hints;
use crate::key::{KeyCode, KeyEvent};
use crate::motion::{MotionDetector, MotionPhase};
use crate::traits::{DisplaySink, Recenter, ViewportSource};
use crate::types::{
    AnchorPolicy, BufferId, EngineAction, HandleSet, HintKey, HintMapping, Location,
    MotionOutcome, Target, Viewport,
};

// Hints currently on screen
#[derive(Debug)]
struct HintSession {
    mappings: Arc<[HintMapping]>,
    handles: HandleSet,
    typed: String,
    origin: Location,
    trigger: Option<char>,
}

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    detector: WordDetector,
    caches: CacheRegistry,
    motion: MotionDetector,
    continuous: ContinuousLoop,
    session: Option<HintSession>,
}

#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub hints_visible: bool,
    pub hint_count: usize,
    pub typed: String,
    pub loop_state: LoopState,
}

#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    caches: Option<CacheRegistry>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing cache registry instead of one sized from the config.
    pub fn caches(mut self, caches: CacheRegistry) -> Self {
        self.caches = Some(caches);
        self
    }

    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;
        let detector = WordDetector::new(&self.config.detection)?;
        let caches = self
            .caches
            .unwrap_or_else(|| CacheRegistry::new(&self.config.cache));
        Ok(Engine {
            motion: MotionDetector::new(self.config.motion.clone()),
            continuous: ContinuousLoop::new(self.config.continuous.clone()),
            config: self.config,
            detector,
            caches,
            session: None,
        })
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        EngineBuilder::default().config(config).build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            hints_visible: self.session.is_some(),
            hint_count: self.session.as_ref().map_or(0, |s| s.mappings.len()),
            typed: self
                .session
                .as_ref()
                .map(|s| s.typed.clone())
                .unwrap_or_default(),
            loop_state: self.continuous.state(),
        }
    }

    /// Runs a detection cycle on the visible lines and displays the result.
    ///
    /// `trigger` is the motion key that requested the hints, if any; it selects
    /// a per-key minimum word length.
    pub fn show_hints<V, D>(&mut self, view: &V, display: &mut D, trigger: Option<char>) -> EngineAction
    where
        V: ViewportSource,
        D: DisplaySink,
    {
        self.hide_session(display);
        let viewport = view.visible_lines();
        let mappings = self.compute_mappings(&viewport, trigger);
        if mappings.is_empty() {
            log::debug!("no targets in lines {}..={}", viewport.first_line, viewport.last_line);
            self.continuous.stop(ExitReason::NoMatch);
            return EngineAction::Ignore;
        }
        match display.show(&mappings) {
            Ok(handles) => {
                self.session = Some(HintSession {
                    mappings: Arc::clone(&mappings),
                    handles,
                    typed: String::new(),
                    origin: view.location(),
                    trigger,
                });
                EngineAction::ShowHints(mappings)
            }
            Err(err) => {
                log::warn!("failed to display hints: {err}");
                display.warn(&err.to_string());
                self.continuous.stop(ExitReason::HostFailure);
                EngineAction::Cancel
            }
        }
    }

    /// Handles a keystroke while hints may be on screen.
    pub fn on_keystroke<V, D, R>(
        &mut self,
        view: &mut V,
        display: &mut D,
        recenter: &mut R,
        key: KeyEvent,
    ) -> EngineAction
    where
        V: ViewportSource,
        D: DisplaySink,
        R: Recenter,
    {
        let Some(session) = self.session.as_mut() else {
            // Nothing on screen means nothing to continue
            self.continuous.stop(ExitReason::NoMatch);
            return EngineAction::Ignore;
        };

        match key.code {
            KeyCode::Esc => return self.exit(display, ExitReason::Cancelled),
            KeyCode::Backspace => {
                session.typed.pop();
                let matching = matching_keys(&session.mappings, &session.typed);
                display.update_partial(&session.handles, &matching);
                return EngineAction::UpdatePartial(matching);
            }
            _ => {}
        }

        let Some(c) = key.typed_char() else {
            return self.exit(display, ExitReason::NoMatch);
        };
        session.typed.push(c);

        if let Some(hit) = session.mappings.iter().find(|m| m.key == *session.typed) {
            let target = hit.target.clone();
            return self.jump(view, display, recenter, target);
        }

        let matching = matching_keys(&session.mappings, &session.typed);
        if matching.is_empty() {
            return self.exit(display, ExitReason::NoMatch);
        }
        display.update_partial(&session.handles, &matching);
        EngineAction::UpdatePartial(matching)
    }

    /// Feeds a raw motion key and shows hints when it triggers.
    pub fn on_motion_key<V, D>(
        &mut self,
        view: &V,
        display: &mut D,
        key: char,
        now: u64,
    ) -> Result<MotionOutcome>
    where
        V: ViewportSource,
        D: DisplaySink,
    {
        let buffer = view.location().buffer;
        let outcome = self.motion.on_motion_key(buffer, key, now)?;
        if outcome.trigger {
            self.show_hints(view, display, Some(key));
        }
        Ok(outcome)
    }

    /// Feeds a count digit typed before a motion key.
    pub fn on_count_digit(&mut self, buffer: BufferId, digit: char) -> bool {
        self.motion.on_count_digit(buffer, digit)
    }

    pub fn motion_phase(&self, buffer: BufferId) -> MotionPhase {
        self.motion.phase(buffer)
    }

    /// Expires motion timers due at `now`.
    pub fn tick(&mut self, now: u64) {
        self.motion.tick(now);
    }

    /// Hides any hints and leaves the continuous loop.
    pub fn cancel<D: DisplaySink>(&mut self, display: &mut D) -> EngineAction {
        self.exit(display, ExitReason::Cancelled)
    }

    /// Drops all per-buffer state of a closed buffer, including hints shown
    /// in it.
    pub fn forget_buffer<D: DisplaySink>(&mut self, display: &mut D, buffer: BufferId) {
        self.motion.forget_buffer(buffer);
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.origin.buffer == buffer)
        {
            self.hide_session(display);
        }
        if let LoopState::Active { origin, .. } = self.continuous.state()
            && origin.buffer == buffer
        {
            self.continuous.stop(ExitReason::LeftOrigin);
        }
    }

    pub fn cache_stats(&self, kind: CacheKind) -> CacheStats {
        self.caches.stats(kind)
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    pub fn clear_caches(&mut self) {
        self.caches.clear_all();
    }

    fn jump<V, D, R>(
        &mut self,
        view: &mut V,
        display: &mut D,
        recenter: &mut R,
        target: Target,
    ) -> EngineAction
    where
        V: ViewportSource,
        D: DisplaySink,
        R: Recenter,
    {
        let Some(session) = self.session.take() else {
            return EngineAction::Ignore;
        };
        display.hide(session.handles);

        log::debug!(
            "jumping from {:?} to {}:{}",
            view.cursor(),
            target.line,
            target.col
        );
        if let Err(err) = view.move_cursor(target.position()) {
            log::warn!("failed to jump to {}:{}: {err}", target.line, target.col);
            display.warn(&err.to_string());
            self.continuous.stop(ExitReason::HostFailure);
            return EngineAction::Cancel;
        }

        match self.continuous.on_jump(session.origin, view.location()) {
            JumpStep::SingleShot | JumpStep::Exit(_) => {}
            JumpStep::Recenter => {
                if let Err(err) = recenter.recenter() {
                    log::warn!("recenter failed, leaving continuous mode: {err}");
                    display.warn(&err.to_string());
                    self.continuous.stop(ExitReason::HostFailure);
                } else {
                    match self.continuous.advance() {
                        Ok(jumps) => {
                            log::debug!("continuous jump {jumps}");
                            let action = self.show_hints(view, display, session.trigger);
                            if !matches!(action, EngineAction::ShowHints(_)) {
                                self.continuous.stop(ExitReason::NoMatch);
                            }
                        }
                        Err(ExitReason::JumpCap) => {
                            display.warn(&format!(
                                "continuous jump limit ({}) reached",
                                self.continuous.max_jumps()
                            ));
                        }
                        Err(_) => {}
                    }
                }
            }
        }

        EngineAction::Jump(target)
    }

    fn exit<D: DisplaySink>(&mut self, display: &mut D, reason: ExitReason) -> EngineAction {
        self.hide_session(display);
        self.continuous.stop(reason);
        EngineAction::Cancel
    }

    fn hide_session<D: DisplaySink>(&mut self, display: &mut D) {
        if let Some(session) = self.session.take() {
            display.hide(session.handles);
        }
    }

    // Detect, generate and assign, each step served from its cache partition
    // when the fingerprint is unchanged.
    fn compute_mappings(&mut self, viewport: &Viewport, trigger: Option<char>) -> Arc<[HintMapping]> {
        let detection = &self.config.detection;
        let min_length = detection.min_length_for(trigger);
        let words_key = Fingerprint::of(&(viewport, detection, min_length));
        let detector = &self.detector;
        let targets: Arc<[Target]> = self
            .caches
            .words
            .get_or_insert_with(words_key, || detector.detect(viewport, min_length).into());

        let keys_config = &self.config.keys;
        let policy = self.config.hint_position;
        let both_min = keys_config.both_ends_min_word_length;
        let needed = keys_needed(&targets, policy, both_min);
        let keys_key = Fingerprint::of(&(needed, keys_config));
        let keys: Arc<[HintKey]> = self
            .caches
            .hint_keys
            .get_or_insert_with(keys_key, || hints::generate(needed, keys_config).into());

        let assign_key = Fingerprint::of(&(words_key, keys_key, policy, both_min));
        let mappings = self.caches.assignments.get_or_insert_with(assign_key, || {
            assign(&targets, &keys, policy, both_min).into()
        });
        log::debug!(
            "{} targets, {} keys, {} hints",
            targets.len(),
            keys.len(),
            mappings.len()
        );
        mappings
    }
}

fn keys_needed(targets: &[Target], policy: AnchorPolicy, both_min: Option<usize>) -> usize {
    match policy {
        AnchorPolicy::Both => targets
            .iter()
            .map(|t| {
                if both_min.is_none_or(|min| t.width as usize >= min) {
                    2
                } else {
                    1
                }
            })
            .sum(),
        _ => targets.len(),
    }
}

fn matching_keys(mappings: &[HintMapping], typed: &str) -> Vec<HintKey> {
    mappings
        .iter()
        .filter(|m| m.key.as_str().starts_with(typed))
        .map(|m| m.key.clone())
        .collect()
}
