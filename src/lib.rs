pub mod assign;
pub mod cache;
pub mod config;
pub mod continuous;
pub mod detector;
pub mod engine;
pub mod error;
pub mod hints;
pub mod key;
pub mod motion;
pub mod timers;
pub mod traits;
pub mod types;

pub use crate::assign::assign;
pub use crate::cache::{CacheKind, CacheRegistry, CacheStats, Fingerprint, ResultCache};
pub use crate::config::{EngineConfig, KeyPoolConfig};
pub use crate::continuous::{ContinuousLoop, ExitReason, LoopState};
pub use crate::detector::WordDetector;
pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::error::{ConfigError, EngineError, HostError};
pub use crate::hints::{generate, maximum_addressable};
pub use crate::key::{KeyCode, KeyEvent, Modifiers};
pub use crate::motion::{MotionDetector, MotionPhase};
pub use crate::traits::{DisplaySink, Recenter, ViewportSource};
pub use crate::types::{
    Anchor, AnchorPolicy, BufferId, EngineAction, HandleSet, HintKey, HintMapping, Location,
    MotionOutcome, Position, Target, Viewport, WindowId,
};
