//! Kana-kanji conversion engine.
//!
//! The data structures and the conversion pipeline live in `kkc_core`; this
//! crate re-exports them and adds a background worker for callers that must
//! not block on a conversion (e.g. an input method's UI thread).

mod async_worker;
mod trace_init;

pub use async_worker::{ConversionResult, ConversionWorker};
pub use kkc_core::{
    converter, dict, engine, ng_word, settings, unicode, user_dict, user_history, Candidate,
    ConversionEngine, EngineBuilder, EngineError, Origin,
};
pub use trace_init::init_tracing;
