#[cfg(not(target_endian = "little"))]
compile_error!("kkc-core requires a little-endian platform");

pub mod converter;
pub mod dict;
pub mod engine;
pub mod louds;
pub mod ng_word;
pub mod numeric;
pub(crate) mod overlay_io;
pub mod settings;
pub(crate) mod snapshot;
pub mod succinct;
pub mod unicode;
pub mod user_dict;
pub mod user_history;

pub use engine::{Candidate, ConversionEngine, EngineBuilder, EngineError, Origin};
