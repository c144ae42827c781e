
use crate::converter::testutil::{neko_dict, neko_matrix};

use super::ConversionEngine;

fn neko_engine() -> ConversionEngine {
    ConversionEngine::builder()
        .system(neko_dict())
        .connection(neko_matrix())
        .build()
        .unwrap()
}

fn surfaces(candidates: &[super::Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.surface.as_str()).collect()
}
