use std::io;
use std::path::Path;

use super::{now_epoch, LearnedOverlay, LearnedRecord};
use crate::overlay_io;
use crate::settings::settings;

const MAGIC: &[u8; 4] = b"KKLH";
const VERSION: u8 = 1;

impl LearnedOverlay {
    /// `KKLH` image: every entry with its score, last use and class ids.
    pub fn to_bytes(&self) -> Result<Vec<u8>, io::Error> {
        overlay_io::encode(MAGIC, VERSION, &self.list_all())
    }

    /// Rebuild from a `KKLH` image. Timestamps are kept, so decay continues
    /// from where it was; the capacity limit is applied once, ranked at the
    /// current time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, io::Error> {
        let records = overlay_io::decode::<LearnedRecord>(MAGIC, VERSION, bytes)?;
        Ok(Self::restore(
            records,
            settings().learning.max_entries,
            now_epoch(),
        ))
    }

    pub(crate) fn restore(records: Vec<LearnedRecord>, max: usize, now: u64) -> Self {
        let overlay = Self::new();
        overlay.store.update(|store| {
            for r in records {
                if r.reading.is_empty() || r.surface.is_empty() {
                    continue;
                }
                store.upsert(
                    &r.reading,
                    &r.surface,
                    (r.left_id, r.right_id),
                    r.score as i64,
                    r.last_used,
                );
            }
            store.evict(max, now);
        });
        overlay
    }

    pub fn save(&self, path: &Path) -> Result<(), io::Error> {
        overlay_io::save_atomic(path, &self.to_bytes()?)
    }

    /// Load `path`; a missing file gives an empty overlay.
    pub fn open(path: &Path) -> Result<Self, io::Error> {
        overlay_io::read_optional(path)?
            .map_or_else(|| Ok(Self::new()), |bytes| Self::from_bytes(&bytes))
    }
}
