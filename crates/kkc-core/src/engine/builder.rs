use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{info, warn};

use crate::dict::connection::ConnectionMatrix;
use crate::dict::{DictError, SourceTag, TrieDictionary};
use crate::ng_word::NgWordFilter;
use crate::user_dict::UserDictionary;
use crate::user_history::LearnedOverlay;

use super::{ConversionEngine, EngineError, RegisteredSource};

const SYSTEM_FILE: &str = "system.dict";
const CONNECTION_FILE: &str = "connection.conn";

enum Pending<T> {
    Ready(T),
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl Pending<Arc<TrieDictionary>> {
    fn load(self) -> Result<Arc<TrieDictionary>, DictError> {
        match self {
            Pending::Ready(dict) => Ok(dict),
            Pending::Bytes(bytes) => TrieDictionary::from_bytes(&bytes).map(Arc::new),
            Pending::Path(path) => TrieDictionary::open(&path).map(Arc::new),
        }
    }
}

impl Pending<ConnectionMatrix> {
    fn load(self) -> Result<ConnectionMatrix, DictError> {
        match self {
            Pending::Ready(conn) => Ok(conn),
            Pending::Bytes(bytes) => ConnectionMatrix::from_bytes(&bytes),
            Pending::Path(path) => ConnectionMatrix::open(&path),
        }
    }
}

/// Collects dictionary sources and overlays, then loads and checks them in
/// [`build`](Self::build).
///
/// The system dictionary and the connection matrix are mandatory; any other
/// static source that fails to load is logged and left out.
#[derive(Default)]
pub struct EngineBuilder {
    system: Option<Pending<Arc<TrieDictionary>>>,
    connection: Option<Pending<ConnectionMatrix>>,
    optional: Vec<(SourceTag, Pending<Arc<TrieDictionary>>)>,
    user: Option<Arc<UserDictionary>>,
    learned: Option<Arc<LearnedOverlay>>,
    ng_words: Option<Arc<NgWordFilter>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_source(mut self, tag: SourceTag, pending: Pending<Arc<TrieDictionary>>) -> Self {
        if tag == SourceTag::System {
            self.system = Some(pending);
        } else {
            self.optional.retain(|(t, _)| *t != tag);
            self.optional.push((tag, pending));
        }
        self
    }

    pub fn system(self, dict: TrieDictionary) -> Self {
        self.with_source(SourceTag::System, Pending::Ready(Arc::new(dict)))
    }

    pub fn system_bytes(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_source(SourceTag::System, Pending::Bytes(bytes.into()))
    }

    pub fn system_path(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(SourceTag::System, Pending::Path(path.into()))
    }

    pub fn connection(mut self, conn: ConnectionMatrix) -> Self {
        self.connection = Some(Pending::Ready(conn));
        self
    }

    pub fn connection_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.connection = Some(Pending::Bytes(bytes.into()));
        self
    }

    pub fn connection_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.connection = Some(Pending::Path(path.into()));
        self
    }

    /// Adds a static source. A second call for the same tag replaces the first.
    pub fn source(self, tag: SourceTag, dict: TrieDictionary) -> Self {
        self.with_source(tag, Pending::Ready(Arc::new(dict)))
    }

    pub fn source_shared(self, tag: SourceTag, dict: Arc<TrieDictionary>) -> Self {
        self.with_source(tag, Pending::Ready(dict))
    }

    pub fn source_bytes(self, tag: SourceTag, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_source(tag, Pending::Bytes(bytes.into()))
    }

    pub fn source_path(self, tag: SourceTag, path: impl Into<PathBuf>) -> Self {
        self.with_source(tag, Pending::Path(path.into()))
    }

    pub fn user_dictionary(mut self, user: Arc<UserDictionary>) -> Self {
        self.user = Some(user);
        self
    }

    pub fn learned(mut self, learned: Arc<LearnedOverlay>) -> Self {
        self.learned = Some(learned);
        self
    }

    pub fn ng_words(mut self, ng_words: Arc<NgWordFilter>) -> Self {
        self.ng_words = Some(ng_words);
        self
    }

    /// Registers `system.dict`, `connection.conn` and every `<tag>.dict`
    /// present in `dir` (e.g. `single_kanji.dict`, `emoji.dict`).
    pub fn load_dir(mut self, dir: &Path) -> Self {
        self = self
            .system_path(dir.join(SYSTEM_FILE))
            .connection_path(dir.join(CONNECTION_FILE));
        for tag in SourceTag::ALL {
            if tag == SourceTag::System || !tag.is_static() {
                continue;
            }
            let path = dir.join(format!("{}.dict", tag.as_str()));
            if path.exists() {
                self = self.source_path(tag, path);
            }
        }
        self
    }

    pub fn build(self) -> Result<ConversionEngine, EngineError> {
        let conn = self
            .connection
            .ok_or(EngineError::Missing("connection matrix"))?
            .load()
            .map_err(|error| EngineError::Load {
                what: "connection matrix".to_string(),
                error,
            })?;
        let num_ids = conn.num_ids();

        let system = self
            .system
            .ok_or(EngineError::Missing("system dictionary"))?
            .load()
            .map_err(|error| EngineError::Load {
                what: "system dictionary".to_string(),
                error,
            })?;
        if let Some(max_id) = system.max_pos_id().filter(|&id| id >= num_ids) {
            return Err(EngineError::IdOutOfRange {
                tag: SourceTag::System,
                max_id,
                num_ids,
            });
        }

        let mut sources = vec![RegisteredSource {
            tag: SourceTag::System,
            dict: system,
            enabled: AtomicBool::new(true),
        }];
        for (tag, pending) in self.optional {
            if !tag.is_static() {
                warn!(%tag, "not a static source, ignored");
                continue;
            }
            let dict = match pending.load() {
                Ok(dict) => dict,
                Err(e) => {
                    warn!(%tag, error = %e, "optional dictionary failed to load, leaving it out");
                    continue;
                }
            };
            if let Some(max_id) = dict.max_pos_id().filter(|&id| id >= num_ids) {
                warn!(%tag, max_id, num_ids, "optional dictionary exceeds connection ids, leaving it out");
                continue;
            }
            sources.push(RegisteredSource {
                tag,
                dict,
                enabled: AtomicBool::new(tag.enabled_by_default()),
            });
        }
        sources.sort_by_key(|s| s.tag);

        info!(
            sources = sources.len(),
            num_ids,
            mapped = conn.is_mapped(),
            "conversion engine ready"
        );
        Ok(ConversionEngine {
            sources,
            conn,
            user: self.user.unwrap_or_default(),
            learned: self.learned.unwrap_or_default(),
            ng_words: self.ng_words.unwrap_or_default(),
            user_enabled: AtomicBool::new(true),
            learned_enabled: AtomicBool::new(true),
        })
    }
}
