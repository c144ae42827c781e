use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use kkc_core::{Candidate, ConversionEngine};

struct ConversionWork {
    reading: String,
    generation: u64,
}

/// Candidates for one submitted reading.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub generation: u64,
    pub reading: String,
    pub candidates: Vec<Candidate>,
}

/// Runs conversions on a background thread. Every submit supersedes the
/// previous one: queued requests are drained to the newest, and a result is
/// only handed out while its generation is still current.
pub struct ConversionWorker {
    work_tx: mpsc::Sender<ConversionWork>,
    result_rx: Mutex<mpsc::Receiver<ConversionResult>>,
    generation: Arc<AtomicU64>,
}

impl ConversionWorker {
    /// Start the worker thread. It exits once the worker is dropped.
    pub fn spawn(engine: Arc<ConversionEngine>, max_results: usize) -> io::Result<Self> {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<ConversionWork>();
        let (result_tx, result_rx) = mpsc::channel::<ConversionResult>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("kkc-convert".into())
                .spawn(move || worker_loop(work_rx, result_tx, generation, engine, max_results))?;
        }
        Ok(Self {
            work_tx,
            result_rx: Mutex::new(result_rx),
            generation,
        })
    }

    /// Queue a reading and return the generation its result will carry.
    pub fn submit(&self, reading: impl Into<String>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.work_tx.send(ConversionWork {
            reading: reading.into(),
            generation,
        });
        generation
    }

    /// Make every pending request stale.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The result for the current generation, if it has arrived. Stale
    /// results are discarded.
    pub fn try_recv(&self) -> Option<ConversionResult> {
        let rx = self.result_rx.lock().ok()?;
        while let Ok(result) = rx.try_recv() {
            if self.is_current(&result) {
                return Some(result);
            }
        }
        None
    }

    /// Like [`try_recv`](Self::try_recv), waiting up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ConversionResult> {
        let deadline = Instant::now() + timeout;
        let rx = self.result_rx.lock().ok()?;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let result = rx.recv_timeout(remaining).ok()?;
            if self.is_current(&result) {
                return Some(result);
            }
        }
    }

    fn is_current(&self, result: &ConversionResult) -> bool {
        result.generation == self.generation.load(Ordering::SeqCst)
    }
}

fn worker_loop(
    rx: mpsc::Receiver<ConversionWork>,
    tx: mpsc::Sender<ConversionResult>,
    generation: Arc<AtomicU64>,
    engine: Arc<ConversionEngine>,
    max_results: usize,
) {
    while let Ok(work) = rx.recv() {
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "stale request skipped");
            continue;
        }

        let candidates = engine.convert(&latest.reading, max_results);

        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "stale result dropped");
            continue;
        }
        if tx
            .send(ConversionResult {
                generation: latest.generation,
                reading: latest.reading,
                candidates,
            })
            .is_err()
        {
            break;
        }
    }
}
