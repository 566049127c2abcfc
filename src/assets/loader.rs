use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use crate::assets::decode::decode_image_file;
use crate::assets::path::{FramePathPattern, frame_path};
use crate::assets::store::PreparedImage;
use crate::foundation::core::{FrameCount, FrameIndex};
use crate::foundation::error::{ScrollseqError, ScrollseqResult};
use crate::session::event::ScrollEvent;

/// Where frame images come from.
///
/// Implementations are called from loader worker threads, once per frame index.
pub trait FrameSource: Send + Sync {
    /// Load and decode one frame.
    fn load(&self, index: FrameIndex) -> ScrollseqResult<PreparedImage>;
}

/// Frames read from a directory following a [`FramePathPattern`].
#[derive(Clone, Debug)]
pub struct DirFrameSource {
    pattern: FramePathPattern,
}

impl DirFrameSource {
    /// Create a source after validating the pattern.
    pub fn new(pattern: FramePathPattern) -> ScrollseqResult<Self> {
        pattern.validate()?;
        Ok(Self { pattern })
    }

    /// Path a frame is read from.
    pub fn path_for(&self, index: FrameIndex) -> PathBuf {
        frame_path(&self.pattern, index)
    }
}

impl FrameSource for DirFrameSource {
    fn load(&self, index: FrameIndex) -> ScrollseqResult<PreparedImage> {
        decode_image_file(&self.path_for(index))
    }
}

/// Background frame loader.
///
/// Every requested frame is loaded as an independent job on a dedicated rayon pool; there is no
/// ordering between completions and no retry. Each completion is posted as
/// [`ScrollEvent::FrameLoaded`] so the store is only ever mutated by whoever drains the channel.
pub struct FrameLoader {
    pool: Arc<rayon::ThreadPool>,
}

impl FrameLoader {
    /// Build a loader. `threads: None` uses rayon's default thread count.
    pub fn new(threads: Option<usize>) -> ScrollseqResult<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("scrollseq-load-{i}"))
            .panic_handler(|_| tracing::error!("frame load panicked; frame stays pending"));
        if let Some(n) = threads {
            if n == 0 {
                return Err(ScrollseqError::validation("loader threads must be > 0"));
            }
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| ScrollseqError::Other(anyhow::Error::new(e)))?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Request every frame of a `count`-long sequence, fire-and-forget.
    ///
    /// Completions whose receiver is gone are dropped silently.
    pub fn spawn_all(
        &self,
        source: Arc<dyn FrameSource>,
        count: FrameCount,
        events: mpsc::Sender<ScrollEvent>,
    ) {
        tracing::debug!(frames = count.get(), "spawning frame loads");
        for index in count.indices() {
            self.spawn_one(Arc::clone(&source), index, events.clone());
        }
    }

    /// Request a single frame, fire-and-forget.
    ///
    /// A panicking source drops `events` without posting a completion.
    pub fn spawn_one(
        &self,
        source: Arc<dyn FrameSource>,
        index: FrameIndex,
        events: mpsc::Sender<ScrollEvent>,
    ) {
        self.pool.spawn(move || {
            let result = source.load(index);
            let _ = events.send(ScrollEvent::FrameLoaded { index, result });
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
