use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::{
    assets::loader::{DirFrameSource, FrameLoader, FrameSource},
    assets::store::FrameStore,
    eval::scroll::{ScrollMapper, ScrollSpan},
    foundation::core::{FrameCount, FrameIndex, Viewport},
    foundation::error::{ScrollseqError, ScrollseqResult},
    render::compositor::{Compositor, CompositorState, RenderOutcome},
    render::cpu::CpuSurface,
    render::surface::{DrawSurface, FrameRGBA},
    sequence::model::SequenceConfig,
    session::event::{DispatchOutcome, ScrollEvent},
};

/// Channel feeding a session, plus the loader whose workers post into it.
///
/// Hosts may send their own scroll and resize events through [`EventQueue::sender`] so that a
/// single receiver sees every event in arrival order. The queue holds a sender of its own until
/// [`EventQueue::close`], so the receiver only reports a disconnect after that.
pub struct EventQueue {
    tx: Option<mpsc::Sender<ScrollEvent>>,
    rx: mpsc::Receiver<ScrollEvent>,
    loader: FrameLoader,
}

impl EventQueue {
    /// Create an empty queue with its own loader pool.
    pub fn new(threads: Option<usize>) -> ScrollseqResult<Self> {
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            tx: Some(tx),
            rx,
            loader: FrameLoader::new(threads)?,
        })
    }

    /// Another handle for posting events. `None` once the queue is closed.
    pub fn sender(&self) -> Option<mpsc::Sender<ScrollEvent>> {
        self.tx.clone()
    }

    /// Receiving end drained by the session.
    pub fn receiver(&self) -> &mpsc::Receiver<ScrollEvent> {
        &self.rx
    }

    /// Start loading every frame of `count` from `source`.
    pub fn preload(&self, source: Arc<dyn FrameSource>, count: FrameCount) -> ScrollseqResult<()> {
        let Some(tx) = self.sender() else {
            return Err(ScrollseqError::validation("event queue is closed"));
        };
        self.loader.spawn_all(source, count, tx);
        Ok(())
    }

    /// Drop the queue's own sender.
    ///
    /// Afterwards the receiver disconnects as soon as every in-flight load and every sender
    /// handed out by [`EventQueue::sender`] is gone, which lets
    /// [`ScrollSession::run_until_settled`] fail fast on loads that never report back.
    pub fn close(&mut self) {
        self.tx = None;
    }
}

/// Owns everything needed to scrub a frame sequence by scroll position.
///
/// There is no shared global state: the store, mapper, compositor and surface live here and are
/// only touched from [`ScrollSession::dispatch`], one event at a time.
pub struct ScrollSession<S: DrawSurface = CpuSurface> {
    store: FrameStore,
    mapper: ScrollMapper,
    compositor: Compositor,
    surface: S,
}

impl<S: DrawSurface> ScrollSession<S> {
    /// Create a session drawing onto `surface`. Every frame starts pending.
    pub fn new(count: FrameCount, span: ScrollSpan, surface: S) -> ScrollseqResult<Self> {
        let mapper = ScrollMapper::new(count, span, surface.viewport())?;
        Ok(Self {
            store: FrameStore::new(count),
            mapper,
            compositor: Compositor::new(),
            surface,
        })
    }

    /// Frame store.
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Frame derived from the latest scroll position.
    pub fn current_frame(&self) -> FrameIndex {
        self.mapper.current()
    }

    /// Compositor state.
    pub fn compositor_state(&self) -> CompositorState {
        self.compositor.state()
    }

    /// Number of draws performed so far.
    pub fn draw_count(&self) -> u64 {
        self.compositor.draw_count()
    }

    /// Current scroll distance in pixels.
    pub fn scroll_distance(&self) -> f64 {
        self.mapper.distance()
    }

    /// Drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Copy of the current surface pixels.
    pub fn frame_rgba(&self) -> FrameRGBA {
        self.surface.readback_rgba8()
    }

    /// Apply one event and redraw if it calls for it.
    pub fn dispatch(&mut self, event: ScrollEvent) -> ScrollseqResult<DispatchOutcome> {
        match event {
            ScrollEvent::Scrolled(progress) => match self.mapper.update(progress) {
                Some(frame) => self.redraw(frame),
                None => Ok(DispatchOutcome::Unchanged),
            },
            ScrollEvent::ScrolledTo(offset) => match self.mapper.update_offset(offset) {
                Some(frame) => self.redraw(frame),
                None => Ok(DispatchOutcome::Unchanged),
            },
            ScrollEvent::Resized { width, height } => self.resize(Viewport::new(width, height)),
            ScrollEvent::FrameLoaded { index, result } => {
                if !self.store.complete(index, result) {
                    return Ok(DispatchOutcome::Ignored);
                }
                let current = self.mapper.current();
                if index == current && self.compositor.state() != CompositorState::Drawn(current) {
                    return self.redraw(current);
                }
                Ok(DispatchOutcome::Unchanged)
            }
        }
    }

    /// Dispatch every event already queued on `rx` without blocking.
    pub fn drain(
        &mut self,
        rx: &mpsc::Receiver<ScrollEvent>,
    ) -> ScrollseqResult<Vec<DispatchOutcome>> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(self.dispatch(ev)?);
        }
        Ok(out)
    }

    /// Dispatch events from `rx` until every frame has finished loading.
    ///
    /// Fails if `timeout` elapses first or every sender hangs up while frames are still pending.
    /// A queue from [`ScrollSession::start`] only hangs up after [`EventQueue::close`].
    pub fn run_until_settled(
        &mut self,
        rx: &mpsc::Receiver<ScrollEvent>,
        timeout: Duration,
    ) -> ScrollseqResult<()> {
        let deadline = Instant::now() + timeout;
        while !self.store.is_settled() {
            let left = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(left) {
                Ok(ev) => {
                    self.dispatch(ev)?;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    return Err(ScrollseqError::validation(format!(
                        "{} frame(s) still loading after {timeout:?}",
                        self.store.pending_count()
                    )));
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(ScrollseqError::validation(format!(
                        "event channel closed with {} frame(s) pending",
                        self.store.pending_count()
                    )));
                }
            }
        }
        tracing::debug!(
            ready = self.store.ready_count(),
            failed = self.store.failed_count(),
            "frame sequence settled"
        );
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) -> ScrollseqResult<DispatchOutcome> {
        if viewport.is_empty() {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "ignoring resize to an empty viewport"
            );
            return Ok(DispatchOutcome::Ignored);
        }
        if let Err(err) = self.surface.resize(viewport) {
            tracing::warn!(error = %err, "ignoring unsupported resize");
            return Ok(DispatchOutcome::Ignored);
        }
        self.compositor.invalidate();
        self.mapper.resize(viewport);
        tracing::debug!(width = viewport.width, height = viewport.height, "surface resized");
        self.redraw(self.mapper.current())
    }

    fn redraw(&mut self, frame: FrameIndex) -> ScrollseqResult<DispatchOutcome> {
        let outcome = match self
            .compositor
            .render(frame, &self.store, &mut self.surface)?
        {
            RenderOutcome::Drawn(f) => DispatchOutcome::Redrawn(f),
            RenderOutcome::Skipped(reason) => {
                tracing::trace!(%frame, ?reason, "redraw skipped");
                DispatchOutcome::Skipped(frame, reason)
            }
        };
        Ok(outcome)
    }
}

impl ScrollSession<CpuSurface> {
    /// Build a CPU-backed session from `config` and start loading every frame from disk.
    ///
    /// Load completions arrive on the returned queue; feed them back through
    /// [`ScrollSession::drain`] or [`ScrollSession::run_until_settled`].
    #[tracing::instrument(skip_all, fields(frames = config.count.get()))]
    pub fn start(config: &SequenceConfig) -> ScrollseqResult<(Self, EventQueue)> {
        config.validate()?;
        let surface = CpuSurface::new(config.viewport, config.surface_settings())?;
        let session = Self::new(config.count, config.span, surface)?;

        let source = DirFrameSource::new(config.frames.clone())?;
        let queue = EventQueue::new(config.threads)?;
        tracing::info!(dir = %config.frames.dir.display(), "preloading frame sequence");
        queue.preload(Arc::new(source), config.count)?;
        Ok((session, queue))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scroll_session.rs"]
mod tests;
