//! Virtual proxy for images that are expensive to construct.

use std::cell::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

/// Common interface of the real image and its stand-in.
pub trait Graphic {
    fn id(&self) -> u64;

    /// Draw the graphic and return the trace line it produced.
    fn render(&self) -> String;
}

/// Id sequence and live-image bookkeeping shared by all proxies of a session.
#[derive(Debug)]
pub struct ImageSession {
    next_id: AtomicU64,
    live: Arc<AtomicUsize>,
}

impl Default for ImageSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSession {
    /// Session whose first image gets id 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first_id: u64) -> Self {
        Self {
            next_id: AtomicU64::new(first_id),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Id the next proxy will receive.
    pub fn peek_next_id(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Number of real images currently alive.
    pub fn live_images(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// The expensive resource.
pub struct RealImage {
    id: u64,
    live: Arc<AtomicUsize>,
}

impl RealImage {
    fn new(id: u64, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        info!("ctor: {}", id);
        Self { id, live }
    }
}

impl fmt::Debug for RealImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealImage").field("id", &self.id).finish()
    }
}

impl Graphic for RealImage {
    fn id(&self) -> u64 {
        self.id
    }

    fn render(&self) -> String {
        format!("drawing image {}", self.id)
    }
}

impl Drop for RealImage {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        info!("dtor: {}", self.id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Unloaded,
    Loaded,
}

/// Stand-in that builds its [`RealImage`] on first use and keeps it afterwards.
#[derive(Debug)]
pub struct ImageProxy {
    id: u64,
    live: Arc<AtomicUsize>,
    real: OnceCell<RealImage>,
}

impl ImageProxy {
    /// Take the next id from `session`; the real image is not built yet.
    pub fn new(session: &ImageSession) -> Self {
        let id = session.allocate_id();
        debug!("proxy created: {}", id);
        Self {
            id,
            live: Arc::clone(&session.live),
            real: OnceCell::new(),
        }
    }

    pub fn state(&self) -> ImageState {
        match self.real.get() {
            Some(_) => ImageState::Loaded,
            None => ImageState::Unloaded,
        }
    }

    /// Return the real image, constructing it on the first call only.
    pub fn load(&self) -> &RealImage {
        self.real
            .get_or_init(|| RealImage::new(self.id, Arc::clone(&self.live)))
    }
}

impl Graphic for ImageProxy {
    fn id(&self) -> u64 {
        self.id
    }

    fn render(&self) -> String {
        self.load().render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_monotonic_from_one() {
        let session = ImageSession::new();
        let ids: Vec<u64> = (0..3).map(|_| ImageProxy::new(&session).id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(session.peek_next_id(), 4);
    }

    #[test]
    fn test_real_image_renders_its_id() {
        let session = ImageSession::starting_at(42);
        let proxy = ImageProxy::new(&session);
        assert_eq!(proxy.render(), "drawing image 42");
        assert_eq!(proxy.load().id(), 42);
    }
}
