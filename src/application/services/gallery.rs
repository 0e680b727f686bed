//! Virtual proxy gallery scenario

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::{Graphic, ImageProxy, ImageSession, ImageState};

/// Output from running the gallery scenario.
#[derive(Debug, Clone)]
pub struct GalleryReport {
    /// Ids handed out to the proxies, in creation order
    pub ids: Vec<u64>,
    /// Real images constructed while drawing
    pub loads: usize,
    /// Ids whose real image was constructed, in load order
    pub loaded_ids: Vec<u64>,
    /// Real images released when the gallery was dropped
    pub destroyed: usize,
    /// Real images still alive after the gallery was dropped
    pub live_after_drop: usize,
    pub lines: Vec<String>,
}

/// Creates proxies from a session and draws them twice each.
pub struct GalleryScenario {
    session: ImageSession,
}

impl GalleryScenario {
    pub fn new(session: ImageSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ImageSession {
        &self.session
    }

    /// Create `count` proxies and draw every one of them twice.
    pub fn run(&self, count: usize) -> GalleryReport {
        self.run_where(count, |_| true)
    }

    /// Create `count` proxies and draw twice only those whose position
    /// satisfies `should_draw`; the rest stay unloaded.
    #[instrument(level = "debug", skip(self, should_draw))]
    pub fn run_where(&self, count: usize, should_draw: impl Fn(usize) -> bool) -> GalleryReport {
        let mut lines = Vec::new();
        let mut loaded_ids = Vec::new();

        let gallery: Vec<ImageProxy> = (0..count).map(|_| ImageProxy::new(&self.session)).collect();
        let ids: Vec<u64> = gallery.iter().map(|image| image.id()).collect();
        lines.push(format!("created {} proxies, none loaded", gallery.len()));

        for (position, image) in gallery.iter().enumerate() {
            if !should_draw(position) {
                continue;
            }
            for _ in 0..2 {
                let before = image.state();
                let drawn = image.render();
                if before == ImageState::Unloaded {
                    loaded_ids.push(image.id());
                    lines.push(format!("   $$ ctor: {}", image.id()));
                }
                lines.push(format!("   {}", drawn));
            }
        }

        let live_before_drop = self.session.live_images();
        drop(gallery);
        let live_after_drop = self.session.live_images();
        let destroyed = live_before_drop.saturating_sub(live_after_drop);
        if !loaded_ids.is_empty() {
            lines.push(format!("   dtor: {}", loaded_ids.iter().join(" ")));
        }
        debug!(
            "gallery: {} loads, {} destroyed, {} live after drop",
            loaded_ids.len(),
            destroyed,
            live_after_drop
        );

        GalleryReport {
            ids,
            loads: loaded_ids.len(),
            loaded_ids,
            destroyed,
            live_after_drop,
            lines,
        }
    }
}
