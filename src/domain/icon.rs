//! Flyweight icon registry.
//!
//! Icons carry intrinsic state only (name and dimensions) and are shared by
//! every client that asks for the same key. Position is extrinsic and is
//! passed to [`Icon::draw`] on each call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, instrument};

/// Intrinsic dimensions of an icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IconSize {
    pub width: i32,
    pub height: i32,
}

impl IconSize {
    pub const fn square(side: i32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// Deterministic name -> dimensions table used when an icon is first created.
///
/// Unknown names map to a zero-sized icon rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCatalog {
    sizes: BTreeMap<String, IconSize>,
}

impl Default for IconCatalog {
    fn default() -> Self {
        let sizes = [
            ("go", IconSize::square(20)),
            ("stop", IconSize::square(40)),
            ("select", IconSize::square(60)),
            ("undo", IconSize::square(30)),
        ]
        .into_iter()
        .map(|(name, size)| (name.to_string(), size))
        .collect();
        Self { sizes }
    }
}

impl IconCatalog {
    /// Catalog without any known names; every icon is 0x0.
    pub fn empty() -> Self {
        Self {
            sizes: BTreeMap::new(),
        }
    }

    /// Add or replace the dimensions for `name`.
    pub fn with_size(mut self, name: &str, size: IconSize) -> Self {
        self.sizes.insert(name.to_string(), size);
        self
    }

    /// Overlay `entries` onto this catalog (same name replaces, new name adds).
    pub fn merge<'a>(mut self, entries: impl IntoIterator<Item = (&'a str, IconSize)>) -> Self {
        for (name, size) in entries {
            self.sizes.insert(name.to_string(), size);
        }
        self
    }

    pub fn size_of(&self, name: &str) -> IconSize {
        self.sizes.get(name).copied().unwrap_or_default()
    }

    /// True when `name` has an entry, even a 0×0 one.
    pub fn contains(&self, name: &str) -> bool {
        self.sizes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sizes.keys().map(String::as_str)
    }
}

/// Shared flyweight. Only the factory constructs these.
#[derive(Debug, PartialEq, Eq)]
pub struct Icon {
    name: String,
    size: IconSize,
}

impl Icon {
    fn new(name: &str, catalog: &IconCatalog) -> Self {
        Self {
            name: name.to_string(),
            size: catalog.size_of(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> IconSize {
        self.size
    }

    /// Place the icon at the extrinsic position `(x, y)`.
    ///
    /// Corners are computed in `i64`, so any `i32` position is exact.
    pub fn draw(&self, x: i32, y: i32) -> BoundingBox {
        self.place(i64::from(x), i64::from(y))
    }

    /// Edges saturate at `i64::MAX`/`i64::MIN`.
    fn place(&self, x: i64, y: i64) -> BoundingBox {
        BoundingBox {
            name: self.name.clone(),
            left: x,
            top: y,
            right: x.saturating_add(i64::from(self.size.width)),
            bottom: y.saturating_add(i64::from(self.size.height)),
        }
    }
}

/// Area covered by one drawn icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub name: String,
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "drawing {}: upper left ({},{}) - lower right ({},{})",
            self.name, self.left, self.top, self.right, self.bottom
        )
    }
}

/// Registry guaranteeing one [`Icon`] per key.
///
/// Lookup-or-insert runs under a single lock, so concurrent first requests
/// for the same key still yield one shared instance. Keys are kept in the
/// order they were first requested.
#[derive(Debug, Default)]
pub struct IconFactory {
    catalog: IconCatalog,
    icons: Mutex<IndexMap<String, Arc<Icon>>>,
}

impl IconFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: IconCatalog) -> Self {
        Self {
            catalog,
            icons: Mutex::new(IndexMap::new()),
        }
    }

    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    /// Return the shared icon for `key`, creating it on first request.
    #[instrument(level = "trace", skip(self))]
    pub fn get_icon(&self, key: &str) -> Arc<Icon> {
        // a panicking holder cannot leave the map half-updated, so poison is ignored
        let mut icons = self.icons.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(icon) = icons.get(key) {
            return Arc::clone(icon);
        }
        let icon = Arc::new(Icon::new(key, &self.catalog));
        debug!("new flyweight: {} {:?}", key, icon.size());
        icons.insert(key.to_string(), Arc::clone(&icon));
        icon
    }

    /// Keys of all icons created so far, in first-request order.
    pub fn active_keys(&self) -> Vec<String> {
        self.icons
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.icons.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line diagnostic listing the active flyweights.
    pub fn report(&self) -> String {
        format!("Active Flyweights: {}", self.active_keys().iter().join(" "))
    }
}

/// Unshared client holding shared icons and the layout (extrinsic) state.
#[derive(Debug, Clone)]
pub struct Dialog {
    title: String,
    icons: Vec<Arc<Icon>>,
    origin_x: i32,
    origin_y: i32,
    x_increment: i32,
}

impl Dialog {
    pub fn new(
        title: &str,
        icons: Vec<Arc<Icon>>,
        origin: (i32, i32),
        x_increment: i32,
    ) -> Self {
        Self {
            title: title.to_string(),
            icons,
            origin_x: origin.0,
            origin_y: origin.1,
            x_increment,
        }
    }

    pub fn file_selection(first: Arc<Icon>, second: Arc<Icon>, third: Arc<Icon>) -> Self {
        Self::new("FileSelection", vec![first, second, third], (100, 100), 100)
    }

    pub fn commit_transaction(first: Arc<Icon>, second: Arc<Icon>, third: Arc<Icon>) -> Self {
        Self::new("CommitTransaction", vec![first, second, third], (150, 150), 150)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icons(&self) -> &[Arc<Icon>] {
        &self.icons
    }

    /// Lay the icons out left to right starting at the dialog origin.
    pub fn draw(&self) -> Vec<BoundingBox> {
        let step = i64::from(self.x_increment);
        (0_i64..)
            .zip(&self.icons)
            .map(|(i, icon)| {
                let x = i64::from(self.origin_x).saturating_add(i.saturating_mul(step));
                icon.place(x, i64::from(self.origin_y))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_display_matches_trace_format() {
        let factory = IconFactory::new();
        let bbox = factory.get_icon("go").draw(100, 100);
        assert_eq!(
            bbox.to_string(),
            "drawing go: upper left (100,100) - lower right (120,120)"
        );
    }

    #[test]
    fn test_catalog_merge_replaces_and_adds() {
        let catalog = IconCatalog::default().merge([
            ("go", IconSize::square(25)),
            ("redo", IconSize { width: 30, height: 10 }),
        ]);
        assert_eq!(catalog.size_of("go"), IconSize::square(25));
        assert_eq!(catalog.size_of("redo"), IconSize { width: 30, height: 10 });
        assert_eq!(catalog.size_of("stop"), IconSize::square(40));
    }

    #[test]
    fn test_report_lists_keys_in_request_order() {
        let factory = IconFactory::new();
        for key in ["stop", "go", "stop"] {
            factory.get_icon(key);
        }
        assert_eq!(factory.report(), "Active Flyweights: stop go");
    }

    #[test]
    fn test_commit_transaction_layout() {
        let factory = IconFactory::new();
        let dialog = Dialog::commit_transaction(
            factory.get_icon("select"),
            factory.get_icon("stop"),
            factory.get_icon("undo"),
        );
        let boxes = dialog.draw();
        assert_eq!((boxes[0].left, boxes[0].top), (150, 150));
        assert_eq!((boxes[1].left, boxes[1].right), (300, 340));
        assert_eq!((boxes[2].left, boxes[2].bottom), (450, 180));
    }

    #[test]
    fn given_position_near_i32_max_when_drawing_then_corner_is_exact() {
        let factory = IconFactory::new();
        let bbox = factory.get_icon("go").draw(i32::MAX - 5, i32::MIN);

        assert_eq!(bbox.left, i64::from(i32::MAX) - 5);
        assert_eq!(bbox.right, i64::from(i32::MAX) + 15);
        assert_eq!(bbox.bottom, i64::from(i32::MIN) + 20);
    }

    #[test]
    fn given_extreme_spacing_when_drawing_dialog_then_positions_do_not_wrap() {
        let factory = IconFactory::new();
        let dialog = Dialog::new(
            "Wide",
            vec![factory.get_icon("go"), factory.get_icon("stop"), factory.get_icon("undo")],
            (i32::MAX, 0),
            i32::MAX,
        );

        let boxes = dialog.draw();

        let lefts: Vec<i64> = boxes.iter().map(|b| b.left).collect();
        let max = i64::from(i32::MAX);
        assert_eq!(lefts, vec![max, 2 * max, 3 * max]);
        assert!(boxes.iter().all(|b| b.right > b.left));
    }

    #[test]
    fn given_configured_zero_sized_icon_when_checking_catalog_then_it_is_known() {
        let catalog = IconCatalog::default().merge([("blank", IconSize::square(0))]);

        assert!(catalog.contains("blank"));
        assert!(catalog.contains("go"));
        assert!(!catalog.contains("redo"));
        assert_eq!(catalog.size_of("blank"), catalog.size_of("redo"));
    }
}
