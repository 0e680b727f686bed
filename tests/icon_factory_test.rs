//! Tests for the flyweight icon registry

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use rstest::rstest;

use gofpat::domain::{Dialog, IconCatalog, IconFactory, IconSize};

#[test]
fn given_same_key_twice_when_getting_icon_then_returns_same_instance() {
    let factory = IconFactory::new();

    let first = factory.get_icon("go");
    let second = factory.get_icon("go");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(factory.len(), 1);
}

#[test]
fn given_different_keys_when_getting_icons_then_returns_distinct_instances() {
    let factory = IconFactory::new();

    let go = factory.get_icon("go");
    let stop = factory.get_icon("stop");

    assert!(!Arc::ptr_eq(&go, &stop));
    assert_eq!(stop.size(), IconSize::square(40));
}

#[rstest]
#[case("go", 20, 20)]
#[case("stop", 40, 40)]
#[case("select", 60, 60)]
#[case("undo", 30, 30)]
#[case::unknown("redo", 0, 0)]
#[case::case_sensitive("Go", 0, 0)]
fn given_key_when_creating_icon_then_dimensions_come_from_catalog(
    #[case] key: &str,
    #[case] width: i32,
    #[case] height: i32,
) {
    let factory = IconFactory::new();

    let icon = factory.get_icon(key);

    assert_eq!(icon.name(), key);
    assert_eq!(icon.size(), IconSize { width, height });
}

#[test]
fn given_icon_when_drawing_then_box_is_pure_function_of_position() {
    let factory = IconFactory::new();
    let select = factory.get_icon("select");

    let a = select.draw(10, 5);
    let b = select.draw(10, 5);
    let c = select.draw(-60, -60);

    assert_eq!(a, b);
    assert_eq!((a.left, a.top, a.right, a.bottom), (10, 5, 70, 65));
    assert_eq!((c.right, c.bottom), (0, 0));
    assert_eq!(select.size(), IconSize::square(60), "draw must not mutate the flyweight");
}

#[test]
fn given_many_distinct_keys_when_requested_then_registry_grows_without_limit() {
    let factory = IconFactory::new();
    let keys: Vec<String> = (0..32).map(|i| format!("icon-{}", i)).collect();

    for key in &keys {
        factory.get_icon(key);
    }

    assert_eq!(factory.active_keys(), keys);
}

#[test]
fn given_repeated_requests_when_reporting_then_no_duplicates_and_bounded() {
    let factory = IconFactory::new();
    let requests = ["go", "stop", "go", "select", "stop", "undo", "go"];

    for key in requests {
        factory.get_icon(key);
    }

    let active = factory.active_keys();
    let distinct: HashSet<&str> = requests.iter().copied().collect();
    assert_eq!(active, vec!["go", "stop", "select", "undo"]);
    assert!(active.len() <= distinct.len());
}

#[test]
fn given_concurrent_first_requests_when_getting_same_key_then_one_instance() {
    let factory = IconFactory::new();

    let icons: Vec<Arc<_>> = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| factory.get_icon("select")))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(factory.len(), 1);
    assert!(icons.iter().all(|icon| Arc::ptr_eq(icon, &icons[0])));
}

#[test]
fn given_custom_catalog_when_creating_icon_then_uses_custom_size() {
    let catalog = IconCatalog::empty().with_size("go", IconSize { width: 5, height: 7 });
    let factory = IconFactory::with_catalog(catalog);

    assert_eq!(factory.get_icon("go").size(), IconSize { width: 5, height: 7 });
    assert_eq!(factory.get_icon("stop").size(), IconSize::default());
}

#[test]
fn given_two_dialogs_when_built_from_one_factory_then_icons_are_shared() {
    let factory = IconFactory::new();
    let file_selection = Dialog::file_selection(
        factory.get_icon("go"),
        factory.get_icon("stop"),
        factory.get_icon("select"),
    );
    let commit = Dialog::commit_transaction(
        factory.get_icon("select"),
        factory.get_icon("stop"),
        factory.get_icon("undo"),
    );

    assert!(Arc::ptr_eq(&file_selection.icons()[1], &commit.icons()[1]));
    assert!(Arc::ptr_eq(&file_selection.icons()[2], &commit.icons()[0]));
    assert_eq!(factory.len(), 4);

    let boxes: Vec<String> = file_selection.draw().iter().map(|b| b.to_string()).collect();
    assert_eq!(
        boxes,
        vec![
            "drawing go: upper left (100,100) - lower right (120,120)",
            "drawing stop: upper left (200,100) - lower right (240,140)",
            "drawing select: upper left (300,100) - lower right (360,160)",
        ]
    );
}
