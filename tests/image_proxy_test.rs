//! Tests for the lazy image proxy

use gofpat::domain::{Graphic, ImageProxy, ImageSession, ImageState};

#[test]
fn given_new_proxy_when_inspected_then_unloaded_and_nothing_constructed() {
    let session = ImageSession::new();

    let proxy = ImageProxy::new(&session);

    assert_eq!(proxy.id(), 1);
    assert_eq!(proxy.state(), ImageState::Unloaded);
    assert_eq!(session.live_images(), 0);
}

#[test]
fn given_proxy_when_drawn_once_then_exactly_one_real_image() {
    let session = ImageSession::new();
    let proxy = ImageProxy::new(&session);

    let line = proxy.render();

    assert_eq!(line, "drawing image 1");
    assert_eq!(proxy.state(), ImageState::Loaded);
    assert_eq!(session.live_images(), 1);
}

#[test]
fn given_loaded_proxy_when_drawn_again_then_reuses_same_instance() {
    let session = ImageSession::new();
    let proxy = ImageProxy::new(&session);

    let first: *const _ = proxy.load();
    proxy.render();
    proxy.render();
    let second: *const _ = proxy.load();

    assert!(std::ptr::eq(first, second));
    assert_eq!(session.live_images(), 1);
    assert_eq!(proxy.state(), ImageState::Loaded);
}

#[test]
fn given_loaded_proxy_when_dropped_then_real_image_destroyed() {
    let session = ImageSession::new();
    let proxy = ImageProxy::new(&session);
    proxy.render();
    assert_eq!(session.live_images(), 1);

    drop(proxy);

    assert_eq!(session.live_images(), 0);
}

#[test]
fn given_unloaded_proxy_when_dropped_then_nothing_to_destroy() {
    let session = ImageSession::new();
    let proxy = ImageProxy::new(&session);

    drop(proxy);

    assert_eq!(session.live_images(), 0);
    assert_eq!(session.peek_next_id(), 2, "ids are never reused");
}

#[test]
fn given_several_proxies_when_only_some_drawn_then_only_those_load() {
    let session = ImageSession::new();
    let images: Vec<ImageProxy> = (0..4).map(|_| ImageProxy::new(&session)).collect();

    images[1].render();
    images[3].render();
    images[3].render();

    let states: Vec<ImageState> = images.iter().map(ImageProxy::state).collect();
    assert_eq!(
        states,
        vec![
            ImageState::Unloaded,
            ImageState::Loaded,
            ImageState::Unloaded,
            ImageState::Loaded
        ]
    );
    assert_eq!(session.live_images(), 2);
}

#[test]
fn given_proxy_and_real_image_when_used_as_graphic_then_same_output() {
    fn draw_twice(g: &dyn Graphic) -> Vec<String> {
        vec![g.render(), g.render()]
    }
    let session = ImageSession::starting_at(9);
    let proxy = ImageProxy::new(&session);

    let via_proxy = draw_twice(&proxy);
    let via_real = draw_twice(proxy.load());

    assert_eq!(via_proxy, via_real);
    assert_eq!(via_proxy[0], "drawing image 9");
}

#[test]
fn given_two_sessions_when_creating_proxies_then_counters_are_independent() {
    let a = ImageSession::new();
    let b = ImageSession::new();

    assert_eq!(ImageProxy::new(&a).id(), 1);
    assert_eq!(ImageProxy::new(&a).id(), 2);
    assert_eq!(ImageProxy::new(&b).id(), 1);
}
