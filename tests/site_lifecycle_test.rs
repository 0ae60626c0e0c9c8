use instant::Duration;
use vault_folio::{
    Config, PageEvent, Site,
    content::{Rendered, SiteData, load_site_data},
    document::{Document, memory::site_skeleton},
};

use crate::common::test_utils::{FRAME, run_frames, site, test_config};

mod common;

#[test]
fn boot_completes_after_the_delay_exactly_once() {
    let (mut site, _) = site(1280, 720);
    let body = site.document().body().unwrap();
    let overlay = site.document().query("#boot-sequence").unwrap();
    assert!(site.document().has_class(body, "boot-mode"));

    site.frame(Duration::from_millis(2400));
    assert!(!site.core().is_booted());
    assert!(!site.document().has_class(overlay, "hidden"));

    site.frame(Duration::from_millis(100));
    assert!(site.core().is_booted());
    assert!(site.core().is_ready());
    assert!(site.document().has_class(overlay, "hidden"));
    assert!(site.document().has_class(body, "ready"));
    assert!(!site.document().has_class(body, "boot-mode"));

    // a page that puts boot-mode back is left alone
    site.document_mut().add_class(body, "boot-mode");
    site.frame(Duration::from_millis(5000));
    assert!(site.document().has_class(body, "boot-mode"));
}

#[test]
fn fallback_content_fills_every_container() {
    let (mut site, _) = site(1280, 720);
    let rendered = site.on_data(&SiteData::fallback());
    assert_eq!(
        rendered,
        Rendered {
            skills: 3,
            projects: 2,
            doctrines: 6,
            timeline: 4,
        }
    );
    let doc = site.document();
    let count = |container: &str| doc.children(doc.query(container).unwrap()).len();
    assert_eq!(count("#proof-grid"), 3);
    assert_eq!(count("#operations-container"), 2);
    assert_eq!(count("#doctrine-grid"), 6);
    assert_eq!(count("#timeline-container"), 4);
}

#[test]
fn shipped_data_files_load() {
    // integration tests run from the package root, next to `assets/`
    let data = futures::executor::block_on(load_site_data());
    assert!(!data.projects.is_empty());
    assert_eq!(data.doctrines.len(), 6);
    assert_eq!(data.timeline.len(), 4);
}

#[test]
fn late_cards_are_revealed_by_scrolling() {
    let (mut site, _) = site(1280, 720);
    site.on_data(&SiteData::fallback());
    run_frames(&mut site, 1);
    let card = site.document().query(".skill-vault").unwrap();
    assert_eq!(site.document().style(card, "opacity"), Some("0"));

    site.document_mut().scroll_to(720.0);
    run_frames(&mut site, 60);
    assert_eq!(site.document().style(card, "opacity"), Some("1"));
}

#[test]
fn resize_reaches_camera_renderer_and_device_class() {
    let (mut site, log) = site(1280, 720);
    assert!(!site.core().is_mobile());

    site.document_mut().set_viewport(600.0, 900.0);
    site.handle(PageEvent::Resize { width: 600, height: 900 });
    assert_eq!(site.scene().unwrap().camera.aspect, 600.0 / 900.0);
    assert_eq!(site.renderer_size(), Some((600, 900)));
    assert_eq!(log.borrow().resizes(), &[(600, 900)]);
    assert!(site.core().is_mobile());

    site.frame(FRAME);
    assert_eq!(log.borrow().last_aspect(), Some(600.0 / 900.0));
}

#[test]
fn hidden_page_pauses_rendering() {
    let (mut site, log) = site(1280, 720);
    run_frames(&mut site, 3);
    assert_eq!(log.borrow().frames(), 3);

    site.handle(PageEvent::VisibilityChanged { hidden: true });
    run_frames(&mut site, 3);
    assert_eq!(log.borrow().frames(), 3);

    site.handle(PageEvent::VisibilityChanged { hidden: false });
    run_frames(&mut site, 1);
    assert_eq!(log.borrow().frames(), 4);
}

#[test]
fn escape_closes_the_modal_and_actions_are_found() {
    let (mut site, _) = site(1280, 720);
    let body = site.document().body().unwrap();
    site.document_mut().add_class(body, "modal-open");
    site.handle(PageEvent::KeyDown("Escape".to_string()));
    assert!(!site.document().has_class(body, "modal-open"));

    site.handle(PageEvent::PointerMove { x: 1280.0 - 150.0, y: 720.0 * 0.75 + 10.0 });
    assert!(site.input().is_moving());
    site.handle(PageEvent::PointerLeave);
    assert!(!site.input().is_moving());
}

#[test]
fn site_without_gpu_still_boots_and_renders_content() {
    let mut site = Site::new(test_config(), site_skeleton(1280.0, 720.0), None);
    site.on_data(&SiteData::fallback());
    site.frame(Duration::from_millis(2500));
    assert!(site.core().is_ready());
    assert!(site.scene().is_none());
    assert_eq!(site.document().query_all(".timeline-item").len(), 4);
}

#[test]
fn motion_can_be_switched_off() {
    let mut config: Config = test_config();
    config.animation.enabled = false;
    let mut site = Site::new(config, site_skeleton(1280.0, 720.0), None);
    site.on_data(&SiteData::fallback());
    site.frame(Duration::from_millis(3000));
    assert!(!site.motion().is_enabled());
    let card = site.document().query(".skill-vault").unwrap();
    assert_eq!(site.document().style(card, "opacity"), None);
}
