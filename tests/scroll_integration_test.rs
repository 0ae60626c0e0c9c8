use vault_folio::{
    PageEvent,
    document::Document,
    scroll::{Direction, scroll_fraction},
};

use crate::common::test_utils::{run_frames, scroll_to, site};

mod common;

#[test]
fn fraction_is_clamped_and_monotonic() {
    let (mut site, _) = site(1280, 720);
    let max = site.document().scroll_height() - 720.0;
    let mut last = -1.0;
    for step in 0..=40 {
        scroll_to(&mut site, max * step as f64 / 40.0);
        let fraction = site.scroll().fraction();
        assert!((0.0..=1.0).contains(&fraction));
        assert!(fraction >= last, "{} after {}", fraction, last);
        last = fraction;
    }
    assert_eq!(last, 1.0);
    assert_eq!(site.scroll().depth(), 100);
    assert_eq!(scroll_fraction(500.0, 720.0, 720.0), 0.0);
}

#[test]
fn scrolling_drives_progress_bar_direction_and_camera() {
    let (mut site, _) = site(1280, 720);
    let start_z = site.scene().unwrap().camera.position.z;

    scroll_to(&mut site, 1440.0);
    assert_eq!(site.scroll().direction(), Direction::Down);
    let bar = site.document().query(".scroll-progress").unwrap();
    assert_eq!(site.document().style(bar, "height"), Some("50%"));

    let scene = site.scene().unwrap();
    let expected = 35.0 - 0.5 * (35.0 - site.config().scene.camera_z_scroll);
    assert!((scene.camera_target_z() - expected).abs() < 1e-4);
    assert!(scene.camera_target_z() < start_z);

    // the camera glides there within its tween
    run_frames(&mut site, 30);
    assert!((site.scene().unwrap().camera.position.z - expected).abs() < 1e-4);

    scroll_to(&mut site, 720.0);
    assert_eq!(site.scroll().direction(), Direction::Up);
}

#[test]
fn section_at_viewport_centre_becomes_current() {
    let (mut site, _) = site(1280, 720);
    assert_eq!(site.core().current_section(), Some("hero"));
    scroll_to(&mut site, 720.0 * 2.0);
    assert_eq!(site.core().current_section(), Some("operations"));
}

#[test]
fn nav_link_smooth_scrolls_to_its_section() {
    let (mut site, _) = site(1280, 720);
    // first `.btn` targets #proof, one viewport down
    site.handle(PageEvent::Click { x: 60.0, y: 720.0 * 0.6 + 10.0 });
    assert!(site.navigator().is_scrolling());

    run_frames(&mut site, 30);
    let halfway = site.document().scroll_y();
    assert!(halfway > 0.0 && halfway < 660.0);

    run_frames(&mut site, 60);
    assert!(!site.navigator().is_scrolling());
    assert_eq!(site.document().scroll_y(), 720.0 - 60.0);
    assert_eq!(site.scroll().direction(), Direction::Down);
}
