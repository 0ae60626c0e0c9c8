use cgmath::Vector3;
use vault_folio::{
    PageEvent,
    document::Cursor,
    interaction::HeroEvent,
    scene::ScaleState,
};

use crate::common::test_utils::{run_frames, site};

mod common;

const CENTRE: (f64, f64) = (640.0, 360.0);
const CORNER: (f64, f64) = (10.0, 10.0);

fn pointer(x: f64, y: f64) -> PageEvent {
    PageEvent::PointerMove { x, y }
}

fn idle() -> Vector3<f32> {
    Vector3::new(1.0, 1.0, 1.0)
}

#[test]
fn hover_transitions_fire_once_per_session() {
    let (mut site, _) = site(1280, 720);
    let mut events = Vec::new();
    let path = [CENTRE, (650.0, 355.0), (660.0, 370.0), CORNER, (20.0, 30.0), CENTRE];
    for (x, y) in path {
        events.extend(site.handle(pointer(x, y)));
        run_frames(&mut site, 1);
    }
    assert_eq!(
        events,
        vec![HeroEvent::HoverStart, HeroEvent::HoverEnd, HeroEvent::HoverStart]
    );
    assert_eq!(site.document().cursor(), Cursor::Pointer);
}

#[test]
fn hover_scales_up_and_back() {
    let (mut site, _) = site(1280, 720);
    site.handle(pointer(CENTRE.0, CENTRE.1));
    run_frames(&mut site, 40);
    let hero = &site.scene().unwrap().hero;
    assert_eq!(hero.scale_state(), ScaleState::Hovered);
    assert_eq!(hero.scale(), Vector3::new(1.1, 1.1, 1.1));

    site.handle(pointer(CORNER.0, CORNER.1));
    run_frames(&mut site, 40);
    let hero = &site.scene().unwrap().hero;
    assert_eq!(hero.scale_state(), ScaleState::Idle);
    assert_eq!(hero.scale(), idle());
    assert_eq!(site.document().cursor(), Cursor::Default);
}

#[test]
fn pulse_returns_to_the_pre_click_scale() {
    let (mut site, _) = site(1280, 720);
    assert_eq!(site.handle(PageEvent::Click { x: CORNER.0, y: CORNER.1 }), None);
    assert_eq!(
        site.handle(PageEvent::Click { x: CENTRE.0, y: CENTRE.1 }),
        Some(HeroEvent::Clicked)
    );
    run_frames(&mut site, 5);
    assert!(site.scene().unwrap().hero.scale().x > 1.0);

    run_frames(&mut site, 30);
    let hero = &site.scene().unwrap().hero;
    assert!(!hero.is_animating());
    assert_eq!(hero.scale(), idle());
}

#[test]
fn leaving_during_a_pulse_ends_idle() {
    let (mut site, _) = site(1280, 720);
    site.handle(pointer(CENTRE.0, CENTRE.1));
    run_frames(&mut site, 40);
    site.handle(PageEvent::Click { x: CENTRE.0, y: CENTRE.1 });
    run_frames(&mut site, 3);
    assert_eq!(
        site.handle(pointer(CORNER.0, CORNER.1)),
        Some(HeroEvent::HoverEnd)
    );
    assert_eq!(site.scene().unwrap().hero.scale_state(), ScaleState::Pulsing);

    run_frames(&mut site, 60);
    let hero = &site.scene().unwrap().hero;
    assert_eq!(hero.scale_state(), ScaleState::Idle);
    assert_eq!(hero.scale(), idle());
}

#[test]
fn pointer_tilts_and_disabled_layer_ignores_the_hero() {
    let (mut site, _) = site(1280, 720);
    site.handle(pointer(1280.0, 0.0));
    let strength = site.config().mouse.tilt_strength;
    let target = site.scene().unwrap().hero.target_rotation();
    assert_eq!((target.x, target.y), (strength, strength));

    site.pointer_mut().unwrap().disable();
    assert_eq!(site.handle(pointer(CENTRE.0, CENTRE.1)), None);
    assert_eq!(site.handle(PageEvent::Click { x: CENTRE.0, y: CENTRE.1 }), None);
    assert_eq!(site.scene().unwrap().hero.scale_state(), ScaleState::Idle);
}

#[test]
fn touch_drag_sets_the_tilt() {
    let (mut site, _) = site(1280, 720);
    site.handle(PageEvent::TouchStart { x: 640.0, y: 360.0 });
    site.handle(PageEvent::TouchMove { x: 0.0, y: 720.0 });
    let scene = site.scene().unwrap();
    assert_eq!((scene.pointer().x, scene.pointer().y), (-1.0, -1.0));
}
