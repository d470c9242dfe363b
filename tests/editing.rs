//! End-to-end editing flow: configure, brush, stamp, undo, redo.

use std::io::Write;
use std::time::{Duration, Instant};

use glam::{IVec2, UVec2, Vec3};

use gridbrush::brush::BrushShape;
use gridbrush::config::EditorConfig;
use gridbrush::edit::{EditGesture, GestureClock, StampTimer, TimerPoll};
use gridbrush::selection::{GridCoord, SurfaceId};
use gridbrush::surface::{HeightField, SurfaceAdapter, SurfaceRegistry};

fn heights(registry: &SurfaceRegistry, id: SurfaceId) -> Vec<f32> {
    let surface = registry.get(id).unwrap();
    let size = surface.size();
    let mut out = Vec::new();
    for y in 0..size.y as i32 {
        for x in 0..size.x as i32 {
            out.push(surface.height_at(IVec2::new(x, y)));
        }
    }
    out
}

/// Ground at height 10, and a ledge at height 12 over part of it.
fn stacked(config: &EditorConfig) -> (SurfaceRegistry, SurfaceId, SurfaceId) {
    let mut registry = config.registry();
    let ground = registry.register(HeightField::flat(UVec2::new(16, 16), 1.0, Vec3::ZERO, 10.0));
    let ledge = registry.register(HeightField::flat(
        UVec2::new(8, 8),
        1.0,
        Vec3::new(2.0, 0.0, 2.0),
        12.0,
    ));
    (registry, ground, ledge)
}

#[test]
fn test_stamp_undo_redo_across_surfaces() {
    gridbrush::core::logging::try_init();
    let mut config = EditorConfig::default();
    config.brush.size = [3, 3];
    let (mut registry, ground, ledge) = stacked(&config);

    let mut brush = config.brush();
    assert!(brush.set_world_position(Vec3::new(4.0, 10.0, 4.0), &registry));
    assert_eq!(brush.surface(), Some(ground));
    assert_eq!(brush.anchor(), IVec2::new(4, 4));
    assert!(brush.cells().iter().any(|r| r.coord.surface == ledge));

    let ground_before = heights(&registry, ground);
    let ledge_before = heights(&registry, ledge);

    let mut clock = GestureClock::new();
    let mut history = config.undo_stack();
    let mut gesture = EditGesture::begin(&mut clock);
    gesture.stamp(&brush, &mut registry, |r| r.height += r.weight);
    gesture.stamp(&brush, &mut registry, |r| r.height += r.weight);
    let snapshot = gesture.finish(&mut clock).unwrap();
    assert_eq!(snapshot.len(), brush.len());
    assert!(history.push(snapshot));

    let ground_after = heights(&registry, ground);
    let ledge_after = heights(&registry, ledge);
    assert_ne!(ground_after, ground_before);
    assert_ne!(ledge_after, ledge_before);
    assert_eq!(registry.get(ground).unwrap().height_at(IVec2::new(4, 4)), 12.0);
    // Outside the footprint nothing moved.
    assert_eq!(registry.get(ground).unwrap().height_at(IVec2::new(10, 10)), 10.0);

    // Height-only edit, so no material refresh is reported.
    assert_eq!(history.undo(&mut registry), Some(false));
    assert_eq!(heights(&registry, ground), ground_before);
    assert_eq!(heights(&registry, ledge), ledge_before);

    assert_eq!(history.redo(&mut registry), Some(false));
    assert_eq!(heights(&registry, ground), ground_after);
    assert_eq!(heights(&registry, ledge), ledge_after);
}

#[test]
fn test_undo_only_reverts_latest_gesture() {
    gridbrush::core::logging::try_init();
    let mut config = EditorConfig::default();
    config.brush.size = [2, 2];
    let (mut registry, ground, _) = stacked(&config);
    let mut brush = config.brush();
    brush.set_surface(Some(ground), &registry);

    let mut clock = GestureClock::new();
    let mut history = config.undo_stack();

    brush.set_position(IVec2::new(12, 12), &registry);
    let mut first = EditGesture::begin(&mut clock);
    first.stamp(&brush, &mut registry, |r| r.height = 20.0);
    history.push(first.finish(&mut clock).unwrap());
    let after_first = heights(&registry, ground);

    brush.set_position(IVec2::new(13, 12), &registry);
    let mut second = EditGesture::begin(&mut clock);
    second.stamp(&brush, &mut registry, |r| r.height = 30.0);
    history.push(second.finish(&mut clock).unwrap());

    history.undo(&mut registry);
    assert_eq!(heights(&registry, ground), after_first);
    assert!(history.can_undo());
    assert!(history.can_redo());
}

#[test]
fn test_paint_restores_material() {
    let config = EditorConfig::default();
    let (mut registry, ground, _) = stacked(&config);
    let mut brush = config.brush();
    brush.set_shape(BrushShape::Ellipse, &registry);
    brush.set_surface(Some(ground), &registry);
    brush.set_position(IVec2::new(12, 12), &registry);
    brush.set_size(4, 4, &registry);

    let mut clock = GestureClock::new();
    let mut gesture = EditGesture::begin(&mut clock);
    assert_eq!(gesture.stamp(&brush, &mut registry, |r| r.material = 7), 12);
    let mut snapshot = gesture.finish(&mut clock).unwrap();
    assert!(snapshot.material_changed());

    let cell = GridCoord::new(ground, 12, 12);
    assert_eq!(registry.read_record(cell).unwrap().material, 7);
    snapshot.undo(&mut registry);
    assert_eq!(registry.read_record(cell).unwrap().material, 0);
    snapshot.redo(&mut registry);
    assert_eq!(registry.read_record(cell).unwrap().material, 7);
}

#[test]
fn test_timer_driven_gesture() {
    let config = EditorConfig::default();
    let (mut registry, ground, _) = stacked(&config);
    let mut brush = config.brush();
    brush.set_surface(Some(ground), &registry);
    brush.set_position(IVec2::new(12, 12), &registry);

    let mut clock = GestureClock::new();
    let mut gesture = EditGesture::begin(&mut clock);
    let start = Instant::now();
    let mut timer = StampTimer::schedule(gesture.token(), config.stamp_interval(), start);

    // Pointer held for 100ms, polled every 10ms.
    for ms in (10..=100).step_by(10) {
        if timer.poll(&clock, start + Duration::from_millis(ms)) == TimerPoll::Fire {
            gesture.stamp(&brush, &mut registry, |r| r.height += 1.0);
        }
    }
    assert_eq!(gesture.stamps(), 3);
    assert_eq!(registry.get(ground).unwrap().height_at(IVec2::new(12, 12)), 13.0);

    gesture.finish(&mut clock);
    assert_eq!(timer.poll(&clock, start + Duration::from_millis(200)), TimerPoll::Expired);
}

#[test]
fn test_config_file_drives_editor() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "brush": {{ "shape": "ellipse", "size": [4, 4], "softness": 0.5 }},
            "cross_surface_tolerance": 1.0,
            "undo_limit": 2
        }}"#
    )
    .unwrap();
    let config = EditorConfig::load(file.path()).unwrap();
    let (registry, ground, _) = stacked(&config);

    let mut brush = config.brush();
    brush.set_surface(Some(ground), &registry);
    brush.set_position(IVec2::new(4, 4), &registry);
    // The ledge is 2 units above the ground, beyond the 1.0 tolerance.
    assert_eq!(brush.len(), 12);
    assert!(brush.cells().iter().all(|r| r.coord.surface == ground));
    assert_eq!(brush.softness(), 0.5);
}
