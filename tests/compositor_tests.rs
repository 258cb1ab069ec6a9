// Compositor integration tests
//
// Overlay timing, draw order, caching and the base-image guard, all against a
// manually advanced clock.

mod common;

use common::{compositor, solid, BLUE, GREEN, RED};
use nes_shell::{Color, CompositorError, OverlayId, OverlayStatus, Point, Raster};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_liveness_classification() {
    let (c, clock) = compositor(4, 4);
    let id = c.add_overlay(solid(1, 1, RED), Point::ORIGIN, 200, 100);

    assert_eq!(c.overlay_status(id), Some(OverlayStatus::Pending));

    clock.advance_ms(150);
    assert_eq!(c.overlay_status(id), Some(OverlayStatus::Live));

    clock.advance_ms(200);
    assert_eq!(c.overlay_status(id), Some(OverlayStatus::Expired));
}

#[test]
fn test_pending_overlay_is_not_drawn() {
    let (c, clock) = compositor(4, 4);
    c.add_overlay(solid(1, 1, RED), Point::ORIGIN, 0, 50);

    assert_eq!(c.get_image().get_pixel(0, 0), Some(Color::BLACK));
    assert!(c.live_overlays().is_empty());

    clock.advance_ms(50);
    assert_eq!(c.get_image().get_pixel(0, 0), Some(RED));
}

#[test]
fn test_later_overlay_draws_on_top() {
    let (c, _) = compositor(8, 8);
    c.add_overlay(solid(4, 4, RED), Point::new(0.0, 0.0), 0, 0);
    c.add_overlay(solid(4, 4, BLUE), Point::new(2.0, 2.0), 0, 0);

    let image = c.get_image();
    assert_eq!(image.get_pixel(1, 1), Some(RED));
    assert_eq!(image.get_pixel(3, 3), Some(BLUE));
    assert_eq!(image.get_pixel(5, 5), Some(BLUE));
    assert_eq!(image.get_pixel(7, 7), Some(Color::BLACK));
}

#[test]
fn test_dimension_guard_leaves_state_untouched() {
    let (c, _) = compositor(8, 8);
    c.add_overlay(solid(2, 2, RED), Point::ORIGIN, 0, 0);
    let before = c.get_image();
    let base_before = c.base_image();

    let result = c.set_base_image(solid(8, 9, Color::WHITE));
    assert_eq!(
        result,
        Err(CompositorError::DimensionMismatch {
            expected: (8, 8),
            actual: (8, 9),
        })
    );

    assert!(Arc::ptr_eq(&c.base_image(), &base_before));
    assert!(Arc::ptr_eq(&c.get_image(), &before));
}

#[test]
fn test_cache_reused_without_mutation() {
    let (c, clock) = compositor(8, 8);
    c.add_overlay(solid(2, 2, RED), Point::ORIGIN, 1000, 0);

    let first = c.get_image();
    clock.advance_ms(10);
    let second = c.get_image();
    assert!(Arc::ptr_eq(&first, &second));

    c.add_overlay(solid(2, 2, GREEN), Point::new(4.0, 4.0), 0, 0);
    let third = c.get_image();
    assert_ne!(*third, *second);
    assert_eq!(third.get_pixel(4, 4), Some(GREEN));
}

#[test]
fn test_base_replacement_rerenders_with_overlays() {
    let (c, _) = compositor(4, 4);
    c.add_overlay(solid(1, 1, RED), Point::ORIGIN, 0, 0);
    let before = c.get_image();

    c.set_base_image(solid(4, 4, Color::WHITE)).unwrap();
    let after = c.get_image();

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.get_pixel(0, 0), Some(RED));
    assert_eq!(after.get_pixel(3, 3), Some(Color::WHITE));
}

#[test]
fn test_expired_overlay_is_swept() {
    let (c, clock) = compositor(4, 4);
    let short = c.add_overlay(solid(1, 1, RED), Point::ORIGIN, 100, 0);
    assert_eq!(c.get_image().get_pixel(0, 0), Some(RED));

    clock.advance_ms(101);
    assert_eq!(c.get_image().get_pixel(0, 0), Some(Color::BLACK));
    assert!(c.live_overlays().iter().all(|info| info.id != short));
    assert_eq!(c.overlay_status(short), None);
    assert_eq!(c.overlay_count(), 0);

    // Removing after the sweep is a quiet no-op
    assert!(!c.remove_overlay(short));
}

#[test]
fn test_expiry_and_activation_in_same_instant() {
    let (c, clock) = compositor(4, 4);
    c.add_overlay(solid(1, 1, RED), Point::ORIGIN, 50, 0);
    c.add_overlay(solid(1, 1, GREEN), Point::ORIGIN, 0, 51);
    assert_eq!(c.get_image().get_pixel(0, 0), Some(RED));

    clock.advance_ms(51);
    assert_eq!(c.live_overlays().len(), 1);
    assert_eq!(c.get_image().get_pixel(0, 0), Some(GREEN));
}

#[test]
fn test_bulk_add_and_remove() {
    let (c, _) = compositor(4, 4);
    let images: Vec<Arc<Raster>> = (0..5).map(|_| Arc::new(solid(1, 1, RED))).collect();
    let ids = c.add_overlays(images, Point::ORIGIN, 0, 0);

    assert_eq!(ids.len(), 5);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 5);
    let live: Vec<OverlayId> = c.live_overlays().iter().map(|info| info.id).collect();
    assert_eq!(live, ids);

    c.remove_overlay(ids[0]);
    c.remove_overlay(ids[3]);
    let removed = c.remove_overlays(ids.iter().copied());
    assert_eq!(removed, 3);
    assert_eq!(c.overlay_count(), 0);
}

#[test]
fn test_overlay_info_reports_geometry() {
    let (c, _) = compositor(16, 16);
    let id = c.add_overlay(solid(3, 2, RED), Point::new(5.0, 6.0), 0, 0);

    let infos = c.live_overlays();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].id, id);
    assert_eq!((infos[0].width, infos[0].height), (3, 2));
    assert_eq!(infos[0].location, Point::new(5.0, 6.0));
    assert_eq!(infos[0].status, OverlayStatus::Live);
}

#[test]
fn test_clear_overlays() {
    let (c, _) = compositor(4, 4);
    c.add_overlay(solid(4, 4, RED), Point::ORIGIN, 0, 0);
    c.add_overlay(solid(4, 4, GREEN), Point::ORIGIN, 0, 500);
    c.clear_overlays();

    assert_eq!(c.overlay_count(), 0);
    assert_eq!(c.get_image().get_pixel(2, 2), Some(Color::BLACK));
}

#[test]
fn test_concurrent_mutation_and_reads() {
    let (c, _) = compositor(32, 32);
    let c = Arc::new(c);

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                for i in 0..50 {
                    let id = c.add_overlay(
                        solid(2, 2, RED),
                        Point::new((t * 8) as f32, (i % 16) as f32),
                        0,
                        0,
                    );
                    if i % 2 == 0 {
                        c.remove_overlay(id);
                    }
                }
            })
        })
        .collect();

    let reader = {
        let c = Arc::clone(&c);
        thread::spawn(move || {
            for _ in 0..200 {
                let image = c.get_image();
                assert_eq!(image.dimensions(), (32, 32));
            }
        })
    };

    for w in writers {
        w.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(c.overlay_count(), 100);
    assert_eq!(c.live_overlays().len(), 100);
}
