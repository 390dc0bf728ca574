//! End-to-end scenarios for particles backed by a shared property pool.
//!
//! Each test builds its pools with `mote-test-utils` fixtures and drives
//! particles only through the public API.

use mote_core::{ParticleId, Point, SCALAR_BYTES};
use mote_particle::{Particle, ParticleError, SpatialKey};
use mote_pool::{InvalidHandleReason, PoolError, PropertyHandle};
use mote_test_utils::{fixed_pool, pool_with_stride, property_values};

type P2<'p> = Particle<'p, 2, 2>;

// ── Helpers ─────────────────────────────────────────────────────

fn particle_a(pool: &mote_pool::PropertyPool) -> P2<'_> {
    let mut a = P2::with_location(Point::new([1.0, 2.0]), Point::new([0.1, 0.2]), ParticleId(42));
    a.set_property_pool(pool).unwrap();
    a.set_properties(&[1.0, 2.0, 3.0]).unwrap();
    a
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn write_then_rebuild_against_same_pool() {
    let pool = pool_with_stride(3);
    let a = particle_a(&pool);

    let mut buf = Vec::new();
    a.write_data(&mut buf).unwrap();
    assert_eq!(buf.len(), a.serialized_size_in_bytes());

    let mut cursor = buf.as_slice();
    let b = P2::from_data(&mut cursor, Some(&pool)).unwrap();
    assert!(cursor.is_empty());
    assert_eq!(b.get_location(), &Point::new([1.0, 2.0]));
    assert_eq!(b.get_reference_location(), &Point::new([0.1, 0.2]));
    assert_eq!(b.get_id(), ParticleId(42));
    assert_eq!(&*b.get_properties().unwrap(), &[1.0, 2.0, 3.0]);
    assert_ne!(b.handle(), a.handle());
    assert_eq!(pool.n_slots_allocated(), 2);
}

#[test]
fn property_less_particle() {
    let c = P2::with_location(Point::new([3.0, 4.0]), Point::new([0.5, 0.5]), ParticleId(7));
    assert!(matches!(c.get_properties(), Err(ParticleError::NoProperties)));
    assert!(!c.has_properties());
    assert_eq!(c.serialized_size_in_bytes(), P2::HEADER_BYTES);
    assert_eq!(P2::HEADER_BYTES, 4 * SCALAR_BYTES + 8 + 4);
}

#[test]
fn migrate_between_pools_frees_old_slot_for_reuse() {
    let p1 = pool_with_stride(2);
    let p2 = pool_with_stride(2);
    let mut d = P2::new();
    d.set_property_pool(&p1).unwrap();
    d.set_properties(&[5.0, 6.0]).unwrap();

    d.set_property_pool(&p2).unwrap();
    assert_eq!(&*d.get_properties().unwrap(), &[5.0, 6.0]);
    assert_eq!(p1.n_slots_allocated(), 0);

    let reused = p1.allocate_properties_array().unwrap();
    assert!(reused.is_valid());
    assert_eq!(p1.total_slots(), 1, "the old slot was reused, not a new one");
}

#[test]
fn stride_mismatch_leaves_pool_and_cursor_unchanged() {
    let source = pool_with_stride(3);
    let a = particle_a(&source);
    let mut buf = Vec::new();
    a.write_data(&mut buf).unwrap();

    let target = pool_with_stride(4);
    let mut cursor = buf.as_slice();
    let err = P2::from_data(&mut cursor, Some(&target)).unwrap_err();
    assert!(matches!(
        err,
        ParticleError::PropertyCountMismatch {
            recorded: 3,
            expected: 4
        }
    ));
    assert_eq!(cursor.len(), buf.len());
    assert_eq!(target.n_slots_allocated(), 0);
    assert_eq!(target.total_slots(), 0);
}

#[test]
fn double_free_reports_invalid_handle() {
    let pool = pool_with_stride(1);
    let mut h = pool.allocate_properties_array().unwrap();
    pool.deallocate_properties_array(&mut h).unwrap();
    assert_eq!(
        pool.deallocate_properties_array(&mut h),
        Err(PoolError::InvalidHandle {
            reason: InvalidHandleReason::Sentinel
        })
    );

    let mut sentinel = PropertyHandle::INVALID;
    assert!(matches!(
        pool.deallocate_properties_array(&mut sentinel),
        Err(PoolError::InvalidHandle { .. })
    ));
}

#[test]
fn copy_is_independent_and_move_transfers() {
    let pool = pool_with_stride(3);
    let values = property_values(9, 3);
    let mut a = P2::new();
    a.set_property_pool(&pool).unwrap();
    a.set_properties(&values).unwrap();

    let mut b = a.try_clone().unwrap();
    b.get_properties_mut().unwrap().fill(0.0);
    assert_eq!(&*a.get_properties().unwrap(), values.as_slice());

    let c = a.take();
    assert!(!a.has_properties());
    assert_eq!(&*c.get_properties().unwrap(), values.as_slice());
    assert_eq!(pool.n_slots_allocated(), 2);
}

#[test]
fn capped_pool_reports_out_of_resources_on_copy() {
    let pool = fixed_pool(2, 1);
    let mut a = P2::new();
    a.set_property_pool(&pool).unwrap();
    a.set_properties(&[1.0, 1.0]).unwrap();
    assert!(matches!(
        a.try_clone(),
        Err(ParticleError::Pool(PoolError::OutOfResources { .. }))
    ));
}

#[test]
fn update_never_changes_property_count() {
    let pool = pool_with_stride(3);
    let a = particle_a(&pool);
    let mut target = particle_a(&pool);
    target.set_properties(&[0.0, 0.0, 0.0]).unwrap();

    let mut buf = Vec::new();
    a.write_data(&mut buf).unwrap();
    target.update_particle_data(&mut buf.as_slice()).unwrap();
    assert_eq!(target.n_properties(), 3);
    assert_eq!(&*target.get_properties().unwrap(), &[1.0, 2.0, 3.0]);
}

#[test]
fn spatial_key_tracks_reference_location() {
    let pool = pool_with_stride(3);
    let mut a = particle_a(&pool);
    assert_eq!(a.spatial_key(), &Point::new([0.1, 0.2]));
    a.set_reference_location(Point::new([0.9, 0.8]));
    assert_eq!(a.spatial_key(), &Point::new([0.9, 0.8]));
}
