//! Migration buffers of concatenated particle records.
//!
//! A sender appends one record per outgoing particle and then releases
//! its local copies; the receiver rebuilds the particles, in the same
//! order, against its own pool.

use mote_pool::PropertyPool;

use crate::error::ParticleError;
use crate::particle::Particle;

/// Total bytes [`write_particles`] produces for `particles`.
pub fn serialized_size<const DIM: usize, const SPACEDIM: usize>(
    particles: &[Particle<'_, DIM, SPACEDIM>],
) -> usize {
    particles.iter().map(Particle::serialized_size_in_bytes).sum()
}

/// Append one record per particle, in slice order.
///
/// On error `out` is truncated back to its length on entry.
pub fn write_particles<const DIM: usize, const SPACEDIM: usize>(
    particles: &[Particle<'_, DIM, SPACEDIM>],
    out: &mut Vec<u8>,
) -> Result<(), ParticleError> {
    let start = out.len();
    out.reserve(serialized_size(particles));
    for p in particles {
        if let Err(e) = p.write_data(out) {
            out.truncate(start);
            return Err(e);
        }
    }
    Ok(())
}

/// Decode every record in `data` against `pool`, in buffer order.
///
/// On success the cursor is empty. On error the cursor points at the
/// record that failed to decode and the particles decoded so far are
/// dropped, releasing their slots.
pub fn read_particles<'p, const DIM: usize, const SPACEDIM: usize>(
    data: &mut &[u8],
    pool: Option<&'p PropertyPool>,
) -> Result<Vec<Particle<'p, DIM, SPACEDIM>>, ParticleError> {
    let mut particles = Vec::new();
    while !data.is_empty() {
        particles.push(Particle::from_data(data, pool)?);
    }
    tracing::trace!(count = particles.len(), "decoded particle batch");
    Ok(particles)
}
