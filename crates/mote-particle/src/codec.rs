//! Binary encode/decode for particle records.
//!
//! A record is a flat little-endian sequence with no padding:
//!
//! ```text
//! [location: SPACEDIM × f64] [reference_location: DIM × f64]
//! [id: u64] [property_count: u32] [properties: property_count × f64]
//! ```
//!
//! Records carry no length or offset table, so a buffer of concatenated
//! records must be decoded in the order it was written. Decoders take a
//! `&mut &[u8]` cursor and only advance it once the whole field group
//! has been read successfully.

use mote_core::{ParticleId, Point, Scalar, SCALAR_BYTES};

use crate::error::ParticleError;

/// Encoded width of the particle id.
pub const ID_BYTES: usize = std::mem::size_of::<u64>();

/// Encoded width of the property count.
pub const COUNT_BYTES: usize = std::mem::size_of::<u32>();

/// Size of the fixed part of a record: coordinates, id and property count.
pub const fn header_bytes(dim: usize, spacedim: usize) -> usize {
    (spacedim + dim) * SCALAR_BYTES + ID_BYTES + COUNT_BYTES
}

/// Total size of a record carrying `n_properties` property values.
pub const fn record_size(dim: usize, spacedim: usize, n_properties: usize) -> usize {
    header_bytes(dim, spacedim) + n_properties * SCALAR_BYTES
}

/// The fixed part of a decoded record.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordHeader<const DIM: usize, const SPACEDIM: usize> {
    /// World-space location.
    pub location: Point<SPACEDIM>,
    /// Location in the reference frame.
    pub reference_location: Point<DIM>,
    /// Particle id.
    pub id: ParticleId,
    /// Number of property values following the header.
    pub property_count: usize,
}

// ── Primitive writers ───────────────────────────────────────────

/// Append a little-endian scalar.
pub fn write_scalar(out: &mut Vec<u8>, v: Scalar) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian u32.
pub fn write_u32_le(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian u64.
pub fn write_u64_le(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

// ── Primitive readers ───────────────────────────────────────────

/// Split `N` bytes off the front of `input`.
fn take_bytes<const N: usize>(input: &mut &[u8], what: &str) -> Result<[u8; N], ParticleError> {
    let data: &[u8] = *input;
    let Some((head, rest)) = data.split_first_chunk::<N>() else {
        return Err(ParticleError::MalformedRecord {
            detail: format!("truncated {what}: need {N} bytes, have {}", input.len()),
        });
    };
    *input = rest;
    Ok(*head)
}

/// Read a little-endian scalar.
pub fn read_scalar(input: &mut &[u8]) -> Result<Scalar, ParticleError> {
    take_bytes(input, "scalar").map(Scalar::from_le_bytes)
}

/// Read a little-endian u32.
pub fn read_u32_le(input: &mut &[u8]) -> Result<u32, ParticleError> {
    take_bytes(input, "u32").map(u32::from_le_bytes)
}

/// Read a little-endian u64.
pub fn read_u64_le(input: &mut &[u8]) -> Result<u64, ParticleError> {
    take_bytes(input, "u64").map(u64::from_le_bytes)
}

fn read_point<const D: usize>(input: &mut &[u8]) -> Result<Point<D>, ParticleError> {
    let mut p = Point::<D>::origin();
    for c in p.coords_mut() {
        *c = read_scalar(input)?;
    }
    Ok(p)
}

// ── Record encode/decode ────────────────────────────────────────

/// Append a record header.
///
/// The caller appends exactly `header.property_count` scalars afterwards
/// with [`encode_properties`]. Fails without writing anything if the
/// count does not fit the `u32` count field.
pub fn encode_header<const DIM: usize, const SPACEDIM: usize>(
    out: &mut Vec<u8>,
    header: &RecordHeader<DIM, SPACEDIM>,
) -> Result<(), ParticleError> {
    let count = u32::try_from(header.property_count).map_err(|_| ParticleError::MalformedRecord {
        detail: format!(
            "property count {} exceeds the u32 count field",
            header.property_count
        ),
    })?;
    out.reserve(header_bytes(DIM, SPACEDIM));
    for &c in header.location.coords() {
        write_scalar(out, c);
    }
    for &c in header.reference_location.coords() {
        write_scalar(out, c);
    }
    write_u64_le(out, header.id.0);
    write_u32_le(out, count);
    Ok(())
}

/// Append property values.
pub fn encode_properties(out: &mut Vec<u8>, properties: &[Scalar]) {
    out.reserve(properties.len() * SCALAR_BYTES);
    for &v in properties {
        write_scalar(out, v);
    }
}

/// Decode a record header.
///
/// Also checks that `input` holds at least the declared property bytes,
/// so a truncated record is reported before anything is allocated. On
/// error `input` is left where it was.
pub fn decode_header<const DIM: usize, const SPACEDIM: usize>(
    input: &mut &[u8],
) -> Result<RecordHeader<DIM, SPACEDIM>, ParticleError> {
    let mut cursor = *input;
    let location = read_point::<SPACEDIM>(&mut cursor)?;
    let reference_location = read_point::<DIM>(&mut cursor)?;
    let id = ParticleId(read_u64_le(&mut cursor)?);
    let property_count = read_u32_le(&mut cursor)? as usize;

    let needed = property_count
        .checked_mul(SCALAR_BYTES)
        .ok_or_else(|| ParticleError::MalformedRecord {
            detail: format!("property count {property_count} overflows"),
        })?;
    if cursor.len() < needed {
        return Err(ParticleError::MalformedRecord {
            detail: format!(
                "truncated properties: record declares {property_count} values \
                 ({needed} bytes), have {} bytes",
                cursor.len()
            ),
        });
    }

    *input = cursor;
    Ok(RecordHeader {
        location,
        reference_location,
        id,
        property_count,
    })
}

/// Decode `dst.len()` property values into `dst`.
///
/// On error `input` is left where it was and `dst` is unchanged.
pub fn decode_properties(input: &mut &[u8], dst: &mut [Scalar]) -> Result<(), ParticleError> {
    let needed = dst.len() * SCALAR_BYTES;
    if input.len() < needed {
        return Err(ParticleError::MalformedRecord {
            detail: format!(
                "truncated properties: need {needed} bytes, have {}",
                input.len()
            ),
        });
    }
    let data: &[u8] = *input;
    let (bytes, rest) = data.split_at(needed);
    for (v, chunk) in dst.iter_mut().zip(bytes.chunks_exact(SCALAR_BYTES)) {
        let mut raw = [0u8; SCALAR_BYTES];
        raw.copy_from_slice(chunk);
        *v = Scalar::from_le_bytes(raw);
    }
    *input = rest;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> RecordHeader<2, 3> {
        RecordHeader {
            location: Point::new([1.0, 2.0, 3.0]),
            reference_location: Point::new([0.25, 0.75]),
            id: ParticleId(7),
            property_count: 2,
        }
    }

    #[test]
    fn header_size_matches_layout() {
        assert_eq!(header_bytes(2, 3), 5 * 8 + 8 + 4);
        assert_eq!(record_size(2, 3, 4), header_bytes(2, 3) + 32);
    }

    #[test]
    fn encode_writes_fields_in_order() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        assert_eq!(buf.len(), header_bytes(2, 3));
        assert_eq!(&buf[0..8], &1.0f64.to_le_bytes());
        assert_eq!(&buf[24..32], &0.25f64.to_le_bytes());
        assert_eq!(&buf[40..48], &7u64.to_le_bytes());
        assert_eq!(&buf[48..52], &2u32.to_le_bytes());
    }

    #[test]
    fn decode_reads_back_header_and_properties() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        encode_properties(&mut buf, &[4.5, -1.0]);
        buf.push(0xAB);

        let mut cursor = buf.as_slice();
        let decoded = decode_header::<2, 3>(&mut cursor).unwrap();
        assert_eq!(decoded, header());
        let mut props = [0.0; 2];
        decode_properties(&mut cursor, &mut props).unwrap();
        assert_eq!(props, [4.5, -1.0]);
        assert_eq!(cursor, &[0xAB]);
    }

    #[test]
    fn truncated_header_is_malformed_and_cursor_untouched() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        let short = &buf[..buf.len() - 1];
        let mut cursor = short;
        let err = decode_header::<2, 3>(&mut cursor).unwrap_err();
        assert!(matches!(err, ParticleError::MalformedRecord { .. }));
        assert_eq!(cursor.len(), short.len());
    }

    #[test]
    fn missing_property_bytes_detected_at_header() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        encode_properties(&mut buf, &[1.0]);
        let mut cursor = buf.as_slice();
        let err = decode_header::<2, 3>(&mut cursor).unwrap_err();
        assert!(matches!(err, ParticleError::MalformedRecord { .. }));
        assert_eq!(cursor.len(), buf.len());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_property_count_is_rejected_before_writing() {
        let mut h = header();
        h.property_count = u32::MAX as usize + 1;
        let mut buf = vec![0xAB];
        let err = encode_header(&mut buf, &h).unwrap_err();
        assert!(matches!(err, ParticleError::MalformedRecord { .. }));
        assert_eq!(buf, vec![0xAB]);
    }

    #[test]
    fn decode_properties_leaves_dst_on_error() {
        let mut cursor: &[u8] = &[0u8; 12];
        let mut dst = [9.0; 2];
        assert!(decode_properties(&mut cursor, &mut dst).is_err());
        assert_eq!(dst, [9.0; 2]);
        assert_eq!(cursor.len(), 12);
    }

    #[test]
    fn primitive_readers_advance_cursor() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, 5);
        write_u64_le(&mut buf, 6);
        write_scalar(&mut buf, 7.5);
        let mut cursor = buf.as_slice();
        assert_eq!(read_u32_le(&mut cursor).unwrap(), 5);
        assert_eq!(read_u64_le(&mut cursor).unwrap(), 6);
        assert_eq!(read_scalar(&mut cursor).unwrap(), 7.5);
        assert!(cursor.is_empty());
        assert!(read_u32_le(&mut cursor).is_err());
    }
}
