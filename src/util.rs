use bytemuck::{pod_read_unaligned, Pod};

use crate::{BmpError, BmpResult};
use core::mem::size_of;

/// Reads a `T` off the front of the bytes, also giving back the rest.
#[inline]
pub(crate) fn try_pull_pod<T: Pod>(bytes: &[u8]) -> BmpResult<(T, &[u8])> {
  let position = size_of::<T>();
  if bytes.len() >= position {
    let (head, tail) = bytes.split_at(position);
    let a: T = pod_read_unaligned(head);
    Ok((a, tail))
  } else {
    Err(BmpError::InsufficientBytes { needed: position, found: bytes.len() })
  }
}

/// Clamps a float channel sum into `0..=255` and truncates it.
#[inline]
#[must_use]
pub(crate) fn clamp_truncate_u8(f: f32) -> u8 {
  f.clamp(0.0, 255.0) as u8
}

/// Clamps a float into `0..=255` and rounds it to the nearest integer.
#[inline]
#[must_use]
pub(crate) fn clamp_round_u8(f: f32) -> u8 {
  f.clamp(0.0, 255.0).round() as u8
}

#[inline]
#[must_use]
pub(crate) fn clamp_i32_u8(i: i32) -> u8 {
  i.clamp(0, 255) as u8
}
