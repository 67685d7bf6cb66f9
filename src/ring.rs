//! Cyclic sequence of open faces around the unbounded region.
//!
//! Slot `i` and slot `i + 1` (modulo the length) hold faces that meet at a
//! vertex. Every index handed in is a slot, every value stored is a face id.

use crate::face::FaceId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenRing {
  slots: Vec<FaceId>,
}

impl OpenRing {
  pub fn new(slots: Vec<FaceId>) -> Self {
    Self { slots }
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  /// Face held in `slot`.
  pub fn get(&self, slot: usize) -> FaceId {
    self.slots[slot]
  }

  pub fn iter(&self) -> impl Iterator<Item = FaceId> + '_ {
    self.slots.iter().copied()
  }

  pub fn as_slice(&self) -> &[FaceId] {
    &self.slots
  }

  pub fn contains(&self, face: FaceId) -> bool {
    self.slots.contains(&face)
  }

  /// Slot `delta` steps away from `slot`, wrapping in both directions.
  pub fn offset(&self, slot: usize, delta: isize) -> usize {
    let n = self.slots.len() as isize;
    (slot as isize + delta).rem_euclid(n) as usize
  }

  pub fn successor(&self, slot: usize) -> usize {
    self.offset(slot, 1)
  }

  /// Drop `count` consecutive slots starting at `slot`, continuing through the
  /// wrap if the run passes the last slot. Survivors keep their relative order.
  pub fn remove_run(&mut self, slot: usize, count: usize) {
    let n = self.slots.len();
    assert!(count <= n && slot < n, "run {slot}+{count} outside ring of {n}");
    if slot + count <= n {
      self.slots.drain(slot..slot + count);
    } else {
      let wrapped = slot + count - n;
      self.slots.truncate(slot);
      self.slots.drain(..wrapped);
    }
  }

  pub fn replace(&mut self, slot: usize, face: FaceId) {
    self.slots[slot] = face;
  }

  /// Put `faces`, in order, where `slot` was.
  pub fn splice(&mut self, slot: usize, faces: &[FaceId]) {
    self.slots.splice(slot..=slot, faces.iter().copied());
  }

  /// Face `removed` left the face list: ids above it move down by one.
  pub fn renumber_after_removal(&mut self, removed: FaceId) {
    for face in &mut self.slots {
      debug_assert_ne!(*face, removed, "removed face {removed} still on the ring");
      if *face > removed {
        *face -= 1;
      }
    }
  }
}
