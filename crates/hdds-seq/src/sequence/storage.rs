// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

/// Backing memory of a [`SequenceBuffer`](super::SequenceBuffer).
///
/// `Owned` is sized to the current capacity (`vec.len() == capacity`).
/// `Loaned` keeps the caller's whole slice so that `unloan` can hand it back
/// untouched; only its first `capacity` elements are addressed.
#[derive(Debug)]
pub(super) enum Storage<'a, T> {
    Owned(Vec<T>),
    Loaned(&'a mut [T]),
    Released,
}

impl<T> Storage<'_, T> {
    pub(super) fn elements(&self) -> &[T] {
        match self {
            Storage::Owned(vec) => vec.as_slice(),
            Storage::Loaned(slice) => &slice[..],
            Storage::Released => &[],
        }
    }

    pub(super) fn elements_mut(&mut self) -> &mut [T] {
        match self {
            Storage::Owned(vec) => vec.as_mut_slice(),
            Storage::Loaned(slice) => &mut slice[..],
            Storage::Released => &mut [],
        }
    }

    pub(super) fn is_loaned(&self) -> bool {
        matches!(self, Storage::Loaned(_))
    }

    pub(super) fn is_released(&self) -> bool {
        matches!(self, Storage::Released)
    }
}
