use core::{
	fmt,
	iter::FusedIterator,
	mem
};
use crate::{
	generic::Meta,
	raw::RawBuf
};

/// An iterator that moves out of a vector.
///
/// Created by the `into_iter` method on [`SimpleVec`](crate::generic::SimpleVec).
/// The buffer is released when the iterator is dropped, together with the elements
/// that were not yielded.
pub struct IntoIter<M: Meta, T> {
	buf: RawBuf<M, T>,
	front: usize,
	back: usize
}

impl<M: Meta, T> IntoIter<M, T> {
	pub(crate) fn new(buf: RawBuf<M, T>) -> Self {
		let back = buf.meta().len();
		IntoIter {
			buf,
			front: 0,
			back
		}
	}

	/// Returns the remaining items of this iterator as a slice.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		&self.buf.slots()[self.front..self.back]
	}
}

impl<M: Meta, T: Default> Iterator for IntoIter<M, T> {
	type Item = T;

	#[inline]
	fn next(&mut self) -> Option<T> {
		if self.front < self.back {
			let item = mem::take(&mut self.buf.slots_mut()[self.front]);
			self.front += 1;
			Some(item)
		} else {
			None
		}
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.back - self.front;
		(len, Some(len))
	}
}

impl<M: Meta, T: Default> DoubleEndedIterator for IntoIter<M, T> {
	#[inline]
	fn next_back(&mut self) -> Option<T> {
		if self.front < self.back {
			self.back -= 1;
			Some(mem::take(&mut self.buf.slots_mut()[self.back]))
		} else {
			None
		}
	}
}

impl<M: Meta, T: Default> ExactSizeIterator for IntoIter<M, T> {}

impl<M: Meta, T: Default> FusedIterator for IntoIter<M, T> {}

impl<M: Meta, T: fmt::Debug> fmt::Debug for IntoIter<M, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
	}
}
