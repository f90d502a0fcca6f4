use core::{
	alloc::Layout,
	marker::PhantomData,
	mem,
	ops::Range,
	ptr::{
		self,
		NonNull
	}
};
use std::alloc::{
	self,
	handle_alloc_error
};
use log::trace;
use crate::{
	generic::Meta,
	Error
};

/// Produces the values written into freshly allocated slots.
///
/// `last` is called for the final slot so that a cloned element can be moved in
/// instead of cloned one more time.
pub(crate) trait ExtendWith<T> {
	fn next(&mut self) -> T;
	fn last(self) -> T;
}

pub(crate) struct ExtendElement<T>(pub T);
impl<T: Clone> ExtendWith<T> for ExtendElement<T> {
	fn next(&mut self) -> T {
		self.0.clone()
	}
	fn last(self) -> T {
		self.0
	}
}

pub(crate) struct ExtendDefault;
impl<T: Default> ExtendWith<T> for ExtendDefault {
	fn next(&mut self) -> T {
		Default::default()
	}
	fn last(self) -> T {
		Default::default()
	}
}

pub(crate) struct ExtendFunc<F>(pub F);
impl<T, F: FnMut() -> T> ExtendWith<T> for ExtendFunc<F> {
	fn next(&mut self) -> T {
		(self.0)()
	}
	fn last(mut self) -> T {
		(self.0)()
	}
}

/// Fills the slots in `range` with `inner`, and every other slot with `T::default()`.
pub(crate) struct ExtendRange<E> {
	index: usize,
	range: Range<usize>,
	inner: Option<E>
}

impl<E> ExtendRange<E> {
	pub(crate) fn new(range: Range<usize>, inner: E) -> Self {
		ExtendRange {
			index: 0,
			range,
			inner: Some(inner)
		}
	}
}

impl<T: Default, E: ExtendWith<T>> ExtendWith<T> for ExtendRange<E> {
	fn next(&mut self) -> T {
		let index = self.index;
		self.index += 1;

		if self.range.contains(&index) {
			if index + 1 == self.range.end {
				if let Some(inner) = self.inner.take() {
					return inner.last()
				}
			} else if let Some(inner) = &mut self.inner {
				return inner.next()
			}
		}

		T::default()
	}

	fn last(mut self) -> T {
		self.next()
	}
}

/// Overwrite every slot of `slots` with values produced by `value`.
pub(crate) fn fill_with<T, E: ExtendWith<T>>(slots: &mut [T], mut value: E) {
	if let Some((last, init)) = slots.split_last_mut() {
		for slot in init {
			*slot = value.next()
		}

		*last = value.last()
	}
}

/// A single-owner buffer of `capacity` slots.
///
/// Unlike `Vec`'s raw buffer, every slot of a `RawBuf` always holds an initialized
/// value: slots are filled when the buffer is allocated, and all of them are dropped
/// when it is released. The user of a `RawBuf` decides which prefix of the slots is
/// meaningful and records it in the length part of the metadata, which the buffer
/// itself never reads.
///
/// Zero-sized element types never allocate, but the requested capacity is still
/// recorded and the slot values are still created and dropped.
pub struct RawBuf<M: Meta, T> {
	/// Length and capacity.
	meta: M,

	/// Pointer to the first slot, dangling when nothing is allocated.
	ptr: NonNull<T>,

	marker: PhantomData<T>
}

unsafe impl<M: Meta + Send, T: Send> Send for RawBuf<M, T> {}
unsafe impl<M: Meta + Sync, T: Sync> Sync for RawBuf<M, T> {}

impl<M: Meta, T> Drop for RawBuf<M, T> {
	fn drop(&mut self) {
		self.release()
	}
}

impl<M: Meta, T> RawBuf<M, T> {
	/// Creates a buffer without any slot. Does not allocate.
	#[inline]
	pub fn new() -> Self {
		RawBuf {
			meta: M::new(0, 0),
			ptr: NonNull::dangling(),
			marker: PhantomData
		}
	}

	/// Allocates exactly `capacity` slots, filling each of them with `value`.
	///
	/// # Panics
	///
	/// Panics if the capacity overflows, and aborts through
	/// [`handle_alloc_error`] if the allocator fails.
	#[inline]
	pub(crate) fn allocate_with<E: ExtendWith<T>>(capacity: usize, value: E) -> Self {
		handle_reserve(Self::try_allocate_with(capacity, value))
	}

	/// The same as `allocate_with`, but returns on errors instead of panicking or aborting.
	pub(crate) fn try_allocate_with<E: ExtendWith<T>>(capacity: usize, mut value: E) -> Result<Self, Error> {
		if capacity == 0 {
			return Ok(Self::new())
		}

		if capacity > M::MAX_LENGTH {
			return Err(Error::CapacityOverflow)
		}

		let layout = Layout::array::<T>(capacity).map_err(|_| Error::CapacityOverflow)?;
		let ptr = if layout.size() == 0 {
			NonNull::dangling()
		} else {
			// SAFETY: the layout has a non-zero size.
			let ptr = unsafe { alloc::alloc(layout) };
			NonNull::new(ptr.cast::<T>()).ok_or(Error::AllocFailed {
				size: layout.size(),
				align: layout.align()
			})?
		};

		trace!("allocated {} slots of {} bytes", capacity, mem::size_of::<T>());

		// Releases what has been written so far if `value` panics.
		struct FillGuard<T> {
			ptr: NonNull<T>,
			layout: Layout,
			initialized: usize
		}

		impl<T> Drop for FillGuard<T> {
			fn drop(&mut self) {
				// SAFETY: the first `initialized` slots were written, and the memory was
				// allocated with `layout` if its size is non-zero.
				unsafe {
					ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.initialized));
					if self.layout.size() != 0 {
						alloc::dealloc(self.ptr.as_ptr().cast(), self.layout)
					}
				}
			}
		}

		let mut guard = FillGuard { ptr, layout, initialized: 0 };

		// SAFETY: every write stays within the `capacity` slots just allocated.
		unsafe {
			for i in 1..capacity {
				ptr::write(ptr.as_ptr().add(i - 1), value.next());
				guard.initialized = i;
			}

			ptr::write(ptr.as_ptr().add(capacity - 1), value.last());
		}

		mem::forget(guard);

		Ok(RawBuf {
			meta: M::new(0, capacity),
			ptr,
			marker: PhantomData
		})
	}

	/// Drops every slot and frees the memory, leaving an empty buffer behind.
	pub fn release(&mut self) {
		let capacity = self.meta.capacity();
		let ptr = mem::replace(&mut self.ptr, NonNull::dangling());
		self.meta.set_len(0);
		self.meta.set_capacity(0);

		if capacity > 0 {
			trace!("releasing {} slots of {} bytes", capacity, mem::size_of::<T>());

			// SAFETY: all `capacity` slots are initialized, and this layout was valid when
			// they were allocated.
			unsafe {
				ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), capacity));

				let size = mem::size_of::<T>() * capacity;
				if size != 0 {
					let layout = Layout::from_size_align_unchecked(size, mem::align_of::<T>());
					alloc::dealloc(ptr.as_ptr().cast(), layout)
				}
			}
		}
	}

	/// Exchanges the content of two buffers, metadata included. This is O(1).
	#[inline]
	pub fn swap(&mut self, other: &mut Self) {
		mem::swap(self, other)
	}

	#[inline]
	pub fn meta(&self) -> &M {
		&self.meta
	}

	/// The capacity part of the metadata must not be changed through this reference.
	#[inline]
	pub(crate) fn meta_mut(&mut self) -> &mut M {
		&mut self.meta
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.meta.capacity()
	}

	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Every slot of the buffer, meaningful or not.
	#[inline]
	pub fn slots(&self) -> &[T] {
		// SAFETY: all `capacity` slots are initialized, and the pointer is dangling
		// (but aligned) when the capacity is 0.
		unsafe { std::slice::from_raw_parts(self.as_ptr(), self.capacity()) }
	}

	/// Every slot of the buffer, meaningful or not.
	#[inline]
	pub fn slots_mut(&mut self) -> &mut [T] {
		let capacity = self.capacity();
		// SAFETY: see `slots`.
		unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), capacity) }
	}
}

impl<M: Meta, T: Default> RawBuf<M, T> {
	/// Allocates exactly `capacity` default-constructed slots.
	#[inline]
	pub fn allocate(capacity: usize) -> Self {
		Self::allocate_with(capacity, ExtendDefault)
	}

	/// The same as `allocate`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_allocate(capacity: usize) -> Result<Self, Error> {
		Self::try_allocate_with(capacity, ExtendDefault)
	}
}

impl<M: Meta, T> Default for RawBuf<M, T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

// Central function for reserve error handling.
#[inline]
pub(crate) fn handle_reserve<T>(result: Result<T, Error>) -> T {
	match result {
		Ok(t) => t,
		Err(Error::AllocFailed { size, align }) => match Layout::from_size_align(size, align) {
			Ok(layout) => handle_alloc_error(layout),
			Err(_) => capacity_overflow()
		},
		Err(_) => capacity_overflow()
	}
}

// One central function responsible for reporting capacity overflows. This'll
// ensure that the code generation related to these panics is minimal as there's
// only one location which panics rather than a bunch throughout the module.
pub(crate) fn capacity_overflow() -> ! {
	panic!("capacity overflow");
}

#[cfg(test)]
mod tests {
	use std::{
		cell::Cell,
		panic::{
			self,
			AssertUnwindSafe
		},
		rc::Rc
	};
	use crate::generic::Meta as _;
	use super::*;

	type Buf<T> = RawBuf<crate::wide::Meta, T>;

	struct Counted(Option<Rc<Cell<usize>>>);

	impl Drop for Counted {
		fn drop(&mut self) {
			if let Some(drops) = &self.0 {
				drops.set(drops.get() + 1)
			}
		}
	}

	#[test]
	fn new_has_no_slot() {
		let buf: Buf<u32> = RawBuf::new();
		assert_eq!(buf.capacity(), 0);
		assert!(buf.slots().is_empty());
	}

	#[test]
	fn allocate_default_fills_every_slot() {
		let buf: Buf<u32> = RawBuf::allocate(5);
		assert_eq!(buf.capacity(), 5);
		assert_eq!(buf.meta().len(), 0);
		assert_eq!(buf.slots(), &[0, 0, 0, 0, 0]);
	}

	#[test]
	fn allocate_with_element() {
		let buf: Buf<String> = RawBuf::allocate_with(3, ExtendElement("x".to_string()));
		assert_eq!(buf.slots(), &["x", "x", "x"]);
	}

	#[test]
	fn release_drops_every_slot() {
		let drops = Rc::new(Cell::new(0));
		let counter = drops.clone();
		let mut buf: Buf<Counted> = RawBuf::allocate_with(4, ExtendFunc(|| Counted(Some(counter.clone()))));
		buf.release();
		assert_eq!(drops.get(), 4);
		assert_eq!(buf.capacity(), 0);

		// Releasing twice is harmless.
		buf.release();
		drop(buf);
		assert_eq!(drops.get(), 4);
	}

	#[test]
	fn panicking_filler_drops_written_slots() {
		let drops = Rc::new(Cell::new(0));
		let counter = drops.clone();
		let mut made = 0;
		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			let _: Buf<Counted> = RawBuf::allocate_with(8, ExtendFunc(|| {
				if made == 3 {
					panic!("filler failure")
				}
				made += 1;
				Counted(Some(counter.clone()))
			}));
		}));

		assert!(result.is_err());
		assert_eq!(drops.get(), 3);
	}

	#[test]
	fn swap_exchanges_everything() {
		let mut a: Buf<u8> = RawBuf::allocate_with(2, ExtendElement(1));
		let mut b: Buf<u8> = RawBuf::allocate_with(5, ExtendElement(2));
		b.meta_mut().set_len(3);
		a.swap(&mut b);
		assert_eq!(a.capacity(), 5);
		assert_eq!(a.meta().len(), 3);
		assert_eq!(a.slots(), &[2; 5]);
		assert_eq!(b.capacity(), 2);
		assert_eq!(b.meta().len(), 0);
	}

	#[test]
	fn zero_sized_slots_are_counted() {
		thread_local! {
			static DROPS: Cell<usize> = Cell::new(0);
		}

		#[derive(Default)]
		struct Zst;

		impl Drop for Zst {
			fn drop(&mut self) {
				DROPS.with(|drops| drops.set(drops.get() + 1))
			}
		}

		let buf: Buf<Zst> = RawBuf::allocate(1000);
		assert_eq!(buf.capacity(), 1000);
		assert_eq!(buf.slots().len(), 1000);
		drop(buf);
		assert_eq!(DROPS.with(Cell::get), 1000);
	}

	#[test]
	fn oversized_capacity_overflows() {
		let result: Result<Buf<u64>, _> = RawBuf::try_allocate(usize::MAX / 4);
		assert_eq!(result.err(), Some(Error::CapacityOverflow));
	}

	#[test]
	#[should_panic(expected = "capacity overflow")]
	fn infallible_allocation_panics_on_overflow() {
		let _: Buf<u64> = RawBuf::allocate(usize::MAX);
	}

	#[test]
	fn range_filler_only_touches_its_range() {
		let buf: Buf<u8> = RawBuf::allocate_with(6, ExtendRange::new(2..4, ExtendElement(7)));
		assert_eq!(buf.slots(), &[0, 0, 7, 7, 0, 0]);

		let buf: Buf<u8> = RawBuf::allocate_with(4, ExtendRange::new(1..4, ExtendElement(7)));
		assert_eq!(buf.slots(), &[0, 7, 7, 7]);

		let mut calls = 0;
		let buf: Buf<u32> = RawBuf::allocate_with(5, ExtendRange::new(1..3, ExtendFunc(|| { calls += 1; calls })));
		assert_eq!(buf.slots(), &[0, 1, 2, 0, 0]);
	}

	#[test]
	fn fill_with_reuses_last_value() {
		let mut slots = [0u8; 4];
		fill_with(&mut slots, ExtendElement(9));
		assert_eq!(slots, [9; 4]);

		let mut none: [u8; 0] = [];
		fill_with(&mut none, ExtendElement(9));
	}
}
