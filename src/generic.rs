use core::{
	cmp,
	fmt,
	hash::{
		Hash,
		Hasher
	},
	mem,
	ops::{
		Deref,
		DerefMut
	}
};
use log::debug;
use crate::{
	raw::{
		self,
		RawBuf,
		ExtendWith,
		ExtendDefault,
		ExtendElement,
		ExtendFunc,
		ExtendRange
	},
	Error
};

/// Metadata representing the length and capacity of the array.
///
/// This crate provides two implementation of this trait:
/// [`wide::Meta`](crate::wide::Meta) stores the length and capacity with two `usize`.
/// Then the maximum size/capacity depends on the bit-depth of the plateform.
/// For 64-bit plateforms, this crate also provides [`lean::Meta`](crate::lean::Meta) that stores both the length
/// and capacity on a single `usize`. As a result, the maximum size/capacity is [`u32::MAX`].
pub trait Meta: Copy {
	/// Maximum size/capacity of the array using this metadata format.
	const MAX_LENGTH: usize;

	/// Create a new metadata from an array's length and capacity.
	fn new(len: usize, capacity: usize) -> Self;

	/// Get the length of the array.
	fn len(&self) -> usize;

	/// Get the capacity of the buffer. A capacity of 0 means that nothing is allocated.
	fn capacity(&self) -> usize;

	/// Set the new length of the array.
	fn set_len(&mut self, len: usize);

	/// Set the new capacity of the buffer.
	fn set_capacity(&mut self, capacity: usize);
}

/// Contiguous growable array type with explicit capacity control.
///
/// The array owns a single buffer of `capacity` slots, the first `len` of which hold
/// its elements. The remaining slots hold default or moved-out values that are never
/// observable through the public interface, and are reused as the array grows back.
/// Because every slot is always initialized, operations that allocate require
/// `T: Default`.
///
/// Appending grows the capacity from 0 to 1, then doubles it whenever the array is full,
/// so that [`push_back`](SimpleVec::push_back) runs in amortized constant time.
/// Removing elements ([`pop_back`](SimpleVec::pop_back), [`erase`](SimpleVec::erase),
/// [`clear`](SimpleVec::clear), [`resize`](SimpleVec::resize)) never releases memory.
///
/// The metadata layout is given as type parameter `M`, implementing the [`Meta`] trait.
/// By default the `wide::Meta` is used, in which case the maximum capacity is `usize::MAX`.
///
/// # Examples
///
/// ```
/// # use simple_vec::SimpleVec;
/// let mut v = SimpleVec::new();
/// v.push_back(1);
/// v.push_back(2);
/// v.insert(1, 9);
/// assert_eq!(v, [1, 9, 2]);
///
/// v.erase(1);
/// v.resize(5);
/// assert_eq!(v, [1, 2, 0, 0, 0]);
/// ```
pub struct SimpleVec<M: Meta, T> {
	buf: RawBuf<M, T>
}

impl<M: Meta, T> SimpleVec<M, T> {
	/// Creates a new empty `SimpleVec`.
	///
	/// The vector will not allocate until elements are pushed onto it.
	#[inline]
	pub fn new() -> Self {
		SimpleVec {
			buf: RawBuf::new()
		}
	}

	/// Creates a vector of `len` clones of `value`.
	///
	/// Exactly `len` slots are allocated.
	///
	/// ```
	/// # use simple_vec::SimpleVec;
	/// let v = SimpleVec::from_elem(3, "a");
	/// assert_eq!(v, ["a", "a", "a"]);
	/// assert_eq!(v.capacity(), 3);
	/// ```
	pub fn from_elem(len: usize, value: T) -> Self where T: Clone {
		Self::filled(len, ExtendElement(value))
	}

	/// Creates a vector of `len` elements, each produced by calling `f`.
	pub fn from_fn<F: FnMut() -> T>(len: usize, f: F) -> Self {
		Self::filled(len, ExtendFunc(f))
	}

	fn filled<E: ExtendWith<T>>(len: usize, value: E) -> Self {
		let mut buf: RawBuf<M, T> = RawBuf::allocate_with(len, value);
		buf.meta_mut().set_len(len);
		SimpleVec { buf }
	}

	/// Returns a raw pointer to the vector's buffer.
	///
	/// The caller must ensure that the vector outlives the pointer this
	/// function returns, or else it will end up pointing to garbage.
	/// Modifying the vector may cause its buffer to be reallocated,
	/// which would also make any pointers to it invalid.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.buf.as_ptr()
	}

	/// Returns an unsafe mutable pointer to the vector's buffer.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.buf.as_mut_ptr()
	}

	/// Extracts a slice containing the entire vector.
	///
	/// Equivalent to `&s[..]`.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		&self.buf.slots()[..self.len()]
	}

	/// Extracts a mutable slice of the entire vector.
	///
	/// Equivalent to `&mut s[..]`.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		let len = self.len();
		&mut self.buf.slots_mut()[..len]
	}

	/// Returns the length of the array.
	#[inline]
	pub fn len(&self) -> usize {
		self.buf.meta().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of slots currently allocated.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity()
	}

	/// Returns a reference to the element at `index`,
	/// or [`Error::OutOfRange`] if `index >= len`.
	///
	/// ```
	/// # use simple_vec::{SimpleVec, Error};
	/// let v = SimpleVec::from([1, 2, 3]);
	/// assert_eq!(v.at(1), Ok(&2));
	/// assert_eq!(v.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
	/// ```
	#[inline]
	pub fn at(&self, index: usize) -> Result<&T, Error> {
		let len = self.len();
		self.as_slice().get(index).ok_or(Error::OutOfRange { index, len })
	}

	/// Returns a mutable reference to the element at `index`,
	/// or [`Error::OutOfRange`] if `index >= len`.
	#[inline]
	pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
		let len = self.len();
		self.as_mut_slice().get_mut(index).ok_or(Error::OutOfRange { index, len })
	}

	/// Shortens the vector, keeping the first `len` elements.
	///
	/// If `len` is greater than the vector's current length, this has no
	/// effect. The discarded elements are not dropped here: they stay in their slots
	/// until they are overwritten or the buffer is released.
	///
	/// Note that this method has no effect on the allocated capacity
	/// of the vector.
	#[inline]
	pub fn truncate(&mut self, len: usize) {
		if len < self.len() {
			self.buf.meta_mut().set_len(len)
		}
	}

	/// Clears the vector, removing all values.
	///
	/// Note that this method has no effect on the allocated capacity
	/// of the vector, and does not drop the elements (see [`truncate`](SimpleVec::truncate)).
	#[inline]
	pub fn clear(&mut self) {
		self.truncate(0)
	}

	/// Exchanges the buffers, lengths and capacities of two vectors.
	///
	/// This is O(1) and never moves any element.
	#[inline]
	pub fn swap(&mut self, other: &mut Self) {
		self.buf.swap(&mut other.buf)
	}

	/// Capacity to grow to so that `required` slots fit: twice the current capacity,
	/// bounded by `M::MAX_LENGTH`, unless `required` is larger.
	fn grown_capacity(&self, required: usize) -> usize {
		let doubled = cmp::min(self.capacity().saturating_mul(2), M::MAX_LENGTH);
		cmp::max(required, doubled)
	}

	/// Capacity to grow to when the vector is full.
	fn next_capacity(&self) -> usize {
		match self.len().checked_add(1) {
			Some(required) => self.grown_capacity(required),
			None => raw::capacity_overflow()
		}
	}
}

impl<M: Meta, T: Default> SimpleVec<M, T> {
	/// Creates a vector of `len` default values.
	///
	/// Exactly `len` slots are allocated.
	#[inline]
	pub fn with_len(len: usize) -> Self {
		Self::filled(len, ExtendDefault)
	}

	/// Creates a new empty `SimpleVec` with exactly the given capacity.
	///
	/// ```
	/// # use simple_vec::SimpleVec;
	/// let v: SimpleVec<u8> = SimpleVec::with_capacity(10);
	/// assert_eq!(v.len(), 0);
	/// assert_eq!(v.capacity(), 10);
	/// ```
	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		SimpleVec {
			buf: RawBuf::allocate(capacity)
		}
	}

	/// The same as `with_capacity`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
		Ok(SimpleVec {
			buf: RawBuf::try_allocate(capacity)?
		})
	}

	/// Moves the elements into a new buffer of `new_capacity` slots.
	///
	/// The old buffer is only released once the new one is fully built, so on error
	/// the vector is left untouched.
	fn try_relocate(&mut self, new_capacity: usize) -> Result<(), Error> {
		let len = self.len();
		debug_assert!(new_capacity >= len);

		let mut buf: RawBuf<M, T> = RawBuf::try_allocate(new_capacity)?;
		debug!("relocating {} elements from {} to {} slots", len, self.capacity(), new_capacity);
		buf.slots_mut()[..len].swap_with_slice(self.as_mut_slice());
		buf.meta_mut().set_len(len);
		self.buf.swap(&mut buf);
		Ok(())
	}

	#[inline]
	fn relocate(&mut self, new_capacity: usize) {
		raw::handle_reserve(self.try_relocate(new_capacity))
	}

	/// The same as `reserve`, but returns on errors instead of panicking or aborting.
	pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), Error> {
		if new_capacity > self.capacity() {
			self.try_relocate(new_capacity)
		} else {
			Ok(())
		}
	}

	/// Raises the capacity to exactly `new_capacity` if it is currently smaller.
	/// Does nothing otherwise: the capacity never shrinks.
	///
	/// Existing elements are moved into the new buffer.
	///
	/// # Panics
	///
	/// Panics if the new capacity exceeds `M::MAX_LENGTH` or overflows `isize::MAX` bytes.
	pub fn reserve(&mut self, new_capacity: usize) {
		raw::handle_reserve(self.try_reserve(new_capacity))
	}

	/// Shrinks the capacity of the vector down to its length.
	///
	/// The elements are moved into a new buffer of exactly `len` slots.
	pub fn shrink_to_fit(&mut self) {
		if self.capacity() > self.len() {
			self.relocate(self.len())
		}
	}

	/// Appends an element to the back of a collection.
	///
	/// If the vector is full, its capacity doubles first (or becomes 1 if it was 0).
	///
	/// # Panics
	///
	/// Panics if the new capacity exceeds `M::MAX_LENGTH`.
	#[inline]
	pub fn push_back(&mut self, value: T) {
		let len = self.len();
		if len == self.capacity() {
			self.relocate(self.next_capacity())
		}

		self.buf.slots_mut()[len] = value;
		self.buf.meta_mut().set_len(len + 1)
	}

	/// Alias of [`push_back`](SimpleVec::push_back).
	#[inline]
	pub fn push(&mut self, value: T) {
		self.push_back(value)
	}

	/// Removes the last element from a vector and returns it, or [`None`] if it
	/// is empty.
	///
	/// Never allocates or releases memory.
	#[inline]
	pub fn pop_back(&mut self) -> Option<T> {
		let len = self.len();
		if len == 0 {
			None
		} else {
			self.buf.meta_mut().set_len(len - 1);
			Some(mem::take(&mut self.buf.slots_mut()[len - 1]))
		}
	}

	/// Alias of [`pop_back`](SimpleVec::pop_back).
	#[inline]
	pub fn pop(&mut self) -> Option<T> {
		self.pop_back()
	}

	/// Inserts an element at position `index` within the vector, shifting all
	/// elements after it to the right, and returns a reference to it.
	///
	/// The capacity grows exactly as with [`push_back`](SimpleVec::push_back).
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub fn insert(&mut self, index: usize, value: T) -> &mut T {
		let len = self.len();
		if index > len {
			panic!("insertion index (is {}) should be <= len (which is {})", index, len);
		}

		if len == self.capacity() {
			let new_capacity = self.next_capacity();
			let mut buf: RawBuf<M, T> = RawBuf::allocate(new_capacity);
			debug!("relocating {} elements from {} to {} slots", len, self.capacity(), new_capacity);

			{
				let src = self.as_mut_slice();
				let dst = buf.slots_mut();
				dst[..index].swap_with_slice(&mut src[..index]);
				dst[index] = value;
				dst[(index + 1)..=len].swap_with_slice(&mut src[index..]);
			}

			buf.meta_mut().set_len(len + 1);
			self.buf.swap(&mut buf);
		} else {
			let slots = self.buf.slots_mut();
			slots[len] = value;
			// Shift everything over to make space.
			slots[index..=len].rotate_right(1);
			self.buf.meta_mut().set_len(len + 1);
		}

		&mut self.as_mut_slice()[index]
	}

	/// Removes and returns the element at position `index` within the vector,
	/// shifting all elements after it to the left.
	///
	/// Afterwards `index` designates the element that followed the removed one,
	/// or the end of the vector. The capacity is unchanged.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn erase(&mut self, index: usize) -> T {
		let len = self.len();
		if index >= len {
			panic!("removal index (is {}) should be < len (is {})", index, len);
		}

		let slots = self.as_mut_slice();
		slots[index..].rotate_left(1);
		let value = mem::take(&mut slots[len - 1]);
		self.buf.meta_mut().set_len(len - 1);
		value
	}

	/// Alias of [`erase`](SimpleVec::erase).
	#[inline]
	pub fn remove(&mut self, index: usize) -> T {
		self.erase(index)
	}

	/// Resizes the `SimpleVec` in-place so that `len` is equal to `new_len`.
	///
	/// If `new_len` is greater than `len`, the `SimpleVec` is extended by the
	/// difference, with each additional slot set to `T::default()`.
	/// If `new_len` is less than `len`, the `SimpleVec` is simply truncated.
	///
	/// When `new_len` exceeds the capacity, the new capacity is the largest of
	/// `new_len` and twice the old capacity (bounded by `M::MAX_LENGTH`).
	#[inline]
	pub fn resize(&mut self, new_len: usize) {
		self.resize_with_filler(new_len, ExtendDefault)
	}

	/// Same as [`resize`](SimpleVec::resize), but new slots are set to clones of `value`.
	#[inline]
	pub fn resize_with_value(&mut self, new_len: usize, value: T) where T: Clone {
		self.resize_with_filler(new_len, ExtendElement(value))
	}

	/// Same as [`resize`](SimpleVec::resize), but new slots are produced by calling `f`.
	#[inline]
	pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
		self.resize_with_filler(new_len, ExtendFunc(f))
	}

	fn resize_with_filler<E: ExtendWith<T>>(&mut self, new_len: usize, value: E) {
		let len = self.len();
		if new_len <= len {
			self.truncate(new_len);
			return
		}

		if new_len > self.capacity() {
			// New elements are written directly into the fresh buffer.
			let new_capacity = self.grown_capacity(new_len);
			let mut buf: RawBuf<M, T> = RawBuf::allocate_with(new_capacity, ExtendRange::new(len..new_len, value));
			debug!("relocating {} elements from {} to {} slots", len, self.capacity(), new_capacity);
			buf.slots_mut()[..len].swap_with_slice(self.as_mut_slice());
			buf.meta_mut().set_len(new_len);
			self.buf.swap(&mut buf);
		} else {
			raw::fill_with(&mut self.buf.slots_mut()[len..new_len], value);
			self.buf.meta_mut().set_len(new_len)
		}
	}

	/// Clones and appends all elements in a slice to the `SimpleVec`.
	#[inline]
	pub fn extend_from_slice(&mut self, other: &[T]) where T: Clone {
		self.extend(other.iter().cloned())
	}
}

impl<M: Meta, T> Default for SimpleVec<M, T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Meta, T: Clone + Default> Clone for SimpleVec<M, T> {
	/// The clone has the same length and capacity as `self`.
	fn clone(&self) -> Self {
		let len = self.len();
		let mut buf: RawBuf<M, T> = RawBuf::allocate(self.capacity());
		buf.slots_mut()[..len].clone_from_slice(self.as_slice());
		buf.meta_mut().set_len(len);
		SimpleVec { buf }
	}

	/// Builds the copy in fresh storage before swapping it in,
	/// so `self` is untouched if anything fails along the way.
	fn clone_from(&mut self, source: &Self) {
		let mut copy = source.clone();
		self.swap(&mut copy)
	}
}

impl<M: Meta, T> Deref for SimpleVec<M, T> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<M: Meta, T> DerefMut for SimpleVec<M, T> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<'v, M: Meta, T> IntoIterator for &'v SimpleVec<M, T> {
	type Item = &'v T;
	type IntoIter = std::slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_slice().iter()
	}
}

impl<'v, M: Meta, T> IntoIterator for &'v mut SimpleVec<M, T> {
	type Item = &'v mut T;
	type IntoIter = std::slice::IterMut<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_mut_slice().iter_mut()
	}
}

impl<M: Meta, T: Default> IntoIterator for SimpleVec<M, T> {
	type Item = T;
	type IntoIter = crate::iter::IntoIter<M, T>;

	#[inline]
	fn into_iter(self) -> Self::IntoIter {
		crate::iter::IntoIter::new(self.buf)
	}
}

impl<M: Meta, T: Default> Extend<T> for SimpleVec<M, T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
		let iterator = iterable.into_iter();
		let (lower, _) = iterator.size_hint();
		let required = self.len().saturating_add(lower);
		if required > self.capacity() {
			self.reserve(self.grown_capacity(required))
		}

		for value in iterator {
			self.push_back(value)
		}
	}
}

impl<'a, M: Meta, T: 'a + Copy + Default> Extend<&'a T> for SimpleVec<M, T> {
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iterable: I) {
		self.extend(iterable.into_iter().copied())
	}
}

impl<M: Meta, T: Default> std::iter::FromIterator<T> for SimpleVec<M, T> {
	fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
		let mut vec = SimpleVec::new();
		vec.extend(iterable);
		vec
	}
}

impl<M: Meta, T: fmt::Debug> fmt::Debug for SimpleVec<M, T> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<M: Meta, T> AsRef<[T]> for SimpleVec<M, T> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<M: Meta, T> AsMut<[T]> for SimpleVec<M, T> {
	#[inline]
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

/// Takes exactly as many slots as the array has elements.
impl<M: Meta, T: Default, const N: usize> From<[T; N]> for SimpleVec<M, T> {
	fn from(array: [T; N]) -> Self {
		let mut values = array.into_iter();
		Self::from_fn(N, || values.next().unwrap_or_default())
	}
}

impl<M: Meta, T: Default> From<Vec<T>> for SimpleVec<M, T> {
	fn from(vec: Vec<T>) -> Self {
		let len = vec.len();
		let mut values = vec.into_iter();
		Self::from_fn(len, || values.next().unwrap_or_default())
	}
}

impl<'s, M: Meta, T: Clone> From<&'s [T]> for SimpleVec<M, T> {
	fn from(slice: &'s [T]) -> Self {
		let mut i = 0;
		Self::from_fn(slice.len(), || {
			let value = slice[i].clone();
			i += 1;
			value
		})
	}
}

impl<M: Meta, T: Default> From<SimpleVec<M, T>> for Vec<T> {
	fn from(vec: SimpleVec<M, T>) -> Vec<T> {
		vec.into_iter().collect()
	}
}

macro_rules! impl_slice_eq1 {
	([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
		impl<$($vars)*> PartialEq<$rhs> for $lhs where T: PartialEq<U> {
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
			#[inline]
			fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
		}
	}
}

impl_slice_eq1! { [T, U, O: Meta, P: Meta] SimpleVec<O, T>, SimpleVec<P, U> }
impl_slice_eq1! { [T, U, M: Meta] SimpleVec<M, T>, Vec<U> }
impl_slice_eq1! { [T, U, M: Meta] Vec<T>, SimpleVec<M, U> }
impl_slice_eq1! { [T, U, M: Meta] SimpleVec<M, T>, &[U] }
impl_slice_eq1! { [T, U, M: Meta] SimpleVec<M, T>, &mut [U] }
impl_slice_eq1! { [T, U, M: Meta] &[T], SimpleVec<M, U> }
impl_slice_eq1! { [T, U, M: Meta] &mut [T], SimpleVec<M, U> }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] SimpleVec<M, T>, [U; N] }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] SimpleVec<M, T>, &[U; N] }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] [T; N], SimpleVec<M, U> }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] &[T; N], SimpleVec<M, U> }

impl<M: Meta, T: Eq> Eq for SimpleVec<M, T> {}

/// Lexicographic order over the elements.
impl<M: Meta, T: PartialOrd> PartialOrd for SimpleVec<M, T> {
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		PartialOrd::partial_cmp(&**self, &**other)
	}
}

impl<M: Meta, T: Ord> Ord for SimpleVec<M, T> {
	#[inline]
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		Ord::cmp(&**self, &**other)
	}
}

impl<M: Meta, T: Hash> Hash for SimpleVec<M, T> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		Hash::hash(&**self, state)
	}
}
