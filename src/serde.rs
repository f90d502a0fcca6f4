//! `serde` support for [`SimpleVec`](crate::generic::SimpleVec).
//!
//! - **Serialize**: as a sequence of the `len` elements. Capacity is not preserved.
//! - **Deserialize**: from any sequence. The vector grows as elements are read.
use core::{
	cmp,
	fmt,
	marker::PhantomData,
	mem
};
use serde::{
	de,
	ser::SerializeSeq,
	Deserialize,
	Deserializer,
	Serialize,
	Serializer
};
use crate::generic::{
	Meta,
	SimpleVec
};

impl<M: Meta, T: Serialize> Serialize for SimpleVec<M, T> {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		let mut seq = s.serialize_seq(Some(self.len()))?;
		for item in self.iter() {
			seq.serialize_element(item)?;
		}
		seq.end()
	}
}

/// Upper bound on the bytes pre-allocated from an untrusted size hint.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// Number of slots worth reserving for a sequence announcing `hint` elements.
fn cautious<T>(hint: Option<usize>) -> usize {
	match mem::size_of::<T>() {
		0 => 0,
		size => cmp::min(hint.unwrap_or(0), MAX_PREALLOC_BYTES / size)
	}
}

struct VecVisitor<M, T>(PhantomData<(M, T)>);

impl<'de, M: Meta, T> de::Visitor<'de> for VecVisitor<M, T>
where
	T: Deserialize<'de> + Default
{
	type Value = SimpleVec<M, T>;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a sequence")
	}

	fn visit_seq<A: de::SeqAccess<'de>>(self, mut a: A) -> Result<Self::Value, A::Error> {
		let mut out: SimpleVec<M, T> = SimpleVec::new();
		out.try_reserve(cautious::<T>(a.size_hint())).map_err(de::Error::custom)?;

		while let Some(elem) = a.next_element::<T>()? {
			out.push_back(elem);
		}
		Ok(out)
	}
}

impl<'de, M: Meta, T> Deserialize<'de> for SimpleVec<M, T>
where
	T: Deserialize<'de> + Default
{
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		d.deserialize_seq(VecVisitor::<M, T>(PhantomData))
	}
}
