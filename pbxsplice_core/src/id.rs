use derive_more::Deref;
use derive_more::Display;
use serde::Serialize;
use uuid::Uuid;

/// Number of characters in every object identifier written to a manifest.
pub const ID_WIDTH: usize = 24;

/// A 24-digit uppercase hexadecimal object identifier.
///
/// Each [`Entry`](crate::Entry) carries two of these, one keyed in the
/// `PBXBuildFile` table and one in the `PBXFileReference` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Source of fresh object identifiers.
pub trait IdGenerator {
	fn next_id(&mut self) -> ObjectId;
}

/// Identifiers derived from random v4 UUIDs. Used for every real run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
	fn next_id(&mut self) -> ObjectId {
		generate_id()
	}
}

/// Counter-backed identifiers (`000000000000000000000001`, ...), for
/// reproducible output.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
	counter: u64,
}

impl SequentialIds {
	pub fn new() -> Self {
		Self::default()
	}

	/// Start counting after `counter`.
	pub fn starting_at(counter: u64) -> Self {
		Self { counter }
	}
}

impl IdGenerator for SequentialIds {
	fn next_id(&mut self) -> ObjectId {
		self.counter += 1;
		ObjectId(format!("{:0width$X}", self.counter, width = ID_WIDTH))
	}
}

/// Generate a fresh identifier from a random UUID.
///
/// The hyphenated form `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` is reduced to
/// its first eight digits, the second group, and the final twelve digits.
pub fn generate_id() -> ObjectId {
	let uuid = Uuid::new_v4();
	let mut buffer = Uuid::encode_buffer();
	let digits = uuid.simple().encode_upper(&mut buffer);

	let mut id = String::with_capacity(ID_WIDTH);
	id.push_str(&digits[..8]);
	id.push_str(&digits[8..12]);
	id.push_str(&digits[20..]);

	ObjectId(id)
}
