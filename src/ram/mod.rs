//! Byte-addressable storage of the emulated memory chip.
//!
//! A single cursor points at the cell the next read or write will use; both
//! operations auto-increment it. All index arithmetic is taken modulo the
//! capacity, so the cursor can never leave `[0, N)`: after the last cell the
//! cursor rolls over to 0.

mod seed;

use std::fmt;

pub use self::seed::Seed;

pub struct RegisterFile<const N: usize> {
	memory: [u8; N],
	cursor: usize,
}

impl<const N: usize> RegisterFile<N> {
	const NOT_EMPTY: () = assert!(N > 0, "register file needs at least one cell");

	pub fn new() -> Self {
		#[allow(clippy::let_unit_value)]
		let () = Self::NOT_EMPTY;

		RegisterFile {
			memory: [0u8; N],
			cursor: 0,
		}
	}

	/// Fresh register file with the given seeds applied (later seeds win on
	/// overlap). Seeds must fit into the capacity; they are not wrapped.
	pub fn seeded(seeds: &[Seed]) -> crate::AResult<Self> {
		let mut ram = Self::new();
		for seed in seeds {
			let end = match seed.end() {
				Some(end) if end <= N => end,
				_ => bail!("Seed {} doesn't fit into {} bytes of RAM", seed, N),
			};
			ram.memory[seed.offset..end].copy_from_slice(&seed.bytes);
		}
		Ok(ram)
	}

	pub fn capacity(&self) -> usize {
		N
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn set_cursor(&mut self, address: usize) {
		// the wire address and the storage size may differ in range; always wrap
		self.cursor = address % N;
	}

	pub fn read_at_cursor(&mut self) -> u8 {
		let value = self.memory[self.cursor];
		self.advance();
		value
	}

	pub fn write_at_cursor(&mut self, value: u8) {
		self.memory[self.cursor] = value;
		self.advance();
	}

	/// Look at a cell without moving the cursor.
	pub fn peek(&self, address: usize) -> u8 {
		self.memory[address % N]
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.memory[..]
	}

	fn advance(&mut self) {
		self.cursor = (self.cursor + 1) % N;
		debug_assert!(self.cursor < N);
	}
}

impl<const N: usize> Default for RegisterFile<N> {
	fn default() -> Self {
		Self::new()
	}
}

impl<const N: usize> fmt::Debug for RegisterFile<N> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("RegisterFile")
			.field("capacity", &N)
			.field("cursor", &self.cursor)
			.finish()
	}
}
