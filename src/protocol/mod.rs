//! Bus protocol of the emulated memory chip.
//!
//! The first byte of every write sets the address; all following bytes of
//! that write are stored starting at the address, auto-incrementing. A read
//! returns bytes starting at the current address, auto-incrementing as well.
//! The address persists across transactions: a master can set it once and
//! then continue with any number of short reads or writes.

use std::fmt;

use crate::ram::{
	RegisterFile,
	Seed,
};

/// Role of a received byte within the current write.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Phase {
	Address,
	Data,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Event {
	/// master sent a byte; `is_first` marks the first byte of a write
	Received {
		byte: u8,
		is_first: bool,
	},
	/// master wants the next byte
	ReadRequested,
}

impl Event {
	pub fn address(byte: u8) -> Self {
		Event::Received { byte, is_first: true }
	}

	pub fn data(byte: u8) -> Self {
		Event::Received { byte, is_first: false }
	}

	pub fn phase(&self) -> Option<Phase> {
		match *self {
			Event::Received { is_first: true, .. } => Some(Phase::Address),
			Event::Received { is_first: false, .. } => Some(Phase::Data),
			Event::ReadRequested => None,
		}
	}
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Event::Received { byte, is_first: true } => write!(f, "address 0x{:02x}", byte),
			Event::Received { byte, is_first: false } => write!(f, "data 0x{:02x}", byte),
			Event::ReadRequested => write!(f, "read request"),
		}
	}
}

/// The emulated memory chip: owns its register file and handles one bus
/// event at a time.
///
/// `handle` never allocates, blocks or fails; it is meant to run inside the
/// bus controller's interrupt.
#[derive(Debug, Default)]
pub struct RamPeripheral<const N: usize> {
	ram: RegisterFile<N>,
}

impl<const N: usize> RamPeripheral<N> {
	pub fn new(ram: RegisterFile<N>) -> Self {
		RamPeripheral { ram }
	}

	pub fn seeded(seeds: &[Seed]) -> crate::AResult<Self> {
		Ok(RamPeripheral::new(RegisterFile::seeded(seeds)?))
	}

	/// Returns the byte to put on the bus for `ReadRequested`, `None` otherwise.
	pub fn handle(&mut self, event: Event) -> Option<u8> {
		match event {
			Event::Received { byte, is_first: true } => {
				self.ram.set_cursor(byte as usize);
				None
			},
			Event::Received { byte, is_first: false } => {
				self.ram.write_at_cursor(byte);
				None
			},
			Event::ReadRequested => Some(self.ram.read_at_cursor()),
		}
	}

	/// read-only view for diagnostics
	pub fn ram(&self) -> &RegisterFile<N> {
		&self.ram
	}
}
