use std::fmt;
use std::str;

use crate::protocol::RamPeripheral;
use crate::ram::Seed;

/// 7-bit bus address the peripheral answers on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BusAddress(u8);

impl BusAddress {
	pub const DEFAULT: BusAddress = BusAddress(0x68);

	pub fn new(address: u8) -> crate::AResult<Self> {
		ensure!(address < 0x80, "bus address 0x{:02x} doesn't fit into 7 bits", address);
		// 0000xxx and 1111xxx are reserved by the bus specification
		ensure!(address >= 0x08 && address < 0x78, "bus address 0x{:02x} is reserved", address);
		Ok(BusAddress(address))
	}

	pub fn value(&self) -> u8 {
		self.0
	}
}

impl Default for BusAddress {
	fn default() -> Self {
		BusAddress::DEFAULT
	}
}

impl fmt::Display for BusAddress {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

impl str::FromStr for BusAddress {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let address = with_context!(("invalid bus address {:?}", s),
			crate::parse_number(s, u8::from_str_radix)
		)?;
		BusAddress::new(address)
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
	pub bus_address: BusAddress,
	/// only reported; the simulated bus has no timing
	pub baudrate: u32,
	pub seeds: Vec<Seed>,
}

impl Config {
	pub const DEFAULT_BAUDRATE: u32 = 400 * 1000;

	/// Empty RAM on the default address.
	pub fn blank() -> Self {
		Config {
			bus_address: BusAddress::DEFAULT,
			baudrate: Config::DEFAULT_BAUDRATE,
			seeds: Vec::new(),
		}
	}

	pub fn peripheral<const N: usize>(&self) -> crate::AResult<RamPeripheral<N>> {
		with_context!(("RAM with {} bytes", N),
			RamPeripheral::seeded(&self.seeds)
		)
	}
}

/// Default address and baudrate, RAM seeded with the sensor readings.
impl Default for Config {
	fn default() -> Self {
		Config {
			seeds: Seed::sensor_telemetry(),
			..Config::blank()
		}
	}
}
