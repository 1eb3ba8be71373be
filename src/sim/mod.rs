//! Host-side simulation: a bus controller without hardware behind it, and a
//! blocking master driving the RAM peripheral through it.

mod demo;
mod script;

pub use self::demo::{
	demo_message,
	run_demo,
};
pub use self::script::Step;

use std::collections::VecDeque;

use crate::config::{
	BusAddress,
	Config,
};
use crate::controller::{
	Controller,
	DataCmd,
	IntrMask,
	IntrStat,
	Slave,
};
use crate::protocol::RamPeripheral;

/// Controller registers kept in memory.
#[derive(Debug, Default)]
pub struct SimController {
	rx_fifo: VecDeque<DataCmd>,
	read_request: bool,
	tx: VecDeque<u8>,
	mask: IntrMask,
}

impl SimController {
	pub fn new() -> Self {
		Self::default()
	}

	/// master clocked in a byte
	pub fn receive(&mut self, word: DataCmd) {
		self.rx_fifo.push_back(word);
	}

	/// master addressed us for reading and waits for a byte
	pub fn request_read(&mut self) {
		self.read_request = true;
	}

	pub fn take_transmitted(&mut self) -> Option<u8> {
		self.tx.pop_front()
	}

	pub fn mask(&self) -> IntrMask {
		self.mask
	}
}

impl Controller for SimController {
	fn interrupt_status(&mut self) -> IntrStat {
		let mut raw = IntrStat::default();
		if !self.rx_fifo.is_empty() {
			raw.set_rx_full();
		}
		if self.read_request {
			raw.set_rd_req();
		}
		self.mask.filter(raw.0)
	}

	fn read_data_cmd(&mut self) -> DataCmd {
		// reading an empty FIFO yields zero on real hardware as well
		self.rx_fifo.pop_front().unwrap_or_default()
	}

	fn write_data(&mut self, data: u8) {
		self.tx.push_back(data);
	}

	fn clear_read_request(&mut self) {
		self.read_request = false;
	}

	fn set_interrupt_mask(&mut self, mask: IntrMask) {
		self.mask = mask;
	}
}

/// Blocking master with a single simulated RAM peripheral on the bus.
///
/// Every byte is delivered through the controller interrupt, one interrupt
/// per byte. `keep_bus` (no STOP at the end) is accepted for parity with a
/// real master; the peripheral never sees START or STOP conditions.
pub struct SimBus<const N: usize> {
	address: BusAddress,
	slave: Slave<SimController, N>,
}

impl<const N: usize> SimBus<N> {
	pub fn new(address: BusAddress, peripheral: RamPeripheral<N>) -> Self {
		SimBus {
			address,
			slave: Slave::new(SimController::new(), peripheral),
		}
	}

	pub fn from_config(config: &Config) -> crate::AResult<Self> {
		Ok(SimBus::new(config.bus_address, config.peripheral()?))
	}

	pub fn address(&self) -> BusAddress {
		self.address
	}

	pub fn peripheral(&self) -> &RamPeripheral<N> {
		self.slave.peripheral()
	}

	fn select(&self, target: BusAddress) -> crate::AResult<()> {
		if target != self.address {
			bail!("no device acknowledged address {} (peripheral is on {})", target, self.address);
		}
		Ok(())
	}

	/// Returns the number of bytes written. The first byte is flagged as the
	/// first data byte of the write.
	pub fn write(&mut self, target: BusAddress, data: &[u8], keep_bus: bool) -> crate::AResult<usize> {
		self.select(target)?;
		for (i, &byte) in data.iter().enumerate() {
			self.slave.controller_mut().receive(DataCmd::received(byte, i == 0));
			self.slave.on_interrupt();
		}
		debug!("write to {}: {} bytes{}", target, data.len(), if keep_bus { " (bus kept)" } else { "" });
		Ok(data.len())
	}

	/// Fills `buf` from the peripheral; returns the number of bytes read.
	pub fn read(&mut self, target: BusAddress, buf: &mut [u8], keep_bus: bool) -> crate::AResult<usize> {
		self.select(target)?;
		for (i, slot) in buf.iter_mut().enumerate() {
			self.slave.controller_mut().request_read();
			self.slave.on_interrupt();
			*slot = match self.slave.controller_mut().take_transmitted() {
				Some(byte) => byte,
				None => bail!("peripheral {} didn't answer read request for byte {}", target, i),
			};
		}
		debug!("read from {}: {} bytes{}", target, buf.len(), if keep_bus { " (bus kept)" } else { "" });
		Ok(buf.len())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ram::Seed;

	fn bus<const N: usize>(seeds: &[Seed]) -> SimBus<N> {
		SimBus::new(BusAddress::DEFAULT, RamPeripheral::seeded(seeds).unwrap())
	}

	#[test]
	fn controller_reports_pending_sources() {
		let mut ctrl = SimController::new();
		ctrl.set_interrupt_mask(IntrMask::ram_peripheral());
		assert!(ctrl.interrupt_status().is_spurious());
		ctrl.receive(DataCmd::received(1, true));
		ctrl.request_read();
		let status = ctrl.interrupt_status();
		assert!(status.is_rx_full() && status.is_rd_req());
		assert_eq!(ctrl.read_data_cmd(), DataCmd::received(1, true));
		ctrl.clear_read_request();
		assert!(ctrl.interrupt_status().is_spurious());
		assert_eq!(ctrl.read_data_cmd(), DataCmd(0));
	}

	#[test]
	fn masked_controller_stays_quiet() {
		let mut ctrl = SimController::new();
		ctrl.receive(DataCmd::received(1, true));
		assert!(ctrl.interrupt_status().is_spurious());
	}

	#[test]
	fn write_then_read_back() {
		let mut bus = bus::<256>(&[]);
		let a = bus.address();
		assert_eq!(bus.write(a, &[0x20, 1, 2, 3], false).unwrap(), 4);
		assert_eq!(bus.write(a, &[0x20], true).unwrap(), 1);
		let mut buf = [0u8; 3];
		assert_eq!(bus.read(a, &mut buf, false).unwrap(), 3);
		assert_eq!(buf, [1, 2, 3]);
		assert_eq!(bus.peripheral().ram().cursor(), 0x23);
	}

	#[test]
	fn read_continues_from_last_position() {
		let mut bus = bus::<256>(&Seed::sensor_telemetry());
		let a = bus.address();
		bus.write(a, &[60], true).unwrap();
		let mut buf = [0u8; 2];
		bus.read(a, &mut buf, true).unwrap();
		assert_eq!(buf, [50, 0]);
		bus.read(a, &mut buf, false).unwrap();
		assert_eq!(buf, [50, 0]);
		assert_eq!(bus.peripheral().ram().cursor(), 64);
	}

	#[test]
	fn first_read_starts_at_zero() {
		let mut bus = bus::<128>(&[Seed::byte(0, 0x5a)]);
		let a = bus.address();
		let mut buf = [0u8; 1];
		bus.read(a, &mut buf, false).unwrap();
		assert_eq!(buf, [0x5a]);
	}

	#[test]
	fn empty_write_changes_nothing() {
		let mut bus = bus::<128>(&[]);
		let a = bus.address();
		assert_eq!(bus.write(a, &[], false).unwrap(), 0);
		assert_eq!(bus.peripheral().ram().cursor(), 0);
	}

	#[test]
	fn wrong_address_is_nacked() {
		let mut bus = bus::<256>(&[]);
		let other = BusAddress::new(0x17).unwrap();
		assert!(bus.write(other, &[0, 1], false).is_err());
		assert!(bus.read(other, &mut [0u8; 1], false).is_err());
		assert_eq!(bus.peripheral().ram().peek(0), 0);
		assert_eq!(bus.peripheral().ram().cursor(), 0);
	}

	#[test]
	fn bus_from_config() {
		let bus = SimBus::<256>::from_config(&Config::default()).unwrap();
		assert_eq!(bus.address(), BusAddress::DEFAULT);
		assert_eq!(bus.peripheral().ram().peek(68), 50);
		assert!(SimBus::<64>::from_config(&Config::default()).is_err());
	}
}
