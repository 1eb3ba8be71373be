//! Glue between a bus controller in peripheral mode and the RAM protocol.
//!
//! The controller raises one interrupt for "byte received" (RX_FULL) and
//! "master wants a byte" (RD_REQ); both may be pending at once. The status
//! is decoded into [`Event`]s, received data first, and each event is handed
//! to the [`RamPeripheral`] synchronously.

mod registers;

pub use self::registers::{
	DataCmd,
	IntrMask,
	IntrStat,
};

use crate::protocol::{
	Event,
	RamPeripheral,
};

/// Register access to a bus controller running in peripheral mode.
pub trait Controller {
	/// masked interrupt status
	fn interrupt_status(&mut self) -> IntrStat;

	/// pop the next received word; clears RX_FULL once the FIFO is empty
	fn read_data_cmd(&mut self) -> DataCmd;

	/// byte to send to the master for the pending read request
	fn write_data(&mut self, data: u8);

	fn clear_read_request(&mut self);

	fn set_interrupt_mask(&mut self, mask: IntrMask);
}

impl<'a, C: ?Sized + Controller> Controller for &'a mut C {
	fn interrupt_status(&mut self) -> IntrStat {
		C::interrupt_status(*self)
	}
	fn read_data_cmd(&mut self) -> DataCmd {
		C::read_data_cmd(*self)
	}
	fn write_data(&mut self, data: u8) {
		C::write_data(*self, data)
	}
	fn clear_read_request(&mut self) {
		C::clear_read_request(*self)
	}
	fn set_interrupt_mask(&mut self, mask: IntrMask) {
		C::set_interrupt_mask(*self, mask)
	}
}

/// Events pending for the given status, in the order they must be handled.
///
/// Pops the received word from the controller if RX_FULL is set.
pub fn decode<C: ?Sized + Controller>(controller: &mut C, status: IntrStat) -> [Option<Event>; 2] {
	let received = if status.is_rx_full() {
		let word = controller.read_data_cmd();
		Some(Event::Received {
			byte: word.data(),
			is_first: word.is_first_data_byte(),
		})
	} else {
		None
	};
	let requested = if status.is_rd_req() {
		Some(Event::ReadRequested)
	} else {
		None
	};
	[received, requested]
}

/// A RAM peripheral bound to the controller whose interrupt drives it.
pub struct Slave<C: Controller, const N: usize> {
	controller: C,
	peripheral: RamPeripheral<N>,
}

impl<C: Controller, const N: usize> Slave<C, N> {
	/// Enables exactly the interrupts the RAM protocol needs.
	pub fn new(mut controller: C, peripheral: RamPeripheral<N>) -> Self {
		controller.set_interrupt_mask(IntrMask::ram_peripheral());
		Slave {
			controller,
			peripheral,
		}
	}

	/// Interrupt service routine.
	pub fn on_interrupt(&mut self) {
		let status = self.controller.interrupt_status();
		if status.is_spurious() {
			debug!("ignoring spurious interrupt: {:?}", status);
			return;
		}

		for event in decode(&mut self.controller, status).iter().filter_map(|e| *e) {
			trace!("I2C event: {}", event);
			if let Some(byte) = self.peripheral.handle(event) {
				self.controller.write_data(byte);
				self.controller.clear_read_request();
			}
		}
	}

	/// The routine to register as the exclusive interrupt handler.
	pub fn handler<'a>(&'a mut self) -> impl FnMut() + 'a {
		move || self.on_interrupt()
	}

	pub fn peripheral(&self) -> &RamPeripheral<N> {
		&self.peripheral
	}

	pub fn controller(&self) -> &C {
		&self.controller
	}

	pub fn controller_mut(&mut self) -> &mut C {
		&mut self.controller
	}

	pub fn into_parts(self) -> (C, RamPeripheral<N>) {
		(self.controller, self.peripheral)
	}
}
