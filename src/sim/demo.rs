use super::SimBus;

/// Split point for the partial read; the rest is read in a second transaction.
const SPLIT: usize = 5;

pub fn demo_message(address: u8) -> String {
	format!("Hello, I2C slave! - 0x{:02X}", address)
}

/// Exercise the peripheral the way a master on real hardware would.
///
/// For each round: write a message at an address, seek back to the address
/// with an address-only write, read the first few bytes and then the rest in
/// a second read that continues where the first stopped. The address starts
/// at 0 and advances by 32 each round, wrapping at 256.
pub fn run_demo<const N: usize>(bus: &mut SimBus<N>, rounds: usize) -> crate::AResult<()> {
	let target = bus.address();
	let mut address: u8 = 0;

	for _ in 0..rounds {
		let msg = demo_message(address);
		let msg = msg.as_bytes();

		let mut buf = Vec::with_capacity(1 + msg.len());
		buf.push(address);
		buf.extend_from_slice(msg);
		info!("Write at 0x{:02X}: '{}'", address, String::from_utf8_lossy(msg));
		let count = with_context!(("couldn't write to peripheral {}", target),
			bus.write(target, &buf, false)
		)?;
		ensure!(count == buf.len(), "short write at 0x{:02X}: {} of {} bytes", address, count, buf.len());

		// seek
		let count = bus.write(target, &buf[..1], true)?;
		ensure!(count == 1, "seek to 0x{:02X} failed", address);

		let mut head = [0u8; SPLIT];
		let count = bus.read(target, &mut head, true)?;
		ensure!(count == SPLIT, "short read at 0x{:02X}", address);
		info!("Read  at 0x{:02X}: '{}'", address, String::from_utf8_lossy(&head));
		ensure!(&head[..] == &msg[..SPLIT],
			"Verify failed at 0x{:02X}: expected {:?}, got {:?}", address, &msg[..SPLIT], head
		);

		let mut tail = vec![0u8; msg.len() - SPLIT];
		let count = bus.read(target, &mut tail, false)?;
		ensure!(count == tail.len(), "short read at 0x{:02X}", address as usize + SPLIT);
		info!("Read  at 0x{:02X}: '{}'", address as usize + SPLIT, String::from_utf8_lossy(&tail));
		ensure!(&tail[..] == &msg[SPLIT..],
			"Verify failed at 0x{:02X}: expected {:?}, got {:?}", address as usize + SPLIT, &msg[SPLIT..], tail
		);

		address = address.wrapping_add(32);
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use super::{demo_message, run_demo};
	use crate::config::BusAddress;
	use crate::protocol::RamPeripheral;
	use crate::sim::SimBus;

	#[test]
	fn demo_passes_on_full_ram() {
		let mut bus = SimBus::<256>::new(BusAddress::DEFAULT, RamPeripheral::default());
		run_demo(&mut bus, 9).unwrap();
		// last round wrote at 0 again
		let msg = demo_message(0);
		assert_eq!(&bus.peripheral().ram().as_bytes()[..msg.len()], msg.as_bytes());
	}

	#[test]
	fn demo_passes_on_half_ram() {
		// addresses >= 128 wrap into the lower half
		let mut bus = SimBus::<128>::new(BusAddress::DEFAULT, RamPeripheral::default());
		run_demo(&mut bus, 8).unwrap();
		let msg = demo_message(0xe0);
		assert_eq!(&bus.peripheral().ram().as_bytes()[0x60..0x60 + msg.len()], msg.as_bytes());
	}

	#[test]
	fn message_format() {
		assert_eq!(demo_message(0x20), "Hello, I2C slave! - 0x20");
	}
}
