use std::fmt;

// interrupt status / mask bits (IC_INTR_STAT, IC_INTR_MASK)
const INTR_RX_UNDER:   u32 = 0x0000_0001;
const INTR_RX_OVER:    u32 = 0x0000_0002;
const INTR_RX_FULL:    u32 = 0x0000_0004;
const INTR_TX_OVER:    u32 = 0x0000_0008;
const INTR_TX_EMPTY:   u32 = 0x0000_0010;
const INTR_RD_REQ:     u32 = 0x0000_0020;
const INTR_TX_ABRT:    u32 = 0x0000_0040;
const INTR_RX_DONE:    u32 = 0x0000_0080;
const INTR_ACTIVITY:   u32 = 0x0000_0100;
const INTR_STOP_DET:   u32 = 0x0000_0200;
const INTR_START_DET:  u32 = 0x0000_0400;
const INTR_GEN_CALL:   u32 = 0x0000_0800;
const INTR_RESTART_DET: u32 = 0x0000_1000;

// receive/transmit data register (IC_DATA_CMD)
const DATA_CMD_DAT:             u32 = 0x0000_00ff;
const DATA_CMD_FIRST_DATA_BYTE: u32 = 0x0000_0800; // read only

/// Interrupt status as reported by the controller.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IntrStat(pub u32);

impl IntrStat {
	pub fn is_rx_full(&self) -> bool {
		0 != self.0 & INTR_RX_FULL
	}
	pub fn is_rd_req(&self) -> bool {
		0 != self.0 & INTR_RD_REQ
	}
	pub fn is_stop_det(&self) -> bool {
		0 != self.0 & INTR_STOP_DET
	}
	pub fn is_start_det(&self) -> bool {
		0 != self.0 & INTR_START_DET
	}
	pub fn is_restart_det(&self) -> bool {
		0 != self.0 & INTR_RESTART_DET
	}

	/// neither received data nor a read request: nothing for the RAM to do
	pub fn is_spurious(&self) -> bool {
		!self.is_rx_full() && !self.is_rd_req()
	}

	pub fn set_rx_full(&mut self) -> &mut Self {
		self.0 |= INTR_RX_FULL;
		self
	}
	pub fn set_rd_req(&mut self) -> &mut Self {
		self.0 |= INTR_RD_REQ;
		self
	}
}

impl fmt::Display for IntrStat {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:08x}", self.0)
	}
}

impl fmt::Debug for IntrStat {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:08x} (", self.0)?;
		if 0 != self.0 & INTR_RX_UNDER { write!(f, " [RX_UNDER]")?; }
		if 0 != self.0 & INTR_RX_OVER { write!(f, " [RX_OVER]")?; }
		if self.is_rx_full() { write!(f, " [RX_FULL]")?; }
		if 0 != self.0 & INTR_TX_OVER { write!(f, " [TX_OVER]")?; }
		if 0 != self.0 & INTR_TX_EMPTY { write!(f, " [TX_EMPTY]")?; }
		if self.is_rd_req() { write!(f, " [RD_REQ]")?; }
		if 0 != self.0 & INTR_TX_ABRT { write!(f, " [TX_ABRT]")?; }
		if 0 != self.0 & INTR_RX_DONE { write!(f, " [RX_DONE]")?; }
		if 0 != self.0 & INTR_ACTIVITY { write!(f, " [ACTIVITY]")?; }
		if self.is_stop_det() { write!(f, " [STOP_DET]")?; }
		if self.is_start_det() { write!(f, " [START_DET]")?; }
		if 0 != self.0 & INTR_GEN_CALL { write!(f, " [GEN_CALL]")?; }
		if self.is_restart_det() { write!(f, " [RESTART_DET]")?; }
		write!(f, " )")
	}
}

/// Interrupt mask; only the sources the RAM peripheral serves are ever enabled.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct IntrMask(pub u32);

impl IntrMask {
	pub fn ram_peripheral() -> Self {
		IntrMask(INTR_RD_REQ | INTR_RX_FULL)
	}

	/// status bits the mask lets through
	pub fn filter(&self, raw: u32) -> IntrStat {
		IntrStat(raw & self.0)
	}
}

/// A word popped from the receive FIFO.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DataCmd(pub u32);

impl DataCmd {
	pub fn received(data: u8, first_data_byte: bool) -> Self {
		let first = if first_data_byte { DATA_CMD_FIRST_DATA_BYTE } else { 0 };
		DataCmd(first | data as u32)
	}

	pub fn data(&self) -> u8 {
		(self.0 & DATA_CMD_DAT) as u8
	}

	pub fn is_first_data_byte(&self) -> bool {
		0 != self.0 & DATA_CMD_FIRST_DATA_BYTE
	}
}

impl fmt::Display for DataCmd {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:08x}", self.0)
	}
}

impl fmt::Debug for DataCmd {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:08x} (data: 0x{:02x}", self.0, self.data())?;
		if self.is_first_data_byte() { write!(f, " [FIRST]")?; }
		write!(f, ")")
	}
}

#[cfg(test)]
mod test {
	use super::{DataCmd, IntrMask, IntrStat};

	#[test]
	fn data_cmd_bits() {
		let first = DataCmd(0x0000_083c);
		assert!(first.is_first_data_byte());
		assert_eq!(first.data(), 0x3c);
		assert_eq!(DataCmd::received(0x3c, true), first);

		let cont = DataCmd(0x0000_01ff);
		assert!(!cont.is_first_data_byte());
		assert_eq!(cont.data(), 0xff);
	}

	#[test]
	fn mask_filters_unserved_sources() {
		let mask = IntrMask::ram_peripheral();
		let stat = mask.filter(0x0000_0624); // STOP_DET | START_DET | RD_REQ | RX_FULL
		assert!(stat.is_rx_full());
		assert!(stat.is_rd_req());
		assert!(!stat.is_stop_det());
		assert!(mask.filter(0x0000_0600).is_spurious());
	}

	#[test]
	fn debug_lists_flags() {
		let mut stat = IntrStat::default();
		stat.set_rx_full().set_rd_req();
		assert_eq!(format!("{:?}", stat), "0x00000024 ( [RX_FULL] [RD_REQ] )");
		assert_eq!(format!("{:?}", DataCmd::received(1, true)), "0x00000801 (data: 0x01 [FIRST])");
	}
}
