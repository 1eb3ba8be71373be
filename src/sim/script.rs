use std::fmt;
use std::str;

use super::SimBus;
use crate::config::BusAddress;

/// One master transaction of a scripted session.
///
/// Textual form: `w:B[,B...]` writes the bytes (the first one is the RAM
/// address), `r:LEN` reads LEN bytes. A trailing `+` keeps the bus (no STOP).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Step {
	Write {
		data: Vec<u8>,
		keep_bus: bool,
	},
	Read {
		len: usize,
		keep_bus: bool,
	},
}

impl Step {
	pub fn keep_bus(&self) -> bool {
		match *self {
			Step::Write { keep_bus, .. } => keep_bus,
			Step::Read { keep_bus, .. } => keep_bus,
		}
	}

	/// Returns the bytes read for a read step.
	pub fn run<const N: usize>(&self, bus: &mut SimBus<N>, target: BusAddress) -> crate::AResult<Option<Vec<u8>>> {
		match self {
			Step::Write { data, keep_bus } => {
				let count = bus.write(target, data, *keep_bus)?;
				ensure!(count == data.len(), "short write: {} of {} bytes", count, data.len());
				Ok(None)
			},
			Step::Read { len, keep_bus } => {
				let mut buf = vec![0u8; *len];
				let count = bus.read(target, &mut buf, *keep_bus)?;
				ensure!(count == *len, "short read: {} of {} bytes", count, len);
				Ok(Some(buf))
			},
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Step::Write { data, .. } => {
				write!(f, "w:")?;
				for (i, b) in data.iter().enumerate() {
					if i > 0 {
						write!(f, ",")?;
					}
					write!(f, "0x{:02x}", b)?;
				}
			},
			Step::Read { len, .. } => write!(f, "r:{}", len)?,
		}
		if self.keep_bus() {
			write!(f, "+")?;
		}
		Ok(())
	}
}

impl str::FromStr for Step {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (body, keep_bus) = if s.ends_with('+') {
			(&s[..s.len() - 1], true)
		} else {
			(s, false)
		};

		if body.starts_with("w:") {
			let mut data = Vec::new();
			for byte_s in body[2..].split(',') {
				let byte = with_context!(("invalid byte in step {:?}", s),
					crate::parse_number(byte_s, u8::from_str_radix)
				)?;
				data.push(byte);
			}
			Ok(Step::Write { data, keep_bus })
		} else if body.starts_with("r:") {
			let len = with_context!(("invalid length in step {:?}", s),
				crate::parse_number(&body[2..], usize::from_str_radix)
			)?;
			ensure!(len > 0, "read step needs a length > 0: {:?}", s);
			Ok(Step::Read { len, keep_bus })
		} else {
			bail!("step must start with 'w:' or 'r:': {:?}", s);
		}
	}
}

#[cfg(test)]
mod test {
	use super::Step;
	use crate::config::BusAddress;
	use crate::protocol::RamPeripheral;
	use crate::sim::SimBus;

	fn check_step(repr: &str, step: Step) {
		match repr.parse::<Step>() {
			Err(e) => panic!("{:?} failed to parse as Step: {}", repr, e),
			Ok(parsed) => assert_eq!(parsed, step, "failed validating parsed {:?}", repr),
		}
	}

	fn check_invalid_step(repr: &str) {
		assert!(repr.parse::<Step>().is_err(), "{:?} must not be a valid step", repr);
	}

	#[test]
	fn parse_steps() {
		check_step("w:60", Step::Write { data: vec![60], keep_bus: false });
		check_step("w:0x10,1,0xff+", Step::Write { data: vec![0x10, 1, 0xff], keep_bus: true });
		check_step("r:3", Step::Read { len: 3, keep_bus: false });
		check_step("r:0x10+", Step::Read { len: 16, keep_bus: true });
		check_invalid_step("");
		check_invalid_step("w:");
		check_invalid_step("w:256");
		check_invalid_step("r:");
		check_invalid_step("r:0");
		check_invalid_step("x:1");
		check_invalid_step("+");
	}

	#[test]
	fn display() {
		assert_eq!(Step::Write { data: vec![0x3c, 1], keep_bus: true }.to_string(), "w:0x3c,0x01+");
		assert_eq!(Step::Read { len: 5, keep_bus: false }.to_string(), "r:5");
	}

	#[test]
	fn run_script() {
		let mut bus = SimBus::<256>::new(BusAddress::DEFAULT, RamPeripheral::default());
		let a = bus.address();
		let script: Vec<Step> = ["w:0xc8,1,2,3", "w:0xc8+", "r:2+", "r:1"]
			.iter()
			.map(|s| s.parse().unwrap())
			.collect();
		let results: Vec<Option<Vec<u8>>> = script.iter().map(|step| step.run(&mut bus, a).unwrap()).collect();
		assert_eq!(results, vec![None, None, Some(vec![1, 2]), Some(vec![3])]);
		assert_eq!(bus.peripheral().ram().cursor(), 203);
	}
}
