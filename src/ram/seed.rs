use std::fmt;
use std::str;

// fixed readings the peripheral reports before any master wrote to it
const ACCELEROMETER_VALUE: u8 = 50;
const ACCELEROMETER_OFFSETS: [usize; 3] = [60, 62, 64];
const GYRO_VALUE: u8 = 50;
const GYRO_OFFSETS: [usize; 3] = [68, 70, 72];

/// Bytes placed at a fixed offset when the RAM is created.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Seed {
	pub offset: usize,
	pub bytes: Vec<u8>,
}

impl Seed {
	pub fn new<B: Into<Vec<u8>>>(offset: usize, bytes: B) -> Self {
		Seed {
			offset,
			bytes: bytes.into(),
		}
	}

	pub fn byte(offset: usize, value: u8) -> Self {
		Seed::new(offset, vec![value])
	}

	/// Simulated accelerometer and gyro readings at their well-known offsets.
	pub fn sensor_telemetry() -> Vec<Seed> {
		let acc = ACCELEROMETER_OFFSETS.iter().map(|&offset| Seed::byte(offset, ACCELEROMETER_VALUE));
		let gyro = GYRO_OFFSETS.iter().map(|&offset| Seed::byte(offset, GYRO_VALUE));
		acc.chain(gyro).collect()
	}

	/// first offset after the seeded bytes
	pub fn end(&self) -> Option<usize> {
		self.offset.checked_add(self.bytes.len())
	}
}

impl fmt::Display for Seed {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}=", self.offset)?;
		for (i, b) in self.bytes.iter().enumerate() {
			if i > 0 {
				write!(f, ",")?;
			}
			write!(f, "0x{:02x}", b)?;
		}
		Ok(())
	}
}

impl str::FromStr for Seed {
	type Err = ::failure::Error;

	// OFFSET=V[,V...]; numbers in decimal or 0x-prefixed hex
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(2, '=');
		let offset_s = parts.next().unwrap_or("");
		let values_s = match parts.next() {
			Some(v) => v,
			None => bail!("Need '=' between offset and values in seed: {:?}", s),
		};

		let offset = with_context!(("invalid seed offset in {:?}", s),
			crate::parse_number(offset_s, usize::from_str_radix)
		)?;

		let mut bytes = Vec::new();
		for value_s in values_s.split(',') {
			let value = with_context!(("invalid seed value in {:?}", s),
				crate::parse_number(value_s, u8::from_str_radix)
			)?;
			bytes.push(value);
		}
		ensure!(!bytes.is_empty(), "Seed without values: {:?}", s);

		Ok(Seed { offset, bytes })
	}
}

#[cfg(test)]
mod test {
	use super::Seed;

	fn check_seed(repr: &str, offset: usize, bytes: &[u8]) {
		match repr.parse::<Seed>() {
			Err(e) => panic!("{:?} failed to parse as Seed: {}", repr, e),
			Ok(seed) => assert_eq!(Seed::new(offset, bytes), seed, "failed validating parsed {:?}", repr),
		}
	}

	fn check_invalid_seed(repr: &str) {
		assert!(repr.parse::<Seed>().is_err(), "{:?} must not be a valid seed", repr);
	}

	#[test]
	fn parse_seed() {
		check_seed("60=50", 60, &[50]);
		check_seed("0x3c=0x32", 60, &[50]);
		check_seed("0=1,2,3", 0, &[1, 2, 3]);
		check_seed("255=0xff", 255, &[0xff]);
		check_seed(" 7 = 8 ", 7, &[8]);
		check_invalid_seed("");
		check_invalid_seed("60");
		check_invalid_seed("60=");
		check_invalid_seed("=50");
		check_invalid_seed("60=256");
		check_invalid_seed("60=1,,2");
		check_invalid_seed("x=1");
	}

	#[test]
	fn display_roundtrips() {
		let seed = Seed::new(0x44, vec![0x01, 0xab]);
		assert_eq!(seed.to_string(), "0x44=0x01,0xab");
		assert_eq!(seed.to_string().parse::<Seed>().unwrap(), seed);
	}

	#[test]
	fn sensor_telemetry_layout() {
		let seeds = Seed::sensor_telemetry();
		let offsets: Vec<usize> = seeds.iter().map(|s| s.offset).collect();
		assert_eq!(offsets, vec![60, 62, 64, 68, 70, 72]);
		assert!(seeds.iter().all(|s| s.bytes == vec![50]));
	}
}
