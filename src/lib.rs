#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod config;
pub mod controller;
pub mod protocol;
pub mod ram;
pub mod sim;

/// Capacity used when nothing else is configured; every address byte maps
/// to its own cell.
pub const DEFAULT_CAPACITY: usize = 256;

/// Parse an unsigned number given either in decimal or with a `0x` prefix in hex.
pub(crate) fn parse_number<T>(s: &str, from_str_radix: fn(&str, u32) -> Result<T, std::num::ParseIntError>) -> AResult<T> {
	let s = s.trim();
	with_context!(("invalid number {:?}", s), {
		if s.starts_with("0x") || s.starts_with("0X") {
			Ok(from_str_radix(&s[2..], 16)?)
		} else {
			Ok(from_str_radix(s, 10)?)
		}
	})
}
