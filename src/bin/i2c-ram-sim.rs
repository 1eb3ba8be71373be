#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate i2c_ram_peripheral;
use i2c_ram_peripheral::*;

use std::process::exit;

use i2c_ram_peripheral::config::Config;
use i2c_ram_peripheral::ram::Seed;
use i2c_ram_peripheral::sim::{
	SimBus,
	Step,
};

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid paramater {}: {}", name, e);
		e.context(msg).into()
	})
}

fn load_config(matches: &clap::ArgMatches) -> AResult<Config> {
	let mut config = if matches.is_present("no_sensors") {
		Config::blank()
	} else {
		Config::default()
	};
	if matches.is_present("address") {
		config.bus_address = get_param(matches, "address")?;
	}
	if let Some(seeds) = matches.values_of("seed") {
		for seed in seeds {
			config.seeds.push(seed.parse::<Seed>()?);
		}
	}
	Ok(config)
}

fn hexdump(data: &[u8]) {
	for i in 0..data.len() {
		if 0 == i % 16 {
			print!("{:08x} ", i);
		} else if 0 == i % 8 {
			print!(" ");
		}
		print!(" {:02x}", data[i]);
		if 15 == i % 16 {
			println!("");
		}
	}
	if 0 != data.len() % 16 {
		println!("");
	}
	println!("{:08x}", data.len());
}

fn dump<const N: usize>(config: &Config) -> AResult<()> {
	let peripheral = config.peripheral::<N>()?;
	hexdump(peripheral.ram().as_bytes());
	Ok(())
}

fn run_script<const N: usize>(config: &Config, sub_m: &clap::ArgMatches) -> AResult<()> {
	let mut steps = Vec::new();
	for step in sub_m.values_of("STEP").into_iter().flatten() {
		steps.push(step.parse::<Step>()?);
	}

	let mut bus = SimBus::<N>::from_config(config)?;
	let target = bus.address();
	for step in &steps {
		match step.run(&mut bus, target) {
			Ok(Some(data)) => {
				let bytes: Vec<String> = data.iter().map(|b| format!("{:02x}", b)).collect();
				println!("{}: {}", step, bytes.join(" "));
			},
			Ok(None) => println!("{}", step),
			Err(e) => {
				warn!("step {} failed: {}", step, e);
				return Err(e);
			},
		}
	}
	println!("cursor: 0x{:02x}", bus.peripheral().ram().cursor());

	Ok(())
}

fn demo<const N: usize>(config: &Config, sub_m: &clap::ArgMatches) -> AResult<()> {
	let rounds: usize = if sub_m.is_present("rounds") {
		get_param(sub_m, "rounds")?
	} else {
		8
	};

	let mut bus = SimBus::<N>::from_config(config)?;
	sim::run_demo(&mut bus, rounds)?;
	println!("{} rounds verified", rounds);

	Ok(())
}

fn dispatch<const N: usize>(config: &Config, matches: &clap::ArgMatches) -> AResult<()> {
	info!("RAM peripheral: {} bytes on bus address {} ({} Hz), {} seeds",
		N, config.bus_address, config.baudrate, config.seeds.len());

	match matches.subcommand() {
		("dump", _) => {
			dump::<N>(config)
		},
		("run", Some(sub_m)) => {
			run_script::<N>(config, sub_m)
		},
		("demo", Some(sub_m)) => {
			demo::<N>(config, sub_m)
		},
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg capacity: -c --capacity +takes_value "RAM size in bytes: 128 or 256 (default 256)")
		(@arg address: -a --address +takes_value "7-bit bus address (default 0x68)")
		(@arg seed: -s --seed +takes_value number_of_values(1) +multiple "pre-seeded bytes: OFFSET=V[,V...]")
		(@arg no_sensors: --("no-sensors") "don't seed the simulated sensor readings")
		(@subcommand dump =>
			(about: "print the initial RAM contents")
		)
		(@subcommand run =>
			(about: "run master transactions against the simulated peripheral")
			(@arg STEP: +required +multiple "w:B[,B...] writes (first byte is the RAM address), r:LEN reads; append '+' to keep the bus")
		)
		(@subcommand demo =>
			(about: "write, seek and read back messages like a master on real hardware")
			(@arg rounds: -n --rounds +takes_value "number of rounds (default 8)")
		)
	).get_matches();

	let config = load_config(&matches)?;

	let capacity: usize = if matches.is_present("capacity") {
		get_param(&matches, "capacity")?
	} else {
		DEFAULT_CAPACITY
	};

	match capacity {
		128 => dispatch::<128>(&config, &matches),
		256 => dispatch::<256>(&config, &matches),
		_ => bail!("unsupported RAM capacity {} (supported: 128, 256)", capacity),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
