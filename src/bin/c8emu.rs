/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The `c8emu` binary program.
//!
//! Runs a ROM headlessly: the display, keypad and sound hooks are left
//! unattached, which is enough to watch a program compute.  With `-v` every
//! instruction is traced along with the register file, and with `-s` the
//! emulator waits for a newline between instructions.

extern crate chip8tk;
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::process;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error, ResultExt};
use log::LevelFilter;

use chip8tk::timer::Timer;
use chip8tk::util;
use chip8tk::{Instruction, Interpreter, Machine, PROG_START};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let matches = App::new("c8emu")
        .version(VERSION)
        .author("Ian Johnson <ianprime0509@gmail.com>")
        .about("A Chip-8 emulator")
        .help_message("show this help message and exit")
        .version_message("show version information and exit")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("ROM")
                .help("set the ROM file to run")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("cols")
                .short("c")
                .long("cols")
                .value_name("N")
                .help("dump the loaded ROM first, N columns per row")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("step")
                .short("s")
                .long("step")
                .help("wait for a newline on stdin between instructions"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("increase verbosity; once also traces execution"),
        )
        .get_matches();

    let verbosity = matches.occurrences_of("verbose");
    let filter = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter(None, filter)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        for cause in e.iter_chain().skip(1) {
            info!("caused by: {}", cause);
        }
        trace!("backtrace: {}", e.backtrace());
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let input_file = matches.value_of("input").unwrap();
    let mut file = File::open(input_file)
        .with_context(|_| format!("could not open ROM file '{}'", input_file))?;
    let mut rom = Vec::new();
    file.read_to_end(&mut rom)?;

    let mut interp = Interpreter::new();
    interp.machine_mut().load_rom(&rom)?;
    info!("loaded {} bytes from '{}'", rom.len(), input_file);

    if let Some(cols) = matches.value_of("cols") {
        let cols: usize = cols.parse()
            .map_err(|_| err_msg("column count must be a positive integer"))?;
        if cols == 0 {
            return Err(err_msg("column count must be a positive integer"));
        }
        let stdout = io::stdout();
        util::hexdump(&mut stdout.lock(), &rom, PROG_START, cols)?;
    }

    let trace = matches.occurrences_of("verbose") > 0;
    let step_mode = matches.is_present("step");
    let mut timer = Timer::new(60);
    let stdin = io::stdin();

    while interp.machine().running() {
        let ticks = timer.lap();
        if ticks > 0 {
            interp.machine_mut().tick_timers(ticks);
        }

        if trace {
            let machine = interp.machine();
            if let Some(opcode) = machine.current_opcode() {
                println!("{:#05X}: {}", machine.pc(), Instruction::from_opcode(opcode));
            }
        }

        interp.step()?;

        if trace {
            print_registers(interp.machine());
        }
        if step_mode && interp.machine().running() {
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
        }
    }

    Ok(())
}

/// Prints the register file, then the special registers, to stdout.
fn print_registers(machine: &Machine) {
    for (i, val) in machine.registers().iter().enumerate() {
        print!("V{:X}={:02X}", i, val);
        if i % 8 == 7 {
            println!();
        } else {
            print!(" ");
        }
    }
    println!(
        "I={:#05X} PC={:#05X} SP={} DT={} ST={}",
        machine.i(),
        machine.pc(),
        machine.sp(),
        machine.dt(),
        machine.st()
    );
}
