/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The `c8disasm` binary program.

extern crate chip8tk;
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{self, Read, Write};
use std::process;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error, ResultExt};
use log::LevelFilter;

use chip8tk::util;
use chip8tk::{Disassembler, PROG_START};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let matches = App::new("c8disasm")
        .version(VERSION)
        .author("Ian Johnson <ianprime0509@gmail.com>")
        .about("A Chip-8 disassembler")
        .help_message("show this help message and exit")
        .version_message("show version information and exit")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("ROM")
                .help("set the ROM file to disassemble ('-' for stdin)")
                .takes_value(true)
                .default_value("-"),
        )
        .arg(
            Arg::with_name("cols")
                .short("c")
                .long("cols")
                .value_name("N")
                .help("dump the ROM bytes first, N columns per row")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("increase verbosity"),
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
    let input_file = matches.value_of("input").unwrap_or("-");
    let stdin = io::stdin();
    let mut input: Box<Read> = if input_file == "-" {
        Box::new(stdin.lock())
    } else {
        Box::new(File::open(input_file)
            .with_context(|_| format!("could not open input file '{}'", input_file))?)
    };

    let disasm = Disassembler::new(&mut input)?;
    info!("read {} bytes", disasm.rom().len());

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    if let Some(cols) = matches.value_of("cols") {
        let cols: usize = cols.parse()
            .map_err(|_| err_msg("column count must be a positive integer"))?;
        if cols == 0 {
            return Err(err_msg("column count must be a positive integer"));
        }
        util::hexdump(&mut stdout, disasm.rom(), PROG_START, cols)?;
    }
    disasm.dump(&mut stdout)?;

    Ok(())
}
