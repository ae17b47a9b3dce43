#[macro_use]
extern crate log;

mod command;
mod info;
mod list;
mod partition;
mod shell;

use std::io::{self, BufRead, Write};

use clap::Parser;
use derive_more::Display;
use fat32::io::std::FileIO;
use fat32::Fat32;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long)]
    quiet: bool,
    #[clap(short, action = clap::ArgAction::Count)]
    verbosity: u8,
    /// Mount the N-th MBR primary partition instead of the whole image
    #[clap(short, long)]
    partition: Option<usize>,
    /// Print read output as hex dump
    #[clap(long)]
    hex: bool,
    /// Disk image formatted with FAT32
    image: String,
}

#[derive(Debug, Display, Error)]
enum MountError {
    #[display("{_0}")]
    IO(#[from] io::Error),
    #[display("{_0}")]
    Volume(fat32::error::Error<io::Error>),
    #[display("{_0}")]
    Partition(&'static str),
}

fn mount(args: &Args) -> Result<Fat32<FileIO>, MountError> {
    let mut io = FileIO::open(&args.image)?;
    if let Some(index) = args.partition {
        let base = partition::offset(&mut io, index)?;
        io.set_base(base);
    }
    Fat32::new(io).map_err(MountError::Volume)
}

fn main() {
    let args = Args::parse();
    let level = match (args.quiet, args.verbosity) {
        (true, _) => log::LevelFilter::Off,
        (_, 0) => log::LevelFilter::Info,
        (_, 1) => log::LevelFilter::Debug,
        (_, _) => log::LevelFilter::Trace,
    };
    log::set_max_level(level);
    env_logger::builder().filter(None, level).target(env_logger::Target::Stderr).init();

    let fs = match mount(&args) {
        Ok(fs) => fs,
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    };
    let mut shell = shell::Shell::new(fs, args.hex);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", shell.path());
        io::stdout().flush().ok();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(error)) => {
                error!("Read stdin: {}", error);
                break;
            }
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse() {
            Ok(command) => command,
            Err(error) => {
                eprintln!("Error: {}", error);
                continue;
            }
        };
        match shell.execute(command) {
            Ok(true) => continue,
            Ok(false) => break,
            Err(error) => eprintln!("Error: {}", error),
        }
    }
}
