use clap::{Arg, ArgAction, Command as ClapCommand};
use env_logger::Env;
use log::{error, LevelFilter};
use std::path::Path;
use std::process;

use tiffpages::commands::{CommandFactory, TiffpagesCommandFactory};
use tiffpages::utils::logger::Logger;

fn cli() -> ClapCommand {
    ClapCommand::new("tiffpages")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split, merge and conformance-test multi-page TIFF files")
        .subcommand_required(true)
        .arg(
            Arg::new("backend")
                .short('b')
                .long("backend")
                .help("Codec backend (container, raster, tools; conform also accepts all)")
                .value_name("NAME")
                .default_value("container")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log output to this file")
                .value_name("FILE")
                .global(true),
        )
        .subcommand(
            ClapCommand::new("split")
                .about("Write every page of a TIFF to its own file")
                .arg(Arg::new("input").help("Input TIFF file").required(true).index(1))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_name("DIR"),
                ),
        )
        .subcommand(
            ClapCommand::new("merge")
                .about("Combine TIFF files into one multi-page TIFF")
                .arg(
                    Arg::new("inputs")
                        .help("Input TIFF files, in page order")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output TIFF file")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(
                    Arg::new("compression")
                        .short('c')
                        .long("compression")
                        .help("Compression for every page (preserve, none, lzw, deflate, packbits, zstd, ...)")
                        .value_name("NAME"),
                ),
        )
        .subcommand(
            ClapCommand::new("inspect")
                .about("Show the page structure of a TIFF file")
                .arg(Arg::new("input").help("Input TIFF file").required(true).index(1)),
        )
        .subcommand(
            ClapCommand::new("conform")
                .about("Run the conformance suites over a TIFF corpus")
                .arg(
                    Arg::new("corpus")
                        .long("corpus")
                        .help("Corpus root directory")
                        .value_name("DIR"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Artifact root directory")
                        .value_name("DIR"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Harness configuration file")
                        .value_name("FILE"),
                )
                .arg(
                    Arg::new("capabilities")
                        .long("capabilities")
                        .help("Capability table replacing the built-in one")
                        .value_name("FILE"),
                )
                .arg(
                    Arg::new("junit")
                        .long("junit")
                        .help("Write a JUnit XML report")
                        .value_name("FILE"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Hide progress bars")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(Path::new(log_file), level) {
                eprintln!("Error setting up logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str().to_lowercase()))
                .format_timestamp(None)
                .init();
        }
    }

    let factory = TiffpagesCommandFactory::new();
    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
