use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use regnie::LineEnding;

mod commands;
mod logging;

/// Convert REGNIE precipitation rasters to GIS-ready CSV
///
/// Without a subcommand, converts RASTER to `<name>_full.csv` (LAT,LON,ID,VAL)
/// or, with -j, to `<name>_join.csv` (ID,VAL) next to the input file.
/// A raster named like a subcommand is converted with `regnie2csv -- <RASTER>`.
#[derive(Parser)]
#[command(name = "regnie2csv")]
#[command(author, version, about)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Args)]
struct ConvertArgs {
    /// REGNIE raster file
    raster: Option<PathBuf>,

    /// Write all cells, missing values as -1 (larger output file)
    #[arg(short, long)]
    all: bool,

    /// Write a small ID,VAL file for joining with a REGNIE polygon shapefile
    #[arg(short, long)]
    join: bool,

    /// Output file (derived from the raster name if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Row terminator of the raster: auto, lf or crlf
    #[arg(long, env = "REGNIE_LINE_ENDING", default_value = "auto")]
    line_ending: LineEnding,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a REGNIE raster
    Info {
        /// REGNIE raster file
        raster: PathBuf,
    },

    /// Print the value of a single cell
    Query {
        /// REGNIE raster file
        raster: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long, requires = "lon", conflicts_with_all = ["row", "col"])]
        lat: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long, requires = "lat")]
        lon: Option<f64>,

        /// Row index (1 = north)
        #[arg(long, requires = "col")]
        row: Option<usize>,

        /// Column index (1 = west)
        #[arg(long, requires = "row", conflicts_with = "lon")]
        col: Option<usize>,

        /// Output result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Info { raster }) => commands::info::run(raster),
        Some(Commands::Query {
            raster,
            lat,
            lon,
            row,
            col,
            json,
        }) => commands::query::run(raster, lat, lon, row, col, json),
        None => {
            let args = cli.convert;
            let Some(raster) = args.raster else {
                Cli::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "a REGNIE raster file is required",
                    )
                    .exit();
            };
            commands::convert::run(
                raster,
                args.all,
                args.join,
                args.output,
                args.line_ending,
                args.quiet,
            )
        }
    }
}
