#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

use clap::{Args, Parser};
use eyre::{Context, Result};
use log::{error, info, trace};

const INPUT_FILE: &str = "ISBN_Input_File.txt";
const OUTPUT_FILE: &str = "output.csv";

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<()> {
    let Cli {
        input,
        output,
        global_opts: GlobalOpts { verbosity, quiet },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    trace!(
        "Reading ISBNs from '{}' and writing the report to '{}'",
        input.display(),
        output.display()
    );

    let rows = shelf::generate_report(&input, &output).wrap_err_with(|| {
        format!(
            "Cannot generate a report from '{}' to '{}'",
            input.display(),
            output.display()
        )
    })?;

    info!("{rows} rows written to '{}'", output.display());

    if !quiet {
        println!("CSV file generated successfully!");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new()
        .verbosity(verbosity)
        .init()
        .wrap_err("Cannot set up logging")
}

#[derive(Parser)]
#[clap(name = "shelf")]
#[clap(about = "Look up a file of ISBNs with Open Library and write the results to a csv report")]
#[clap(
    long_about = "Look up a file of ISBNs with Open Library and write the results to a csv report.\n\n\
                  Run without arguments to read `ISBN_Input_File.txt` and write `output.csv` in the \
                  current directory."
)]
#[clap(version, author)]
struct Cli {
    /// The file to read ISBNs from, ISBNs are separated by commas and/or new lines
    ///
    /// Without this option `ISBN_Input_File.txt` in the current directory is read.
    #[clap(short, long, parse(from_os_str), default_value = INPUT_FILE)]
    input: PathBuf,

    /// The file to write the report to, an existing file is overwritten
    ///
    /// Without this option the report is written to `output.csv` in the current directory.
    #[clap(short, long, parse(from_os_str), default_value = OUTPUT_FILE)]
    output: PathBuf,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long)]
    quiet: bool,
}
