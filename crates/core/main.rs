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

use orcid_ris as lib;

use lib::{ast::OrcidId, format::Ris, Config, FailurePolicy};

use clap::{ArgEnum, Parser};
use log::{error, info, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let cli = Cli::parse();

    setup_errlog(cli.verbosity as usize, cli.quiet)?;

    let config = Config::new(cli.orcid)
        .with_api_url(cli.api_url)
        .with_policy(cli.on_error.into());
    trace!("Exporting with {:?}", config);

    let (export, file) = lib::export_to_file::<Ris, _>(&config, &cli.output)?;
    info!(
        "{} works written to '{}', {} left out",
        export.biblio().len(),
        file.path().display(),
        export.failures().len()
    );

    if !cli.quiet {
        println!("RIS file saved as '{}'", file.path().display());
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "orcid-ris")]
#[clap(about = "Export the works of an ORCID record to a RIS file for reference managers")]
#[clap(version, author)]
struct Cli {
    /// The researcher's ORCID iD, e.g. 0000-0002-1825-0097 or https://orcid.org/0000-0002-1825-0097
    #[clap(env = "ORCID_ID")]
    orcid: OrcidId,

    /// The file the RIS entries are written to, replacing any existing content
    #[clap(
        short,
        long,
        parse(from_os_str),
        default_value = "orcid_export.ris"
    )]
    output: PathBuf,

    /// What to do when a single work cannot be fetched
    #[clap(long, arg_enum, default_value = "abort")]
    on_error: OnError,

    /// Base URL of the ORCID API, such as the sandbox registry
    #[clap(long, env = "ORCID_API_URL", default_value = lib::PUBLIC_API_URL)]
    api_url: String,

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

#[derive(ArgEnum, Clone, Copy, Debug)]
enum OnError {
    /// Stop at the first work that cannot be fetched and write nothing
    Abort,
    /// Leave out works that cannot be fetched and export the rest
    Skip,
}

impl From<OnError> for FailurePolicy {
    fn from(on_error: OnError) -> Self {
        match on_error {
            OnError::Abort => Self::Abort,
            OnError::Skip => Self::Skip,
        }
    }
}
