#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # orcid_ris
//!
//! orcid_ris is a library which fetches a researcher's works from the public ORCID registry and
//! normalizes them into an in-memory model that can be composed into [`format::Format`]s such as
//! [`format::Ris`].
//!
//! ```no_run
//! use orcid_ris::{
//!     file::FormatFile,
//!     format::{Ris, Writer},
//!     Config,
//! };
//!
//! fn main() -> Result<(), orcid_ris::Error> {
//!     let config = Config::new("0000-0002-1825-0097".parse()?);
//!     let export = orcid_ris::export(&config)?;
//!
//!     FormatFile::<Ris>::create("orcid_export.ris")?.write_ast(export.biblio())
//! }
//! ```
//!
//! [`export_to_file`] does the same in one step.
//!
//! ```no_run
//! use orcid_ris::{format::Ris, Config};
//!
//! fn main() -> Result<(), orcid_ris::Error> {
//!     let config = Config::new("0000-0002-1825-0097".parse()?);
//!     let (export, file) = orcid_ris::export_to_file::<Ris, _>(&config, "orcid_export.ris")?;
//!
//!     println!("{} works saved to {}", export.biblio().len(), file.path().display());
//!     Ok(())
//! }
//! ```

mod api;
pub mod ast;
mod error;
mod export;
pub mod file;
pub mod format;

pub use api::orcid::PUBLIC_API_URL;
pub use error::{Error, ErrorKind};
pub use export::{Config, Export, Failure, FailurePolicy};

use std::path::Path;

use file::FormatFile;
use format::Format;
use log::trace;

type Client = reqwest::blocking::Client;

/// Export every work listed for the configured ORCID iD using the default HTTP client.
///
/// The works listing is fetched once and then each work is fetched in turn, in listing order.
/// A listing that cannot be fetched is treated as empty.
///
/// # Errors
///
/// An [`Err`] is returned when a work cannot be fetched or its response cannot be parsed and the
/// config uses [`FailurePolicy::Abort`]. With [`FailurePolicy::Skip`] such works are reported by
/// [`Export::failures`] instead.
#[inline]
pub fn export(config: &Config) -> Result<Export, Error> {
    trace!(
        "Export works of '{}' from '{}'",
        config.orcid(),
        config.api_url()
    );
    export::export_works::<Client>(config)
}

/// Export every work like [`export`] and write the composed document to `path`.
///
/// The file is created, or truncated, only after the export succeeds. See [`FormatFile::create`]
/// for how `path` is resolved.
///
/// # Errors
///
/// An [`Err`] is returned for the same reasons as [`export`], in which case no file is touched, or
/// when the file cannot be created or written.
#[inline]
pub fn export_to_file<F: Format, P: AsRef<Path>>(
    config: &Config,
    path: P,
) -> Result<(Export, FormatFile<F>), Error> {
    trace!("Export works of '{}' to '{}'", config.orcid(), path.as_ref().display());
    export::export_works_to_file::<Client, F, P>(config, path)
}
