use std::path::Path;

use log::{info, trace, warn};

use crate::{
    api::{orcid, Client},
    ast::{Biblio, OrcidId, PutCode},
    file::FormatFile,
    format::{Format, Writer},
    Error,
};

/// What to do when a single work cannot be fetched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the export and return the error. Works fetched so far are discarded.
    #[default]
    Abort,
    /// Record the failure and continue with the next work.
    Skip,
}

/// Everything a single export run needs to know.
#[derive(Clone, Debug)]
pub struct Config {
    orcid: OrcidId,
    api_url: String,
    policy: FailurePolicy,
}

impl Config {
    /// A config for the public registry that aborts on the first failed work.
    #[must_use]
    pub fn new(orcid: OrcidId) -> Self {
        Self {
            orcid,
            api_url: orcid::PUBLIC_API_URL.to_owned(),
            policy: FailurePolicy::default(),
        }
    }

    /// Use another registry API base, such as the sandbox.
    #[must_use]
    pub fn with_api_url<S: Into<String>>(mut self, api_url: S) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Choose what happens when a single work cannot be fetched.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The researcher whose works are exported.
    #[must_use]
    pub const fn orcid(&self) -> &OrcidId {
        &self.orcid
    }

    /// The registry API base URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// A work that could not be fetched while exporting with [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct Failure {
    /// The work that was left out.
    pub put_code: PutCode,
    /// Why fetching it failed.
    pub error: Error,
}

/// The result of an export run.
#[derive(Debug)]
pub struct Export {
    biblio: Biblio,
    failures: Vec<Failure>,
}

impl Export {
    /// Works in listing order.
    #[must_use]
    pub const fn biblio(&self) -> &Biblio {
        &self.biblio
    }

    /// Works that were skipped, always empty with [`FailurePolicy::Abort`].
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Splits the export into its works and its failures.
    #[must_use]
    pub fn into_parts(self) -> (Biblio, Vec<Failure>) {
        (self.biblio, self.failures)
    }
}

pub(crate) fn export_works<C: Client>(config: &Config) -> Result<Export, Error> {
    let put_codes = orcid::get_put_codes::<C>(&config.api_url, &config.orcid);
    let total = put_codes.len();

    let mut biblio = Biblio::default();
    let mut failures = Vec::new();

    // one request at a time, in listing order
    for (i, put_code) in put_codes.into_iter().enumerate() {
        trace!("Work {} of {total}", i + 1);
        match orcid::get_work_record::<C>(&config.api_url, &config.orcid, &put_code) {
            Ok(record) => biblio.insert(record.build(put_code)),
            Err(error) => match config.policy {
                FailurePolicy::Abort => {
                    return Err(Error::wrap_with(
                        error.kind(),
                        error,
                        format!("Cannot fetch work '{put_code}'"),
                    ));
                }
                FailurePolicy::Skip => {
                    warn!("Skipping work '{put_code}': {error}");
                    failures.push(Failure { put_code, error });
                }
            },
        }
    }

    info!(
        "Exported {} of {total} works for ORCID iD '{}'",
        biblio.len(),
        config.orcid
    );
    Ok(Export { biblio, failures })
}

pub(crate) fn export_works_to_file<C, F, P>(
    config: &Config,
    path: P,
) -> Result<(Export, FormatFile<F>), Error>
where
    C: Client,
    F: Format,
    P: AsRef<Path>,
{
    // the file is only opened once every work is in hand
    let export = export_works::<C>(config)?;
    let mut file = FormatFile::<F>::create(path)?;
    file.write_ast(export.biblio())?;
    Ok((export, file))
}
