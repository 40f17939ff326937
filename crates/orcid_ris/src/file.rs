//! Format supporting Filesystem operations.
//!
//! This module contains a file type that a composed [`Format`] can be written to.

use std::{
    fs::{File, OpenOptions},
    io::{Seek, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use crate::{
    format::{Format, Writer},
    Error, ErrorKind,
};

/// A reference to an open file on the filesystem which will hold textual content that matches
/// the generic [`Format`].
///
/// `FormatFile`s are automatically closed when they go out of scope. Errors detected on closing are
/// ignored by the implementation of `Drop`.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct FormatFile<F: Format> {
    file: File,
    path: PathBuf,
    _format: PhantomData<F>,
}

impl<F: Format> FormatFile<F> {
    const fn new(file: File, path: PathBuf) -> Self {
        Self {
            file,
            path,
            _format: PhantomData,
        }
    }

    /// Opens a format file in write mode.
    ///
    /// This function will create a file if it does not exist, and will truncate it if it does.
    /// When `path` has no extension the [`Format::ext`] of `F` is added.
    ///
    /// # Errors
    /// This function will return an error if the user lacks permissions to open or create the
    /// file, or a parent directory does not exist.
    ///
    /// # Examples
    /// ```no_run
    /// use orcid_ris::{
    ///     file::FormatFile,
    ///     format::Ris
    /// };
    ///
    /// fn main() -> Result<(), orcid_ris::Error> {
    ///     let f = FormatFile::<Ris>::create("orcid_export")?;
    ///     assert_eq!("orcid_export.ris", f.path().to_string_lossy());
    ///     Ok(())
    /// }
    ///
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let path_buf = if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(F::ext())
        };
        create_file_for_write(path_buf)
    }

    /// The path the file was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F: Format> Writer for FormatFile<F> {
    type Format = F;

    fn write(&mut self, format: F) -> Result<(), Error> {
        fn overrwrite_file_from_start(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
            // Rewind the cursor back to the start of the file to write over the contents and set
            // the length of the file to be equal to bytes so that existing data is removed
            log::trace!("rewind file cursor to start and write {} bytes", bytes.len());
            file.rewind()?;
            file.set_len(bytes.len() as u64)?;
            file.write_all(bytes)?;
            file.flush()
        }

        let bytes = format.raw().into_bytes();
        overrwrite_file_from_start(&mut self.file, &bytes).map_err(|e| {
            Error::wrap_with(
                ErrorKind::IO,
                e,
                format!("Cannot write {} to '{}'", F::name(), self.path.display()),
            )
        })
    }
}

#[inline]
fn create_file_for_write<F: Format>(path: PathBuf) -> Result<FormatFile<F>, Error> {
    match OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&path)
    {
        Ok(file) => Ok(FormatFile::new(file, path)),
        Err(e) => Err(Error::wrap_with(
            ErrorKind::IO,
            e,
            format!("Failed to create and open the '{}' file for writing", path.display()),
        )),
    }
}
