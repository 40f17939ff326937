//! Contains the [`Format`] and [`Writer`] traits and their implementations.
mod ris;

use crate::{
    ast::{Biblio, Work},
    Error,
};
pub use ris::Ris;

/// A textual representation that can be composed from a [`Biblio`].
///
/// Formats are promises at the type level about what a [`String`] (or similar) represents.
pub trait Format {
    /// Composes a [`Biblio`] to this [`Format`].
    ///
    /// This function should not fail as every [`Work`] has its fallbacks applied and every
    /// [`Format`] must be able to represent every [`Work`].
    fn compose(biblio: &Biblio) -> Self;

    /// Composes a single [`Work`] to a [`String`].
    fn compose_entry(work: &Work) -> String;

    /// The current [`Format`] in a raw [`String`].
    fn raw(self) -> String;

    /// The display name of the format.
    fn name() -> &'static str;

    /// The file extension associated with this format.
    fn ext() -> &'static str;
}

/// A trait for objects which are [`Format`]-oriented sinks.
///
/// Writers are defined by implementing the [`Writer::write`] method which writes a format to this given
/// writer.
///
/// Writers have a default implemention of [`Writer::write_ast`] for [`Biblio`] using the
/// [`Writer::write`] method.
pub trait Writer {
    /// The format associated with the writer.
    type Format: Format;

    /// Write a format into this writer.
    ///
    /// # Errors
    ///
    /// The call to write should only return an [`Err`] when writing to the writer cannot be
    /// completed.
    fn write(&mut self, format: Self::Format) -> Result<(), Error>;

    /// Write a [`Biblio`] into this writer using [`Format::compose`] from the [`Writer::Format`]
    /// associated type.
    ///
    /// # Errors
    ///
    /// The call to write should only return an [`Err`] when writing to the writer cannot be
    /// completed.
    fn write_ast(&mut self, ast: &Biblio) -> Result<(), Error> {
        let format = Self::Format::compose(ast);
        self.write(format)
    }
}
