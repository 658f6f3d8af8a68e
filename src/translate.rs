// fdi to InputClass translation
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of fdi2iclass.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Translation of whole fdi documents.
//!
//! Every `<match>` in a document,
//!   at any depth,
//!   is a candidate for a section.
//! Those that declare a driver,
//!   remove one,
//!   or set driver options each produce one section holding their own
//!   condition and those inherited from enclosing elements
//!   (see [`crate::walk`]).
//! All other `<match>` elements contribute only by way of inheritance.
//!
//! A [`Translator`] may be fed any number of documents;
//!   section identifiers continue from one document to the next.
//! Sections of a single document are separated by a blank line.

use crate::dom::{Document, DomError};
use crate::fs::{Filesystem, LocalFilesystem};
use crate::options::{self, OptionError, MATCH_TAG};
use crate::section::SectionWriter;
use crate::walk::inherited_matches;
use std::fmt::Display;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Translates fdi documents into `InputClass` sections written to `W`.
pub struct Translator<W: Write, FS: Filesystem = LocalFilesystem> {
    writer: SectionWriter<W>,
    fs: FS,
}

impl<W: Write> Translator<W> {
    /// Translator reading from the local filesystem.
    pub fn new(out: W) -> Self {
        Self::with_filesystem(out, LocalFilesystem)
    }
}

impl<W: Write, FS: Filesystem> Translator<W, FS> {
    pub fn with_filesystem(out: W, fs: FS) -> Self {
        Self {
            writer: SectionWriter::new(out),
            fs,
        }
    }

    /// Load and translate the document at `path`,
    ///   returning the number of sections written.
    ///
    /// The document is loaded in full before anything is written,
    ///   so a document that cannot be parsed produces no output.
    pub fn translate_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<usize, TranslateError> {
        let path = path.as_ref();

        let file = self
            .fs
            .open(path)
            .map_err(|e| TranslateError::Read(path.into(), e))?;

        let doc = Document::from_reader(BufReader::new(file))
            .map_err(|e| TranslateError::Parse(path.into(), e))?;

        info!("loaded {}", path.display());

        self.translate_document(path, &doc)
    }

    /// Translate an already loaded document,
    ///   returning the number of sections written.
    ///
    /// `path` identifies the document in diagnostics.
    /// Sections written before an invalid `<match>` is encountered are
    ///   not retracted.
    pub fn translate_document(
        &mut self,
        path: &Path,
        doc: &Document,
    ) -> Result<usize, TranslateError> {
        let mut count = 0;

        for id in doc.elements_named(MATCH_TAG) {
            let bundle = options::extract(doc, id)
                .map_err(|e| TranslateError::Invalid(path.into(), e))?;

            if bundle.is_empty() {
                debug!("{}: no settings in {id:?}", path.display());
                continue;
            }

            if count > 0 {
                self.writer.write_separator()?;
            }

            let matches = inherited_matches(doc, id);
            let section = self.writer.write_section(&matches, &bundle)?;

            debug!(
                "{}: {id:?} became section {section} with {} condition(s)",
                path.display(),
                matches.len(),
            );

            count += 1;
        }

        Ok(count)
    }

    /// Identifier that the next section will receive.
    pub fn next_id(&self) -> usize {
        self.writer.next_id()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and yield the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer.into_inner())
    }
}

/// Failure to translate a document.
#[derive(Debug)]
pub enum TranslateError {
    /// Output could not be written.
    Write(io::Error),
    /// The input document could not be opened.
    Read(PathBuf, io::Error),
    /// The input document is not well-formed XML.
    Parse(PathBuf, DomError),
    /// The input document contains a `<match>` that cannot be translated.
    Invalid(PathBuf, OptionError),
}

impl From<io::Error> for TranslateError {
    fn from(e: io::Error) -> Self {
        Self::Write(e)
    }
}

impl Display for TranslateError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Write(e) => write!(fmt, "failed to write output: {e}"),
            Self::Read(path, e) => write!(fmt, "{}: {e}", path.display()),
            Self::Parse(path, e) => {
                write!(fmt, "{}: malformed XML: {e}", path.display())
            }
            Self::Invalid(path, e) => write!(fmt, "{}: {e}", path.display()),
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Write(e) | Self::Read(_, e) => Some(e),
            Self::Parse(_, e) => Some(e),
            Self::Invalid(_, e) => Some(e),
        }
    }
}
