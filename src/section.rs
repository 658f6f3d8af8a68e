// InputClass section output
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

//! `InputClass` section rendering.
//!
//! Each section is given an identifier of the form `Converted Class N`,
//!   where `N` is allocated by [`SectionWriter`] starting at `1`.
//! Values are written verbatim;
//!   no attempt is made to escape quotes.

use crate::options::OptionBundle;
use crate::resolve::MatchCondition;
use std::fmt::Display;
use std::io::{self, Write};

/// A single `InputClass` section ready to be rendered.
#[derive(Debug, PartialEq, Eq)]
pub struct Section<'a> {
    pub id: usize,
    pub matches: &'a [MatchCondition],
    pub bundle: &'a OptionBundle,
}

impl<'a> Display for Section<'a> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let OptionBundle {
            driver,
            ignore,
            options,
        } = self.bundle;

        writeln!(fmt, "Section \"InputClass\"")?;
        writeln!(fmt, "\tIdentifier \"Converted Class {}\"", self.id)?;

        for cond in self.matches {
            writeln!(fmt, "\t{} \"{}\"", cond.kind(), cond.value())?;
        }

        if !driver.is_empty() {
            writeln!(fmt, "\tDriver \"{driver}\"")?;
        }

        if *ignore {
            writeln!(fmt, "\tOption \"Ignore\" \"yes\"")?;
        }

        for (name, value) in options {
            writeln!(fmt, "\tOption \"{name}\" \"{value}\"")?;
        }

        writeln!(fmt, "EndSection")
    }
}

/// Writes numbered sections to `W`.
///
/// Section identifiers are allocated for the lifetime of the writer,
///   so that sections from any number of input documents never share an
///   identifier.
pub struct SectionWriter<W: Write> {
    out: W,
    next_id: usize,
}

impl<W: Write> SectionWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, next_id: 1 }
    }

    /// Identifier that will be given to the next section.
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    /// Render a section and allocate its identifier,
    ///   returning that identifier.
    pub fn write_section(
        &mut self,
        matches: &[MatchCondition],
        bundle: &OptionBundle,
    ) -> io::Result<usize> {
        let id = self.next_id;

        write!(
            self.out,
            "{}",
            Section {
                id,
                matches,
                bundle
            }
        )?;

        self.next_id += 1;
        Ok(id)
    }

    /// Blank line between two sections.
    pub fn write_separator(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
