// Light filesystem abstractions
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

//! Lightweight filesystem abstraction.
//!
//! Input documents are opened through a [`Filesystem`] so that
//!   [`Translator`](crate::translate::Translator) can be driven by
//!   something other than the local disk.
//! It makes no attempt to be comprehensive.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Source of input files by path.
pub trait Filesystem {
    type File: Read;

    fn open(&mut self, path: &Path) -> io::Result<Self::File>;
}

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    type File = fs::File;

    fn open(&mut self, path: &Path) -> io::Result<Self::File> {
        fs::File::open(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn local_missing_file() {
        let result = LocalFilesystem.open(Path::new("does/not/exist.fdi"));

        assert_eq!(
            io::ErrorKind::NotFound,
            result.map(|_| ()).unwrap_err().kind()
        );
    }

    #[test]
    fn local_reads_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let mut buf = String::new();

        LocalFilesystem
            .open(&path)
            .unwrap()
            .read_to_string(&mut buf)
            .unwrap();

        assert!(buf.contains("fdi2iclass"));
    }
}
