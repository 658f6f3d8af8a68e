// fdi to InputClass converter
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

//! Conversion of HAL device information files (fdi) into X server
//!   `InputClass` configuration sections.
//!
//! HAL policy files describe input devices as nested `<match>` elements,
//!   each testing a single device property,
//!   with property merges that select an X driver and its options.
//! The X server's `InputClass` sections express the same idea as a flat
//!   list of match entries followed by a driver and options.
//!
//! The conversion is a single pass over each document:
//!
//!   1. [`dom`] loads the document into a tree;
//!   2. [`options`] finds the `<match>` elements that carry X settings;
//!   3. [`walk`] gathers the conditions of each such element and of those
//!        enclosing it,
//!          using [`resolve`] to translate each condition; and
//!   4. [`section`] renders the result.
//!
//! [`translate`] ties these together.

pub mod dom;
pub mod fs;
pub mod options;
pub mod resolve;
pub mod section;
pub mod translate;
pub mod walk;
