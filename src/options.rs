// Driver and option extraction
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

//! X11 driver and option settings of a `<match>` element.
//!
//! Within a `<match>`,
//!   HAL properties are modified by property merge elements
//!   (see [`MergeTag`]).
//! Two families of properties are of interest to the X server:
//!
//!   - [`DRIVER_KEY`] names the X input driver for the device;
//!       _removing_ it means that the X server should not bind the
//!       device at all; and
//!   - keys beginning with [`OPTION_PREFIX`] are passed to the driver as
//!       options named by the remainder of the key.
//!
//! All other properties are ignored.

use crate::dom::{Document, NodeId};
use std::fmt::Display;
use tracing::debug;

/// Tag name of a match condition element.
pub const MATCH_TAG: &str = "match";

/// HAL property selecting the X input driver.
pub const DRIVER_KEY: &str = "input.x11_driver";

/// Prefix of HAL properties that become X driver options.
pub const OPTION_PREFIX: &str = "input.x11_options.";

/// Property merge element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeTag {
    AddSet,
    Merge,
    Append,
    Remove,
}

impl MergeTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "addset" => Some(Self::AddSet),
            "merge" => Some(Self::Merge),
            "append" => Some(Self::Append),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddSet => "addset",
            Self::Merge => "merge",
            Self::Append => "append",
            Self::Remove => "remove",
        }
    }
}

impl Display for MergeTag {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "<{}>", self.as_str())
    }
}

/// Driver assignment and options declared by a single `<match>`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptionBundle {
    /// X input driver,
    ///   or empty if none was assigned.
    pub driver: String,
    /// Whether the driver assignment was removed.
    pub ignore: bool,
    /// Driver options `(name, value)` in declaration order.
    pub options: Vec<(String, String)>,
}

impl OptionBundle {
    /// Whether this bundle has nothing to contribute to a section.
    pub fn is_empty(&self) -> bool {
        self.driver.is_empty() && !self.ignore && self.options.is_empty()
    }
}

/// Whether any direct child of `id` is a property merge element.
///
/// Such an element scopes its own settings.
/// Only direct children are considered.
pub fn declares_options(doc: &Document, id: NodeId) -> bool {
    doc.child_elements(id)
        .any(|(_, el)| MergeTag::from_name(el.name()).is_some())
}

/// Extract the [`OptionBundle`] from the direct children of `id`.
///
/// Nested `<match>` elements are skipped;
///   every other child must be a property merge element,
///     and its content must be text.
pub fn extract(
    doc: &Document,
    id: NodeId,
) -> Result<OptionBundle, OptionError> {
    let mut bundle = OptionBundle::default();

    for (child, el) in doc.child_elements(id) {
        if el.name() == MATCH_TAG {
            continue;
        }

        let tag = MergeTag::from_name(el.name()).ok_or_else(|| {
            OptionError::UnexpectedTag(el.name().to_string())
        })?;

        let key = match el.attr("key") {
            Some(key) => key,
            None => {
                debug!("skipping {tag} without a key");
                continue;
            }
        };

        let value = doc.text(child).ok_or_else(|| {
            OptionError::NonTextContent(tag, key.to_string())
        })?;

        match (tag, key) {
            (MergeTag::Remove, DRIVER_KEY) => bundle.ignore = true,
            (_, DRIVER_KEY) => bundle.driver = value,
            _ => match key.strip_prefix(OPTION_PREFIX) {
                Some(name) => bundle.options.push((name.to_string(), value)),
                None => debug!("ignoring {tag} of unrelated key `{key}`"),
            },
        }
    }

    Ok(bundle)
}

/// Malformed `<match>` content.
///
/// These are conditions that the converter is not prepared to interpret
///   and so cannot be skipped without risking an incorrect translation.
#[derive(Debug, PartialEq, Eq)]
pub enum OptionError {
    /// A child of `<match>` that is neither a `<match>` nor a property
    ///   merge element.
    UnexpectedTag(String),
    /// A property merge element containing elements rather than a plain
    ///   text value.
    NonTextContent(MergeTag, String),
}

impl Display for OptionError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag(name) => {
                write!(fmt, "unexpected element `<{name}>` within `<match>`")
            }
            Self::NonTextContent(tag, key) => {
                write!(fmt, "{tag} of key `{key}` must contain only text")
            }
        }
    }
}

impl std::error::Error for OptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
