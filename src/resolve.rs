// Match condition resolution
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

//! Translation of a single fdi `<match>` element into an `InputClass`
//!   match entry.
//!
//! An fdi `<match>` tests one HAL property (its `@key`) against a value
//!   given by exactly one of several comparison attributes.
//! Only a handful of properties have an `InputClass` counterpart;
//!   see [`MatchKind::from_key`].
//!
//! The comparison attribute determines how the value is rendered:
//!
//!   - `@string` is taken literally;
//!   - `@contains` is a substring test,
//!       which becomes a glob for device paths;
//!   - `@string_outof` is a `;`-delimited list of alternatives,
//!       which becomes a `|`-delimited alternation; and
//!   - `@contains_outof` is a `;`-delimited list of substrings,
//!       each rendered as `@contains` would be and then `|`-joined.
//!
//! The `info.capabilities` property is special:
//!   it is a list of strings,
//!     and a `@contains` test against it asks whether the device has a
//!     given capability.
//! Those capabilities that `InputClass` understands are mapped onto their
//!   own boolean match kinds with a value of `yes`.
//!
//! ```
//! use fdi2iclass::dom::Document;
//! use fdi2iclass::resolve::{resolve, MatchCondition, MatchKind};
//!
//! let doc = Document::parse_str(
//!     r#"<match key="info.capabilities" contains="input.mouse"/>"#,
//! ).unwrap();
//!
//! assert_eq!(
//!     Some(MatchCondition::new(MatchKind::IsPointer, "yes")),
//!     resolve(&doc, doc.root()),
//! );
//! ```

use crate::dom::{Document, Element, NodeId};
use std::fmt::Display;

/// HAL property holding the capability list of a device.
pub const CAPABILITIES_KEY: &str = "info.capabilities";

/// PnP IDs shorter than this are manufacturer prefixes and are matched
///   as such.
const PNP_ID_LEN: usize = 7;

/// `InputClass` match entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Product,
    Vendor,
    DevicePath,
    OS,
    PnPID,
    IsKeyboard,
    IsPointer,
    IsJoystick,
    IsTablet,
    IsTouchpad,
    IsTouchscreen,
}

impl MatchKind {
    /// Match kind for the HAL property `key`,
    ///   if `InputClass` has an equivalent.
    pub fn from_key(key: &str) -> Option<Self> {
        use MatchKind::*;

        match key {
            "info.product" | "input.product" => Some(Product),
            "info.vendor" | "input.vendor" => Some(Vendor),
            "info.device" | "linux.device_file" => Some(DevicePath),
            "/org/freedesktop/Hal/devices/computer:system.kernel.name" => {
                Some(OS)
            }
            "@info.parent:pnp.id" => Some(PnPID),
            _ => None,
        }
    }

    /// Boolean match kind for the HAL capability `cap`,
    ///   if `InputClass` has an equivalent.
    pub fn from_capability(cap: &str) -> Option<Self> {
        use MatchKind::*;

        match cap {
            "input.keys" | "input.keyboard" | "input.keypad" => {
                Some(IsKeyboard)
            }
            "input.mouse" => Some(IsPointer),
            "input.joystick" => Some(IsJoystick),
            "input.tablet" => Some(IsTablet),
            "input.touchpad" => Some(IsTouchpad),
            "input.touchscreen" => Some(IsTouchscreen),
            _ => None,
        }
    }

    /// Entry name as written in an `InputClass` section.
    pub fn as_str(&self) -> &'static str {
        use MatchKind::*;

        match self {
            Product => "MatchProduct",
            Vendor => "MatchVendor",
            DevicePath => "MatchDevicePath",
            OS => "MatchOS",
            PnPID => "MatchPnPID",
            IsKeyboard => "MatchIsKeyboard",
            IsPointer => "MatchIsPointer",
            IsJoystick => "MatchIsJoystick",
            IsTablet => "MatchIsTablet",
            IsTouchpad => "MatchIsTouchpad",
            IsTouchscreen => "MatchIsTouchscreen",
        }
    }
}

impl Display for MatchKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// A single `InputClass` match entry.
///
/// The value is never empty;
///   see [`MatchCondition::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCondition {
    kind: MatchKind,
    value: String,
}

impl MatchCondition {
    /// Create a condition from a known non-empty value.
    ///
    /// Use [`MatchCondition::try_new`] for values of unknown provenance.
    pub fn new<S: Into<String>>(kind: MatchKind, value: S) -> Self {
        let value = value.into();
        debug_assert!(!value.is_empty(), "empty match condition value");

        Self { kind, value }
    }

    /// Create a condition,
    ///   or [`None`] if `value` is empty.
    pub fn try_new<S: Into<String>>(
        kind: MatchKind,
        value: S,
    ) -> Option<Self> {
        let value = value.into();

        (!value.is_empty()).then(|| Self { kind, value })
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// What the `@key` of a `<match>` tests,
///   before its comparison value is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    Property(MatchKind),
    Capabilities,
}

impl Subject {
    fn from_key(key: &str) -> Option<Self> {
        match MatchKind::from_key(key) {
            Some(kind) => Some(Self::Property(kind)),
            None if key == CAPABILITIES_KEY => Some(Self::Capabilities),
            None => None,
        }
    }
}

/// Resolve the `<match>` element `id` into a match condition.
///
/// Yields [`None`] if the element tests a property with no `InputClass`
///   equivalent,
///     tests an unknown capability,
///     or would produce an empty value.
/// `id` is expected to be a `<match>` element,
///   but its name is not checked.
pub fn resolve(doc: &Document, id: NodeId) -> Option<MatchCondition> {
    let el = doc.element(id)?;
    let subject = Subject::from_key(el.attr("key")?)?;

    let (kind, value) = match subject {
        Subject::Property(kind) => (kind, property_value(kind, el)?),
        Subject::Capabilities => capability(el)?,
    };

    MatchCondition::try_new(kind, value)
}

/// Value of a property test from the first comparison attribute present.
fn property_value(kind: MatchKind, el: &Element) -> Option<String> {
    if let Some(value) = el.attr("string") {
        Some(value.to_string())
    } else if let Some(value) = el.attr("contains") {
        Some(match kind {
            MatchKind::DevicePath => device_glob(value),
            _ => value.to_string(),
        })
    } else if let Some(value) = el.attr("string_outof") {
        Some(value.replace(';', "|"))
    } else if let Some(values) = el.attr("contains_outof") {
        Some(
            values
                .split(';')
                .map(|value| match kind {
                    MatchKind::DevicePath => device_glob(value),
                    MatchKind::PnPID
                        if value.chars().count() < PNP_ID_LEN =>
                    {
                        format!("{value}*")
                    }
                    _ => value.to_string(),
                })
                .fold(String::new(), alternate),
        )
    } else {
        None
    }
}

/// Boolean match for an `info.capabilities` test.
///
/// Only a `@contains` test is meaningful for the capability list;
///   a capability that is tested by any other comparison attribute does
///   not produce a match,
///     even if a later attribute would.
fn capability(el: &Element) -> Option<(MatchKind, String)> {
    if el.attr("string").is_some() {
        return None;
    }

    let kind = MatchKind::from_capability(el.attr("contains")?)?;

    Some((kind, "yes".into()))
}

/// Convert a device path substring into a glob.
///
/// Absolute paths are anchored at their start;
///   anything else may appear anywhere in the path.
pub fn device_glob(path: &str) -> String {
    if path.starts_with('/') {
        format!("{path}*")
    } else {
        format!("*{path}*")
    }
}

/// Append `value` as an alternative to `acc`.
///
/// An empty accumulator is replaced outright rather than producing a
///   leading `|`.
fn alternate(acc: String, value: String) -> String {
    if acc.is_empty() {
        value
    } else {
        acc + "|" + &value
    }
}

#[cfg(test)]
mod test;
