// Inherited match conditions
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

//! Collection of the match conditions that apply to a `<match>`.
//!
//! In an fdi file,
//!   a `<match>` applies only if every enclosing `<match>` also applies.
//! An `InputClass` section has no nesting,
//!   so the conditions of enclosing elements must be flattened into the
//!   section itself.
//!
//! An enclosing `<match>` that declares settings of its own
//!   (see [`declares_options`])
//!   is converted into a section of its own,
//!     and its conditions,
//!       along with those of everything above it,
//!       are not inherited.

use crate::dom::{Document, NodeId};
use crate::options::{declares_options, MATCH_TAG};
use crate::resolve::{resolve, MatchCondition};
use tracing::debug;

/// Match conditions for `id` followed by those inherited from its
///   enclosing `<match>` elements,
///     nearest first.
///
/// Elements that do not resolve to a condition contribute nothing but do
///   not stop the walk.
pub fn inherited_matches(doc: &Document, id: NodeId) -> Vec<MatchCondition> {
    let mut matches = Vec::new();
    let mut cur = id;

    loop {
        match resolve(doc, cur) {
            Some(cond) => matches.push(cond),
            None => debug!("no InputClass equivalent for {cur:?}"),
        }

        match doc.parent(cur) {
            Some(parent) if inherits_from(doc, parent) => cur = parent,
            _ => break,
        }
    }

    matches
}

/// Whether conditions should be inherited from `parent`.
fn inherits_from(doc: &Document, parent: NodeId) -> bool {
    let is_match = doc
        .element(parent)
        .map_or(false, |el| el.name() == MATCH_TAG);

    is_match && !declares_options(doc, parent)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resolve::MatchKind::*;

    /// Walk from the first element whose `@key` is `key`.
    fn walk_from(src: &str, key: &str) -> Vec<MatchCondition> {
        let doc = Document::parse_str(src).unwrap();
        let start = doc
            .elements_named("match")
            .find(|&id| doc.element(id).unwrap().attr("key") == Some(key))
            .unwrap();

        inherited_matches(&doc, start)
    }

    #[test]
    fn collects_nearest_first() {
        let src = r#"
          <deviceinfo><device>
            <match key="info.capabilities" contains="input.keys">
              <match key="info.vendor" string="ACME">
                <match key="info.product" string="Board">
                  <merge key="input.x11_driver">kbd</merge>
                </match>
              </match>
            </match>
          </device></deviceinfo>"#;

        assert_eq!(
            vec![
                MatchCondition::new(Product, "Board"),
                MatchCondition::new(Vendor, "ACME"),
                MatchCondition::new(IsKeyboard, "yes"),
            ],
            walk_from(src, "info.product"),
        );
    }

    #[test]
    fn stops_at_ancestor_with_own_options() {
        let src = r#"
          <match key="info.capabilities" contains="input.mouse">
            <match key="info.vendor" string="ACME">
              <merge key="input.x11_driver">mouse</merge>
              <match key="info.product" string="Ball">
                <merge key="input.x11_options.Emulate3Buttons">on</merge>
              </match>
            </match>
          </match>"#;

        assert_eq!(
            vec![MatchCondition::new(Product, "Ball")],
            walk_from(src, "info.product"),
        );

        // The ancestor itself still sees the whole chain.
        assert_eq!(
            vec![
                MatchCondition::new(Vendor, "ACME"),
                MatchCondition::new(IsPointer, "yes"),
            ],
            walk_from(src, "info.vendor"),
        );
    }

    #[test]
    fn stops_at_non_match_parent() {
        let src = r#"
          <match key="info.vendor" string="Outer">
            <device>
              <match key="info.product" string="Inner">
                <merge key="input.x11_driver">evdev</merge>
              </match>
            </device>
          </match>"#;

        assert_eq!(
            vec![MatchCondition::new(Product, "Inner")],
            walk_from(src, "info.product"),
        );
    }

    #[test]
    fn unresolved_ancestors_are_passed_through() {
        let src = r#"
          <match key="info.vendor" string="ACME">
            <match key="info.linux.driver" string="psmouse">
              <match key="info.device" contains="mouse">
                <merge key="input.x11_driver">mouse</merge>
              </match>
            </match>
          </match>"#;

        assert_eq!(
            vec![
                MatchCondition::new(DevicePath, "*mouse*"),
                MatchCondition::new(Vendor, "ACME"),
            ],
            walk_from(src, "info.device"),
        );
    }

    #[test]
    fn nested_match_sibling_does_not_stop() {
        // Only merge elements scope settings;
        //   a sibling `<match>` with settings deeper down does not.
        let src = r#"
          <match key="info.vendor" string="ACME">
            <match key="info.product" string="Other">
              <merge key="input.x11_driver">evdev</merge>
            </match>
            <match key="info.device" contains="/dev/input/event">
              <merge key="input.x11_driver">evdev</merge>
            </match>
          </match>"#;

        assert_eq!(
            vec![
                MatchCondition::new(DevicePath, "/dev/input/event*"),
                MatchCondition::new(Vendor, "ACME"),
            ],
            walk_from(src, "info.device"),
        );
    }
}
