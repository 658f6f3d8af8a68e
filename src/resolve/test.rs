// Tests for match condition resolution
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

use super::*;
use super::MatchKind::*;

/// Resolve a lone `<match>` element with the given attributes.
fn resolve_attrs(attrs: &str) -> Option<MatchCondition> {
    let doc = Document::parse_str(&format!("<match {attrs}/>")).unwrap();
    resolve(&doc, doc.root())
}

fn expect(kind: MatchKind, value: &str) -> Option<MatchCondition> {
    Some(MatchCondition::new(kind, value))
}

#[test]
fn literal_string() {
    assert_eq!(
        expect(Vendor, "ACME"),
        resolve_attrs(r#"key="info.vendor" string="ACME""#),
    );
    assert_eq!(
        expect(Product, "Mouse"),
        resolve_attrs(r#"key="input.product" string="Mouse""#),
    );
}

#[test]
fn os_key() {
    assert_eq!(
        expect(OS, "Linux"),
        resolve_attrs(
            r#"key="/org/freedesktop/Hal/devices/computer:system.kernel.name"
               string="Linux""#
        ),
    );
}

#[test]
fn device_path_contains_is_unanchored_glob() {
    assert_eq!(
        expect(DevicePath, "*usb-mouse*"),
        resolve_attrs(r#"key="info.device" contains="usb-mouse""#),
    );
}

#[test]
fn device_path_contains_absolute_is_anchored() {
    assert_eq!(
        expect(DevicePath, "/dev/input/mouse0*"),
        resolve_attrs(
            r#"key="linux.device_file" contains="/dev/input/mouse0""#
        ),
    );
}

#[test]
fn contains_other_kinds_is_verbatim() {
    assert_eq!(
        expect(Product, "Touch"),
        resolve_attrs(r#"key="info.product" contains="Touch""#),
    );
}

#[test]
fn string_outof_becomes_alternation() {
    assert_eq!(
        expect(Vendor, "ACME|Initech|Globex"),
        resolve_attrs(
            r#"key="info.vendor" string_outof="ACME;Initech;Globex""#
        ),
    );
}

#[test]
fn contains_outof_pnp_suffixes_short_ids() {
    assert_eq!(
        expect(PnPID, "A*|BB*|CCCCCCC"),
        resolve_attrs(
            r#"key="@info.parent:pnp.id" contains_outof="A;BB;CCCCCCC""#
        ),
    );
}

#[test]
fn contains_outof_device_paths_are_globs() {
    assert_eq!(
        expect(DevicePath, "*event*|/dev/input/js*"),
        resolve_attrs(
            r#"key="info.device" contains_outof="event;/dev/input/js""#
        ),
    );
}

#[test]
fn contains_outof_other_kinds_are_joined() {
    assert_eq!(
        expect(Product, "Pad|Stick"),
        resolve_attrs(r#"key="info.product" contains_outof="Pad;Stick""#),
    );
}

#[test]
fn string_takes_priority_over_later_attributes() {
    assert_eq!(
        expect(DevicePath, "/dev/input/event0"),
        resolve_attrs(
            r#"key="info.device" contains="mouse"
               string="/dev/input/event0""#
        ),
    );
}

#[test]
fn capability_maps_to_boolean_kind() {
    assert_eq!(
        expect(IsPointer, "yes"),
        resolve_attrs(r#"key="info.capabilities" contains="input.mouse""#),
    );

    for cap in ["input.keys", "input.keyboard", "input.keypad"] {
        assert_eq!(
            expect(IsKeyboard, "yes"),
            resolve_attrs(&format!(
                r#"key="info.capabilities" contains="{cap}""#
            )),
        );
    }

    assert_eq!(
        expect(IsTouchscreen, "yes"),
        resolve_attrs(
            r#"key="info.capabilities" contains="input.touchscreen""#
        ),
    );
}

#[test]
fn unknown_capability_yields_nothing() {
    assert_eq!(
        None,
        resolve_attrs(r#"key="info.capabilities" contains="input.switch""#),
    );
}

#[test]
fn capability_without_contains_yields_nothing() {
    assert_eq!(
        None,
        resolve_attrs(r#"key="info.capabilities" string="input.mouse""#),
    );
    assert_eq!(
        None,
        resolve_attrs(
            r#"key="info.capabilities" contains_outof="input.mouse;input.keys""#
        ),
    );
}

#[test]
fn unknown_key_yields_nothing() {
    assert_eq!(
        None,
        resolve_attrs(r#"key="info.linux.driver" string="psmouse""#),
    );
}

#[test]
fn missing_key_yields_nothing() {
    assert_eq!(None, resolve_attrs(r#"string="ACME""#));
}

#[test]
fn missing_value_yields_nothing() {
    assert_eq!(None, resolve_attrs(r#"key="info.vendor""#));
}

#[test]
fn empty_value_yields_nothing() {
    assert_eq!(None, resolve_attrs(r#"key="info.vendor" string="""#));
}

#[test]
fn match_kind_names() {
    assert_eq!("MatchPnPID", PnPID.to_string());
    assert_eq!("MatchIsTouchpad", IsTouchpad.as_str());
}
