// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn parse_known_variants() {
    assert_eq!(Capability::parse("builder"), Capability::Builder);
    assert_eq!(Capability::parse("scout"), Capability::Scout);
}

#[test]
fn parse_unknown_falls_back_to_custom() {
    assert_eq!(Capability::parse("archivist"), Capability::Custom("archivist".to_string()));
}

#[test]
fn only_builder_merger_custom_are_write_capable() {
    for cap in [Capability::Scout, Capability::Reviewer, Capability::Lead,
                Capability::Coordinator, Capability::Supervisor, Capability::Monitor] {
        assert!(!cap.is_write_capable(), "{cap:?} should not be write-capable");
    }
    assert!(Capability::Builder.is_write_capable());
    assert!(Capability::Merger.is_write_capable());
}

#[test]
fn display_round_trips_through_parse() {
    for cap in [Capability::Scout, Capability::Builder, Capability::Reviewer, Capability::Lead,
                Capability::Merger, Capability::Coordinator, Capability::Supervisor, Capability::Monitor] {
        assert_eq!(Capability::parse(&cap.to_string()), cap);
    }
}
