//! Marker-delimited regions inside generated files.
//!
//! A region is everything between a `// region: <name>` line and the matching
//! `// endregion: <name>` line. Regions let hand-written code live inside a
//! generated file and survive regeneration: the generator renders a fresh
//! template and [`merge`] copies the bodies of the old file's regions into it.

use crate::error::RegionError;
use std::ops::Range;

pub const OPEN_MARKER: &str = "// region:";
pub const CLOSE_MARKER: &str = "// endregion:";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region<'a> {
    pub name: &'a str,
    pub body: &'a str,
    span: Range<usize>,
}

pub fn open_marker(name: &str) -> String {
    format!("{} {}", OPEN_MARKER, name)
}

pub fn close_marker(name: &str) -> String {
    format!("{} {}", CLOSE_MARKER, name)
}

/// Regions of `source` in file order.
pub fn parse(source: &str) -> Result<Vec<Region<'_>>, RegionError> {
    let mut regions: Vec<Region> = Vec::new();
    let mut open: Option<(&str, usize)> = None;
    let mut offset = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += line.len();
        let line_number = index + 1;
        let trimmed = line.trim();

        if let Some(name) = trimmed.strip_prefix(OPEN_MARKER) {
            let name = name.trim();

            if let Some((outer, _)) = open {
                return Err(RegionError::Nested {
                    outer: outer.to_string(),
                    inner: name.to_string(),
                    line: line_number,
                });
            }
            if regions.iter().any(|region| region.name == name) {
                return Err(RegionError::Duplicate {
                    name: name.to_string(),
                    line: line_number,
                });
            }

            open = Some((name, offset));
        } else if let Some(name) = trimmed.strip_prefix(CLOSE_MARKER) {
            let name = name.trim();

            match open.take() {
                Some((current, body_start)) if current == name => regions.push(Region {
                    name,
                    body: &source[body_start..line_start],
                    span: body_start..line_start,
                }),
                Some((current, _)) => {
                    return Err(RegionError::Mismatched {
                        expected: current.to_string(),
                        found: name.to_string(),
                        line: line_number,
                    })
                }
                None => {
                    return Err(RegionError::Unopened {
                        name: name.to_string(),
                        line: line_number,
                    })
                }
            }
        }
    }

    match open {
        Some((name, _)) => Err(RegionError::Unterminated(name.to_string())),
        None => Ok(regions),
    }
}

/// `template` with each region body replaced by the body of the same-named
/// region in `existing`. Template regions missing from `existing` keep their
/// default body.
pub fn merge(template: &str, existing: &str) -> Result<String, RegionError> {
    let preserved = parse(existing)?;
    if preserved.is_empty() {
        return Err(RegionError::NoRegions);
    }

    let slots = parse(template)?;
    if let Some(orphan) = preserved
        .iter()
        .find(|region| !slots.iter().any(|slot| slot.name == region.name))
    {
        return Err(RegionError::Orphaned(orphan.name.to_string()));
    }

    let mut merged = String::with_capacity(template.len() + existing.len());
    let mut cursor = 0;

    for slot in &slots {
        merged.push_str(&template[cursor..slot.span.start]);

        let body = preserved
            .iter()
            .find(|region| region.name == slot.name)
            .map_or(slot.body, |region| region.body);
        merged.push_str(body);

        cursor = slot.span.end;
    }
    merged.push_str(&template[cursor..]);

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "pub struct A;\n// region: custom\n// default\n// endregion: custom\n";

    #[test]
    fn parses_region_bodies() {
        let source = "x\n  // region: one\nfn a() {}\n// endregion: one\n// region: two\n// endregion: two\n";
        let regions = parse(source).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "one");
        assert_eq!(regions[0].body, "fn a() {}\n");
        assert_eq!(regions[1].name, "two");
        assert_eq!(regions[1].body, "");
    }

    #[test]
    fn file_without_markers_has_no_regions() {
        assert!(parse("pub struct A;\n").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_markers() {
        assert_eq!(
            parse("// region: a\n").unwrap_err(),
            RegionError::Unterminated("a".into())
        );
        assert_eq!(
            parse("// endregion: a\n").unwrap_err(),
            RegionError::Unopened { name: "a".into(), line: 1 }
        );
        assert_eq!(
            parse("// region: a\n// region: b\n").unwrap_err(),
            RegionError::Nested { outer: "a".into(), inner: "b".into(), line: 2 }
        );
        assert_eq!(
            parse("// region: a\n// endregion: b\n").unwrap_err(),
            RegionError::Mismatched { expected: "a".into(), found: "b".into(), line: 2 }
        );
        assert_eq!(
            parse("// region: a\n// endregion: a\n// region: a\n// endregion: a\n").unwrap_err(),
            RegionError::Duplicate { name: "a".into(), line: 3 }
        );
    }

    #[test]
    fn merge_keeps_hand_written_code() {
        let existing = "pub struct Old;\n// region: custom\nimpl A { fn extra(&self) {} }\n// endregion: custom\n";
        let merged = merge(TEMPLATE, existing).unwrap();

        assert_eq!(
            merged,
            "pub struct A;\n// region: custom\nimpl A { fn extra(&self) {} }\n// endregion: custom\n"
        );
    }

    #[test]
    fn merge_of_untouched_file_is_the_template() {
        assert_eq!(merge(TEMPLATE, TEMPLATE).unwrap(), TEMPLATE);
    }

    #[test]
    fn merge_refuses_foreign_files() {
        assert_eq!(
            merge(TEMPLATE, "pub struct Handwritten;\n").unwrap_err(),
            RegionError::NoRegions
        );
        assert_eq!(
            merge(TEMPLATE, "// region: other\nfn f() {}\n// endregion: other\n").unwrap_err(),
            RegionError::Orphaned("other".into())
        );
    }

    #[test]
    fn markers_round_trip() {
        let source = format!("{}\nbody\n{}\n", open_marker("custom"), close_marker("custom"));
        let regions = parse(&source).unwrap();
        assert_eq!(regions[0].name, "custom");
        assert_eq!(regions[0].body, "body\n");
    }
}
