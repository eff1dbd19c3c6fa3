//! GenBank reference loader: sequence plus a region annotation built from
//! each feature's last `note` qualifier.

use std::path::Path;

use gb_io::seq::{Feature, Location};
use tracing::debug;

use crate::error::{HivevoError, Result};
use crate::reference::annotation::{Annotation, RegionFeature, Segment};
use crate::store::ReferenceRecord;

/// Flattens a location into segments in extraction order.
fn collect_segments(location: &Location, reverse: bool, out: &mut Vec<Segment>) {
    match location {
        Location::Range((from, _), (to, _)) => {
            if *from < 0 || *to < *from {
                return;
            }
            out.push(Segment {
                start: *from as usize,
                end: *to as usize,
                reverse,
            });
        }
        Location::Complement(inner) => {
            let mut parts = Vec::new();
            collect_segments(inner, !reverse, &mut parts);
            parts.reverse();
            out.extend(parts);
        }
        Location::Join(parts) | Location::Order(parts) | Location::Bond(parts) | Location::OneOf(parts) => {
            for part in parts {
                collect_segments(part, reverse, out);
            }
        }
        // 零长度位点、外部序列与 gap 不贡献碱基
        Location::Between(_, _) | Location::External(_, _) | Location::Gap(_) => {}
    }
}

pub fn region_feature(feature: &Feature) -> RegionFeature {
    let mut segments = Vec::new();
    collect_segments(&feature.location, false, &mut segments);
    RegionFeature::new(feature.kind.to_string(), segments)
}

pub fn annotation_from_features(features: &[Feature]) -> Annotation {
    let mut ann = Annotation::new();
    for feature in features {
        if let Some(name) = feature.qualifier_values("note".into()).last() {
            ann.insert(name.trim(), region_feature(feature));
        }
    }
    ann
}

/// Loads the first record of a GenBank file.
pub fn load_reference(path: &Path) -> Result<ReferenceRecord> {
    let mut records = gb_io::reader::parse_file(path).map_err(|e| HivevoError::data_load(path, e))?;
    if records.is_empty() {
        return Err(HivevoError::data_load(path, "GenBank file contains no records"));
    }
    let seq = records.swap_remove(0);
    let annotation = annotation_from_features(&seq.features);
    let name = seq.name.clone().unwrap_or_default();
    debug!(path = %path.display(), len = seq.seq.len(), regions = annotation.len(), "reference loaded");
    Ok(ReferenceRecord {
        name,
        seq: seq.seq.to_ascii_uppercase(),
        annotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow as FeatureKind;

    fn feature(location: Location, notes: &[&str]) -> Feature {
        Feature {
            kind: FeatureKind::from("CDS"),
            location,
            qualifiers: notes.iter().map(|n| ("note".into(), Some(n.to_string()))).collect(),
        }
    }

    #[test]
    fn last_note_names_the_region() {
        let features = vec![
            feature(Location::simple_range(0, 9), &["gag polyprotein", "gag"]),
            feature(Location::simple_range(3, 6), &[]),
        ];
        let ann = annotation_from_features(&features);
        assert_eq!(ann.len(), 1);
        assert_eq!(ann.get("gag").unwrap().segments, vec![Segment::forward(0, 9)]);
    }

    #[test]
    fn complement_join_is_flattened_in_extraction_order() {
        let loc = Location::Complement(Box::new(Location::Join(vec![
            Location::simple_range(0, 2),
            Location::simple_range(4, 8),
        ])));
        let f = region_feature(&feature(loc, &["nef"]));
        assert_eq!(
            f.segments,
            vec![
                Segment { start: 4, end: 8, reverse: true },
                Segment { start: 0, end: 2, reverse: true },
            ]
        );
        assert_eq!(f.extract(b"AAGGCCTT").unwrap(), b"AAGGTT");
    }

    #[test]
    fn missing_genbank_file() {
        let err = load_reference(Path::new("/nonexistent/HXB2.gb")).unwrap_err();
        assert!(matches!(err, HivevoError::DataLoad { .. }));
    }
}
