//! GML boundary file parsing.
//!
//! Boundary datasets arrive as GML documents with one or more
//! `Polygon/exterior/LinearRing/posList` coordinate lists (and optionally
//! `interior` rings for holes), coordinate pairs in the projected CRS.
//! Matching is on local element names, so any namespace prefix works.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::GeometryError;

/// Raw rings of one polygon part, as read from a boundary file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonRings {
    pub exterior: Vec<(f64, f64)>,
    pub interiors: Vec<Vec<(f64, f64)>>,
}

/// One feature of a multi-region boundary file: attribute-embedded
/// metadata plus its polygon parts.
///
/// Boundary datasets covering a whole administrative level ship many
/// regions in one document, each feature carrying its classification code
/// and display name as attribute elements. Either attribute may be absent;
/// the import tooling decides what to do with an incomplete feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFeature {
    pub code: Option<String>,
    pub name: Option<String>,
    pub parts: Vec<PolygonRings>,
}

/// Attribute element names carrying the classification code and display
/// name, as they appear across dataset revisions.
const CODE_ATTRS: &[&str] = &["JPT_KOD_JE", "teryt", "kod"];
const NAME_ATTRS: &[&str] = &["JPT_NAZWA_", "JPT_NAZWA", "NAZWA", "nazwa", "name"];

enum RingTarget {
    Exterior,
    Interior,
}

enum AttrTarget {
    Code,
    Name,
}

fn attr_target(local: &[u8]) -> Option<AttrTarget> {
    if CODE_ATTRS.iter().any(|a| a.as_bytes() == local) {
        Some(AttrTarget::Code)
    } else if NAME_ATTRS.iter().any(|a| a.as_bytes() == local) {
        Some(AttrTarget::Name)
    } else {
        None
    }
}

/// Extract all polygon parts from a GML document.
///
/// Returns one [`PolygonRings`] per `Polygon` element, in document order.
/// A document without any polygon geometry is an error.
pub fn parse_polygons(xml: &str) -> Result<Vec<PolygonRings>, GeometryError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut polygons = Vec::new();
    let mut current: Option<PolygonRings> = None;
    let mut ring_target: Option<RingTarget> = None;
    let mut in_pos_list = false;
    let mut pos_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Polygon" => {
                    current = Some(PolygonRings::default());
                }
                b"exterior" if current.is_some() => {
                    ring_target = Some(RingTarget::Exterior);
                }
                b"interior" if current.is_some() => {
                    ring_target = Some(RingTarget::Interior);
                }
                b"posList" if ring_target.is_some() => {
                    in_pos_list = true;
                    pos_text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_pos_list => {
                let text = t
                    .unescape()
                    .map_err(|e| GeometryError::InvalidGml(e.to_string()))?;
                pos_text.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"posList" if in_pos_list => {
                    in_pos_list = false;
                    let coords = parse_pos_list(&pos_text)?;
                    if let Some(polygon) = current.as_mut() {
                        match ring_target {
                            Some(RingTarget::Exterior) => polygon.exterior = coords,
                            Some(RingTarget::Interior) => polygon.interiors.push(coords),
                            None => {}
                        }
                    }
                }
                b"exterior" | b"interior" => {
                    ring_target = None;
                }
                b"Polygon" => {
                    if let Some(polygon) = current.take() {
                        polygons.push(polygon);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(GeometryError::InvalidGml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if polygons.is_empty() {
        return Err(GeometryError::EmptyDocument);
    }

    Ok(polygons)
}

/// Extract region features from a multi-region GML document.
///
/// A feature is one `featureMember` (or `member`) element: its polygon
/// parts plus whatever code/name attribute elements it carries. Parsing is
/// lenient; geometric validation happens when the parts are assembled into
/// a boundary, so one bad feature never hides the rest of the file.
pub fn parse_features(xml: &str) -> Result<Vec<RegionFeature>, GeometryError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut features = Vec::new();
    let mut feature: Option<RegionFeature> = None;
    let mut current: Option<PolygonRings> = None;
    let mut ring_target: Option<RingTarget> = None;
    let mut in_pos_list = false;
    let mut pos_text = String::new();
    let mut attr: Option<AttrTarget> = None;
    let mut attr_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"featureMember" | b"member" => {
                    feature = Some(RegionFeature::default());
                }
                b"Polygon" if feature.is_some() => {
                    current = Some(PolygonRings::default());
                }
                b"exterior" if current.is_some() => {
                    ring_target = Some(RingTarget::Exterior);
                }
                b"interior" if current.is_some() => {
                    ring_target = Some(RingTarget::Interior);
                }
                b"posList" if ring_target.is_some() => {
                    in_pos_list = true;
                    pos_text.clear();
                }
                local => {
                    // Attribute elements live directly under the feature,
                    // never inside a geometry
                    if feature.is_some() && current.is_none() {
                        if let Some(target) = attr_target(local) {
                            attr = Some(target);
                            attr_text.clear();
                        }
                    }
                }
            },
            Ok(Event::Text(t)) if in_pos_list || attr.is_some() => {
                let text = t
                    .unescape()
                    .map_err(|e| GeometryError::InvalidGml(e.to_string()))?;
                if in_pos_list {
                    pos_text.push_str(&text);
                } else {
                    attr_text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"posList" if in_pos_list => {
                    in_pos_list = false;
                    let coords = parse_pos_list(&pos_text)?;
                    if let Some(polygon) = current.as_mut() {
                        match ring_target {
                            Some(RingTarget::Exterior) => polygon.exterior = coords,
                            Some(RingTarget::Interior) => polygon.interiors.push(coords),
                            None => {}
                        }
                    }
                }
                b"exterior" | b"interior" => {
                    ring_target = None;
                }
                b"Polygon" => {
                    if let (Some(feature), Some(polygon)) = (feature.as_mut(), current.take()) {
                        feature.parts.push(polygon);
                    }
                }
                b"featureMember" | b"member" => {
                    if let Some(feature) = feature.take() {
                        features.push(feature);
                    }
                }
                local => {
                    if let (Some(target), Some(feature)) = (attr.take(), feature.as_mut()) {
                        if attr_target(local).is_some() && !attr_text.is_empty() {
                            let slot = match target {
                                AttrTarget::Code => &mut feature.code,
                                AttrTarget::Name => &mut feature.name,
                            };
                            if slot.is_none() {
                                *slot = Some(attr_text.clone());
                            }
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(GeometryError::InvalidGml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if features.is_empty() {
        return Err(GeometryError::EmptyDocument);
    }

    Ok(features)
}

/// Parse a whitespace-separated posList into coordinate pairs.
fn parse_pos_list(text: &str) -> Result<Vec<(f64, f64)>, GeometryError> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| GeometryError::InvalidGml(format!("bad coordinate: {:?}", token)))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if values.len() % 2 != 0 {
        return Err(GeometryError::InvalidGml(format!(
            "posList has an odd number of values ({})",
            values.len()
        )));
    }

    Ok(values.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTY_GML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2">
  <gml:featureMember>
    <gml:Polygon gml:id="p1">
      <gml:exterior>
        <gml:LinearRing>
          <gml:posList>0.0 0.0 100.0 0.0 100.0 100.0 0.0 100.0 0.0 0.0</gml:posList>
        </gml:LinearRing>
      </gml:exterior>
      <gml:interior>
        <gml:LinearRing>
          <gml:posList>40.0 40.0 60.0 40.0 60.0 60.0 40.0 60.0 40.0 40.0</gml:posList>
        </gml:LinearRing>
      </gml:interior>
    </gml:Polygon>
  </gml:featureMember>
  <gml:featureMember>
    <gml:Polygon gml:id="p2">
      <gml:exterior>
        <gml:LinearRing>
          <gml:posList>200.0 0.0 250.0 0.0 250.0 50.0 200.0 50.0 200.0 0.0</gml:posList>
        </gml:LinearRing>
      </gml:exterior>
    </gml:Polygon>
  </gml:featureMember>
</gml:FeatureCollection>"#;

    #[test]
    fn test_parse_polygons_with_holes() {
        let polygons = parse_polygons(COUNTY_GML).unwrap();
        assert_eq!(polygons.len(), 2);

        assert_eq!(polygons[0].exterior.len(), 5);
        assert_eq!(polygons[0].exterior[0], (0.0, 0.0));
        assert_eq!(polygons[0].interiors.len(), 1);
        assert_eq!(polygons[0].interiors[0][0], (40.0, 40.0));

        assert_eq!(polygons[1].exterior.len(), 5);
        assert!(polygons[1].interiors.is_empty());
    }

    #[test]
    fn test_namespace_prefix_is_ignored() {
        let xml = COUNTY_GML.replace("gml:", "ns1:").replace(
            "xmlns:ns1=\"http://www.opengis.net/gml/3.2\"",
            "xmlns:ns1=\"http://example.com/other\"",
        );
        let polygons = parse_polygons(&xml).unwrap();
        assert_eq!(polygons.len(), 2);
    }

    #[test]
    fn test_odd_coordinate_count_rejected() {
        let xml = r#"<Polygon><exterior><LinearRing>
            <posList>0.0 0.0 1.0 0.0 1.0</posList>
        </LinearRing></exterior></Polygon>"#;
        assert!(matches!(
            parse_polygons(xml),
            Err(GeometryError::InvalidGml(_))
        ));
    }

    #[test]
    fn test_non_numeric_coordinate_rejected() {
        let xml = r#"<Polygon><exterior><LinearRing>
            <posList>0.0 0.0 abc 1.0</posList>
        </LinearRing></exterior></Polygon>"#;
        assert!(matches!(
            parse_polygons(xml),
            Err(GeometryError::InvalidGml(_))
        ));
    }

    #[test]
    fn test_document_without_polygons_rejected() {
        let xml = r#"<gml:FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2"/>"#;
        assert!(matches!(
            parse_polygons(xml),
            Err(GeometryError::EmptyDocument)
        ));
    }

    const MULTI_REGION_GML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:ms="http://example.com/prg">
  <gml:featureMember>
    <ms:Jednostka>
      <ms:JPT_KOD_JE>0401</ms:JPT_KOD_JE>
      <ms:JPT_NAZWA_>powiat aleksandrowski</ms:JPT_NAZWA_>
      <gml:Polygon>
        <gml:exterior>
          <gml:LinearRing>
            <gml:posList>0.0 0.0 100.0 0.0 100.0 100.0 0.0 100.0 0.0 0.0</gml:posList>
          </gml:LinearRing>
        </gml:exterior>
      </gml:Polygon>
    </ms:Jednostka>
  </gml:featureMember>
  <gml:featureMember>
    <ms:Jednostka>
      <ms:JPT_KOD_JE>0402</ms:JPT_KOD_JE>
      <ms:JPT_NAZWA_>powiat brodnicki</ms:JPT_NAZWA_>
      <gml:Polygon>
        <gml:exterior>
          <gml:LinearRing>
            <gml:posList>200.0 0.0 250.0 0.0 250.0 50.0 200.0 50.0 200.0 0.0</gml:posList>
          </gml:LinearRing>
        </gml:exterior>
      </gml:Polygon>
      <gml:Polygon>
        <gml:exterior>
          <gml:LinearRing>
            <gml:posList>300.0 0.0 320.0 0.0 320.0 20.0 300.0 20.0 300.0 0.0</gml:posList>
          </gml:LinearRing>
        </gml:exterior>
      </gml:Polygon>
    </ms:Jednostka>
  </gml:featureMember>
</gml:FeatureCollection>"#;

    #[test]
    fn test_parse_features_with_attributes() {
        let features = parse_features(MULTI_REGION_GML).unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].code.as_deref(), Some("0401"));
        assert_eq!(features[0].name.as_deref(), Some("powiat aleksandrowski"));
        assert_eq!(features[0].parts.len(), 1);

        assert_eq!(features[1].code.as_deref(), Some("0402"));
        assert_eq!(features[1].name.as_deref(), Some("powiat brodnicki"));
        assert_eq!(features[1].parts.len(), 2);
    }

    #[test]
    fn test_parse_features_alternate_attribute_names() {
        let xml = r#"<FeatureCollection>
  <member>
    <teryt>1465</teryt>
    <NAZWA>Warszawa</NAZWA>
    <Polygon><exterior><LinearRing>
      <posList>0.0 0.0 10.0 0.0 10.0 10.0 0.0 0.0</posList>
    </LinearRing></exterior></Polygon>
  </member>
</FeatureCollection>"#;

        let features = parse_features(xml).unwrap();
        assert_eq!(features[0].code.as_deref(), Some("1465"));
        assert_eq!(features[0].name.as_deref(), Some("Warszawa"));
    }

    #[test]
    fn test_parse_features_missing_metadata_is_none() {
        let xml = r#"<FeatureCollection>
  <featureMember>
    <Polygon><exterior><LinearRing>
      <posList>0.0 0.0 10.0 0.0 10.0 10.0 0.0 0.0</posList>
    </LinearRing></exterior></Polygon>
  </featureMember>
</FeatureCollection>"#;

        let features = parse_features(xml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].code, None);
        assert_eq!(features[0].name, None);
        assert_eq!(features[0].parts.len(), 1);
    }

    #[test]
    fn test_parse_features_keeps_degenerate_geometry_for_later_validation() {
        let xml = r#"<FeatureCollection>
  <featureMember>
    <JPT_KOD_JE>0401</JPT_KOD_JE>
    <Polygon><exterior><LinearRing>
      <posList>0.0 0.0 1.0 1.0</posList>
    </LinearRing></exterior></Polygon>
  </featureMember>
  <featureMember>
    <JPT_KOD_JE>0402</JPT_KOD_JE>
    <Polygon><exterior><LinearRing>
      <posList>0.0 0.0 10.0 0.0 10.0 10.0 0.0 0.0</posList>
    </LinearRing></exterior></Polygon>
  </featureMember>
</FeatureCollection>"#;

        let features = parse_features(xml).unwrap();
        assert_eq!(features.len(), 2);

        // Validation rejects only the degenerate feature
        assert!(crate::region::boundary_from_parts(&features[0].parts).is_err());
        assert!(crate::region::boundary_from_parts(&features[1].parts).is_ok());
    }

    #[test]
    fn test_parse_features_empty_document_rejected() {
        let xml = r#"<FeatureCollection/>"#;
        assert!(matches!(
            parse_features(xml),
            Err(GeometryError::EmptyDocument)
        ));
    }
}
