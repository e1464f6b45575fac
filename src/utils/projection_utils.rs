//! Projection descriptor helpers
//!
//! Projections travel through the crate as GDAL-style strings, either
//! `EPSG:<code>` or WKT. GeoTIFF stores a numeric CRS code in its GeoKeys,
//! so these helpers pull that code out of either form.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EPSG_CODE: Regex = Regex::new(r"(?i)^\s*EPSG:(\d+)\s*$").unwrap();
    static ref WKT_AUTHORITY: Regex =
        Regex::new(r#"(?i)AUTHORITY\[\s*"EPSG"\s*,\s*"?(\d+)"?\s*\]"#).unwrap();
    static ref WKT_ROOT: Regex = Regex::new(r"(?i)^\s*([A-Z_]+)\s*\[").unwrap();
}

/// Coordinate system family, which decides the GeoKey a code is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsKind {
    Geographic,
    Projected,
}

/// EPSG code named by a projection string, if any
///
/// WKT nests authorities for datums and units; the outermost one closes the
/// string, so the last match wins.
pub fn epsg_code(projection: &str) -> Option<u16> {
    if let Some(caps) = EPSG_CODE.captures(projection) {
        return caps[1].parse().ok();
    }

    WKT_AUTHORITY.captures_iter(projection)
        .last()
        .and_then(|caps| caps[1].parse().ok())
}

/// Classify a projection string as geographic or projected
///
/// WKT is classified by its root keyword. Bare EPSG codes in the 4000-4999
/// block are geographic CRSs, everything else is treated as projected.
pub fn crs_kind(projection: &str, code: u16) -> CrsKind {
    if let Some(caps) = WKT_ROOT.captures(projection) {
        let root = caps[1].to_ascii_uppercase();
        return match root.as_str() {
            "GEOGCS" | "GEOGCRS" | "GEODCRS" => CrsKind::Geographic,
            _ => CrsKind::Projected,
        };
    }

    if (4000..5000).contains(&code) {
        CrsKind::Geographic
    } else {
        CrsKind::Projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_epsg_strings() {
        assert_eq!(epsg_code("EPSG:32633"), Some(32633));
        assert_eq!(epsg_code(" epsg:4326 "), Some(4326));
        assert_eq!(epsg_code("EPSG:abc"), None);
        assert_eq!(epsg_code("+proj=longlat"), None);
    }

    #[test]
    fn takes_outermost_wkt_authority() {
        let wkt = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;
        assert_eq!(epsg_code(wkt), Some(4326));
        assert_eq!(crs_kind(wkt, 4326), CrsKind::Geographic);
    }

    #[test]
    fn classifies_bare_codes() {
        assert_eq!(crs_kind("EPSG:4326", 4326), CrsKind::Geographic);
        assert_eq!(crs_kind("EPSG:3857", 3857), CrsKind::Projected);
        assert_eq!(crs_kind(r#"PROJCS["x",GEOGCS["y"]]"#, 4326), CrsKind::Projected);
    }
}
