//! String utility functions

/// Trims trailing NUL characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Splits a GeoTIFF ASCII parameter block on its `|` separators
///
/// Each GeoKey that stores text points at a `|`-terminated slice of the
/// GeoAsciiParams tag.
pub fn geo_ascii_slice(params: &str, offset: usize, count: usize) -> Option<String> {
    let end = offset.checked_add(count)?;
    let slice = params.get(offset..end)?;
    Some(slice.trim_end_matches('|').to_string())
}
