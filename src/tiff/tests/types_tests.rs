//! Tests for the TIFF types module

use crate::tiff::constants::tags;
use crate::tiff::types::TIFF;
use crate::tiff::ifd::{IFD, IFDEntry};

#[test]
fn test_tiff_creation() {
    let tiff = TIFF::new(false);
    assert!(!tiff.is_big_tiff);
    assert_eq!(tiff.ifd_count(), 0);
    assert!(tiff.main_ifd().is_none());
}

#[test]
fn test_tiff_with_overview() {
    let mut tiff = TIFF::new(true);

    // Overview listed first; the main IFD is still the full-resolution one
    let mut overview_ifd = IFD::new(0, 16);
    overview_ifd.add_entry(IFDEntry::new(tags::NEW_SUBFILE_TYPE, 4, 1, 1));
    overview_ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, 4, 1, 512));
    overview_ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, 4, 1, 384));
    tiff.ifds.push(overview_ifd);

    let mut main_ifd = IFD::new(1, 100);
    main_ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, 4, 1, 1024));
    main_ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, 4, 1, 768));
    tiff.ifds.push(main_ifd);

    assert_eq!(tiff.ifd_count(), 2);
    assert_eq!(tiff.main_ifd().and_then(|ifd| ifd.get_dimensions()), Some((1024, 768)));

    let overviews = tiff.overviews();
    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0].get_dimensions(), Some((512, 384)));
}

#[test]
fn test_add_entry_replaces_duplicate_tag() {
    let mut ifd = IFD::new(0, 8);
    ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, 4, 1, 10));
    ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, 4, 1, 20));

    assert_eq!(ifd.entry_count(), 1);
    assert_eq!(ifd.get_tag_value(tags::IMAGE_WIDTH), Some(20));

    ifd.remove_entry(tags::IMAGE_WIDTH);
    assert!(!ifd.has_tag(tags::IMAGE_WIDTH));
    assert_eq!(ifd.entry_count(), 0);
}

#[test]
fn test_entry_inline_threshold() {
    // 2 SHORTs fit a classic value field, 2 DOUBLEs fit nowhere
    assert!(IFDEntry::new(tags::BITS_PER_SAMPLE, 3, 2, 0).is_value_inline(false));
    assert!(!IFDEntry::new(tags::BITS_PER_SAMPLE, 3, 3, 0).is_value_inline(false));
    assert!(IFDEntry::new(tags::BITS_PER_SAMPLE, 3, 4, 0).is_value_inline(true));
    assert!(!IFDEntry::new(tags::MODEL_PIXEL_SCALE_TAG, 12, 2, 0).is_value_inline(true));
}
