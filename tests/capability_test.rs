//! Capability table parsing and case resolution

mod common;

use common::{cmyk_tiff, gray_tiff, legacy_jpeg_tiff, Corpus};

use tiffpages::capability::{detect_features, CapabilityTable, CaseExpectation, Expectation, Feature};
use tiffpages::codec::DecodeFailure;
use tiffpages::harness::HarnessError;
use tiffpages::model::PageInfo;
use tiffpages::tiff::ByteOrder;

#[test]
fn test_embedded_table_lists_every_backend() {
    let table = CapabilityTable::embedded();
    let names: Vec<&str> = table.names().collect();
    assert_eq!(names, vec!["container", "raster", "tools"]);

    let raster = table.backend("raster").unwrap();
    assert_eq!(raster.label, "Raster");
    assert_eq!(raster.exclusion_token, "Img#");
    assert_eq!(
        raster.expectation(Feature::Cmyk),
        Expectation::RejectsWith(DecodeFailure::UnsupportedColorType)
    );
    assert_eq!(
        raster.expectation(Feature::LegacyJpeg),
        Expectation::RejectsWith(DecodeFailure::UnsupportedCompression)
    );

    let container = table.backend("container").unwrap();
    assert_eq!(container.expectation(Feature::MixedPageSizes), Expectation::Supported);
    assert_eq!(container.rejection_failures(), DecodeFailure::all().to_vec());
}

#[test]
fn test_table_parsing_errors() {
    let missing_token = r#"
        [backends.custom]
        label = "Custom"
    "#;
    assert!(matches!(CapabilityTable::from_str(missing_token), Err(HarnessError::ConfigError(_))));

    let unknown_feature = r#"
        [backends.custom]
        label = "Custom"
        exclusion_token = "XCus"
        [backends.custom.features]
        holograms = "supported"
    "#;
    assert!(CapabilityTable::from_str(unknown_feature).is_err());

    let bad_failure = r#"
        [backends.custom]
        label = "Custom"
        exclusion_token = "XCus"
        [backends.custom.features]
        cmyk = "explodes"
    "#;
    assert!(CapabilityTable::from_str(bad_failure).is_err());
    assert!(CapabilityTable::from_str("[other]\nkey = 1").is_err());
}

#[test]
fn test_feature_detection() {
    let mixed = PageInfo::probe_all(&gray_tiff(&[(4, 4), (2, 2)], ByteOrder::LittleEndian)).unwrap();
    assert_eq!(detect_features(&mixed), vec![Feature::MixedPageSizes]);

    let cmyk = PageInfo::probe_all(&cmyk_tiff(2, 2)).unwrap();
    assert_eq!(detect_features(&cmyk), vec![Feature::Cmyk]);

    let jpeg = PageInfo::probe_all(&legacy_jpeg_tiff(8, 8)).unwrap();
    assert_eq!(detect_features(&jpeg), vec![Feature::LegacyJpeg]);

    assert_eq!(Feature::from_name("wide_cmyk"), Some(Feature::WideCmyk));
    assert_eq!(Feature::ExoticSampleFormat.to_string(), "exotic_sample_format");
}

#[test]
fn test_case_resolution() {
    let corpus = Corpus::new();
    let raster = CapabilityTable::embedded().backend("raster").unwrap();

    let plain = corpus.add("plain.tif", &gray_tiff(&[(2, 2)], ByteOrder::LittleEndian));
    assert_eq!(raster.resolve_case(&plain).unwrap().expectation, CaseExpectation::MustSucceed);

    let cmyk = corpus.add("ink.tif", &cmyk_tiff(2, 2));
    let case = raster.resolve_case(&cmyk).unwrap();
    assert_eq!(case.features, vec![Feature::Cmyk]);
    assert!(case.expectation.accepts(DecodeFailure::UnsupportedColorType));
    assert!(!case.expectation.accepts(DecodeFailure::CorruptData));

    let damaged = corpus.add("strip_CorruptLZW.tif", &gray_tiff(&[(2, 2)], ByteOrder::LittleEndian));
    let case = raster.resolve_case(&damaged).unwrap();
    assert!(case.features.contains(&Feature::CorruptLzw));
    assert!(case.expectation.accepts(DecodeFailure::CorruptData));

    let tokened = corpus.add("odd_Img#.tif", &gray_tiff(&[(2, 2)], ByteOrder::LittleEndian));
    let case = raster.resolve_case(&tokened).unwrap();
    assert!(case.expectation.accepts(DecodeFailure::MismatchedPageSizes));
    assert!(!case.expectation.accepts(DecodeFailure::InvalidContainer));

    let garbage = corpus.add("garbage.tif", b"nope");
    assert_eq!(
        raster.resolve_case(&garbage).unwrap().expectation,
        CaseExpectation::MustFail { accepted: vec![DecodeFailure::InvalidContainer] }
    );
}
