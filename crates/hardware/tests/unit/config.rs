//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization, file loading,
//! and validation.

use ghb_prefetch::ConfigError;
use ghb_prefetch::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;

#[test]
fn test_config_default() {
    let config = PrefetchConfig::default();
    assert_eq!(config.history_size, 256);
    assert_eq!(config.index_size, 256);
    assert_eq!(config.index, IndexKind::DirectMapped);
    assert_eq!(config.key, KeyKind::Delta);
    assert_eq!(config.ranking, Ranking::Recency);
    assert_eq!(config.trigger, Trigger::EveryAccess);
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.max_width, 1);
    assert_eq!(config.cold_start_degree, 1);
    assert_eq!(config.block_size, 64);
    assert_eq!(config.max_phys_addr, 0x0FFF_FFFF);
}

#[test]
fn test_default_config_is_valid() {
    assert!(PrefetchConfig::default().validate().is_ok());
}

#[test]
fn test_json_empty_object_uses_defaults() {
    let config = PrefetchConfig::from_json("{}").unwrap();
    assert_eq!(config, PrefetchConfig::default());
}

#[test]
fn test_json_full_document() {
    let json = r#"{
        "history_size": 1024,
        "index_size": 512,
        "index": "LinearScan",
        "key": "DeltaPair",
        "ranking": "Frequency",
        "trigger": "DemandMiss",
        "max_depth": 8,
        "max_width": 2,
        "cold_start_degree": 4,
        "block_size": 128,
        "max_phys_addr": 4294967295
    }"#;
    let config = PrefetchConfig::from_json(json).unwrap();
    assert_eq!(
        config,
        PrefetchConfig {
            history_size: 1024,
            index_size: 512,
            index: IndexKind::LinearScan,
            key: KeyKind::DeltaPair,
            ranking: Ranking::Frequency,
            trigger: Trigger::DemandMiss,
            max_depth: 8,
            max_width: 2,
            cold_start_degree: 4,
            block_size: 128,
            max_phys_addr: 0xFFFF_FFFF,
        }
    );
}

#[rstest]
#[case("\"Address\"", KeyKind::Address)]
#[case("\"Delta\"", KeyKind::Delta)]
#[case("\"DeltaPair\"", KeyKind::DeltaPair)]
#[case("\"ProgramCounter\"", KeyKind::ProgramCounter)]
#[case("\"PC\"", KeyKind::ProgramCounter)]
fn test_key_kind_names(#[case] name: &str, #[case] expected: KeyKind) {
    let config = PrefetchConfig::from_json(&format!("{{\"key\": {name}}}")).unwrap();
    assert_eq!(config.key, expected);
}

#[test]
fn test_unknown_enum_variant_is_parse_error() {
    let err = PrefetchConfig::from_json(r#"{"ranking": "Random"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = PrefetchConfig::from_json("{ history_size: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[rstest]
#[case(r#"{"history_size": 0}"#, "history_size")]
#[case(r#"{"index_size": 0}"#, "index_size")]
#[case(r#"{"max_depth": 0}"#, "max_depth")]
#[case(r#"{"max_width": 0}"#, "max_width")]
fn test_zero_sizes_rejected(#[case] json: &str, #[case] expected: &str) {
    match PrefetchConfig::from_json(json) {
        Err(ConfigError::ZeroCapacity { field }) => assert_eq!(field, expected),
        other => panic!("expected ZeroCapacity, got {other:?}"),
    }
}

#[rstest]
#[case(r#"{"history_size": 1048577}"#, "history_size", 1_048_577, TABLE_LIMIT)]
#[case(r#"{"index_size": 1048577}"#, "index_size", 1_048_577, TABLE_LIMIT)]
#[case(r#"{"max_depth": 4097}"#, "max_depth", 4097, CANDIDATE_LIMIT)]
#[case(r#"{"cold_start_degree": 4097}"#, "cold_start_degree", 4097, CANDIDATE_LIMIT)]
#[case(
    r#"{"history_size": 1024, "max_width": 2048}"#,
    "history_size * max_width",
    2_097_152,
    TABLE_LIMIT
)]
fn test_oversized_bounds_rejected(
    #[case] json: &str,
    #[case] expected_field: &str,
    #[case] expected_value: usize,
    #[case] expected_limit: usize,
) {
    match PrefetchConfig::from_json(json) {
        Err(ConfigError::LimitExceeded {
            field,
            value,
            limit,
        }) => {
            assert_eq!(field, expected_field);
            assert_eq!(value, expected_value);
            assert_eq!(limit, expected_limit);
        }
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn test_bounds_at_limit_accepted() {
    let config = PrefetchConfig {
        history_size: TABLE_LIMIT,
        index_size: TABLE_LIMIT,
        max_depth: CANDIDATE_LIMIT,
        cold_start_degree: CANDIDATE_LIMIT,
        ..PrefetchConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[rstest]
#[case(0)]
#[case(48)]
#[case(100)]
fn test_bad_block_size_rejected(#[case] block_size: u64) {
    let config = PrefetchConfig {
        block_size,
        ..PrefetchConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBlockSize(b)) if b == block_size
    ));
}

#[test]
fn test_address_limit_below_block_rejected() {
    let config = PrefetchConfig {
        max_phys_addr: 32,
        ..PrefetchConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::AddressLimitBelowBlock {
            max_phys_addr: 32,
            block_size: 64
        })
    ));
}

#[test]
fn test_cold_start_degree_zero_is_valid() {
    let config = PrefetchConfig {
        cold_start_degree: 0,
        ..PrefetchConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"key": "Address", "max_depth": 5}}"#).unwrap();
    let config = PrefetchConfig::from_path(file.path()).unwrap();
    assert_eq!(config.key, KeyKind::Address);
    assert_eq!(config.max_depth, 5);
    assert_eq!(config.history_size, 256);
}

#[test]
fn test_from_path_validates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"block_size": 3}}"#).unwrap();
    assert!(matches!(
        PrefetchConfig::from_path(file.path()),
        Err(ConfigError::InvalidBlockSize(3))
    ));
}

#[test]
fn test_from_path_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PrefetchConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_error_messages() {
    let zero = ConfigError::ZeroCapacity { field: "max_depth" };
    assert_eq!(zero.to_string(), "`max_depth` must be greater than zero");

    let block = ConfigError::InvalidBlockSize(48);
    assert!(block.to_string().contains("48"));

    let limit = ConfigError::AddressLimitBelowBlock {
        max_phys_addr: 0x10,
        block_size: 64,
    };
    assert!(limit.to_string().contains("0x10"));
}
