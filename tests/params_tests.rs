use deduplication::params::*;
use deduplication::ConfigError;

#[test]
fn test_masks_for_default_average() {
    let params = ChunkParams::new(65536, 16384, 524288).unwrap();
    assert_eq!(params.mask1, (1 << 17) - 1);
    assert_eq!(params.mask2, (1 << 15) - 1);
}

#[test]
fn test_masks_for_smallest_average() {
    let params = ChunkParams::new(256, 64, 1024).unwrap();
    assert_eq!(params.mask1, 511);
    assert_eq!(params.mask2, 127);
    // mask1 always carries two more set bits than mask2
    assert_eq!(params.mask1.count_ones(), params.mask2.count_ones() + 2);
}

#[test]
fn test_logarithm2_rounds_to_nearest() {
    assert_eq!(logarithm2(65537), 16);
    assert_eq!(logarithm2(65536), 16);
    assert_eq!(logarithm2(65535), 16);
    assert_eq!(logarithm2(32769), 15);
    assert_eq!(logarithm2(32768), 15);
    assert_eq!(logarithm2(32767), 15);
    assert_eq!(logarithm2(362), 8);
    assert_eq!(logarithm2(363), 9);
}

#[test]
fn test_average_bits_bounds() {
    assert_eq!(average_bits(256), Ok(8));
    assert_eq!(average_bits(AVERAGE_MAX), Ok(28));
    assert_eq!(average_bits(1 << 29), Err(ConfigError::AverageBits(29)));
    assert_eq!(average_bits(128), Err(ConfigError::AverageBits(7)));
}

#[test]
fn test_rejects_average_below_min() {
    assert_eq!(
        ChunkParams::new(255, 64, 1024),
        Err(ConfigError::AverageTooSmall(255))
    );
}

#[test]
fn test_rejects_average_above_max() {
    assert_eq!(
        ChunkParams::new(AVERAGE_MAX + 1, 64, MAXIMUM_MAX),
        Err(ConfigError::AverageTooLarge(AVERAGE_MAX + 1))
    );
}

#[test]
fn test_rejects_minimum_equal_to_average() {
    assert_eq!(
        ChunkParams::new(65536, 65536, 524288),
        Err(ConfigError::MinimumNotBelowAverage {
            minimum: 65536,
            average: 65536
        })
    );
}

#[test]
fn test_rejects_minimum_out_of_range() {
    assert_eq!(
        ChunkParams::new(65536, 63, 524288),
        Err(ConfigError::MinimumTooSmall(63))
    );
    assert_eq!(
        ChunkParams::new(AVERAGE_MAX, MINIMUM_MAX + 1, MAXIMUM_MAX),
        Err(ConfigError::MinimumTooLarge(MINIMUM_MAX + 1))
    );
}

#[test]
fn test_rejects_maximum_equal_to_average() {
    assert_eq!(
        ChunkParams::new(65536, 16384, 65536),
        Err(ConfigError::MaximumNotAboveAverage {
            maximum: 65536,
            average: 65536
        })
    );
}

#[test]
fn test_rejects_maximum_out_of_range() {
    assert_eq!(
        ChunkParams::new(512, 64, 1023),
        Err(ConfigError::MaximumTooSmall(1023))
    );
    assert_eq!(
        ChunkParams::new(65536, 16384, MAXIMUM_MAX + 1),
        Err(ConfigError::MaximumTooLarge(MAXIMUM_MAX + 1))
    );
}

#[test]
fn test_rejects_narrow_range() {
    assert_eq!(
        ChunkParams::new(65536, 16384, 65536 + 16384 - 1),
        Err(ConfigError::RangeTooNarrow {
            minimum: 16384,
            average: 65536,
            maximum: 65536 + 16384 - 1
        })
    );
    assert!(ChunkParams::new(65536, 16384, 65536 + 16384).is_ok());
}

#[test]
fn test_rejects_values_above_31_bits() {
    assert_eq!(
        ChunkParams::new(INTEGER_MAX + 1, 64, 1024),
        Err(ConfigError::NotAnInteger { name: "average" })
    );
    assert_eq!(
        check_integer("sourceOffset", u32::MAX),
        Err(ConfigError::NotAnInteger {
            name: "sourceOffset"
        })
    );
    assert_eq!(check_integer("sourceOffset", INTEGER_MAX), Ok(()));
}

#[test]
fn test_stream_mode_from_flag() {
    assert_eq!(StreamMode::try_from(0), Ok(StreamMode::More));
    assert_eq!(StreamMode::try_from(1), Ok(StreamMode::Final));
    assert_eq!(StreamMode::try_from(2), Err(ConfigError::UnknownFlag(2)));
    assert_eq!(
        StreamMode::try_from(u32::MAX),
        Err(ConfigError::NotAnInteger { name: "flags" })
    );
    assert_eq!(u32::from(StreamMode::Final), 1);
}

#[test]
fn test_error_messages_name_the_invariant() {
    let err = ChunkParams::new(255, 64, 1024).unwrap_err();
    assert!(err.to_string().contains("average < AVERAGE_MIN"), "{err}");

    let err = ChunkParams::new(65536, 16384, 65536).unwrap_err();
    assert!(err.to_string().contains("maximum <= average"), "{err}");
}
