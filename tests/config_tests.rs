use coins_search::{Scoring, SearchConfig, SearchError, Selection};
use std::time::Duration;

#[test]
fn test_config_builder_methods() {
    // Test that all builder methods correctly set their respective values
    let config = SearchConfig::default()
        .with_max_depth(3)
        .with_scoring(Scoring::CoinDifferential)
        .with_selection(Selection::MaxN)
        .with_max_threads(4)
        .with_max_time(Duration::from_secs(30))
        .with_seed(99)
        .with_profile_depth(5);

    // Verify each setting was applied correctly
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.scoring, Scoring::CoinDifferential);
    assert_eq!(config.selection, Selection::MaxN);
    assert_eq!(config.max_threads, Some(4));
    assert_eq!(config.max_time, Some(Duration::from_secs(30)));
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.profile_depth, 5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_default_values() {
    // Test that default values are set correctly
    let config = SearchConfig::default();

    assert_eq!(config.max_depth, 1);
    assert_eq!(config.scoring, Scoring::WinRate);
    assert_eq!(config.selection, Selection::Max);
    assert_eq!(config.max_threads, None);
    assert_eq!(config.max_time, None);
    assert_eq!(config.seed, None);
    assert_eq!(config.profile_depth, 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let invalid = [
        SearchConfig::default().with_max_depth(0),
        SearchConfig::default().with_max_threads(0),
        SearchConfig::default().with_max_time(Duration::ZERO),
    ];

    for config in invalid {
        assert!(matches!(
            config.validate(),
            Err(SearchError::InvalidConfiguration(_))
        ));
    }
}
