use market_depth_chart::{AppError, ChartConfig, ChartController, ConfigError};
use rust_decimal_macros::dec;

#[test]
fn defaults_match_depth_panel() {
    let config = ChartConfig::default();
    assert_eq!(config.tolerance, dec!(0.01));
    assert_eq!(config.scale_extent, 0.5);
    assert_eq!(config.axis_height, 24.0);
    assert_eq!(config.volume_headroom, dec!(1.05));
    assert_eq!(config.crosshair_width, 79.0);
    assert!(config.validate().is_ok());
}

#[test]
fn json_round_trips() {
    let config = ChartConfig { tolerance: dec!(0.025), axis_height: 30.0, ..ChartConfig::default() };
    let json = config.to_json().unwrap();
    assert_eq!(ChartConfig::from_json(&json).unwrap(), config);
}

#[test]
fn controller_rejects_invalid_config() {
    let config = ChartConfig { volume_headroom: dec!(0.9), ..ChartConfig::default() };
    let result = ChartController::new("depth", config, 800.0, 400.0);
    assert!(matches!(result, Err(AppError::Config(ConfigError::Invalid(_)))));

    let result = ChartController::new("depth", ChartConfig::default(), f64::NAN, 400.0);
    assert!(matches!(result, Err(AppError::Domain(_))));
}
