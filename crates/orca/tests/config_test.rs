use orca::{ConfigError, EdgeStyle, LayoutConfig, Orientation};

#[test]
fn orientation_parses_names_and_abbreviations() {
    assert_eq!("north".parse::<Orientation>().unwrap(), Orientation::North);
    assert_eq!("N".parse::<Orientation>().unwrap(), Orientation::North);
    assert_eq!("south".parse::<Orientation>().unwrap(), Orientation::South);
    assert_eq!("e".parse::<Orientation>().unwrap(), Orientation::East);
    assert_eq!("West".parse::<Orientation>().unwrap(), Orientation::West);
}

#[test]
fn unknown_orientation_is_rejected() {
    let err = "up".parse::<Orientation>().unwrap_err();
    assert_eq!(err, ConfigError::UnknownOrientation("up".to_string()));
}

#[test]
fn edge_style_parses_all_selectors() {
    assert_eq!(
        "orthogonal".parse::<EdgeStyle>().unwrap(),
        EdgeStyle::Orthogonal
    );
    assert_eq!("polyline".parse::<EdgeStyle>().unwrap(), EdgeStyle::Polyline);
    assert_eq!("curve".parse::<EdgeStyle>().unwrap(), EdgeStyle::Curve);
    assert_eq!("none".parse::<EdgeStyle>().unwrap(), EdgeStyle::None);
    assert!("spline".parse::<EdgeStyle>().is_err());
}

#[test]
fn defaults_match_the_documented_values() {
    let config = LayoutConfig::default();
    assert_eq!(config.orientation, Orientation::North);
    assert_eq!(config.intra_cell_spacing, 30.0);
    assert_eq!(config.inter_rank_cell_spacing, 100.0);
    assert_eq!(config.parallel_edge_spacing, 10.0);
    assert_eq!(config.pref_hoz_edge_sep, 5.0);
    assert_eq!(config.pref_vert_edge_off, 2.0);
    assert_eq!(config.min_edge_jetty, 12.0);
    assert_eq!(config.channel_buffer, 4.0);
    assert_eq!(config.group_padding, 10.0);
    assert!(config.fine_tuning);
    assert_eq!(config.max_crossing_iterations, 24);
    assert_eq!(config.max_placement_iterations, 8);
    assert_eq!(config.edge_style, EdgeStyle::Polyline);
}

#[test]
fn config_round_trips_through_serde() {
    let config = LayoutConfig {
        orientation: Orientation::East,
        fine_tuning: false,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: LayoutConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn partial_config_json_fills_in_defaults() {
    let back: LayoutConfig = serde_json::from_str(r#"{"orientation":"South"}"#).unwrap();
    assert_eq!(back.orientation, Orientation::South);
    assert_eq!(back.intra_cell_spacing, 30.0);
}
