use hexnav::{
    Grid, GridConfig, GridRenderer, HexNavConfig, NavigationConfig, Point2,
    Rect, RenderConfig, Size2, Tessellation, TessellationConfig,
};
use validator::{Validate, ValidationErrors};

/// Get the sorted names of every field that failed validation
fn error_fields(err: anyhow::Error) -> Vec<&'static str> {
    // This is a bit of a lazy check but it works well enough
    let validation_errors = err.downcast::<ValidationErrors>().unwrap();
    let mut error_fields =
        validation_errors.errors().keys().copied().collect::<Vec<_>>();
    error_fields.sort_unstable();
    error_fields
}

#[test]
fn test_grid_config_validation() {
    let config = GridConfig {
        origin: Point2::new(-50.0, -50.0), // valid
        hex_radius: -1.0,                  // invalid
        rows: 0,                           // invalid
        cols: 5,                           // valid
        canvas: Size2::new(0.0, 0.0),      // valid (but weird)
    };
    let err = Grid::generate(config).unwrap_err();
    assert_eq!(error_fields(err), vec!["hex_radius", "rows"]);
}

#[test]
fn test_navigation_config_validation() {
    let grid = Grid::generate(GridConfig::default()).unwrap();
    let config = NavigationConfig {
        start: Point2::new(-1000.0, 0.0), // valid (off the grid)
        destination: Point2::ORIGIN,      // valid
        step_size: 0.0,                   // invalid
        max_ticks: 0,                     // invalid
    };
    let err = hexnav::Navigator::new(&grid, config).unwrap_err();
    assert_eq!(error_fields(err), vec!["max_ticks", "step_size"]);
}

#[test]
fn test_tessellation_config_validation() {
    let config = TessellationConfig {
        side_length: -5.0,                       // invalid
        bounds: Rect::new(0.0, 0.0, 10.0, 10.0), // valid
    };
    let err = Tessellation::generate(config).unwrap_err();
    assert_eq!(error_fields(err), vec!["side_length"]);
}

#[test]
fn test_render_config_validation() {
    let render_config = RenderConfig {
        show_corner_labels: true, // valid
        show_candidates: false,   // valid
        marker_radius: 0.0,       // invalid
        line_width: 1.0,          // valid
    };
    let err = GridRenderer::new(render_config).unwrap_err();
    assert_eq!(error_fields(err), vec!["marker_radius"]);
}

#[test]
fn test_nested_config_validation() {
    let config = HexNavConfig {
        grid: GridConfig {
            cols: 0,
            ..Default::default()
        },
        tessellation: TessellationConfig {
            side_length: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let validation_errors = config.validate().unwrap_err();
    let mut error_fields =
        validation_errors.errors().keys().copied().collect::<Vec<_>>();
    error_fields.sort_unstable();
    assert_eq!(error_fields, vec!["grid", "tessellation"]);
    assert!(HexNavConfig::default().validate().is_ok());
}
