use pixen::window::{WindowConfig, WindowMode};

#[test]
fn default_is_320x180_at_4x_windowed() {
    let cfg = WindowConfig::default();
    assert_eq!(cfg.logical_width, 320);
    assert_eq!(cfg.logical_height, 180);
    assert_eq!(cfg.pixel_width, 4);
    assert_eq!(cfg.pixel_height, 4);
    assert_eq!(cfg.mode, WindowMode::Windowed);
    assert!(!cfg.resizable);
}

#[test]
fn physical_size_is_logical_times_pixel_size() {
    let cfg = WindowConfig {
        logical_width: 256,
        logical_height: 200,
        pixel_width: 3,
        pixel_height: 2,
        ..WindowConfig::default()
    };
    assert_eq!(cfg.physical_width(), 768);
    assert_eq!(cfg.physical_height(), 400);
}

#[test]
fn aspect_ratio_of_logical_resolution() {
    let cfg = WindowConfig {
        logical_width: 320,
        logical_height: 240,
        ..WindowConfig::default()
    };
    assert!((cfg.aspect_ratio() - 4.0 / 3.0).abs() < 1e-5);
}

#[test]
fn aspect_ratio_zero_height_returns_zero() {
    let cfg = WindowConfig {
        logical_width: 320,
        logical_height: 0,
        ..WindowConfig::default()
    };
    assert_eq!(cfg.aspect_ratio(), 0.0);
}
