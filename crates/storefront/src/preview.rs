//! Realistic design preview geometry.
//!
//! A customer's design is placed inside the product's print area on a
//! square mockup image. All positions are percentages of the mockup box so
//! the template can apply them as CSS without knowing pixel sizes.

use serde::Deserialize;
use url::Url;

use threadline_core::{PrintArea, ViewSide};

/// Default design width as a fraction of the print area width.
pub const DEFAULT_SCALE: f64 = 0.6;
/// Smallest allowed design width as a fraction of the print area width.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed design width as a fraction of the print area width.
pub const MAX_SCALE: f64 = 1.0;
/// Maximum characters of custom text.
pub const MAX_TEXT_CHARS: usize = 64;
/// Offsets past half the print area can never move the design further.
const MAX_OFFSET: f64 = 50.0;

/// Query parameters accepted by the preview page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewParams {
    pub color: Option<String>,
    pub side: Option<String>,
    pub design_url: Option<String>,
    pub text: Option<String>,
    pub scale: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub rotation: Option<f64>,
}

impl PreviewParams {
    /// Requested side, defaulting to the front.
    #[must_use]
    pub fn view_side(&self) -> ViewSide {
        self.side
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Design width as a fraction of the print area width, clamped.
    #[must_use]
    pub fn scale(&self) -> f64 {
        finite_or(self.scale, DEFAULT_SCALE).clamp(MIN_SCALE, MAX_SCALE)
    }

    /// Horizontal offset from the centre, in percent of the print area.
    #[must_use]
    pub fn offset_x(&self) -> f64 {
        finite_or(self.offset_x, 0.0).clamp(-MAX_OFFSET, MAX_OFFSET)
    }

    /// Vertical offset from the centre, in percent of the print area.
    #[must_use]
    pub fn offset_y(&self) -> f64 {
        finite_or(self.offset_y, 0.0).clamp(-MAX_OFFSET, MAX_OFFSET)
    }

    /// Rotation in degrees, normalised to `(-180, 180]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        normalize_degrees(finite_or(self.rotation, 0.0))
    }
}

/// What is printed on the garment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignSource {
    /// Remote artwork, http(s) only.
    Image(String),
    /// Custom lettering.
    Text(String),
    /// Nothing yet; the template shows the print-area outline.
    Empty,
}

impl DesignSource {
    /// Pick the design from the request. Artwork wins over text.
    #[must_use]
    pub fn from_params(params: &PreviewParams) -> Self {
        if let Some(raw) = params.design_url.as_deref().filter(|s| !s.trim().is_empty()) {
            match Url::parse(raw.trim()) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {
                    return Self::Image(url.to_string());
                }
                Ok(url) => {
                    tracing::warn!(
                        scheme = url.scheme(),
                        "Ignoring design URL with unsupported scheme"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unparseable design URL");
                }
            }
        }

        params
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or(Self::Empty, |t| {
                Self::Text(t.chars().take(MAX_TEXT_CHARS).collect())
            })
    }
}

/// Placement of the design box on the mockup, in percent of the mockup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub left: f64,
    pub top: f64,
    pub size: f64,
    /// Degrees in `(-180, 180]`.
    pub rotation: f64,
}

impl Overlay {
    /// Inline CSS for the overlay element.
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "left: {:.2}%; top: {:.2}%; width: {:.2}%; height: {:.2}%; transform: rotate({:.1}deg);",
            self.left, self.top, self.size, self.size, self.rotation
        )
    }
}

/// Inline CSS outlining the print area.
#[must_use]
pub fn print_area_style(area: &PrintArea) -> String {
    format!(
        "left: {:.2}%; top: {:.2}%; width: {:.2}%; height: {:.2}%;",
        area.left, area.top, area.width, area.height
    )
}

/// Compute where the design sits inside the print area.
///
/// - `scale` is clamped to `[MIN_SCALE, MAX_SCALE]` of the area width and
///   the box never exceeds the area height.
/// - `offset_x`/`offset_y` move the box from the centre, in percent of the
///   area, clamped so the box stays inside the area.
/// - `rotation` is normalised to `(-180, 180]`.
///
/// Non-finite inputs fall back to their defaults.
#[must_use]
pub fn layout(area: &PrintArea, params: &PreviewParams) -> Overlay {
    let size = (area.width * params.scale()).min(area.height).max(0.0);

    // Zero for a degenerate area, so the offset clamps below stay ordered
    let slack_x = ((area.width - size) / 2.0).max(0.0);
    let slack_y = ((area.height - size) / 2.0).max(0.0);

    let dx = (params.offset_x() / 100.0 * area.width).clamp(-slack_x, slack_x);
    let dy = (params.offset_y() / 100.0 * area.height).clamp(-slack_y, slack_y);

    Overlay {
        left: area.left + slack_x + dx,
        top: area.top + slack_y + dy,
        size,
        rotation: params.rotation(),
    }
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Normalise an angle to `(-180, 180]`.
fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn area() -> PrintArea {
        PrintArea {
            left: 30.0,
            top: 20.0,
            width: 40.0,
            height: 50.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_default_layout_is_centred() {
        let overlay = layout(&area(), &PreviewParams::default());
        assert_close(overlay.size, 24.0);
        assert_close(overlay.left, 30.0 + 8.0);
        assert_close(overlay.top, 20.0 + 13.0);
        assert_close(overlay.rotation, 0.0);
    }

    #[test]
    fn test_scale_is_clamped() {
        let big = PreviewParams {
            scale: Some(5.0),
            ..PreviewParams::default()
        };
        assert_close(layout(&area(), &big).size, 40.0);

        let tiny = PreviewParams {
            scale: Some(0.0),
            ..PreviewParams::default()
        };
        assert_close(layout(&area(), &tiny).size, 4.0);

        let nan = PreviewParams {
            scale: Some(f64::NAN),
            ..PreviewParams::default()
        };
        assert_close(layout(&area(), &nan).size, 24.0);
    }

    #[test]
    fn test_box_never_taller_than_area() {
        let wide = PrintArea {
            left: 10.0,
            top: 40.0,
            width: 80.0,
            height: 20.0,
        };
        let overlay = layout(
            &wide,
            &PreviewParams {
                scale: Some(1.0),
                ..PreviewParams::default()
            },
        );
        assert_close(overlay.size, 20.0);
        assert_close(overlay.top, 40.0);
    }

    #[test]
    fn test_offsets_stay_inside_area() {
        let params = PreviewParams {
            offset_x: Some(100.0),
            offset_y: Some(-100.0),
            ..PreviewParams::default()
        };
        let overlay = layout(&area(), &params);
        let a = area();

        assert_close(overlay.left + overlay.size, a.left + a.width);
        assert_close(overlay.top, a.top);
    }

    #[test]
    fn test_small_offset_moves_box() {
        let params = PreviewParams {
            offset_x: Some(10.0),
            ..PreviewParams::default()
        };
        // 10% of a 40-wide area is 4, within the 8 of slack.
        assert_close(layout(&area(), &params).left, 42.0);
    }

    #[test]
    fn test_rotation_normalised() {
        assert_close(normalize_degrees(190.0), -170.0);
        assert_close(normalize_degrees(-190.0), 170.0);
        assert_close(normalize_degrees(180.0), 180.0);
        assert_close(normalize_degrees(-180.0), 180.0);
        assert_close(normalize_degrees(720.0), 0.0);
    }

    #[test]
    fn test_design_source_prefers_http_image() {
        let params = PreviewParams {
            design_url: Some("https://cdn.example.org/art.png".to_string()),
            text: Some("hello".to_string()),
            ..PreviewParams::default()
        };
        assert_eq!(
            DesignSource::from_params(&params),
            DesignSource::Image("https://cdn.example.org/art.png".to_string())
        );
    }

    #[test]
    fn test_design_source_drops_unsafe_urls() {
        let params = PreviewParams {
            design_url: Some("javascript:alert(1)".to_string()),
            text: Some("  Team Otter  ".to_string()),
            ..PreviewParams::default()
        };
        assert_eq!(
            DesignSource::from_params(&params),
            DesignSource::Text("Team Otter".to_string())
        );

        let nothing = PreviewParams {
            design_url: Some("not a url".to_string()),
            ..PreviewParams::default()
        };
        assert_eq!(DesignSource::from_params(&nothing), DesignSource::Empty);
    }

    #[test]
    fn test_text_is_truncated() {
        let params = PreviewParams {
            text: Some("x".repeat(100)),
            ..PreviewParams::default()
        };
        let DesignSource::Text(text) = DesignSource::from_params(&params) else {
            panic!("expected text design");
        };
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_effective_params_echo_clamped_values() {
        let params = PreviewParams {
            scale: Some(3.0),
            offset_x: Some(-400.0),
            offset_y: Some(f64::INFINITY),
            rotation: Some(270.0),
            ..PreviewParams::default()
        };
        assert_close(params.scale(), MAX_SCALE);
        assert_close(params.offset_x(), -50.0);
        assert_close(params.offset_y(), 0.0);
        assert_close(params.rotation(), -90.0);
    }

    #[test]
    fn test_view_side_defaults_to_front() {
        let back = PreviewParams {
            side: Some("back".to_string()),
            ..PreviewParams::default()
        };
        assert_eq!(back.view_side(), ViewSide::Back);
        assert_eq!(PreviewParams::default().view_side(), ViewSide::Front);
    }

    #[test]
    fn test_style_formats_percentages() {
        let overlay = Overlay {
            left: 38.0,
            top: 33.0,
            size: 24.0,
            rotation: -12.5,
        };
        assert_eq!(
            overlay.style(),
            "left: 38.00%; top: 33.00%; width: 24.00%; height: 24.00%; transform: rotate(-12.5deg);"
        );
    }

    #[test]
    fn test_degenerate_area_does_not_panic() {
        let inverted = PrintArea {
            left: 10.0,
            top: 10.0,
            width: -10.0,
            height: 40.0,
        };
        let params = PreviewParams {
            offset_x: Some(25.0),
            offset_y: Some(-25.0),
            ..PreviewParams::default()
        };

        let overlay = layout(&inverted, &params);
        assert_close(overlay.size, 0.0);
        assert!(overlay.left.is_finite() && overlay.top.is_finite());
    }
}
