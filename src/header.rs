use serde::Serialize;

use crate::animation::interpolate;

/// Scroll distance over which the results header turns from transparent to opaque.
pub const HEADER_FADE_PX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let channel = |from: u8, to: u8| -> u8 {
            (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
        };
        Rgba {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusBarStyle {
    LightContent,
    DarkContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderAppearance {
    pub background: Rgba,
    pub border: Rgba,
    pub text: Rgba,
    pub status_bar: StatusBarStyle,
}

const BACKGROUND_TOP: Rgba = Rgba::new(0, 0, 0, 0.1);
const BACKGROUND_SCROLLED: Rgba = Rgba::new(255, 255, 255, 0.98);
const BORDER_TOP: Rgba = Rgba::new(0, 0, 0, 0.0);
const BORDER_SCROLLED: Rgba = Rgba::new(0, 0, 0, 0.1);
const TEXT_TOP: Rgba = Rgba::new(255, 255, 255, 1.0);
const TEXT_SCROLLED: Rgba = Rgba::new(0, 0, 0, 1.0);

impl HeaderAppearance {
    /// Header colours for a vertical scroll offset of the results list.
    ///
    /// Colours blend continuously; the status bar flips once the offset
    /// passes [`HEADER_FADE_PX`].
    pub fn at_scroll(offset_px: f64) -> Self {
        let t = interpolate(offset_px, &[0.0, HEADER_FADE_PX], &[0.0, 1.0]);
        Self {
            background: BACKGROUND_TOP.lerp(BACKGROUND_SCROLLED, t),
            border: BORDER_TOP.lerp(BORDER_SCROLLED, t),
            text: TEXT_TOP.lerp(TEXT_SCROLLED, t),
            status_bar: if offset_px > HEADER_FADE_PX {
                StatusBarStyle::DarkContent
            } else {
                StatusBarStyle::LightContent
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_of_list_is_translucent_dark() {
        let header = HeaderAppearance::at_scroll(0.0);
        assert_eq!(header.background, BACKGROUND_TOP);
        assert_eq!(header.text, TEXT_TOP);
        assert_eq!(header.status_bar, StatusBarStyle::LightContent);
    }

    #[test]
    fn test_halfway_blends_colours() {
        let header = HeaderAppearance::at_scroll(50.0);
        assert_eq!(header.text.r, 128);
        assert!((header.background.a - 0.54).abs() < 1e-9);
        assert_eq!(header.status_bar, StatusBarStyle::LightContent);
    }

    #[test]
    fn test_status_bar_flips_past_threshold() {
        assert_eq!(
            HeaderAppearance::at_scroll(100.0).status_bar,
            StatusBarStyle::LightContent
        );
        let scrolled = HeaderAppearance::at_scroll(240.0);
        assert_eq!(scrolled.status_bar, StatusBarStyle::DarkContent);
        assert_eq!(scrolled.background, BACKGROUND_SCROLLED);
        assert_eq!(scrolled.text.css(), "rgba(0,0,0,1)");
    }
}
