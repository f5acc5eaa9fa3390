//! Visual styling for route layers.

use crate::surface::{MarkerIcon, MarkerOptions, PolylineOptions};

/// Colours, stroke widths and arrow density for a rendered route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStyle {
    /// Wide, faint stroke drawn beneath the route.
    pub outline: PolylineOptions,
    /// Narrow, opaque stroke drawn above the outline.
    pub primary: PolylineOptions,
    /// Pin colour at the origin.
    pub start_color: String,
    /// Pin colour at the destination.
    pub end_color: String,
    /// Fill colour of direction arrows.
    pub arrow_color: String,
    /// Upper bound on direction arrows, whatever the route length.
    pub max_arrows: usize,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            outline: PolylineOptions {
                color: "#1e3a8a".to_owned(),
                weight: 10.0,
                opacity: 0.25,
            },
            primary: PolylineOptions {
                color: "#3b82f6".to_owned(),
                weight: 5.0,
                opacity: 0.9,
            },
            start_color: "#16a34a".to_owned(),
            end_color: "#dc2626".to_owned(),
            arrow_color: "#1d4ed8".to_owned(),
            max_arrows: 5,
        }
    }
}

impl RouteStyle {
    /// Set the arrow cap.
    #[must_use]
    pub const fn with_max_arrows(mut self, max_arrows: usize) -> Self {
        self.max_arrows = max_arrows;
        self
    }

    pub(crate) fn start_marker(&self) -> MarkerOptions {
        pin(&self.start_color)
    }

    pub(crate) fn end_marker(&self) -> MarkerOptions {
        pin(&self.end_color)
    }

    pub(crate) fn arrow_marker(&self, rotation_deg: f64) -> MarkerOptions {
        MarkerOptions {
            icon: MarkerIcon::Arrow {
                color: self.arrow_color.clone(),
                rotation_deg,
            },
            interactive: false,
        }
    }
}

fn pin(color: &str) -> MarkerOptions {
    MarkerOptions {
        icon: MarkerIcon::Pin {
            color: color.to_owned(),
        },
        interactive: true,
    }
}
