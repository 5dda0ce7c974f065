//! Radar chart of a trait vector
//!
//! One axis per trait, starting straight up and proceeding clockwise. Values
//! are clamped to `[0, range_max]` and mapped onto a unit radius. The polygon
//! is closed: the first vertex is repeated at the end.

use std::f64::consts::PI;
use std::fmt::Write as _;

use crate::traits::{SCORE_MAX, TraitVector};

const GRID_RINGS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct Axis {
    pub label: String,
    pub value: f64,
    /// Unit direction of the axis, y pointing down as in screen space
    pub direction: Vertex,
}

#[derive(Debug, Clone)]
pub struct RadarChart {
    pub axes: Vec<Axis>,
    pub range_max: f64,
}

impl RadarChart {
    pub fn new(vector: &TraitVector) -> Self {
        Self::with_range(vector, SCORE_MAX)
    }

    pub fn with_range(vector: &TraitVector, range_max: f64) -> Self {
        let n = vector.len();
        let axes = vector
            .iter()
            .enumerate()
            .map(|(i, (t, score))| {
                let angle = -PI / 2.0 + 2.0 * PI * i as f64 / n as f64;
                Axis {
                    label: t.name().to_string(),
                    value: score.clamp(0.0, range_max),
                    direction: Vertex {
                        x: angle.cos(),
                        y: angle.sin(),
                    },
                }
            })
            .collect();
        Self { axes, range_max }
    }

    /// Closed polygon in unit space (radius 1 = `range_max`)
    pub fn polygon(&self) -> Vec<Vertex> {
        let mut points: Vec<Vertex> = self
            .axes
            .iter()
            .map(|a| {
                let r = a.value / self.range_max;
                Vertex {
                    x: a.direction.x * r,
                    y: a.direction.y * r,
                }
            })
            .collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        points
    }

    /// Closed polygon for one grid ring at `fraction` of the radius
    pub fn ring(&self, fraction: f64) -> Vec<Vertex> {
        let mut points: Vec<Vertex> = self
            .axes
            .iter()
            .map(|a| Vertex {
                x: a.direction.x * fraction,
                y: a.direction.y * fraction,
            })
            .collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        points
    }

    pub fn grid_fractions() -> impl Iterator<Item = f64> {
        (1..=GRID_RINGS).map(|i| i as f64 / GRID_RINGS as f64)
    }

    /// Render as a standalone SVG document of `size` x `size` pixels
    pub fn to_svg(&self, size: u32) -> String {
        let size = size as f64;
        let center = size / 2.0;
        let radius = size * 0.35;
        let to_screen = |v: &Vertex| (center + v.x * radius, center + v.y * radius);
        let points_attr = |vs: &[Vertex]| {
            vs.iter()
                .map(|v| {
                    let (x, y) = to_screen(v);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        );
        let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);

        for fraction in Self::grid_fractions() {
            let _ = writeln!(
                svg,
                r##"  <polygon points="{}" fill="none" stroke="#cccccc" stroke-width="1"/>"##,
                points_attr(&self.ring(fraction))
            );
        }

        for axis in &self.axes {
            let (x, y) = to_screen(&axis.direction);
            let _ = writeln!(
                svg,
                r##"  <line x1="{center:.2}" y1="{center:.2}" x2="{x:.2}" y2="{y:.2}" stroke="#999999" stroke-width="1"/>"##
            );
            let (lx, ly) = (center + axis.direction.x * radius * 1.18, center + axis.direction.y * radius * 1.18);
            let anchor = if axis.direction.x > 0.2 {
                "start"
            } else if axis.direction.x < -0.2 {
                "end"
            } else {
                "middle"
            };
            let _ = writeln!(
                svg,
                r#"  <text x="{lx:.2}" y="{ly:.2}" font-family="sans-serif" font-size="12" text-anchor="{anchor}">{} ({:.1})</text>"#,
                escape_xml(&axis.label),
                axis.value
            );
        }

        let _ = writeln!(
            svg,
            r##"  <polygon points="{}" fill="#4f7cff" fill-opacity="0.35" stroke="#2a4fd6" stroke-width="2"/>"##,
            points_attr(&self.polygon())
        );
        svg.push_str("</svg>\n");
        svg
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
