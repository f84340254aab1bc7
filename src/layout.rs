//! Layout strategies for placing microphones.
//!
//! Each strategy is a pure function of its parameters: the same inputs
//! always give bit-identical positions, and nothing here touches the
//! filesystem. [ArrayLayout] bundles the strategies behind one type so a
//! layout can be picked at runtime, from the command line or from a RON
//! file:
//!
//! ```text
//! Sunflower(count: 64, max_radius: 0.5, v: 5.0)
//! LinearSpiral(count: 64, start_offset: 0.01, growth_rate: 0.05)
//! Grid(rows: 8, cols: 8, spacing: 0.05)
//! ```

use crate::error::GeomError;
use crate::geometry::{Meters, MicPosition};

use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which formula to place microphones with, and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub enum ArrayLayout {
    /// A `rows` by `cols` rectangle with uniform spacing, centered on the
    /// origin.
    Grid {
        /// Number of rows, along y
        rows: usize,
        /// Number of columns, along x
        cols: usize,
        /// Distance between neighbours
        spacing: Meters,
    },
    /// Radius grows linearly with angle over two full turns.
    LinearSpiral {
        /// Number of microphones
        count: usize,
        /// Radius at angle zero
        start_offset: Meters,
        /// Radius gained per radian
        growth_rate: Meters,
    },
    /// Area-uniform Fermat spiral after Sarradj.
    Sunflower {
        /// Number of microphones
        count: usize,
        /// Radius of the outermost microphone
        max_radius: Meters,
        /// Controls the angular step between successive microphones
        v: f64,
    },
}

impl ArrayLayout {
    /// Computes the positions for this layout.
    pub fn generate(&self) -> Result<Vec<MicPosition>, GeomError> {
        match *self {
            ArrayLayout::Grid {
                rows,
                cols,
                spacing,
            } => generate_grid(rows, cols, spacing),
            ArrayLayout::LinearSpiral {
                count,
                start_offset,
                growth_rate,
            } => generate_linear_spiral(count, start_offset, growth_rate),
            ArrayLayout::Sunflower {
                count,
                max_radius,
                v,
            } => generate_sunflower_spiral(count, max_radius, v),
        }
    }

    /// Number of microphones the layout will produce.
    pub fn mic_count(&self) -> usize {
        match *self {
            ArrayLayout::Grid { rows, cols, .. } => rows * cols,
            ArrayLayout::LinearSpiral { count, .. } | ArrayLayout::Sunflower { count, .. } => {
                count
            }
        }
    }
}

fn require_count(what: &str, count: usize) -> Result<(), GeomError> {
    if count == 0 {
        return Err(GeomError::invalid(format!("{} must be at least 1", what)));
    }
    Ok(())
}

fn require_non_negative(what: &str, value: f64) -> Result<(), GeomError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeomError::invalid(format!(
            "{} must be finite and non-negative, got {}",
            what, value
        )));
    }
    Ok(())
}

fn require_positive(what: &str, value: f64) -> Result<(), GeomError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeomError::invalid(format!(
            "{} must be finite and positive, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Places `count` microphones on a spiral whose radius grows linearly
/// with the angle, `start_offset + growth_rate * angle`. The angles are
/// `count` evenly spaced samples from 0 to 4π, both ends included.
pub fn generate_linear_spiral(
    count: usize,
    start_offset: Meters,
    growth_rate: Meters,
) -> Result<Vec<MicPosition>, GeomError> {
    require_count("count", count)?;
    require_non_negative("start_offset", start_offset)?;
    require_non_negative("growth_rate", growth_rate)?;

    let end = 4.0 * PI;
    let step = if count > 1 {
        end / (count - 1) as f64
    } else {
        0.0
    };

    debug!(
        "linear spiral: {} mics, a={}, b={}, step={}",
        count, start_offset, growth_rate, step
    );

    Ok((0..count)
        .map(|i| if i == count - 1 && count > 1 { end } else { i as f64 * step })
        .map(|angle| MicPosition::from_polar(start_offset + growth_rate * angle, angle))
        .collect())
}

/// Places `count` microphones on a sunflower spiral. Microphone `m`, for
/// `m` in `1..=count`, sits at radius `max_radius * sqrt(m / count)` and
/// angle `2π * m * (1 + sqrt(v)) / 2`.
///
/// Values of `v` that make `(1 + sqrt(v)) / 2` a fraction with a small
/// denominator line the microphones up in a few radial spokes; `v = 5`
/// gives the golden ratio and the most even coverage.
pub fn generate_sunflower_spiral(
    count: usize,
    max_radius: Meters,
    v: f64,
) -> Result<Vec<MicPosition>, GeomError> {
    require_count("count", count)?;
    require_positive("max_radius", max_radius)?;
    require_non_negative("V", v)?;

    let turn_fraction = (1.0 + v.sqrt()) / 2.0;
    debug!(
        "sunflower spiral: {} mics, r_max={}, V={}, turn fraction={}",
        count, max_radius, v, turn_fraction
    );

    Ok((1..=count)
        .map(|m| {
            let radius = max_radius * (m as f64 / count as f64).sqrt();
            let angle = 2.0 * PI * m as f64 * turn_fraction;
            MicPosition::from_polar(radius, angle)
        })
        .collect())
}

/// Places `rows * cols` microphones on a rectangular grid centered on the
/// origin, in row-major order starting at the most negative corner.
pub fn generate_grid(
    rows: usize,
    cols: usize,
    spacing: Meters,
) -> Result<Vec<MicPosition>, GeomError> {
    require_count("rows", rows)?;
    require_count("cols", cols)?;
    require_positive("spacing", spacing)?;

    let x_off = (cols - 1) as f64 / 2.0;
    let y_off = (rows - 1) as f64 / 2.0;
    debug!("grid: {}x{} mics, spacing={}", rows, cols, spacing);

    Ok((0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| {
                MicPosition::new(
                    (c as f64 - x_off) * spacing,
                    (r as f64 - y_off) * spacing,
                    0.0,
                )
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radii(positions: &[MicPosition]) -> Vec<f64> {
        positions.iter().map(MicPosition::radius).collect()
    }

    fn non_decreasing(v: &[f64]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1] + 1e-12)
    }

    #[test]
    fn linear_spiral_count_and_plane() {
        for count in [1, 2, 7, 64, 100] {
            let mics = generate_linear_spiral(count, 0.01, 0.05).unwrap();
            assert_eq!(mics.len(), count);
            assert!(mics.iter().all(|p| p.z == 0.0));
        }
    }

    #[test]
    fn linear_spiral_single_mic() {
        let mics = generate_linear_spiral(1, 0.25, 0.05).unwrap();
        assert_eq!(mics, vec![MicPosition::new(0.25, 0.0, 0.0)]);
    }

    #[test]
    fn linear_spiral_spans_two_turns() {
        let (a, b) = (0.01, 0.05);
        let mics = generate_linear_spiral(64, a, b).unwrap();
        assert!(non_decreasing(&radii(&mics)));

        // first and last sample both lie on the positive x axis
        assert!(mics[0].dist(&MicPosition::new(a, 0.0, 0.0)) < 1e-12);
        let r_end = a + b * 4.0 * PI;
        assert!(mics[63].dist(&MicPosition::new(r_end, 0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn linear_spiral_positions_are_distinct() {
        let mics = generate_linear_spiral(64, 0.01, 0.05).unwrap();
        for (i, p1) in mics.iter().enumerate() {
            for p2 in &mics[i + 1..] {
                assert!(p1.dist(p2) > 1e-6);
            }
        }
    }

    #[test]
    fn linear_spiral_rejects_bad_input() {
        assert!(matches!(
            generate_linear_spiral(0, 0.01, 0.05),
            Err(GeomError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_linear_spiral(10, -0.01, 0.05),
            Err(GeomError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_linear_spiral(10, 0.01, f64::NAN),
            Err(GeomError::InvalidParameter(_))
        ));
        for bad in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                generate_linear_spiral(10, bad, 0.05),
                Err(GeomError::InvalidParameter(_))
            ));
        }
        assert!(matches!(
            generate_linear_spiral(10, 0.01, f64::INFINITY),
            Err(GeomError::InvalidParameter(_))
        ));
    }

    #[test]
    fn sunflower_64_mics() {
        let mics = generate_sunflower_spiral(64, 1.0, 1.5).unwrap();
        assert_eq!(mics.len(), 64);
        assert!(mics.iter().all(|p| p.z == 0.0));

        let r = radii(&mics);
        assert!(non_decreasing(&r));
        assert!((r[0] - 0.125).abs() < 1e-9);
        assert!((r[63] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sunflower_outermost_is_max_radius() {
        for count in [1, 3, 17, 128] {
            let mics = generate_sunflower_spiral(count, 0.7, 5.0).unwrap();
            assert_eq!(mics.len(), count);
            let last = mics.last().unwrap();
            assert!((last.radius() - 0.7).abs() < 1e-9);
        }
    }

    #[test]
    fn sunflower_rejects_bad_input() {
        assert!(matches!(
            generate_sunflower_spiral(10, 1.0, -1.0),
            Err(GeomError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_sunflower_spiral(0, 1.0, 5.0),
            Err(GeomError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_sunflower_spiral(10, 0.0, 5.0),
            Err(GeomError::InvalidParameter(_))
        ));
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                generate_sunflower_spiral(10, bad, 5.0),
                Err(GeomError::InvalidParameter(_))
            ));
            assert!(matches!(
                generate_sunflower_spiral(10, 1.0, bad),
                Err(GeomError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn generators_are_deterministic() {
        let layouts = [
            ArrayLayout::LinearSpiral {
                count: 64,
                start_offset: 0.01,
                growth_rate: 0.05,
            },
            ArrayLayout::Sunflower {
                count: 64,
                max_radius: 0.5,
                v: 5.0,
            },
            ArrayLayout::Grid {
                rows: 8,
                cols: 8,
                spacing: 0.05,
            },
        ];
        for layout in layouts {
            let first = layout.generate().unwrap();
            let second = layout.generate().unwrap();
            assert_eq!(first.len(), layout.mic_count());
            assert!(first
                .iter()
                .zip(&second)
                .all(|(a, b)| a.x.to_bits() == b.x.to_bits()
                    && a.y.to_bits() == b.y.to_bits()
                    && a.z.to_bits() == b.z.to_bits()));
        }
    }

    #[test]
    fn grid_is_centered() {
        let mics = generate_grid(3, 4, 0.1).unwrap();
        assert_eq!(mics.len(), 12);
        assert!((mics[0].x + 0.15).abs() < 1e-12);
        assert!((mics[0].y + 0.1).abs() < 1e-12);
        assert!((mics[11].x - 0.15).abs() < 1e-12);
        assert!((mics[11].y - 0.1).abs() < 1e-12);

        let (sx, sy) = mics.iter().fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
        assert!(sx.abs() < 1e-12 && sy.abs() < 1e-12);
    }

    #[test]
    fn grid_rejects_bad_input() {
        assert!(generate_grid(0, 4, 0.1).is_err());
        assert!(generate_grid(4, 0, 0.1).is_err());
        assert!(generate_grid(4, 4, -0.1).is_err());
    }

    #[test]
    fn layout_from_ron() {
        let layout: ArrayLayout =
            ron::from_str("Sunflower(count: 32, max_radius: 0.5, v: 5.0)").unwrap();
        assert_eq!(
            layout,
            ArrayLayout::Sunflower {
                count: 32,
                max_radius: 0.5,
                v: 5.0
            }
        );
        assert_eq!(layout.generate().unwrap().len(), 32);
    }
}
