//! Positions of microphones in space, and the array they make up together.

use std::fmt::Display;

/// Meters.
pub type Meters = f64;

/// A single microphone, in cartesian coordinates relative to the array
/// center.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct MicPosition {
    /// X position in cartesian coordinates
    pub x: Meters,
    /// Y position in cartesian coordinates
    pub y: Meters,
    /// Z position in cartesian coordinates
    pub z: Meters,
}

impl MicPosition {
    /// Builds a position from its three coordinates.
    pub fn new(x: Meters, y: Meters, z: Meters) -> Self {
        Self { x, y, z }
    }

    /// Builds a position in the `z = 0` plane from polar coordinates.
    pub fn from_polar(radius: Meters, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
            z: 0.0,
        }
    }

    /// Distance from the z axis.
    pub fn radius(&self) -> Meters {
        self.x.hypot(self.y)
    }

    /// Straight line distance to another position.
    pub fn dist(&self, other: &Self) -> Meters {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }

    /// Straight line distance to a location given as `[x, y, z]`.
    pub fn dist_to(&self, loc: [Meters; 3]) -> Meters {
        self.dist(&MicPosition::new(loc[0], loc[1], loc[2]))
    }
}

impl Display for MicPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// An ordered, named set of microphone positions. Once built it is never
/// changed, only read.
#[derive(Debug, Clone, PartialEq)]
pub struct MicGeometry {
    name: String,
    positions: Vec<MicPosition>,
}

impl MicGeometry {
    /// Wraps positions into a geometry called `name`.
    pub fn new(name: impl Into<String>, positions: Vec<MicPosition>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }

    /// The name the array was stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positions in microphone order.
    pub fn positions(&self) -> &[MicPosition] {
        &self.positions
    }

    /// Number of microphones.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The mean of all microphone positions, or the origin if there are
    /// none.
    pub fn center(&self) -> MicPosition {
        if self.positions.is_empty() {
            return MicPosition::default();
        }
        let n = self.positions.len() as f64;
        let sum = self
            .positions
            .iter()
            .fold(MicPosition::default(), |acc, p| MicPosition {
                x: acc.x + p.x,
                y: acc.y + p.y,
                z: acc.z + p.z,
            });
        MicPosition::new(sum.x / n, sum.y / n, sum.z / n)
    }

    /// The largest distance between any two microphones.
    pub fn aperture(&self) -> Meters {
        let positions = &self.positions;
        positions
            .iter()
            .enumerate()
            .flat_map(|(i, p1)| positions[i + 1..].iter().map(move |p2| p1.dist(p2)))
            .fold(0.0, f64::max)
    }
}
