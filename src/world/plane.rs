use glam::{DVec2, DVec3};

/// Which of a sector's two surfaces an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneSide {
    Floor,
    Ceiling,
}

impl PlaneSide {
    pub const BOTH: [PlaneSide; 2] = [PlaneSide::Floor, PlaneSide::Ceiling];

    /// Floors face up, ceilings face down.
    #[inline]
    pub fn prefers_up(self) -> bool {
        self == PlaneSide::Floor
    }
}

/// `normal · (x, y, z) + d = 0` for every point on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub d: f64,
}

impl Plane {
    pub const UNIT_TOLERANCE: f64 = 1e-6;

    #[inline]
    pub fn new(normal: DVec3, d: f64) -> Self {
        Plane { normal, d }
    }

    /// Horizontal floor at `height`.
    pub fn flat_floor(height: f64) -> Self {
        Plane::new(DVec3::Z, -height)
    }

    /// Horizontal ceiling at `height`.
    pub fn flat_ceiling(height: f64) -> Self {
        Plane::new(DVec3::NEG_Z, height)
    }

    pub fn flat(side: PlaneSide, height: f64) -> Self {
        match side {
            PlaneSide::Floor => Plane::flat_floor(height),
            PlaneSide::Ceiling => Plane::flat_ceiling(height),
        }
    }

    /// Surface height above `p`. Undefined for vertical planes.
    #[inline]
    pub fn z_at(&self, p: DVec2) -> f64 {
        -(self.d + self.normal.x * p.x + self.normal.y * p.y) / self.normal.z
    }

    /// Signed distance of `p` from the surface.
    #[inline]
    pub fn distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) + self.d
    }

    pub fn is_sloped(&self) -> bool {
        self.normal.x != 0.0 || self.normal.y != 0.0
    }

    /// Finite, unit length and not vertical.
    pub fn is_valid(&self) -> bool {
        self.normal.is_finite()
            && self.d.is_finite()
            && (self.normal.length() - 1.0).abs() <= Self::UNIT_TOLERANCE
            && self.normal.z != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn flat_planes_evaluate_to_height() {
        let floor = Plane::flat_floor(-24.0);
        let ceil = Plane::flat_ceiling(128.0);
        let p = DVec2::new(512.0, -64.0);
        assert_approx_eq!(floor.z_at(p), -24.0);
        assert_approx_eq!(ceil.z_at(p), 128.0);
        assert!(floor.is_valid() && ceil.is_valid());
        assert!(!floor.is_sloped());
    }

    #[test]
    fn zero_normal_is_invalid() {
        assert!(!Plane::new(DVec3::ZERO, 0.0).is_valid());
        assert!(!Plane::new(DVec3::new(f64::NAN, 0.0, 1.0), 0.0).is_valid());
        assert!(!Plane::new(DVec3::X, 0.0).is_valid());
    }
}
