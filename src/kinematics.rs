//! Four-vector and three-vector types used by reconstructed objects.
//!
//! Conventions follow the usual collider ones: `px, py, pz` in GeV/c,
//! `e` in GeV, pseudorapidity computed from the polar angle.

use std::ops::Add;

/// Pseudorapidity returned for objects with no transverse momentum.
const ETA_AT_ZERO_PT: f64 = 1e10;

/// A Lorentz four-momentum `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LorentzVector {
    /// x component of the momentum
    pub px: f64,
    /// y component of the momentum
    pub py: f64,
    /// z component of the momentum
    pub pz: f64,
    /// Energy
    pub e: f64,
}

impl LorentzVector {
    /// Create a four-vector from cartesian components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Create a four-vector from transverse momentum, pseudorapidity, azimuth and mass.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        let pt = pt.abs();
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        let e = if m >= 0.0 {
            (p2 + m * m).sqrt()
        } else {
            (p2 - m * m).max(0.0).sqrt()
        };
        Self { px, py, pz, e }
    }

    /// Invariant mass squared.
    pub fn m2(&self) -> f64 {
        self.e * self.e - self.p2()
    }

    /// Invariant mass. A negative mass squared yields a negative mass.
    pub fn m(&self) -> f64 {
        let m2 = self.m2();
        if m2 < 0.0 {
            -(-m2).sqrt()
        } else {
            m2.sqrt()
        }
    }

    /// Squared momentum magnitude.
    pub fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Momentum magnitude.
    pub fn p(&self) -> f64 {
        self.p2().sqrt()
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuthal angle in `(-pi, pi]`.
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 {
            0.0
        } else {
            self.py.atan2(self.px)
        }
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            return if self.pz >= 0.0 {
                ETA_AT_ZERO_PT
            } else {
                -ETA_AT_ZERO_PT
            };
        }
        (self.pz / pt).asinh()
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, rhs: Self) -> Self::Output {
        LorentzVector {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

/// A cartesian three-vector, used for vertex positions and their errors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
}

impl Vector3 {
    /// Create a three-vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn mag(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}
