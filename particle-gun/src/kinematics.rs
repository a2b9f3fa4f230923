//! Four-vectors and the angular coordinates used to aim the gun.
use particle_gun_common::{Mass, Momentum};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct FourVector {
    pub(crate) px: f64,
    pub(crate) py: f64,
    pub(crate) pz: f64,
    pub(crate) e: f64,
}

impl FourVector {
    pub(crate) const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Builds the on-shell four-momentum of a particle of mass `mass`
    /// travelling with momentum `p` along polar angle `theta` and azimuth `phi`.
    pub(crate) fn from_spherical(p: Momentum, theta: f64, phi: f64, mass: Mass) -> Self {
        let px = p * theta.sin() * phi.cos();
        let py = p * theta.sin() * phi.sin();
        let pz = p * theta.cos();
        let e = f64::sqrt(px * px + py * py + pz * pz + mass * mass);
        Self { px, py, pz, e }
    }

    pub(crate) fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    pub(crate) fn m2(&self) -> f64 {
        self.e * self.e - self.p2()
    }

    /// Invariant mass; space-like vectors give a negative value.
    pub(crate) fn m(&self) -> f64 {
        let m2 = self.m2();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }
}

#[cfg(test)]
impl FourVector {
    pub(crate) fn p(&self) -> f64 {
        self.p2().sqrt()
    }

    pub(crate) fn theta(&self) -> f64 {
        f64::atan2(self.px.hypot(self.py), self.pz)
    }

    pub(crate) fn phi(&self) -> f64 {
        f64::atan2(self.py, self.px)
    }

    pub(crate) fn eta(&self) -> f64 {
        theta_to_eta(self.theta())
    }
}

/// Pseudorapidity of a polar angle: η = −ln(tan(θ/2)).
pub(crate) fn theta_to_eta(theta: f64) -> f64 {
    -f64::ln(f64::tan(theta / 2.0))
}

pub(crate) fn eta_to_theta(eta: f64) -> f64 {
    2.0 * f64::atan(f64::exp(-eta))
}

/// Euclidean distance in (η, φ) space. φ is not wrapped.
pub(crate) fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    f64::hypot(eta1 - eta2, phi1 - phi2)
}
