use crate::{
    config::GunConfig,
    error::GeneratorError,
    event::{Event, Particle, Status, Vertex},
    kinematics::{FourVector, delta_r, eta_to_theta, theta_to_eta},
    masses::MassTable,
};
use itertools::Itertools;
use particle_gun_common::{EventNumber, Pid};
use rand::{
    Rng,
    distr::{Distribution, Uniform, slice::Choose},
};
use std::f64::consts::PI;
use tracing::{debug, warn};

pub(crate) const BEAM_PID: Pid = 11;
/// Energy of each beam, in GeV.
pub(crate) const BEAM_ENERGY: f64 = 125.0;

/// The two counter-rotating beam particles entering every event.
pub(crate) fn beam_particles() -> [Particle; 2] {
    [BEAM_ENERGY, -BEAM_ENERGY].map(|pz| {
        Particle::new(
            FourVector::new(0.0, 0.0, pz, BEAM_ENERGY),
            BEAM_PID,
            Status::Incoming,
        )
    })
}

/// The direction every outgoing particle of an event is scattered around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Direction {
    pub(crate) theta: f64,
    pub(crate) eta: f64,
    pub(crate) phi: f64,
}

fn invalid_range(name: &'static str) -> impl FnOnce(rand::distr::uniform::Error) -> GeneratorError {
    move |e| GeneratorError::InvalidRange {
        name,
        reason: e.to_string(),
    }
}

/// Samples events from a validated configuration.
///
/// All distributions are built once up front; each call to [`generate`]
/// only draws from them, so the random source passed in fully determines
/// the event.
///
/// [`generate`]: ParticleGun::generate
pub(crate) struct ParticleGun<'a> {
    masses: &'a MassTable,
    pid: Choose<'a, Pid>,
    multiplicity: Uniform<u32>,
    theta_degrees: Uniform<f64>,
    phi: Uniform<f64>,
    log_momentum: Uniform<f64>,
    offset_angle: Uniform<f64>,
    unit: Uniform<f64>,
    drmax: f64,
}

impl<'a> ParticleGun<'a> {
    pub(crate) fn new(config: &'a GunConfig, masses: &'a MassTable) -> Result<Self, GeneratorError> {
        for pid in config
            .pid_list
            .iter()
            .unique()
            .filter(|pid| !masses.contains(**pid))
        {
            warn!(pid, "Particle id not in mass table, treating as massless");
        }

        let npart = &config.npart_range;
        let theta = &config.theta_range;
        let mom = &config.mom_range;
        Ok(Self {
            masses,
            pid: Choose::new(&config.pid_list).map_err(|_| GeneratorError::EmptyPidList)?,
            multiplicity: Uniform::new_inclusive(npart.min, npart.max)
                .map_err(invalid_range("npart"))?,
            theta_degrees: Uniform::new_inclusive(theta.min, theta.max)
                .map_err(invalid_range("theta"))?,
            phi: Uniform::new_inclusive(-PI, PI).map_err(invalid_range("phi"))?,
            log_momentum: Uniform::new_inclusive(mom.min.ln(), mom.max.ln())
                .map_err(invalid_range("momentum"))?,
            offset_angle: Uniform::new(-PI, PI).map_err(invalid_range("offset angle"))?,
            unit: Uniform::new_inclusive(0.0, 1.0).map_err(invalid_range("unit"))?,
            drmax: config.drmax,
        })
    }

    /// Draws the seed direction of an event.
    pub(crate) fn sample_direction<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        let theta = self.theta_degrees.sample(rng).to_radians();
        let phi = self.phi.sample(rng);
        Direction {
            theta,
            eta: theta_to_eta(theta),
            phi,
        }
    }

    pub(crate) fn generate<R: Rng + ?Sized>(&self, number: EventNumber, rng: &mut R) -> Event {
        let direction = self.sample_direction(rng);
        self.generate_around(number, &direction, rng)
    }

    /// Generates an event whose outgoing particles all lie within `drmax`
    /// of `direction` in (η, φ).
    pub(crate) fn generate_around<R: Rng + ?Sized>(
        &self,
        number: EventNumber,
        direction: &Direction,
        rng: &mut R,
    ) -> Event {
        let multiplicity = self.multiplicity.sample(rng);
        debug!(
            number,
            multiplicity,
            eta = direction.eta,
            phi = direction.phi,
            "Generating event"
        );

        let mut vertex = Vertex::at_origin();
        for beam in beam_particles() {
            vertex.add_particle_in(beam);
        }
        for _ in 0..multiplicity {
            vertex.add_particle_out(self.shoot(direction, rng));
        }

        let mut event = Event::new(number);
        event.add_vertex(vertex);
        event
    }

    fn shoot<R: Rng + ?Sized>(&self, direction: &Direction, rng: &mut R) -> Particle {
        let pid = *self.pid.sample(rng);
        let (eta, phi) = self.offset(direction, rng);
        let theta = eta_to_theta(eta);
        let momentum = self.log_momentum.sample(rng).exp();
        let mass = self.masses.mass(pid);
        Particle::new(
            FourVector::from_spherical(momentum, theta, phi, mass),
            pid,
            Status::Outgoing,
        )
        .with_generated_mass(mass)
    }

    /// Uniform point in the disk of radius `drmax` around the seed direction.
    fn offset<R: Rng + ?Sized>(&self, direction: &Direction, rng: &mut R) -> (f64, f64) {
        if self.drmax <= 0.0 {
            return (direction.eta, direction.phi);
        }
        let radius = self.drmax * self.unit.sample(rng).sqrt();
        let angle = self.offset_angle.sample(rng);
        let (eta, phi) = (
            direction.eta + radius * angle.cos(),
            direction.phi + radius * angle.sin(),
        );
        debug_assert!(
            delta_r(eta, phi, direction.eta, direction.phi) <= self.drmax * (1.0 + 1e-12)
        );
        (eta, phi)
    }
}
