use crate::kinematics::FourVector;
use particle_gun_common::{EventNumber, Mass, Pid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum MomentumUnit {
    #[strum(to_string = "GEV")]
    GeV,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum LengthUnit {
    #[strum(to_string = "MM")]
    Mm,
}

/// Particle status codes as written to the event record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Status {
    /// Final state particle leaving the interaction.
    Outgoing,
    /// Beam particle entering the interaction.
    Incoming,
}

impl Status {
    pub(crate) fn code(&self) -> i32 {
        match self {
            Status::Outgoing => 1,
            Status::Incoming => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Particle {
    pub(crate) momentum: FourVector,
    pub(crate) pid: Pid,
    pub(crate) status: Status,
    generated_mass: Option<Mass>,
}

impl Particle {
    pub(crate) fn new(momentum: FourVector, pid: Pid, status: Status) -> Self {
        Self {
            momentum,
            pid,
            status,
            generated_mass: None,
        }
    }

    pub(crate) fn with_generated_mass(self, mass: Mass) -> Self {
        Self {
            generated_mass: Some(mass),
            ..self
        }
    }

    /// The mass the particle was generated with, falling back to the
    /// invariant mass of its momentum.
    pub(crate) fn generated_mass(&self) -> Mass {
        self.generated_mass.unwrap_or_else(|| self.momentum.m())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Vertex {
    pub(crate) status: i32,
    incoming: Vec<Particle>,
    outgoing: Vec<Particle>,
}

impl Vertex {
    pub(crate) fn at_origin() -> Self {
        Self {
            status: 0,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub(crate) fn add_particle_in(&mut self, particle: Particle) {
        self.incoming.push(particle);
    }

    pub(crate) fn add_particle_out(&mut self, particle: Particle) {
        self.outgoing.push(particle);
    }

    pub(crate) fn particles_in(&self) -> &[Particle] {
        &self.incoming
    }

    pub(crate) fn particles_out(&self) -> &[Particle] {
        &self.outgoing
    }
}

/// A generated event: a list of vertices, each owning its incoming and
/// outgoing legs.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Event {
    pub(crate) number: EventNumber,
    pub(crate) momentum_unit: MomentumUnit,
    pub(crate) length_unit: LengthUnit,
    vertices: Vec<Vertex>,
}

impl Event {
    pub(crate) fn new(number: EventNumber) -> Self {
        Self {
            number,
            momentum_unit: MomentumUnit::GeV,
            length_unit: LengthUnit::Mm,
            vertices: Vec::new(),
        }
    }

    pub(crate) fn add_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Every particle in record order: each vertex's incoming legs followed
    /// by its outgoing legs.
    pub(crate) fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.vertices
            .iter()
            .flat_map(|vertex| vertex.incoming.iter().chain(vertex.outgoing.iter()))
    }

    #[cfg(test)]
    pub(crate) fn incoming(&self) -> impl Iterator<Item = &Particle> {
        self.vertices.iter().flat_map(|vertex| vertex.incoming.iter())
    }

    pub(crate) fn outgoing(&self) -> impl Iterator<Item = &Particle> {
        self.vertices.iter().flat_map(|vertex| vertex.outgoing.iter())
    }
}
