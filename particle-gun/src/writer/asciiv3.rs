use super::{EventWriter, format::Scientific};
use crate::{
    error::WriterError,
    event::{Event, Particle, Vertex},
};
use itertools::Itertools;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, instrument};

pub(crate) const HEPMC_VERSION: &str = "3.02.06";
const START_LISTING: &str = "HepMC::Asciiv3-START_EVENT_LISTING";
const END_LISTING: &str = "HepMC::Asciiv3-END_EVENT_LISTING";

/// Writes events in the HepMC3 `Asciiv3` text format.
///
/// Particles are numbered from 1 in record order and vertices from -1.
/// Each vertex line is emitted after its incoming particles and before
/// its outgoing ones.
pub(crate) struct Asciiv3Writer<W: Write> {
    inner: W,
    finished: bool,
}

impl Asciiv3Writer<BufWriter<File>> {
    pub(crate) fn create(path: &Path) -> Result<Self, WriterError> {
        debug!("Creating {}", path.display());
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> Asciiv3Writer<W> {
    pub(crate) fn new(mut inner: W) -> Result<Self, WriterError> {
        writeln!(inner, "HepMC::Version {HEPMC_VERSION}")?;
        writeln!(inner, "{START_LISTING}")?;
        Ok(Self {
            inner,
            finished: false,
        })
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.inner
    }

    fn write_particle(
        &mut self,
        id: usize,
        production_vertex: i64,
        particle: &Particle,
    ) -> Result<(), WriterError> {
        let momentum = &particle.momentum;
        writeln!(
            self.inner,
            "P {id} {production_vertex} {} {} {} {} {} {} {}",
            particle.pid,
            Scientific(momentum.px),
            Scientific(momentum.py),
            Scientific(momentum.pz),
            Scientific(momentum.e),
            Scientific(particle.generated_mass()),
            particle.status.code()
        )?;
        Ok(())
    }

    fn write_vertex(
        &mut self,
        id: i64,
        vertex: &Vertex,
        incoming_ids: &[usize],
    ) -> Result<(), WriterError> {
        writeln!(
            self.inner,
            "V {id} {} [{}]",
            vertex.status,
            incoming_ids.iter().join(",")
        )?;
        Ok(())
    }
}

impl<W: Write> EventWriter for Asciiv3Writer<W> {
    #[instrument(skip_all, level = "trace", fields(number = event.number))]
    fn write_event(&mut self, event: &Event) -> Result<(), WriterError> {
        if self.finished {
            return Err(WriterError::Finished(event.number));
        }

        writeln!(
            self.inner,
            "E {} {} {}",
            event.number,
            event.vertices().len(),
            event.particles().count()
        )?;
        writeln!(self.inner, "U {} {}", event.momentum_unit, event.length_unit)?;

        let mut next_id = 1;
        for (index, vertex) in event.vertices().iter().enumerate() {
            let vertex_id = -(index as i64 + 1);

            let mut incoming_ids = Vec::with_capacity(vertex.particles_in().len());
            for particle in vertex.particles_in() {
                self.write_particle(next_id, 0, particle)?;
                incoming_ids.push(next_id);
                next_id += 1;
            }

            self.write_vertex(vertex_id, vertex, &incoming_ids)?;

            for particle in vertex.particles_out() {
                self.write_particle(next_id, vertex_id, particle)?;
                next_id += 1;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriterError> {
        if !self.finished {
            writeln!(self.inner, "{END_LISTING}")?;
            writeln!(self.inner)?;
            self.inner.flush()?;
            self.finished = true;
        }
        Ok(())
    }
}
