use crate::{error::WriterError, generator::ParticleGun, writer::EventWriter};
use metrics::counter;
use particle_gun_common::{
    EventNumber,
    metrics::{
        failures::{self, FailureKind},
        metric_names::{EVENTS_GENERATED, FAILURES, PARTICLES_GENERATED},
    },
};
use rand::Rng;
use tracing::{debug_span, error, info};

/// Generates events `0..nevents` in order, handing each to `writer` as soon
/// as it is built, then finishes the listing.
pub(crate) fn run<R, W>(
    gun: &ParticleGun<'_>,
    nevents: EventNumber,
    rng: &mut R,
    writer: &mut W,
) -> Result<EventNumber, WriterError>
where
    R: Rng + ?Sized,
    W: EventWriter + ?Sized,
{
    let progress_step = (nevents / 10).max(1);
    for number in 0..nevents {
        let span = debug_span!("Event", number);
        let _guard = span.enter();

        let event = gun.generate(number, rng);
        writer.write_event(&event).inspect_err(|e| {
            error!("{e}");
            counter!(FAILURES, &[failures::get_label(FailureKind::FileWriteFailed)]).increment(1);
        })?;

        counter!(EVENTS_GENERATED).increment(1);
        counter!(PARTICLES_GENERATED).increment(event.outgoing().count() as u64);

        if (number + 1) % progress_step == 0 {
            info!("Generated {} of {nevents} events", number + 1);
        }
    }
    writer.finish()?;
    info!("Finished writing {nevents} events");
    Ok(nevents)
}
