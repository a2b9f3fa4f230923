mod asciiv3;
mod format;

use crate::{error::WriterError, event::Event};

pub(crate) use asciiv3::Asciiv3Writer;

/// Destination for generated events. Events are handed over in the order
/// they are generated and are not retained by the caller.
pub(crate) trait EventWriter {
    fn write_event(&mut self, event: &Event) -> Result<(), WriterError>;

    /// Completes the listing. Further calls to `write_event` fail.
    fn finish(&mut self) -> Result<(), WriterError>;
}
