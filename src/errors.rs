use ufmt::{uDebug, uWrite};

/// Errors surfaced by the driver. Semantic mismatches (a failed self-test,
/// a wrong CRC, an unexpected ATQA) are not errors; those come back as
/// `Ok(false)` from the respective procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying SPI transfer failed. Register state is no longer
    /// trustworthy; the procedure in progress is abandoned.
    Spi(E),
    /// A payload was too large for the driver's scratch buffers.
    NoRoom,
    /// A polling loop exhausted its configured limit. Never produced in the
    /// default unbounded configuration.
    Timeout,
}

impl<E> uDebug for Error<E> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Error::Spi(_) => f.write_str("Spi"),
            Error::NoRoom => f.write_str("NoRoom"),
            Error::Timeout => f.write_str("Timeout"),
        }
    }
}
