use std::io::Result;

mod identity;
mod inflate;

pub(crate) use self::identity::IdentityDecoder;
pub(crate) use self::inflate::InflateDecoder;

pub(crate) trait Decode {
    /// Return `Ok((done, input_consumed, output_produced))`; `done` means the
    /// encoded stream signalled its own end and no more input is expected.
    fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<(bool, usize, usize)>;

    /// Drain whatever the engine still holds once input is exhausted.
    /// Return `Ok((done, output_produced))`.
    fn flush(&mut self, output: &mut [u8]) -> Result<(bool, usize)>;
}
