use core::cmp::min;
use std::io::Result;

use crate::codec::Decode;

/// Passthrough engine for uncompressed container bodies. End-of-stream comes
/// solely from source exhaustion, so `decode` never reports done on its own.
#[derive(Debug)]
pub struct IdentityDecoder;

impl Decode for IdentityDecoder {
    fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<(bool, usize, usize)> {
        let len = min(input.len(), output.len());
        output[..len].copy_from_slice(&input[..len]);
        Ok((false, len, len))
    }

    fn flush(&mut self, _output: &mut [u8]) -> Result<(bool, usize)> {
        Ok((true, 0))
    }
}
