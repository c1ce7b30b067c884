use std::io::{Error, ErrorKind, Result};

use flate2::{Decompress, FlushDecompress, Status};

use crate::codec::Decode;

/// Zlib decompression engine for compressed container bodies.
#[derive(Debug)]
pub struct InflateDecoder {
    decompress: Decompress,
}

impl InflateDecoder {
    pub(crate) fn new() -> Self {
        Self {
            decompress: Decompress::new(true),
        }
    }

    fn do_decode(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushDecompress,
    ) -> Result<(Status, usize, usize)> {
        let prior_in = self.decompress.total_in();
        let prior_out = self.decompress.total_out();

        let status = self
            .decompress
            .decompress(input, output, flush)
            .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;

        let in_length = (self.decompress.total_in() - prior_in) as usize;
        let out_length = (self.decompress.total_out() - prior_out) as usize;

        Ok((status, in_length, out_length))
    }
}

impl Decode for InflateDecoder {
    fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<(bool, usize, usize)> {
        if input.is_empty() {
            return Ok((true, 0, 0));
        }

        let (status, in_length, out_length) =
            self.do_decode(input, output, FlushDecompress::None)?;

        match status {
            Status::Ok => Ok((false, in_length, out_length)),
            Status::StreamEnd => Ok((true, in_length, out_length)),
            Status::BufError => Err(Error::new(ErrorKind::Other, "unexpected BufError")),
        }
    }

    fn flush(&mut self, output: &mut [u8]) -> Result<(bool, usize)> {
        let (status, _, out_length) = self.do_decode(&[], output, FlushDecompress::Finish)?;

        match status {
            Status::Ok => Ok((false, out_length)),
            Status::StreamEnd => Ok((true, out_length)),
            // Finish on a drained zlib stream reports BufError; nothing more
            // is coming either way.
            Status::BufError => Ok((true, out_length)),
        }
    }
}
