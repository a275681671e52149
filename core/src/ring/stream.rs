use std::io::{self, Read, Write};

use super::buffer::RingBuffer;
use crate::error::RingError;

impl RingBuffer {
    /// Fills the writable region from `rd`, one contiguous run per read.
    ///
    /// Stops when the ring is full, when `rd` reports end-of-stream, or after
    /// the first short read. Returns the bytes transferred by this call; `0`
    /// means end-of-stream with nothing transferred (or a full ring). An
    /// endpoint error keeps earlier bytes committed and reports their count in
    /// [`RingError::Endpoint`].
    pub fn read_from_stream<R: Read + ?Sized>(&mut self, rd: &mut R) -> Result<usize, RingError> {
        let mut total = 0usize;
        let mut want = self.writable_run();

        while want > 0 {
            let res = rd.read(self.writable_slice());
            if self.absorb_read(res, want, &mut total)? {
                break;
            }
            want = self.writable_run();
        }

        Ok(total)
    }

    /// Drains the readable region into `wr`, one contiguous run per write.
    ///
    /// Stops when the ring is empty or after the first short write. Returns
    /// the bytes transferred by this call. An endpoint error keeps earlier
    /// bytes consumed and reports their count in [`RingError::Endpoint`].
    pub fn write_to_stream<W: Write + ?Sized>(&mut self, wr: &mut W) -> Result<usize, RingError> {
        let mut total = 0usize;
        let mut offer = self.readable_run();

        while offer > 0 {
            let res = wr.write(self.readable_slice());
            if self.absorb_write(res, offer, &mut total)? {
                break;
            }
            offer = self.readable_run();
        }

        Ok(total)
    }

    /// Commits one endpoint read of at most `want` bytes. Returns `true` once
    /// the loop must stop.
    pub(super) fn absorb_read(
        &mut self,
        res: io::Result<usize>,
        want: usize,
        total: &mut usize,
    ) -> Result<bool, RingError> {
        let done = *total;
        let n = res.map_err(|source| endpoint_error("read", done, source))?;
        tracing::trace!(target: "bytering.ring", op = "read", requested = want, transferred = n);

        if n > want {
            return Err(endpoint_error("read", done, over_reported(n, want)));
        }
        if n == 0 {
            tracing::debug!(target: "bytering.ring", total = done, "end of stream");
            return Ok(true);
        }
        *total += n;
        self.commit(n);
        if n < want {
            tracing::debug!(target: "bytering.ring", requested = want, transferred = n, "short read");
            return Ok(true);
        }
        Ok(false)
    }

    /// Consumes one endpoint write of at most `offer` bytes. Returns `true`
    /// once the loop must stop.
    pub(super) fn absorb_write(
        &mut self,
        res: io::Result<usize>,
        offer: usize,
        total: &mut usize,
    ) -> Result<bool, RingError> {
        let done = *total;
        let n = res.map_err(|source| endpoint_error("write", done, source))?;
        tracing::trace!(target: "bytering.ring", op = "write", offered = offer, transferred = n);

        if n > offer {
            return Err(endpoint_error("write", done, over_reported(n, offer)));
        }
        *total += n;
        self.consume(n);
        if n < offer {
            tracing::debug!(target: "bytering.ring", offered = offer, transferred = n, "short write");
            return Ok(true);
        }
        Ok(false)
    }
}

fn endpoint_error(op: &'static str, transferred: usize, source: io::Error) -> RingError {
    tracing::warn!(target: "bytering.ring", op, transferred, error = %source);
    RingError::Endpoint {
        op,
        transferred,
        source,
    }
}

fn over_reported(n: usize, len: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("endpoint reported {n} bytes for a {len} byte buffer"),
    )
}
