use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::buffer::RingBuffer;
use crate::error::RingError;

impl RingBuffer {
    /// Async counterpart of [`read_from_stream`](Self::read_from_stream).
    pub async fn read_from_async<R>(&mut self, rd: &mut R) -> Result<usize, RingError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut total = 0usize;
        let mut want = self.writable_run();

        while want > 0 {
            let res = rd.read(self.writable_slice()).await;
            if self.absorb_read(res, want, &mut total)? {
                break;
            }
            want = self.writable_run();
        }

        Ok(total)
    }

    /// Async counterpart of [`write_to_stream`](Self::write_to_stream).
    pub async fn write_to_async<W>(&mut self, wr: &mut W) -> Result<usize, RingError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut total = 0usize;
        let mut offer = self.readable_run();

        while offer > 0 {
            let res = wr.write(self.readable_slice()).await;
            if self.absorb_write(res, offer, &mut total)? {
                break;
            }
            offer = self.readable_run();
        }

        Ok(total)
    }
}
