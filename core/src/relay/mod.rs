use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::ring::RingBuffer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes staged by this relay, counting any already buffered when it
    /// started. Equals `bytes_out` on success.
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Successful `read_from_async` calls that staged at least one byte.
    pub fills: u64,
    /// Times the ring was drained to empty.
    pub drains: u64,
}

/// Spawns a task relaying `rd` to `wr` through a ring of `capacity` bytes.
pub fn pump<R, W>(
    mut rd: R,
    mut wr: W,
    capacity: usize,
    opts: RelayConfig,
) -> JoinHandle<Result<RelayStats, RelayError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut ring = RingBuffer::new(capacity)?;
        relay(&mut rd, &mut wr, &mut ring, &opts).await
    })
}

/// Stages bytes from `rd` into `ring` and drains them to `wr` until `rd`
/// reaches end-of-stream and the ring is empty.
///
/// Each fill is followed by a full drain, so the writer never waits on the
/// reader while bytes are pending.
pub async fn relay<R, W>(
    rd: &mut R,
    wr: &mut W,
    ring: &mut RingBuffer,
    opts: &RelayConfig,
) -> Result<RelayStats, RelayError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut stats = RelayStats {
        bytes_in: ring.size() as u64,
        ..RelayStats::default()
    };

    // leftovers from a previous user of the ring go out first
    drain(wr, ring, opts, &mut stats).await?;

    loop {
        let n = ring.read_from_async(rd).await?;
        if n == 0 {
            break;
        }
        stats.bytes_in += n as u64;
        stats.fills += 1;
        tracing::trace!(target: "bytering.relay", staged = n, size = ring.size());

        drain(wr, ring, opts, &mut stats).await?;
    }

    wr.flush().await.map_err(RelayError::Flush)?;
    tracing::debug!(
        target: "bytering.relay",
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        fills = stats.fills,
        drains = stats.drains,
        "relay finished"
    );
    Ok(stats)
}

async fn drain<W>(
    wr: &mut W,
    ring: &mut RingBuffer,
    opts: &RelayConfig,
    stats: &mut RelayStats,
) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut wrote = false;
    while !ring.is_empty() {
        let pending = ring.size();
        let n = ring.write_to_async(wr).await?;
        if n == 0 {
            return Err(RelayError::StalledWriter { pending });
        }
        stats.bytes_out += n as u64;
        wrote = true;
    }

    if wrote {
        stats.drains += 1;
        if opts.flush_on_drain {
            wr.flush().await.map_err(RelayError::Flush)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::AsyncReadExt;

    /// Accepts nothing once `open` bytes have been written.
    struct Choked {
        open: usize,
    }

    impl AsyncWrite for Choked {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            let n = buf.len().min(self.open);
            self.open -= n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn pump_relays_input_larger_than_capacity() {
        let input: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let (mut src_wr, src_rd) = tokio::io::duplex(1024);
        let (dst_wr, mut dst_rd) = tokio::io::duplex(64 * 1024);

        let task = pump(src_rd, dst_wr, 37, RelayConfig::default());

        let feed = input.clone();
        let writer = tokio::spawn(async move {
            src_wr.write_all(&feed).await.unwrap();
        });
        writer.await.unwrap();

        let stats = task.await.unwrap().unwrap();
        let mut out = Vec::new();
        dst_rd.read_to_end(&mut out).await.unwrap();

        assert_eq!(out, input);
        assert_eq!(stats.bytes_in, input.len() as u64);
        assert_eq!(stats.bytes_out, stats.bytes_in);
        assert!(stats.fills >= (input.len() / 37) as u64);
    }

    #[tokio::test]
    async fn empty_input_relays_nothing() {
        let mut rd: &[u8] = b"";
        let mut out: Vec<u8> = Vec::new();
        let mut ring = RingBuffer::new(8).unwrap();
        let stats = relay(&mut rd, &mut out, &mut ring, &RelayConfig::default())
            .await
            .unwrap();
        assert_eq!(stats, RelayStats::default());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn leftover_bytes_are_drained_first() {
        let mut ring = RingBuffer::new(8).unwrap();
        ring.write(b"old").unwrap();

        let mut rd: &[u8] = b"new";
        let mut out: Vec<u8> = Vec::new();
        let stats = relay(&mut rd, &mut out, &mut ring, &RelayConfig::default())
            .await
            .unwrap();
        assert_eq!(out, b"oldnew");
        assert_eq!(stats.bytes_in, 6);
        assert_eq!(stats.bytes_out, stats.bytes_in);
        assert_eq!(stats.fills, 1);
        assert_eq!(stats.drains, 2);
    }

    #[tokio::test]
    async fn stalled_writer_is_reported() {
        let mut rd: &[u8] = b"abcdef";
        let mut wr = Choked { open: 2 };
        let mut ring = RingBuffer::new(8).unwrap();
        let err = relay(&mut rd, &mut wr, &mut ring, &RelayConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::StalledWriter { pending: 4 }));
        assert_eq!(ring.size(), 4);
    }

    #[tokio::test]
    async fn zero_capacity_pump_fails() {
        let task = pump(tokio::io::empty(), tokio::io::sink(), 0, RelayConfig::default());
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            RelayError::Ring(crate::error::RingError::ZeroCapacity)
        ));
    }
}
