use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Reader that returns one scripted step per call, then end-of-stream.
///
/// A chunk larger than the caller's buffer is split and the remainder is
/// served by the next call.
pub struct ScriptedReader {
    steps: VecDeque<io::Result<Vec<u8>>>,
    pub requests: Vec<usize>,
}

impl ScriptedReader {
    pub fn chunks(chunks: &[&[u8]]) -> Self {
        Self {
            steps: chunks.iter().map(|c| Ok(c.to_vec())).collect(),
            requests: Vec::new(),
        }
    }

    pub fn then_fail(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Err(io::Error::from(kind)));
        self
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.requests.push(buf.len());
        match self.steps.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.steps.push_front(Ok(chunk[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }
}

/// Writer that accepts at most `per_call` bytes per write.
pub struct ThrottledWriter {
    per_call: usize,
    pub fail_after: Option<usize>,
    pub data: Vec<u8>,
    pub offers: Vec<usize>,
}

impl ThrottledWriter {
    pub fn new(per_call: usize) -> Self {
        Self {
            per_call,
            fail_after: None,
            data: Vec::new(),
            offers: Vec::new(),
        }
    }
}

impl Write for ThrottledWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.offers.push(buf.len());
        if let Some(limit) = self.fail_after {
            if self.data.len() >= limit {
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
        }
        let n = buf.len().min(self.per_call);
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
