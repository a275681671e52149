mod async_stream;
mod buffer;
mod segments;
mod stream;

pub use buffer::RingBuffer;
