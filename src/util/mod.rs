// Small shared utilities

pub mod ring_buffer;

pub use ring_buffer::RingBuffer;
