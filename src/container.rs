//! Container handles: opening encoded GIF bytes, reporting readiness and decoding frames.
//!
//! The reader talks to containers only through [`codec::ContainerCodec`] and
//! [`codec::ContainerHandle`]. [`gif::GifCodec`] is the built-in implementation.

pub(crate) mod blocks;
/// Codec capability traits and the metadata they expose.
pub mod codec;
/// Built-in GIF codec backed by the `image` crate.
pub mod gif;
/// Byte sources a handle can be (re)opened from.
pub mod source;
