//! Compression handling for TIFF pages
//!
//! One strategy per TIFF compression code. The page writer picks a handler
//! by name; the page reader picks one by the code stored in the IFD.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;
mod jpeg;


pub use handler::{CompressionHandler, StripLayout};
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
pub use jpeg::JpegHandler;
