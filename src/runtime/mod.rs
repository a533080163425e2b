//! Runtime layer for befunge-plus.
//!
//! - **IO**: the console streams behind `&`, `~`, `.` and `,`
//! - **Loader**: reading a source file into a grid

pub mod io;
pub mod loader;

pub use io::{InputSource, OutputSink, ReaderInput, WriterOutput, OutputBuffer, OutputItem};
pub use loader::load_file;
