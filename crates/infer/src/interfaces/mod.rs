mod args;
mod range;
mod result;

// re-export the public interface
pub use args::*;
pub use range::*;
pub use result::*;
