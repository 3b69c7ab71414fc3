mod args;
mod artifact;
mod result;

// re-export the public interface
pub use args::*;
pub use artifact::*;
pub use result::*;
