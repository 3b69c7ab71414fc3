mod metadata;

// re-export the public interface
pub use metadata::*;
