//! Plain data types of the sample. No behaviour lives here.

pub mod profile;

pub use profile::*;
