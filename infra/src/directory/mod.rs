//! Identity directory implementations

pub mod firebase;
pub mod google_token;

pub use firebase::{FirebaseDirectory, FirebaseDirectoryConfig};
pub use google_token::{ServiceAccountKey, TokenSource};
