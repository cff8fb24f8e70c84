//! Domain layer containing the entities shared by the coordinator and the
//! external client abstractions.

pub mod entities;

pub use entities::*;
