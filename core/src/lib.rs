// Rock Geo - Core Library
//
// HTTP-free building blocks shared by the API façade: endpoint
// descriptors, path-template resolution and the domain payloads.

pub mod endpoint;
pub mod models;
pub mod validation;

pub use endpoint::*;
pub use models::*;
pub use validation::*;
