// Domain layer: models, the registry, and the ports the engine depends on.

pub mod model;
pub mod ports;
pub mod registry;
