// Domain layer: models and the ports the core logic talks through.

pub mod model;
pub mod ports;
