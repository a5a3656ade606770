// Domain layer: core models and ports (interfaces).

pub mod dataset;
pub mod model;
pub mod ports;
