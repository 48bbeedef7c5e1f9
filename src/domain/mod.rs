// Domain layer: estimator models, form payloads and ports (interfaces).

pub mod model;
pub mod ports;
