// Domain layer: request/response models and ports. No HTTP or runtime types here.

pub mod model;
pub mod ports;
