// Domain layer: core models, ports (interfaces) and the pure calendar/counting services.
// No I/O here; everything is tested with in-memory fixtures.

pub mod model;
pub mod ports;

pub mod services;
