// Application layer - Ports and use cases
pub mod poller;
pub mod refresh_service;
pub mod shutdown;
pub mod telemetry_source;
