pub mod balking;
pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod pickup_point;
pub mod profiling;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;
pub mod telemetry;
pub mod zones;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
