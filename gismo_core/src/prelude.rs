// gismo_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::clock::Clock;
pub use crate::estimation::StateEstimator;
pub use crate::mapping::Mapper;
pub use crate::sensors::{EdgeSensor, InertialSensor, RangeSensor};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::config::{CalibrationConfig, IndexRounding, MapConfig, RangeConfig, StuckConfig};
pub use crate::error::{ConfigError, EstimatorError, SensorError};
pub use crate::types::{EdgeReading, GridIndex, ImuSample, Pose2};

// --- Concrete Implementations (Export common ones for convenience) ---
pub use crate::behavior::{StuckDetector, StuckVerdict};
pub use crate::clock::{ManualClock, MonotonicClock};
pub use crate::estimation::{GyroCalibration, PoseEstimator};
pub use crate::mapping::{MapUpdate, OccupancyGrid, OccupancyStats, SharedOccupancyGrid};
