pub mod edge;
pub mod imu;
pub mod tof;

pub use edge::SimEdgeSensors;
pub use imu::SimImu;
pub use tof::SimTof;
