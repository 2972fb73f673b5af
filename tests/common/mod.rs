pub mod synthetic_poses;
