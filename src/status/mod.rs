mod board;

pub use board::{StatusBoard, StatusUpdate};
