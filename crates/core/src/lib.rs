#![forbid(unsafe_code)]

pub mod curriculum;
pub mod model;
pub mod time;

pub use curriculum::{Curriculum, CurriculumError, Direction};
pub use time::Clock;
