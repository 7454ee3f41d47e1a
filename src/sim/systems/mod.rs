pub mod collision;
pub mod motion;
pub mod population;
