pub mod generation;
pub mod journey;
pub mod playlist;
pub mod providers;
pub mod recommendations;
