// Domain layer - Pure data and rendering, no I/O
pub mod chart;
pub mod reading;
pub mod table;
pub mod view;
pub mod window;
