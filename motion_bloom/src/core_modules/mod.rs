pub mod ambient;
pub mod canvas;
pub mod clock;
pub mod drawing_area;
pub mod frame;
pub mod motion_detector;
pub mod particle;
pub mod pixel;
pub mod population;
