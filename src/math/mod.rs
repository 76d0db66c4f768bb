pub mod spline;

pub use spline::CubicSpline;
