//! Map projections needed to place projected GRIB2 grids.
//!
//! Only the Lambert conformal conic (grid template 3.30) is needed: the
//! decoder uses it to compute the latitude and longitude of every grid point.

pub mod lambert;

pub use lambert::LambertConformal;
