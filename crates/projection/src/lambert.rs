//! Lambert conformal conic grids (GRIB2 grid template 3.30).
//!
//! Template 3.30 only gives the first grid point, the orientation meridian
//! (LoV), the standard parallels and the spacing in metres. Geographic
//! coordinates for the remaining points come from projecting the first point
//! onto the cone plane, stepping through the grid there, and inverting the
//! projection for each point. The earth is the template's sphere of radius
//! 6 371 229 m.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const EARTH_RADIUS_M: f64 = 6_371_229.0;

/// A template 3.30 grid placed on its projection plane.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Orientation meridian, radians
    lov: f64,
    /// Cone constant
    n: f64,
    /// `R * F`, the radius scale shared by forward and inverse mappings
    radius_scale: f64,
    /// Polar distance of the first grid point
    rho_first: f64,
    /// First grid point on the plane
    x_first: f64,
    y_first: f64,
    dx: f64,
    dy: f64,
    nx: usize,
    ny: usize,
}

impl LambertConformal {
    /// Build the projection from template 3.30 values (angles in degrees,
    /// spacing in metres).
    #[allow(clippy::too_many_arguments)]
    pub fn from_grib2(
        lat1_deg: f64,
        lon1_deg: f64,
        lov_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        dx: f64,
        dy: f64,
        nx: usize,
        ny: usize,
    ) -> Self {
        let lat1 = lat1_deg.to_radians();
        let lov = lov_deg.to_radians();
        let phi1 = latin1_deg.to_radians();
        let phi2 = latin2_deg.to_radians();

        let half_colat = |phi: f64| (FRAC_PI_4 + phi / 2.0).tan();

        let n = if (phi1 - phi2).abs() < 1e-10 {
            phi1.sin()
        } else {
            (phi1.cos() / phi2.cos()).ln() / (half_colat(phi2) / half_colat(phi1)).ln()
        };
        let radius_scale = EARTH_RADIUS_M * phi1.cos() * half_colat(phi1).powf(n) / n;
        let rho_first = radius_scale / half_colat(lat1).powf(n);

        let theta = n * wrap_pi(lon1_deg.to_radians() - lov);
        let x_first = rho_first * theta.sin();
        let y_first = rho_first - rho_first * theta.cos();

        Self {
            lov,
            n,
            radius_scale,
            rho_first,
            x_first,
            y_first,
            dx,
            dy,
            nx,
            ny,
        }
    }

    /// Latitude and longitude (degrees) of the point `i` columns east and
    /// `j` rows north of the first grid point. Offsets may be negative.
    pub fn grid_to_geo(&self, i: f64, j: f64) -> (f64, f64) {
        let x = self.x_first + i * self.dx;
        let y = self.y_first + j * self.dy;
        let dy_apex = self.rho_first - y;

        let rho = (x * x + dy_apex * dy_apex).sqrt().copysign(self.n);
        let theta = (x / dy_apex).atan();

        let lat = 2.0 * (self.radius_scale / rho).powf(1.0 / self.n).atan() - FRAC_PI_2;
        let lon = self.lov + theta / self.n;
        (lat.to_degrees(), lon.to_degrees())
    }

    /// Latitude and longitude of every grid point, row-major with `ny` rows
    /// of `nx` points.
    ///
    /// `i_step` and `j_step` are +1.0 or -1.0 and give the direction in
    /// which successive columns and rows advance from the first grid point.
    pub fn coordinate_fields(&self, i_step: f64, j_step: f64) -> (Vec<f64>, Vec<f64>) {
        let mut lats = Vec::with_capacity(self.nx * self.ny);
        let mut lons = Vec::with_capacity(self.nx * self.ny);

        for j in 0..self.ny {
            for i in 0..self.nx {
                let (lat, lon) = self.grid_to_geo(i as f64 * i_step, j as f64 * j_step);
                lats.push(lat);
                lons.push(lon);
            }
        }

        (lats, lons)
    }
}

/// Normalize an angle difference to [-π, π].
fn wrap_pi(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
