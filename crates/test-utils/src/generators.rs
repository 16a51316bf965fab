//! Test data generators: synthetic value grids and GRIB2 messages.
//!
//! The generated GRIB2 messages have valid structure and use simple
//! packing (template 5.0), optionally with a bitmap, so they decode
//! without any external unpacking backend.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// Returns a `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Encode a sign-magnitude 32-bit integer as GRIB2 stores it.
pub fn grib_i32(value: i32) -> [u8; 4] {
    let magnitude = value.unsigned_abs() & 0x7FFF_FFFF;
    let raw = if value < 0 { magnitude | 0x8000_0000 } else { magnitude };
    raw.to_be_bytes()
}

/// Encode a sign-magnitude 16-bit integer as GRIB2 stores it.
pub fn grib_i16(value: i16) -> [u8; 2] {
    let magnitude = value.unsigned_abs() & 0x7FFF;
    let raw = if value < 0 { magnitude | 0x8000 } else { magnitude };
    raw.to_be_bytes()
}

/// Grid layout written to Section 3.
#[derive(Debug, Clone, PartialEq)]
enum GridLayout {
    /// Template 3.0, angles in microdegrees
    LatLon {
        la1: i32,
        lo1: i32,
        la2: i32,
        lo2: i32,
        di: u32,
        dj: u32,
    },
    /// Template 3.30, angles in microdegrees, spacing in millimetres
    Lambert {
        la1: i32,
        lo1: i32,
        lad: i32,
        lov: i32,
        dx: u32,
        dy: u32,
        latin1: i32,
        latin2: i32,
    },
}

/// Build a minimal GRIB2 message with the specified parameters
#[derive(Debug, Clone)]
pub struct Grib2Builder {
    discipline: u8,
    center: u16,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    // Grid definition
    ni: u32, // columns
    nj: u32, // rows
    layout: GridLayout,
    scanning_mode: u8,
    // Product definition
    param_category: u8,
    param_number: u8,
    level_type: u8,
    level_value: u32,
    forecast_hour: u32,
    // Data in scan order; `None` points are masked by a bitmap
    data_values: Vec<Option<f32>>,
}

impl Grib2Builder {
    /// Create a new builder with defaults for GFS-like data
    pub fn new_gfs() -> Self {
        // Small 10x10 grid over the western US
        let ni = 10;
        let nj = 10;
        Self {
            discipline: 0, // Meteorological
            center: 7,     // NCEP
            year: 2025,
            month: 12,
            day: 10,
            hour: 12,
            minute: 0,
            ni,
            nj,
            layout: GridLayout::LatLon {
                la1: 45_000_000,  // 45.0°N (microdegrees)
                lo1: 230_000_000, // 230.0°E = -130°W (microdegrees, 0-360 range)
                la2: 36_000_000,  // 36.0°N
                lo2: 239_000_000, // 239.0°E = -121°W
                di: 1_000_000,    // 1.0° increment
                dj: 1_000_000,    // 1.0° increment
            },
            scanning_mode: 0b0000_0000, // +i, -j, i consecutive
            param_category: 0,
            param_number: 0, // TMP
            level_type: 103, // m above ground
            level_value: 2,  // 2m
            forecast_hour: 0,
            data_values: vec![Some(288.15); (ni * nj) as usize], // 15°C in Kelvin
        }
    }

    /// Create a builder for MRMS-like data
    pub fn new_mrms() -> Self {
        let ni = 20;
        let nj = 15;
        Self {
            discipline: 209, // MRMS local discipline
            center: 161,     // NSSL
            year: 2025,
            month: 12,
            day: 10,
            hour: 12,
            minute: 0,
            ni,
            nj,
            layout: GridLayout::LatLon {
                la1: 54_995_000,  // 54.995°N (microdegrees)
                lo1: 230_005_000, // 230.005°E = -129.995°W
                la2: 54_855_000,
                lo2: 230_195_000,
                di: 10_000, // 0.01° increment
                dj: 10_000, // 0.01° increment
            },
            scanning_mode: 0b0000_0000,
            param_category: 0,
            param_number: 16, // MergedReflectivityQC (REFL)
            level_type: 102,  // m above MSL
            level_value: 500, // 500m
            forecast_hour: 0,
            data_values: vec![Some(-999.0); (ni * nj) as usize], // MRMS "no coverage"
        }
    }

    /// Create a builder for a small HRRR-like Lambert conformal grid
    pub fn new_lambert() -> Self {
        let ni = 6;
        let nj = 4;
        Self {
            layout: GridLayout::Lambert {
                la1: 21_138_123,
                lo1: 237_280_472,
                lad: 38_500_000,
                lov: 262_500_000,
                dx: 3_000_000, // 3 km
                dy: 3_000_000,
                latin1: 38_500_000,
                latin2: 38_500_000,
            },
            ni,
            nj,
            scanning_mode: 0b0100_0000, // +i, +j (south to north)
            data_values: vec![Some(0.0); (ni * nj) as usize],
            ..Self::new_gfs()
        }
    }

    pub fn with_reference_time(mut self, year: u16, month: u8, day: u8, hour: u8) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self.hour = hour;
        self
    }

    pub fn with_minute(mut self, minute: u8) -> Self {
        self.minute = minute;
        self
    }

    /// Set the grid size; values are reset to zero.
    pub fn with_grid(mut self, ni: u32, nj: u32) -> Self {
        self.ni = ni;
        self.nj = nj;
        self.data_values = vec![Some(0.0); (ni * nj) as usize];
        self
    }

    /// Regular lat/lon layout from the first point and signed increments
    /// in degrees (the sign gives the scan direction).
    pub fn with_latlon(mut self, lat1: f64, lon1: f64, dlat: f64, dlon: f64) -> Self {
        let micro = |deg: f64| (deg * 1e6).round() as i32;
        let la2 = lat1 + dlat * (self.nj.saturating_sub(1)) as f64;
        let lo2 = lon1 + dlon * (self.ni.saturating_sub(1)) as f64;
        self.layout = GridLayout::LatLon {
            la1: micro(lat1),
            lo1: micro(lon1.rem_euclid(360.0)),
            la2: micro(la2),
            lo2: micro(lo2.rem_euclid(360.0)),
            di: micro(dlon.abs()) as u32,
            dj: micro(dlat.abs()) as u32,
        };
        self.scanning_mode &= !0xC0;
        if dlon < 0.0 {
            self.scanning_mode |= 0x80;
        }
        if dlat > 0.0 {
            self.scanning_mode |= 0x40;
        }
        self
    }

    /// Raw scanning mode flags (Flag Table 3.4).
    pub fn with_scanning_mode(mut self, flags: u8) -> Self {
        self.scanning_mode = flags;
        self
    }

    pub fn with_discipline(mut self, discipline: u8) -> Self {
        self.discipline = discipline;
        self
    }

    pub fn with_parameter(mut self, category: u8, number: u8) -> Self {
        self.param_category = category;
        self.param_number = number;
        self
    }

    pub fn with_level(mut self, level_type: u8, level_value: u32) -> Self {
        self.level_type = level_type;
        self.level_value = level_value;
        self
    }

    pub fn with_forecast_hour(mut self, hour: u32) -> Self {
        self.forecast_hour = hour;
        self
    }

    pub fn with_constant_value(mut self, value: f32) -> Self {
        self.data_values = vec![Some(value); (self.ni * self.nj) as usize];
        self
    }

    pub fn with_gradient(mut self, min_val: f32, max_val: f32) -> Self {
        let n = (self.ni * self.nj) as usize;
        self.data_values = (0..n)
            .map(|i| Some(min_val + (max_val - min_val) * (i as f32 / n as f32)))
            .collect();
        self
    }

    /// Values in scan order.
    pub fn with_data(mut self, data: Vec<f32>) -> Self {
        self.data_values = data.into_iter().map(Some).collect();
        self
    }

    /// Values in scan order; `None` points are written as bitmap-missing.
    pub fn with_masked_data(mut self, data: Vec<Option<f32>>) -> Self {
        self.data_values = data;
        self
    }

    /// Build the complete GRIB2 message bytes
    pub fn build(&self) -> Vec<u8> {
        let mut message = Vec::new();

        let section1 = self.build_section1();
        let section3 = self.build_section3();
        let section4 = self.build_section4();
        let section5 = self.build_section5();
        let section6 = self.build_section6();
        let section7 = self.build_section7();

        let message_length = 16 // Section 0
            + section1.len()
            + section3.len()
            + section4.len()
            + section5.len()
            + section6.len()
            + section7.len()
            + 4; // Section 8 (end)

        // Section 0: Indicator
        message.extend_from_slice(b"GRIB");
        message.extend_from_slice(&[0, 0]); // Reserved
        message.push(self.discipline);
        message.push(2); // Edition 2
        message.extend_from_slice(&(message_length as u64).to_be_bytes());

        message.extend_from_slice(&section1);
        message.extend_from_slice(&section3);
        message.extend_from_slice(&section4);
        message.extend_from_slice(&section5);
        message.extend_from_slice(&section6);
        message.extend_from_slice(&section7);

        // Section 8: End
        message.extend_from_slice(b"7777");

        message
    }

    fn present_values(&self) -> Vec<f32> {
        self.data_values.iter().flatten().copied().collect()
    }

    fn has_bitmap(&self) -> bool {
        self.data_values.iter().any(Option::is_none)
    }

    /// (reference value, binary scale factor, bits per value)
    fn packing_parameters(&self) -> (f32, i16, u8) {
        let (min_val, max_val) = self
            .present_values()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        if !min_val.is_finite() {
            return (0.0, 0, 0);
        }

        let range = max_val - min_val;
        if range == 0.0 {
            return (min_val, 0, 0);
        }

        // Unpacking formula: value = reference_value + packed_value * 2^E
        // With 16-bit packing: E = ceil(log2(range / 65535))
        let binary_scale_factor = (range / 65535.0).log2().ceil() as i16;
        (min_val, binary_scale_factor, 16)
    }

    fn build_section1(&self) -> Vec<u8> {
        let mut section = Vec::new();
        let section_length: u32 = 21;

        section.extend_from_slice(&section_length.to_be_bytes());
        section.push(1); // Section number

        section.extend_from_slice(&self.center.to_be_bytes());
        section.extend_from_slice(&0u16.to_be_bytes()); // Sub-center
        section.push(2); // Master table version
        section.push(1); // Local table version
        section.push(1); // Significance of reference time (start of forecast)

        section.extend_from_slice(&self.year.to_be_bytes());
        section.push(self.month);
        section.push(self.day);
        section.push(self.hour);
        section.push(self.minute);
        section.push(0); // Second

        section.push(0); // Production status (operational)
        section.push(1); // Type of data (forecast)

        section
    }

    fn build_section3(&self) -> Vec<u8> {
        let (template_number, template): (u16, Vec<u8>) = match &self.layout {
            GridLayout::LatLon {
                la1,
                lo1,
                la2,
                lo2,
                di,
                dj,
            } => {
                let mut t = self.earth_shape();
                t.extend_from_slice(&self.ni.to_be_bytes());
                t.extend_from_slice(&self.nj.to_be_bytes());
                t.extend_from_slice(&0u32.to_be_bytes()); // Basic angle
                t.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes()); // Subdivisions
                t.extend_from_slice(&grib_i32(*la1));
                t.extend_from_slice(&grib_i32(*lo1));
                t.push(48); // Resolution and component flags
                t.extend_from_slice(&grib_i32(*la2));
                t.extend_from_slice(&grib_i32(*lo2));
                t.extend_from_slice(&di.to_be_bytes());
                t.extend_from_slice(&dj.to_be_bytes());
                t.push(self.scanning_mode);
                (0, t)
            }
            GridLayout::Lambert {
                la1,
                lo1,
                lad,
                lov,
                dx,
                dy,
                latin1,
                latin2,
            } => {
                let mut t = self.earth_shape();
                t.extend_from_slice(&self.ni.to_be_bytes());
                t.extend_from_slice(&self.nj.to_be_bytes());
                t.extend_from_slice(&grib_i32(*la1));
                t.extend_from_slice(&grib_i32(*lo1));
                t.push(8); // Resolution and component flags
                t.extend_from_slice(&grib_i32(*lad));
                t.extend_from_slice(&grib_i32(*lov));
                t.extend_from_slice(&dx.to_be_bytes());
                t.extend_from_slice(&dy.to_be_bytes());
                t.push(0); // Projection centre flag (north pole)
                t.push(self.scanning_mode);
                t.extend_from_slice(&grib_i32(*latin1));
                t.extend_from_slice(&grib_i32(*latin2));
                t.extend_from_slice(&grib_i32(-90_000_000)); // Southern pole lat
                t.extend_from_slice(&grib_i32(0)); // Southern pole lon
                (30, t)
            }
        };

        let mut section = Vec::new();
        let section_length = 14 + template.len() as u32;

        section.extend_from_slice(&section_length.to_be_bytes());
        section.push(3); // Section number
        section.push(0); // Source of grid definition
        section.extend_from_slice(&(self.ni * self.nj).to_be_bytes());
        section.push(0); // Number of octets for optional list
        section.push(0); // Interpretation of optional list
        section.extend_from_slice(&template_number.to_be_bytes());
        section.extend_from_slice(&template);

        section
    }

    /// First 16 octets shared by templates 3.0 and 3.30
    fn earth_shape(&self) -> Vec<u8> {
        let mut t = Vec::with_capacity(16);
        t.push(6); // Shape of Earth (spherical with radius 6371229m)
        t.push(0); // Scale factor of radius
        t.extend_from_slice(&0u32.to_be_bytes()); // Scaled value of radius
        t.push(0); // Scale factor of major axis
        t.extend_from_slice(&0u32.to_be_bytes()); // Scaled value of major axis
        t.push(0); // Scale factor of minor axis
        t.extend_from_slice(&0u32.to_be_bytes()); // Scaled value of minor axis
        t
    }

    fn build_section4(&self) -> Vec<u8> {
        let mut section = Vec::new();

        // Template 4.0: Analysis or forecast at horizontal level
        let section_length: u32 = 34;

        section.extend_from_slice(&section_length.to_be_bytes());
        section.push(4); // Section number

        section.extend_from_slice(&0u16.to_be_bytes()); // Number of coordinate values
        section.extend_from_slice(&0u16.to_be_bytes()); // Product definition template (0)

        section.push(self.param_category);
        section.push(self.param_number);
        section.push(2); // Type of generating process (forecast)
        section.push(0); // Background generating process
        section.push(0); // Analysis or forecast process
        section.extend_from_slice(&0u16.to_be_bytes()); // Hours of cutoff
        section.push(0); // Minutes of cutoff
        section.push(1); // Time range unit (hours)
        section.extend_from_slice(&self.forecast_hour.to_be_bytes());

        section.push(self.level_type); // Type of first fixed surface
        section.push(0); // Scale factor
        section.extend_from_slice(&self.level_value.to_be_bytes());

        section.push(255); // Type of second fixed surface (none)
        section.push(0); // Scale factor
        section.extend_from_slice(&0u32.to_be_bytes());

        section
    }

    fn build_section5(&self) -> Vec<u8> {
        let mut section = Vec::new();
        let (reference_value, binary_scale_factor, bits_per_value) = self.packing_parameters();
        let num_packed = self.present_values().len() as u32;

        let section_length: u32 = 21;

        section.extend_from_slice(&section_length.to_be_bytes());
        section.push(5); // Section number

        section.extend_from_slice(&num_packed.to_be_bytes());
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 5.0

        section.extend_from_slice(&reference_value.to_be_bytes());
        section.extend_from_slice(&grib_i16(binary_scale_factor));
        section.extend_from_slice(&grib_i16(0)); // Decimal scale factor
        section.push(bits_per_value);
        section.push(0); // Original field type (floating point)

        section
    }

    fn build_section6(&self) -> Vec<u8> {
        let mut section = Vec::new();

        if !self.has_bitmap() {
            section.extend_from_slice(&6u32.to_be_bytes());
            section.push(6); // Section number
            section.push(255); // Bitmap indicator (255 = no bitmap)
            return section;
        }

        let mut bitmap = vec![0u8; self.data_values.len().div_ceil(8)];
        for (i, value) in self.data_values.iter().enumerate() {
            if value.is_some() {
                bitmap[i / 8] |= 0x80 >> (i % 8);
            }
        }

        section.extend_from_slice(&(6 + bitmap.len() as u32).to_be_bytes());
        section.push(6); // Section number
        section.push(0); // Bitmap indicator (0 = bitmap follows)
        section.extend_from_slice(&bitmap);

        section
    }

    fn build_section7(&self) -> Vec<u8> {
        let mut section = Vec::new();
        let packed_data = self.pack_simple();

        let section_length: u32 = 5 + packed_data.len() as u32;

        section.extend_from_slice(&section_length.to_be_bytes());
        section.push(7); // Section number
        section.extend_from_slice(&packed_data);

        section
    }

    fn pack_simple(&self) -> Vec<u8> {
        let (reference_value, binary_scale_factor, bits_per_value) = self.packing_parameters();
        if bits_per_value == 0 {
            // Constant field - no data needed
            return Vec::new();
        }

        let binary_scale = 2.0_f64.powi(i32::from(binary_scale_factor));

        // Pack: packed_value = (value - reference_value) / 2^E
        self.present_values()
            .iter()
            .flat_map(|&val| {
                let packed = ((f64::from(val) - f64::from(reference_value)) / binary_scale).round();
                (packed.clamp(0.0, 65535.0) as u16).to_be_bytes()
            })
            .collect()
    }
}
