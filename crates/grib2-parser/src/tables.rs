//! GRIB2 parameter and level lookup tables.
//!
//! Translates GRIB2 numeric codes into the short parameter names used as
//! data variable names, and into human-readable level descriptions.
//! [`Grib2Tables::builtin`] covers the common NCEP (GFS/HRRR) and MRMS
//! products; callers can extend or replace entries.

use std::collections::HashMap;

/// Lookup key for parameter: (discipline, category, number)
pub type ParamKey = (u8, u8, u8);

/// Level description - either static text or a template with {value} placeholder
#[derive(Debug, Clone)]
pub enum LevelDescription {
    /// Static description (e.g., "surface", "mean sea level")
    Static(String),
    /// Template with {value} placeholder (e.g., "{value} m above ground")
    Template(String),
}

impl LevelDescription {
    /// Format the level description, substituting placeholders if it's a template.
    ///
    /// Supported placeholders:
    /// - `{value}` - Level value as stored (e.g., 100000 for 1000 mb in Pa)
    /// - `{value_mb}` - Value converted from Pa to mb (divided by 100)
    pub fn format(&self, value: f64) -> String {
        match self {
            LevelDescription::Static(s) => s.clone(),
            LevelDescription::Template(t) => t
                .replace("{value}", &value.to_string())
                .replace("{value_mb}", &(value / 100.0).to_string()),
        }
    }
}

/// GRIB2 parameter and level lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Grib2Tables {
    /// (discipline, category, number) -> parameter short name (e.g., "TMP", "UGRD")
    parameters: HashMap<ParamKey, String>,
    /// level_type -> description pattern
    levels: HashMap<u8, LevelDescription>,
}

impl Grib2Tables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables preloaded with common NCEP and MRMS products.
    pub fn builtin() -> Self {
        let mut tables = Self::new();

        for (key, name) in [
            ((0, 0, 0), "TMP"),
            ((0, 0, 6), "DPT"),
            ((0, 1, 1), "RH"),
            ((0, 1, 8), "APCP"),
            ((0, 2, 2), "UGRD"),
            ((0, 2, 3), "VGRD"),
            ((0, 2, 22), "GUST"),
            ((0, 3, 0), "PRES"),
            ((0, 3, 1), "PRMSL"),
            ((0, 3, 5), "HGT"),
            ((0, 6, 1), "TCDC"),
            ((0, 7, 6), "CAPE"),
            ((0, 16, 196), "REFC"),
            ((0, 19, 0), "VIS"),
            ((209, 0, 16), "REFL"),
            ((209, 1, 0), "PrecipRate"),
            ((209, 6, 1), "QPE_01H"),
        ] {
            tables.add_parameter(key.0, key.1, key.2, name.to_string());
        }

        for (level_type, description) in [
            (1, LevelDescription::Static("surface".to_string())),
            (10, LevelDescription::Static("entire atmosphere".to_string())),
            (100, LevelDescription::Template("{value_mb} mb".to_string())),
            (101, LevelDescription::Static("mean sea level".to_string())),
            (102, LevelDescription::Template("{value} m above mean sea level".to_string())),
            (103, LevelDescription::Template("{value} m above ground".to_string())),
            (200, LevelDescription::Static("entire atmosphere".to_string())),
        ] {
            tables.add_level(level_type, description);
        }

        tables
    }

    /// Add a parameter mapping
    pub fn add_parameter(&mut self, discipline: u8, category: u8, number: u8, name: String) {
        self.parameters.insert((discipline, category, number), name);
    }

    /// Add a level description mapping
    pub fn add_level(&mut self, level_type: u8, description: LevelDescription) {
        self.levels.insert(level_type, description);
    }

    /// Look up parameter short name by GRIB2 codes.
    ///
    /// Returns "P{discipline}_{category}_{number}" if not found.
    pub fn get_parameter_name(&self, discipline: u8, category: u8, number: u8) -> String {
        self.parameters
            .get(&(discipline, category, number))
            .cloned()
            .unwrap_or_else(|| format!("P{}_{}_{}", discipline, category, number))
    }

    /// Look up level description by type code and value.
    ///
    /// Returns "Level type {type} value {value}" if not found.
    pub fn get_level_description(&self, level_type: u8, level_value: f64) -> String {
        match self.levels.get(&level_type) {
            Some(desc) => desc.format(level_value),
            None => format!("Level type {} value {}", level_type, level_value),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parameter_lookup() {
        let tables = Grib2Tables::builtin();

        assert_eq!(tables.get_parameter_name(0, 0, 0), "TMP");
        assert_eq!(tables.get_parameter_name(0, 2, 2), "UGRD");
        assert_eq!(tables.get_parameter_name(0, 3, 1), "PRMSL");
        assert_eq!(tables.get_parameter_name(209, 0, 16), "REFL");
    }

    #[test]
    fn test_parameter_not_found() {
        let tables = Grib2Tables::builtin();

        assert_eq!(tables.get_parameter_name(99, 99, 99), "P99_99_99");
        assert_eq!(tables.get_parameter_name(0, 0, 99), "P0_0_99");
    }

    #[test]
    fn test_level_descriptions() {
        let tables = Grib2Tables::builtin();

        assert_eq!(tables.get_level_description(1, 0.0), "surface");
        assert_eq!(tables.get_level_description(101, 0.0), "mean sea level");
        assert_eq!(tables.get_level_description(100, 50000.0), "500 mb");
        assert_eq!(tables.get_level_description(103, 2.0), "2 m above ground");
        assert_eq!(tables.get_level_description(103, 0.5), "0.5 m above ground");
    }

    #[test]
    fn test_level_not_found() {
        let tables = Grib2Tables::builtin();

        assert_eq!(
            tables.get_level_description(99, 123.0),
            "Level type 99 value 123"
        );
    }

    #[test]
    fn test_custom_entries_override() {
        let mut tables = Grib2Tables::builtin();
        tables.add_parameter(0, 0, 0, "T".to_string());
        assert_eq!(tables.get_parameter_name(0, 0, 0), "T");
    }

    #[test]
    fn test_empty_tables() {
        let tables = Grib2Tables::new();

        assert_eq!(tables.get_parameter_name(0, 0, 0), "P0_0_0");
        assert_eq!(tables.get_level_description(1, 0.0), "Level type 1 value 0");
    }
}
