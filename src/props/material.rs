//! Tabulated solid material properties.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Copper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// (W/m-K)
    ThermalConductivity,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Material::Copper => "copper",
        })
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Property::ThermalConductivity => "thermal conductivity",
        })
    }
}

/// `property(material, kind, T) → value`.
pub trait PropertyLookup {
    /// Property value at `temperature` (K). NaN when out of range.
    fn property(&self, material: Material, property: Property, temperature: f64) -> f64;
}

/// Pure copper conductivity (K, W/m-K).
const COPPER_CONDUCTIVITY: [(f64, f64); 8] = [
    (100.0, 482.0),
    (200.0, 413.0),
    (300.0, 401.0),
    (400.0, 393.0),
    (600.0, 379.0),
    (800.0, 366.0),
    (1000.0, 352.0),
    (1200.0, 339.0),
];

/// Built-in property tables with linear interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyTables;

impl PropertyTables {
    fn table(material: Material, property: Property) -> &'static [(f64, f64)] {
        match (material, property) {
            (Material::Copper, Property::ThermalConductivity) => &COPPER_CONDUCTIVITY,
        }
    }
}

impl PropertyLookup for PropertyTables {
    fn property(&self, material: Material, property: Property, temperature: f64) -> f64 {
        interpolate(Self::table(material, property), temperature)
    }
}

/// Piecewise linear interpolation over `(x, y)` pairs sorted by `x`.
fn interpolate(table: &[(f64, f64)], x: f64) -> f64 {
    let (Some(&(x_min, _)), Some(&(x_max, _))) = (table.first(), table.last()) else {
        return f64::NAN;
    };
    if !(x >= x_min && x <= x_max) {
        return f64::NAN;
    }
    for pair in table.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    table[table.len() - 1].1
}
