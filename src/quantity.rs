// src/quantity.rs

//! Closed set of the quantities the tools know how to load, label and range.
//!
//! Adding a quantity means adding a variant here; plot ranges and labels are
//! never chosen by matching on file names.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    Lift,
    Drag,
    VelocityX,
    VelocityY,
    VelocityZ,
    Amplitude,
}

/// Every quantity, in column order of the probe and coefficient files.
pub const ALL_QUANTITIES: [Quantity; 6] = [
    Quantity::Lift,
    Quantity::Drag,
    Quantity::VelocityX,
    Quantity::VelocityY,
    Quantity::VelocityZ,
    Quantity::Amplitude,
];

impl Quantity {
    /// Column header used in the source tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Quantity::Lift => "Cl",
            Quantity::Drag => "Cd",
            Quantity::VelocityX => "Velocity_X",
            Quantity::VelocityY => "Velocity_Y",
            Quantity::VelocityZ => "Velocity_Z",
            Quantity::Amplitude => "Amplitude",
        }
    }

    /// Axis label for plots.
    pub fn label(self) -> &'static str {
        match self {
            Quantity::Lift => "Lift coefficient (Cl)",
            Quantity::Drag => "Drag coefficient (Cd)",
            Quantity::VelocityX => "v/U (X-direction)",
            Quantity::VelocityY => "v/U (Y-direction)",
            Quantity::VelocityZ => "v/U (Z-direction)",
            Quantity::Amplitude => "Amplitude (v/U)",
        }
    }

    /// Default y-range for a single time-history plot.
    pub fn default_range(self) -> (f64, f64) {
        match self {
            Quantity::Lift => (0.0, 1.25),
            Quantity::Drag => (-0.01, 0.05),
            Quantity::VelocityX => (0.0, 1.2),
            Quantity::VelocityY | Quantity::VelocityZ | Quantity::Amplitude => (-0.2, 0.2),
        }
    }

    /// Short human name, e.g. for the statistics log.
    pub fn short_name(self) -> &'static str {
        self.column_name()
    }

    pub fn from_column(name: &str) -> Option<Self> {
        ALL_QUANTITIES
            .iter()
            .copied()
            .find(|q| q.column_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::from_column(s).ok_or_else(|| {
            format!(
                "Unknown quantity '{s}'. Expected one of: {}",
                ALL_QUANTITIES
                    .iter()
                    .map(|q| q.column_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

/// Velocity component selector for probe data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityComponent {
    X,
    Y,
    Z,
}

pub const COMPONENT_NAMES: [&str; 3] = ["X", "Y", "Z"];

impl VelocityComponent {
    pub fn index(self) -> usize {
        match self {
            VelocityComponent::X => 0,
            VelocityComponent::Y => 1,
            VelocityComponent::Z => 2,
        }
    }

    pub fn quantity(self) -> Quantity {
        match self {
            VelocityComponent::X => Quantity::VelocityX,
            VelocityComponent::Y => Quantity::VelocityY,
            VelocityComponent::Z => Quantity::VelocityZ,
        }
    }

    pub fn name(self) -> &'static str {
        COMPONENT_NAMES[self.index()]
    }
}

impl FromStr for VelocityComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(VelocityComponent::X),
            "y" => Ok(VelocityComponent::Y),
            "z" => Ok(VelocityComponent::Z),
            other => Err(format!(
                "Invalid velocity component '{other}'. Expected 'x', 'y' or 'z'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_from_column() {
        assert_eq!(Quantity::from_column("Cl"), Some(Quantity::Lift));
        assert_eq!(Quantity::from_column("cd"), Some(Quantity::Drag));
        assert_eq!(Quantity::from_column(" Velocity_Z "), Some(Quantity::VelocityZ));
        assert_eq!(Quantity::from_column("Cm"), None);
    }

    #[test]
    fn test_quantity_parse_error_lists_choices() {
        let err = "Cm".parse::<Quantity>().unwrap_err();
        assert!(err.contains("Cl"));
        assert!(err.contains("Amplitude"));
    }

    #[test]
    fn test_default_ranges_are_ordered() {
        for q in ALL_QUANTITIES {
            let (lo, hi) = q.default_range();
            assert!(lo < hi, "{q} range is empty");
        }
    }

    #[test]
    fn test_velocity_component_parsing() {
        assert_eq!("x".parse::<VelocityComponent>(), Ok(VelocityComponent::X));
        assert_eq!("Y".parse::<VelocityComponent>(), Ok(VelocityComponent::Y));
        assert_eq!(" z".parse::<VelocityComponent>(), Ok(VelocityComponent::Z));
        assert!("w".parse::<VelocityComponent>().is_err());
        assert_eq!(VelocityComponent::Z.quantity(), Quantity::VelocityZ);
        assert_eq!(VelocityComponent::Y.name(), "Y");
    }
}
