//! The unit system used throughout: masses in dalton, charges in elementary charges, mass over
//! charge in thomson, and dimensionless ratios.

/// The mass quantity
#[macro_use]
pub mod mass {
    quantity! {
        /// Mass (base unit dalton, Da)
        quantity: Mass; "mass";
        /// Mass dimension, Da
        dimension: Q<P1, Z0>;
        units {
            @dalton: 1.0; "Da", "dalton", "daltons";
        }
    }
}

/// The charge quantity
#[macro_use]
pub mod charge {
    quantity! {
        /// Charge (base unit electron, e)
        quantity: Charge; "charge";
        /// Charge dimension, e
        dimension: Q<Z0, P1>;
        units {
            @e: 1.0; "e", "electron", "electrons";
        }
    }
}

/// The mass over charge quantity
#[macro_use]
pub mod mass_over_charge {
    quantity! {
        /// Mass over charge (base unit thomson, Th)
        quantity: MassOverCharge; "mass_over_charge";
        /// Mass over charge dimension, Th
        dimension: Q<P1, N1>;
        units {
            @thomson: 1.0; "Th", "thomson", "thomson";
        }
    }
}

/// The ratio quantity
#[macro_use]
pub mod ratio {
    quantity! {
        /// Ratio (dimensionless quantity)
        quantity: Ratio; "ratio";
        /// Ratio dimension
        dimension: Q<Z0, Z0>;
        units {
            @fraction: 1.0; "⅟", "fraction", "fraction";
            @percent: 1.0E-2; "%", "percent", "percent";
            @ppm: 1.0E-6; "ppm", "part per million", "parts per million";
        }
    }
}

system! {
    quantities: Q {
        mass: dalton, M;
        charge: e, C;
    }
    units: U {
        mod mass::Mass,
        mod charge::Charge,
        mod mass_over_charge::MassOverCharge,
        mod ratio::Ratio,
    }
}

/// The quantities with `f64` as underlying storage type
pub mod f64 {
    mod mks {
        pub(super) use super::super::*;
    }

    Q!(self::mks, f64);

    /// Annotate the given number as being in Da
    pub fn da(value: f64) -> Mass {
        Mass::new::<super::mass::dalton>(value)
    }

    /// Annotate the given number as being in Th
    pub fn mz(value: f64) -> MassOverCharge {
        MassOverCharge::new::<super::mass_over_charge::thomson>(value)
    }

    /// Annotate the given number as being a number of elementary charges
    pub fn charge(value: u8) -> Charge {
        Charge::new::<super::charge::e>(f64::from(value))
    }
}

pub use self::charge::e;
pub use self::f64::*;
pub use self::mass::dalton;
pub use self::mass_over_charge::thomson;
pub use self::ratio::{fraction, ppm};
