//! Factory parameter set loaded with every new ECU file

use super::parameter::{Category, Subrole, TuningParameter};

/// Parameters every freshly loaded file starts with
///
/// Subroles are tagged explicitly so the stage rules never depend on the
/// display names.
pub fn default_parameters() -> Vec<TuningParameter> {
    vec![
        TuningParameter::new("Turbo Boost Pressure", Category::Boost, 1.2, "bar")
            .with_description("Maximum turbocharger boost pressure")
            .with_address(0x12345),
        TuningParameter::new("Fuel Rail Pressure", Category::Fuel, 1600.0, "bar")
            .with_description("Common rail fuel injection pressure")
            .with_address(0x23456),
        TuningParameter::new("Injection Timing", Category::Timing, 8.5, "°BTDC")
            .with_description("Main injection timing advance")
            .with_address(0x34567),
        TuningParameter::new("Speed Limiter", Category::Limiter, 250.0, "km/h")
            .with_subrole(Subrole::Speed)
            .with_description("Maximum vehicle speed limit")
            .with_address(0x45678),
        TuningParameter::new("Torque Limiter", Category::Limiter, 400.0, "Nm")
            .with_subrole(Subrole::Torque)
            .with_description("Maximum engine torque limit")
            .with_address(0x56789),
        TuningParameter::new("EGR Valve", Category::Other, 100.0, "%")
            .with_subrole(Subrole::Egr)
            .with_description("Exhaust Gas Recirculation valve opening"),
    ]
}
