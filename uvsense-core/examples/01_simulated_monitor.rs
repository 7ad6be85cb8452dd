//! Simulated UV Monitor Example
//!
//! Runs the driver without any hardware: the simulation source walks a
//! compressed day of UV levels and the driver reports raw intensity, UV
//! index, and risk category for each sample.
//!
//! ## What You'll Learn
//!
//! - Building a driver configuration
//! - Creating a simulation-only driver
//! - Reading the three quantities and the risk label
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_monitor
//! ```

use uvsense_core::{DriverConfig, DriverError, UvSensor};

fn main() -> Result<(), DriverError> {
    println!("uvsense Simulated Monitor");
    println!("=========================\n");

    let mut config = DriverConfig::simulation();
    // One level per five samples keeps the output short
    config.simulation.steps_per_level = 5;

    let mut sensor = UvSensor::simulated(config)?;
    println!("Mode: {:?}\n", sensor.mode());

    println!("{:>6} {:>6} {:>6}  {}", "sample", "raw", "index", "risk");
    for sample in 0..65 {
        let raw = sensor.read_raw()?;
        let index = sensor.read_index()?;
        let risk = sensor.read_risk_level()?;
        println!("{:>6} {:>6} {:>6}  {}", sample, raw, index, risk);
    }

    Ok(())
}
