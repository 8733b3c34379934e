//! The `check` command: parse and echo configuration without running.

use crate::config;
use crate::Result;
use bopm_core::types::MAX_BATCH_SIZE;
use bopm_exec::generator::round_up_to_lanes;
use std::path::Path;
use tracing::info;

/// Parses both tables, validates them and reports the resolved setup.
pub fn run(tests: &str, resources: &str) -> Result<()> {
    let resource_config = config::load_resources(Path::new(resources))?;
    let specs = config::load_tests(Path::new(tests))?;

    let defined: usize = specs.iter().map(|spec| spec.repeats as usize).sum();
    let lanes = resource_config.topology.lanes();

    info!(
        threads = resource_config.threads,
        host_cpus = num_cpus::get(),
        "software resources"
    );
    info!(
        kernels = resource_config.topology.kernels,
        compute_units_per_kernel = resource_config.topology.compute_units_per_kernel,
        parallel_functions_per_cu = resource_config.topology.parallel_functions_per_cu,
        lanes,
        "hardware resources"
    );

    for spec in &specs {
        info!(
            label = %spec.label,
            maturity = spec.base.maturity,
            spot = f64::from(spec.base.spot),
            strike = f64::from(spec.base.strike),
            rate = f64::from(spec.base.rate),
            volatility = f64::from(spec.base.volatility),
            dividend_yield = f64::from(spec.base.dividend_yield),
            tree_height = spec.base.tree_height,
            strike_step = f64::from(spec.strike_step),
            repeats = spec.repeats,
            "test specification"
        );
    }

    info!(
        defined,
        max_batch = MAX_BATCH_SIZE,
        sw_rounded = round_up_to_lanes(defined, resource_config.threads),
        hw_rounded = round_up_to_lanes(defined, lanes),
        "batch sizing"
    );

    Ok(())
}
