//! The `run` command: price the configured batch in sw or hw mode.
//!
//! The sw mode prices on the thread pool and writes a report. The hw mode
//! first generates a single-threaded software reference, prices the same
//! batch on the emulated accelerator, compares the defined prefix of the
//! two result vectors, and fails with the mismatch count if any entry
//! diverges beyond tolerance.

use crate::config::{self, ResourceConfig};
use crate::report;
use crate::{CliError, Result};
use bopm_core::types::MAX_BATCH_SIZE;
use bopm_core::validate::compare_results;
use bopm_exec::accel::emulated_pool;
use bopm_exec::executor::price_batch;
use bopm_exec::generator::{expand_specs, Batch, BatchSpec};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Mismatch examples logged before the rest are summarised as a count.
const MAX_MISMATCH_REPORTS: usize = 5;

/// Entry point for `bopm run`.
pub fn run(mode: &str, tests: &str, resources: &str, output: Option<&str>) -> Result<()> {
    let resource_config = config::load_resources(Path::new(resources))?;
    let specs = config::load_tests(Path::new(tests))?;
    info!(
        specs = specs.len(),
        threads = resource_config.threads,
        lanes = resource_config.topology.lanes(),
        "configuration loaded"
    );

    match mode {
        "sw" => run_sw(
            &resource_config,
            &specs,
            Path::new(output.unwrap_or("SW_results.txt")),
        ),
        "hw" => run_hw(
            &resource_config,
            &specs,
            Path::new(output.unwrap_or("HW_results.txt")),
        ),
        other => Err(CliError::UnknownMode(other.to_string())),
    }
}

fn expand(specs: &[BatchSpec], lanes: usize) -> Result<Batch> {
    let batch = expand_specs(specs, lanes, MAX_BATCH_SIZE)?;
    info!(
        defined = batch.defined,
        rounded = batch.requests.len(),
        padding = batch.padding(),
        "test vectors generated"
    );
    Ok(batch)
}

fn run_sw(resource_config: &ResourceConfig, specs: &[BatchSpec], output: &Path) -> Result<()> {
    let batch = expand(specs, resource_config.threads)?;

    let start = Instant::now();
    let results = price_batch(&batch.requests, resource_config.threads)?;
    info!(
        threads = resource_config.threads,
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "software batch complete"
    );

    report::save_report(output, "SW model results", specs, &batch.requests, &results)?;
    info!(path = %output.display(), "results written");
    Ok(())
}

fn run_hw(resource_config: &ResourceConfig, specs: &[BatchSpec], output: &Path) -> Result<()> {
    let topology = resource_config.topology;
    topology.validate()?;
    let batch = expand(specs, topology.lanes())?;

    // Software reference for validation, single worker.
    let reference = price_batch(&batch.requests, 1)?;

    let mut pool = emulated_pool(topology)?;
    let start = Instant::now();
    let accelerated = pool.submit(&batch.requests)?;
    info!(
        kernels = topology.kernels,
        lanes = topology.lanes(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "accelerated batch complete"
    );

    let comparison = compare_results(
        &reference,
        &accelerated,
        batch.defined,
        MAX_MISMATCH_REPORTS,
    );
    for mismatch in &comparison.samples {
        warn!(
            index = mismatch.index,
            expected = f64::from(mismatch.expected),
            actual = f64::from(mismatch.actual),
            "software and accelerated results diverge"
        );
    }

    report::save_report(output, "HW results", specs, &batch.requests, &accelerated)?;
    info!(path = %output.display(), "results written");

    if comparison.passed() {
        info!(compared = batch.defined, "validation passed");
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            mismatches: comparison.mismatches,
        })
    }
}
