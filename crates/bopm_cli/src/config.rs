//! Plain-text configuration tables for resources and test batches.
//!
//! Both tables are whitespace-delimited. A `#` starts a comment that runs
//! to the end of the line; blank lines are skipped. Tables are consumed
//! once at startup and every parse or range failure is fatal, reported
//! with the file name and line number.
//!
//! Resource table: one data row of four integers
//! `threads kernels compute_units_per_kernel parallel_functions_per_cu`.
//!
//! Test table: one data row per specification,
//! `label T S K r sigma q n K_step repeats`.

use bopm_core::types::{OptionRequest, MAX_BATCH_SIZE, MAX_TREE_HEIGHT};
use bopm_exec::accel::DeviceTopology;
use bopm_exec::generator::BatchSpec;
use std::path::Path;
use thiserror::Error;

/// Number of fields in a resource-table row.
const RESOURCE_FIELDS: usize = 4;

/// Number of fields in a test-table row.
const TEST_FIELDS: usize = 10;

/// Configuration table errors.
///
/// Every variant carries enough context to point at the offending file and
/// line; all of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read {file}: {source}")]
    Io {
        /// Path of the unreadable file.
        file: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A row carried the wrong number of fields.
    #[error("{file} (line {line}): expected {expected} values, found {found}")]
    FieldCount {
        /// Configuration file name.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Expected field count.
        expected: usize,
        /// Fields actually present.
        found: usize,
    },

    /// A field failed to parse as its expected type.
    #[error("{file} (line {line}): invalid value for {field}: '{value}'")]
    InvalidValue {
        /// Configuration file name.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
        /// Offending token.
        value: String,
    },

    /// A count field must be positive.
    #[error("{file} (line {line}): {field} must be > 0")]
    NotPositive {
        /// Configuration file name.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
    },

    /// A field fell outside its valid range.
    #[error("{file} (line {line}): {field}={value} outside valid range [1, {max}]")]
    OutOfRange {
        /// Configuration file name.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Upper bound of the valid range.
        max: u64,
    },

    /// The test table contained no specification rows.
    #[error("{file}: no test specifications found")]
    EmptyTable {
        /// Configuration file name.
        file: String,
    },

    /// The resource table contained no data row.
    #[error("{file}: missing resource row")]
    MissingResources {
        /// Configuration file name.
        file: String,
    },
}

/// Parsed resource table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Worker threads for the software path.
    pub threads: usize,
    /// Accelerator topology for the hardware path.
    pub topology: DeviceTopology,
}

/// Yields `(line_number, payload)` for data rows: comments stripped,
/// blank lines skipped, line numbers 1-based.
fn data_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input.lines().enumerate().filter_map(|(idx, line)| {
        let payload = line.split('#').next().unwrap_or(line).trim();
        if payload.is_empty() {
            None
        } else {
            Some((idx + 1, payload))
        }
    })
}

fn parse_field<T: std::str::FromStr>(
    token: &str,
    field: &'static str,
    file: &str,
    line: usize,
) -> Result<T, ConfigError> {
    token.parse().map_err(|_| ConfigError::InvalidValue {
        file: file.to_string(),
        line,
        field,
        value: token.to_string(),
    })
}

fn require_positive(
    value: usize,
    field: &'static str,
    file: &str,
    line: usize,
) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::NotPositive {
            file: file.to_string(),
            line,
            field,
        });
    }
    Ok(value)
}

/// Parses a resource table from a string.
///
/// The first data row wins; `file` is used only for diagnostics.
pub fn parse_resources_str(input: &str, file: &str) -> Result<ResourceConfig, ConfigError> {
    for (line, payload) in data_lines(input) {
        let tokens: Vec<&str> = payload.split_whitespace().collect();
        if tokens.len() != RESOURCE_FIELDS {
            return Err(ConfigError::FieldCount {
                file: file.to_string(),
                line,
                expected: RESOURCE_FIELDS,
                found: tokens.len(),
            });
        }

        let threads = require_positive(
            parse_field(tokens[0], "threads", file, line)?,
            "threads",
            file,
            line,
        )?;
        let kernels = require_positive(
            parse_field(tokens[1], "kernels", file, line)?,
            "kernels",
            file,
            line,
        )?;
        let compute_units = require_positive(
            parse_field(tokens[2], "compute_units_per_kernel", file, line)?,
            "compute_units_per_kernel",
            file,
            line,
        )?;
        let functions = require_positive(
            parse_field(tokens[3], "parallel_functions_per_cu", file, line)?,
            "parallel_functions_per_cu",
            file,
            line,
        )?;

        return Ok(ResourceConfig {
            threads,
            topology: DeviceTopology::new(kernels, compute_units, functions),
        });
    }

    Err(ConfigError::MissingResources {
        file: file.to_string(),
    })
}

/// Parses a test table from a string.
///
/// Per-row limits (`n`, `repeats`) are enforced here with line context;
/// aggregate batch limits are enforced later by the generator.
pub fn parse_tests_str(input: &str, file: &str) -> Result<Vec<BatchSpec>, ConfigError> {
    let mut specs = Vec::new();

    for (line, payload) in data_lines(input) {
        let tokens: Vec<&str> = payload.split_whitespace().collect();
        if tokens.len() != TEST_FIELDS {
            return Err(ConfigError::FieldCount {
                file: file.to_string(),
                line,
                expected: TEST_FIELDS,
                found: tokens.len(),
            });
        }

        let label = tokens[0].to_string();
        let maturity: u32 = parse_field(tokens[1], "T", file, line)?;
        let spot: f32 = parse_field(tokens[2], "S", file, line)?;
        let strike: f32 = parse_field(tokens[3], "K", file, line)?;
        let rate: f32 = parse_field(tokens[4], "r", file, line)?;
        let volatility: f32 = parse_field(tokens[5], "sigma", file, line)?;
        let dividend_yield: f32 = parse_field(tokens[6], "q", file, line)?;
        let tree_height: u32 = parse_field(tokens[7], "n", file, line)?;
        let strike_step: f32 = parse_field(tokens[8], "K_step", file, line)?;
        let repeats: u32 = parse_field(tokens[9], "repeats", file, line)?;

        if maturity == 0 {
            return Err(ConfigError::NotPositive {
                file: file.to_string(),
                line,
                field: "T",
            });
        }
        if tree_height == 0 || tree_height > MAX_TREE_HEIGHT {
            return Err(ConfigError::OutOfRange {
                file: file.to_string(),
                line,
                field: "n",
                value: u64::from(tree_height),
                max: u64::from(MAX_TREE_HEIGHT),
            });
        }
        if repeats == 0 || repeats as usize > MAX_BATCH_SIZE {
            return Err(ConfigError::OutOfRange {
                file: file.to_string(),
                line,
                field: "repeats",
                value: u64::from(repeats),
                max: MAX_BATCH_SIZE as u64,
            });
        }

        let base = OptionRequest::new(
            maturity,
            spot,
            strike,
            rate,
            volatility,
            dividend_yield,
            tree_height,
        );
        specs.push(BatchSpec::new(label, base, strike_step, repeats));
    }

    if specs.is_empty() {
        return Err(ConfigError::EmptyTable {
            file: file.to_string(),
        });
    }

    Ok(specs)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        file: path.display().to_string(),
        source,
    })
}

/// Loads and parses the resource table from a file.
pub fn load_resources(path: &Path) -> Result<ResourceConfig, ConfigError> {
    let input = read(path)?;
    parse_resources_str(&input, &path.display().to_string())
}

/// Loads and parses the test table from a file.
pub fn load_tests(path: &Path) -> Result<Vec<BatchSpec>, ConfigError> {
    let input = read(path)?;
    parse_tests_str(&input, &path.display().to_string())
}
