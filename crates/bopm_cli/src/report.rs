//! Plain-text results report.
//!
//! Lists, per specification, every generated request's parameters and its
//! computed price. Padding rows carry no information and are omitted: the
//! report walks exactly `sum(repeats)` leading entries of the batch.

use bopm_core::types::OptionRequest;
use bopm_exec::generator::BatchSpec;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const COLUMNS: [&str; 8] = ["T", "S", "K", "r", "sigma", "q", "n", "BOPM_Result"];
const COLUMN_WIDTH: usize = 12;

fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(COLUMNS.len() * COLUMN_WIDTH))
}

/// Writes the results report to an arbitrary sink.
///
/// `requests` and `results` are indexed identically; both must cover at
/// least the total repeat count of `specs`. Trailing padding entries are
/// never read.
pub fn write_report(
    out: &mut impl Write,
    report_type: &str,
    specs: &[BatchSpec],
    requests: &[OptionRequest],
    results: &[f32],
) -> io::Result<()> {
    writeln!(out, "===================================================")?;
    writeln!(out, " Binomial Options Pricing Model: {report_type}")?;
    writeln!(out, "===================================================")?;
    writeln!(out)?;

    let mut index = 0usize;
    for spec in specs {
        rule(out)?;
        writeln!(
            out,
            "Company: {} (K_Step={:.3} #tests={})",
            spec.label, spec.strike_step, spec.repeats
        )?;
        rule(out)?;
        for name in COLUMNS {
            write!(out, "{:>width$}", format!("{name} | "), width = COLUMN_WIDTH)?;
        }
        writeln!(out)?;
        rule(out)?;

        for _ in 0..spec.repeats {
            let request = &requests[index];
            writeln!(
                out,
                "{:>9}{:>12.3}{:>12.3}{:>12.3}{:>12.3}{:>12.3}{:>12}{:>14.5}",
                request.maturity,
                request.spot,
                request.strike,
                request.rate,
                request.volatility,
                request.dividend_yield,
                request.tree_height,
                results[index],
            )?;
            index += 1;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Writes the results report to a file.
pub fn save_report(
    path: &Path,
    report_type: &str,
    specs: &[BatchSpec],
    requests: &[OptionRequest],
    results: &[f32],
) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, report_type, specs, requests, results)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<BatchSpec>, Vec<OptionRequest>, Vec<f32>) {
        let base = OptionRequest::new(1, 100.0, 80.0, 0.05, 0.3, 0.01, 800);
        let specs = vec![BatchSpec::new("IBM", base, 5.0, 2)];
        let requests = vec![base, base.with_strike(85.0), OptionRequest::padding()];
        let results = vec![1.25, 2.5, 0.0];
        (specs, requests, results)
    }

    #[test]
    fn test_report_contains_header_and_spec_block() {
        let (specs, requests, results) = sample();
        let mut buffer = Vec::new();
        write_report(&mut buffer, "SW model results", &specs, &requests, &results).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("Binomial Options Pricing Model: SW model results"));
        assert!(text.contains("Company: IBM (K_Step=5.000 #tests=2)"));
        assert!(text.contains("BOPM_Result"));
    }

    #[test]
    fn test_report_lists_stepped_strikes_and_prices() {
        let (specs, requests, results) = sample();
        let mut buffer = Vec::new();
        write_report(&mut buffer, "SW model results", &specs, &requests, &results).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("80.000"));
        assert!(text.contains("85.000"));
        assert!(text.contains("1.25000"));
        assert!(text.contains("2.50000"));
    }

    #[test]
    fn test_report_skips_padding_rows() {
        let (specs, requests, results) = sample();
        let mut buffer = Vec::new();
        write_report(&mut buffer, "SW model results", &specs, &requests, &results).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        // Two data rows only: the padding request (strike 1.0) never prints.
        let data_rows = text
            .lines()
            .filter(|line| line.trim_start().starts_with('1') && line.contains('.'))
            .count();
        assert_eq!(data_rows, 2);
    }
}
