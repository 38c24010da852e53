//! IPOPT options rendering.
//!
//! CppAD's IPOPT driver takes its options as newline-separated records of
//! the form `<Type> <name> <value>`. The seven request fields map onto these
//! records; boolean fields contribute a record only when enabled.

use crate::request::entities::OptimizationRequest;
use serde::Serialize;

/// One option record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IpoptOption {
    Integer { name: &'static str, value: i32 },
    Numeric { name: &'static str, value: f64 },
    String { name: &'static str, value: &'static str },
    Sparse { direction: &'static str },
}

/// The full option set for one solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpoptOptions {
    records: Vec<IpoptOption>,
}

impl IpoptOptions {
    pub fn from_request(request: &OptimizationRequest) -> Self {
        let mut records = vec![
            IpoptOption::Integer {
                name: "print_level",
                value: request.print_level,
            },
            IpoptOption::Integer {
                name: "max_iter",
                value: request.iterations,
            },
            IpoptOption::Numeric {
                name: "tol",
                value: request.tolerance,
            },
        ];

        if request.sparse_forward {
            records.push(IpoptOption::Sparse {
                direction: "forward",
            });
        }
        if request.sparse_reverse {
            records.push(IpoptOption::Sparse {
                direction: "reverse",
            });
        }
        if request.adaptive_mu_strategy {
            records.push(IpoptOption::String {
                name: "mu_strategy",
                value: "adaptive",
            });
        }
        if request.hessian_approximation {
            records.push(IpoptOption::String {
                name: "hessian_approximation",
                value: "limited-memory",
            });
        }

        Self { records }
    }

    pub fn records(&self) -> &[IpoptOption] {
        &self.records
    }

    /// Render in the CppAD options-string layout, one record per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.render());
            out.push('\n');
        }
        out
    }
}

impl IpoptOption {
    fn render(&self) -> String {
        match self {
            IpoptOption::Integer { name, value } => format!("Integer {:<12} {}", name, value),
            IpoptOption::Numeric { name, value } => {
                format!("Numeric {:<12} {}", name, format_numeric(*value))
            }
            IpoptOption::String { name, value } => format!("String  {}  {}", name, value),
            IpoptOption::Sparse { direction } => format!("Sparse  true         {}", direction),
        }
    }
}

/// Format a real the way a default C++ output stream does (`%g`, six
/// significant digits), e.g. `0.001` and `1e-09`.
fn format_numeric(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Rounding to six significant digits decides the exponent.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..PRECISION).contains(&exponent) {
        let fixed = format!("{:.*}", (PRECISION - 1 - exponent) as usize, value);
        trim_fraction(&fixed).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl std::fmt::Display for IpoptOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_matches_stream_formatting() {
        assert_eq!(format_numeric(1e-3), "0.001");
        assert_eq!(format_numeric(1e-4), "0.0001");
        assert_eq!(format_numeric(1e-5), "1e-05");
        assert_eq!(format_numeric(1e-9), "1e-09");
        assert_eq!(format_numeric(2.5e-8), "2.5e-08");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1234567.0), "1.23457e+06");
        assert_eq!(format_numeric(-0.5), "-0.5");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn test_small_tolerance_renders_in_exponent_form() {
        let options =
            IpoptOptions::from_request(&OptimizationRequest::default().with_tolerance(1e-9));
        assert!(options.render().contains("Numeric tol          1e-09\n"));
    }

    #[test]
    fn test_render_defaults() {
        let options = IpoptOptions::from_request(&OptimizationRequest::default());
        assert_eq!(
            options.render(),
            "Integer print_level  0\n\
             Integer max_iter     100\n\
             Numeric tol          0.001\n\
             Sparse  true         forward\n\
             Sparse  true         reverse\n\
             String  mu_strategy  adaptive\n\
             String  hessian_approximation  limited-memory\n"
        );
    }

    #[test]
    fn test_disabled_flags_are_omitted() {
        let request = OptimizationRequest::default()
            .with_adaptive_mu_strategy(false)
            .with_hessian_approximation(false)
            .with_sparse_forward(false)
            .with_sparse_reverse(false);
        let options = IpoptOptions::from_request(&request);

        assert_eq!(options.records().len(), 3);
        assert_eq!(
            options.render(),
            "Integer print_level  0\nInteger max_iter     100\nNumeric tol          0.001\n"
        );
    }

    #[test]
    fn test_values_pass_through_unchanged() {
        let request = OptimizationRequest::default()
            .with_iterations(-1)
            .with_print_level(5);
        let rendered = IpoptOptions::from_request(&request).render();
        assert!(rendered.contains("Integer max_iter     -1\n"));
        assert!(rendered.contains("Integer print_level  5\n"));
    }
}
