use std::fmt;

use crate::{
    samples::{Method, Sample},
    stats::{error_stats, paired_t_test, ErrorStats, PairedTTest},
};

pub const REPORT_FILE: &str = "evaluation_report.txt";
pub const SIGNIFICANCE: f64 = 0.05;

/// Wi-Fi only (control) against Wi-Fi + cell tower fusion (treatment).
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub control: Option<ErrorStats>,
    pub hybrid: Option<ErrorStats>,
    pub t_test: Option<PairedTTest>,
}

/// Rows with an unknown method count toward neither group. Control and
/// hybrid errors are paired in file order.
pub fn evaluate(samples: &[Sample]) -> Evaluation {
    let errors = |method: Method| -> Vec<f64> {
        samples
            .iter()
            .filter(|s| s.method == method)
            .map(|s| s.error_m)
            .collect()
    };
    let control = errors(Method::WifiOnly);
    let hybrid = errors(Method::Hybrid);

    Evaluation {
        control: error_stats(&control),
        hybrid: error_stats(&hybrid),
        t_test: paired_t_test(&control, &hybrid),
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, title: &str, stats: &ErrorStats) -> fmt::Result {
    writeln!(f, "{title}:")?;
    writeln!(f, "  samples: {}", stats.n)?;
    writeln!(f, "  mean absolute error (MAE): {:.2} m", stats.mae)?;
    writeln!(f, "  standard deviation: {:.2} m", stats.std)?;
    writeln!(f, "  90th percentile error (P90): {:.2} m", stats.p90)?;
    writeln!(f)
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Positioning experiment (control: Wi-Fi only, treatment: hybrid)"
        )?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;

        if let Some(stats) = &self.control {
            write_group(f, "Control group (Wi-Fi only)", stats)?;
        }
        if let Some(stats) = &self.hybrid {
            write_group(f, "Treatment group (Wi-Fi + cell towers)", stats)?;
        }

        let Some(tt) = &self.t_test else {
            return write!(f, "A paired t-test needs at least 2 sample pairs.");
        };
        writeln!(f, "Paired t-test (one-sided, H1: hybrid error is lower):")?;
        writeln!(f, "  mean difference (control - hybrid): {:.2} m", tt.mean_diff)?;
        writeln!(f, "  t statistic: {:.3}, degrees of freedom: {}", tt.t, tt.df)?;
        writeln!(f, "  p-value: {:.4}", tt.p_value)?;
        if tt.p_value < SIGNIFICANCE {
            write!(f, "  result: the improvement is significant (p < {SIGNIFICANCE}).")
        } else {
            write!(f, "  result: no significant difference in this sample (p >= {SIGNIFICANCE}).")
        }
    }
}
