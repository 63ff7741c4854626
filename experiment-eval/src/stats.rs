/// Error summary for one method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub n: usize,
    /// Mean absolute error in meters.
    pub mae: f64,
    /// Population standard deviation.
    pub std: f64,
    /// 90th percentile, nearest rank rounded down.
    pub p90: f64,
}

pub fn error_stats(errors: &[f64]) -> Option<ErrorStats> {
    if errors.is_empty() {
        return None;
    }
    let n = errors.len();
    let mean = errors.iter().sum::<f64>() / n as f64;
    let var = errors.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    let mut sorted = errors.to_vec();
    sorted.sort_by(f64::total_cmp);
    let idx90 = ((0.9 * n as f64) as usize).saturating_sub(1);

    Some(ErrorStats {
        n,
        mae: mean,
        std: var.sqrt(),
        p90: sorted[idx90],
    })
}

/// One-sided paired t-test of `control - treatment > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedTTest {
    pub t: f64,
    pub df: usize,
    pub p_value: f64,
    pub mean_diff: f64,
    pub std_diff: f64,
}

/// Pairs the two series by position, truncated to the shorter one. `None`
/// with fewer than two pairs.
pub fn paired_t_test(control: &[f64], treatment: &[f64]) -> Option<PairedTTest> {
    let n = control.len().min(treatment.len());
    if n < 2 {
        return None;
    }
    let diffs: Vec<f64> = control.iter().zip(treatment).map(|(c, t)| c - t).collect();
    let mean_diff = diffs.iter().sum::<f64>() / n as f64;
    let var = diffs.iter().map(|d| (d - mean_diff).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_diff = var.sqrt();
    let df = n - 1;

    if std_diff < 1e-10 {
        return Some(PairedTTest {
            t: 0.0,
            df,
            p_value: 0.5,
            mean_diff,
            std_diff: 0.0,
        });
    }
    let t = mean_diff / (std_diff / (n as f64).sqrt());

    Some(PairedTTest {
        t,
        df,
        p_value: student_t_sf(t, df as f64).clamp(0.0, 1.0),
        mean_diff,
        std_diff,
    })
}

/// `P(T > t)` for Student's t with `df` degrees of freedom.
pub fn student_t_sf(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    let tail = 0.5 * regularized_beta(df / 2.0, 0.5, x);
    if t > 0.0 { tail } else { 1.0 - tail }
}

/// Regularized incomplete beta `I_x(a, b)`.
fn regularized_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front =
        (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln())
            .exp();
    // The continued fraction converges fast only below the mean.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cf(a, b, x) / a
    } else {
        1.0 - front * beta_cf(b, a, 1.0 - x) / b
    }
}

/// Lentz evaluation of the incomplete beta continued fraction.
fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: u32 = 300;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-300;
    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let (qab, qap, qam) = (a + b, a + 1.0, a - 1.0);
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;
    for m in 1..=MAX_ITER {
        let m = f64::from(m);
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Lanczos approximation, good to about 1e-10 for `x > 0`.
fn ln_gamma(x: f64) -> f64 {
    const COF: [f64; 6] = [
        76.180_091_729_471_46,
        -86.505_320_329_416_77,
        24.014_098_240_830_91,
        -1.231_739_572_450_155,
        0.120_865_097_386_617_9e-2,
        -0.539_523_938_495_3e-5,
    ];
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut y = x;
    let mut ser = 1.000_000_000_190_015;
    for c in COF {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.506_628_274_631_000_5 * ser / x).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn summary_of_known_series() {
        let stats = error_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.n, 8);
        assert_eq!(stats.mae, 5.0);
        assert_eq!(stats.std, 2.0);
        // floor(0.9 * 8) - 1 = 6
        assert_eq!(stats.p90, 7.0);
    }

    #[test]
    fn p90_of_ten_is_ninth_smallest() {
        let errors: Vec<f64> = (1..=10).rev().map(f64::from).collect();
        assert_eq!(error_stats(&errors).unwrap().p90, 9.0);
        assert_eq!(error_stats(&[3.5]).unwrap().p90, 3.5);
        assert_eq!(error_stats(&[]), None);
    }

    #[test]
    fn t_distribution_tails() {
        // Cauchy
        assert!(close(student_t_sf(1.0, 1.0), 0.25, 1e-8));
        assert!(close(student_t_sf(-1.0, 1.0), 0.75, 1e-8));
        // df = 2 has a closed form
        let expected = 0.5 - 2.0 / (2.0 * 6f64.sqrt());
        assert!(close(student_t_sf(2.0, 2.0), expected, 1e-8));
        assert!(close(student_t_sf(0.0, 7.0), 0.5, 1e-12));
    }

    #[test]
    fn paired_test_detects_improvement() {
        let control = [2.0, 4.0, 6.0, 8.0, 10.0];
        let hybrid = [1.0, 2.0, 3.0, 4.0, 5.0];
        let tt = paired_t_test(&control, &hybrid).unwrap();
        assert_eq!(tt.df, 4);
        assert_eq!(tt.mean_diff, 3.0);
        assert!(close(tt.t, 4.242_640_687, 1e-6));
        assert!(close(tt.p_value, 0.006_617_8, 1e-6), "{}", tt.p_value);
    }

    #[test]
    fn constant_difference_is_inconclusive() {
        let tt = paired_t_test(&[5.0, 6.0, 7.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(tt.t, 0.0);
        assert_eq!(tt.p_value, 0.5);
        assert_eq!(tt.std_diff, 0.0);
        assert_eq!(tt.mean_diff, 1.0);
    }

    #[test]
    fn pairs_are_truncated_to_shorter_series() {
        assert_eq!(paired_t_test(&[1.0], &[0.5, 0.2]), None);
        let tt = paired_t_test(&[3.0, 1.0, 9.0, 9.0], &[1.0, 2.0]).unwrap();
        assert_eq!(tt.df, 1);
    }
}
