//! Offline significance tests comparing scenarios against the baseline.
//!
//! Welch's t-test on per-replication mean waiting times and a pooled two-proportion
//! z-test on balk shares. Both are two-sided; degenerate inputs yield `None`.

use serde::Serialize;

use crate::export::ScenarioComparison;

/// Significance level used by [compare_to_baseline].
pub const ALPHA: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestOutcome {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WelchOutcome {
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

impl WelchOutcome {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

/// Welch's unequal-variance t-test of `a` against `b`.
///
/// `None` when either sample has fewer than two values or both variances are zero.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<WelchOutcome> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (mean_a, var_a) = mean_and_variance(a);
    let (mean_b, var_b) = mean_and_variance(b);
    let se_a = var_a / a.len() as f64;
    let se_b = var_b / b.len() as f64;
    let se = se_a + se_b;
    if !(se > 0.0) || !se.is_finite() {
        return None;
    }

    let statistic = (mean_a - mean_b) / se.sqrt();
    let degrees_of_freedom = se * se
        / (se_a * se_a / (a.len() as f64 - 1.0) + se_b * se_b / (b.len() as f64 - 1.0));
    let p_value = student_t_two_sided(statistic, degrees_of_freedom);
    Some(WelchOutcome {
        statistic,
        degrees_of_freedom,
        p_value,
    })
}

/// Pooled two-proportion z-test of `x1 / n1` against `x2 / n2`.
///
/// Counts are taken as reals so per-replication averages can be tested directly.
/// `None` when a total is not positive, a count lies outside `[0, total]`, or the pooled
/// proportion is 0 or 1.
pub fn two_proportion_z_test(x1: f64, n1: f64, x2: f64, n2: f64) -> Option<TestOutcome> {
    let in_range = |x: f64, n: f64| n.is_finite() && n > 0.0 && x >= 0.0 && x <= n;
    if !in_range(x1, n1) || !in_range(x2, n2) {
        return None;
    }
    let p1 = x1 / n1;
    let p2 = x2 / n2;
    let pooled = (x1 + x2) / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if !(se > 0.0) {
        return None;
    }

    let statistic = (p1 - p2) / se;
    let p_value = (2.0 * (1.0 - normal_cdf(statistic.abs()))).clamp(0.0, 1.0);
    Some(TestOutcome { statistic, p_value })
}

/// One non-baseline scenario compared with the first scenario of a [ScenarioComparison].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineComparison {
    pub scenario: String,
    pub baseline_mean_wait: Option<f64>,
    pub scenario_mean_wait: Option<f64>,
    pub waiting_time: Option<WelchOutcome>,
    pub baseline_balk_share: Option<f64>,
    pub scenario_balk_share: Option<f64>,
    pub balking: Option<TestOutcome>,
}

impl BaselineComparison {
    pub fn waiting_time_differs(&self) -> bool {
        self.waiting_time.is_some_and(|t| t.is_significant(ALPHA))
    }

    pub fn balking_differs(&self) -> bool {
        self.balking.is_some_and(|z| z.is_significant(ALPHA))
    }
}

/// Run both tests for every scenario after the first against the first one.
pub fn compare_to_baseline(comparison: &ScenarioComparison) -> Vec<BaselineComparison> {
    let Some(baseline_waits) = comparison.mean_waiting_times_per_replication.first() else {
        return Vec::new();
    };
    let baseline_served = comparison.served_customers.first().copied().unwrap_or(0.0);
    let baseline_balked = comparison.balked_customers.first().copied().unwrap_or(0.0);

    comparison
        .scenarios
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, name)| {
            let waits = comparison
                .mean_waiting_times_per_replication
                .get(index)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let served = comparison.served_customers.get(index).copied().unwrap_or(0.0);
            let balked = comparison.balked_customers.get(index).copied().unwrap_or(0.0);

            BaselineComparison {
                scenario: name.clone(),
                baseline_mean_wait: comparison.mean_waiting_time(0),
                scenario_mean_wait: comparison.mean_waiting_time(index),
                waiting_time: welch_t_test(baseline_waits, waits),
                baseline_balk_share: comparison.balk_share(0),
                scenario_balk_share: comparison.balk_share(index),
                balking: two_proportion_z_test(
                    baseline_balked,
                    baseline_served + baseline_balked,
                    balked,
                    served + balked,
                ),
            }
        })
        .collect()
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function, Chebyshev fit with fractional error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}

/// Two-sided tail probability `P(|T| >= |t|)` of Student's t with `df` degrees of freedom.
fn student_t_two_sided(t: f64, df: f64) -> f64 {
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t)).clamp(0.0, 1.0)
}

const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos, g = 7), for positive arguments.
fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + 7.5;
    let series = LANCZOS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Regularized incomplete beta `I_x(a, b)`.
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    // The continued fraction converges quickly only on this side of the mean.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPS: f64 = 1e-14;
    const FPMIN: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < FPMIN { FPMIN } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let even = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + even * d);
        c = guard(1.0 + even / c);
        h *= d * c;

        let odd = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + odd * d);
        c = guard(1.0 + odd / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}
