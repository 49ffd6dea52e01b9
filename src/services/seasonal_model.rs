use thiserror::Error;

/// Seasonal cycle length, matching a monthly cycle on daily closes.
pub const SEASONAL_PERIOD: usize = 12;

/// Fewest observations that leave enough differenced rows to estimate both
/// autoregressive coefficients.
pub const MIN_OBSERVATIONS: usize = 2 * SEASONAL_PERIOD + 4;

#[derive(Debug, Error)]
pub enum SeasonalModelError {
    #[error("insufficient data: seasonal model needs at least {needed} observations, got {got}")]
    TooShort { needed: usize, got: usize },

    #[error("price series contains non-finite values")]
    NonFinite,
}

/// Seasonal autoregressive model fitted to a daily close series.
///
/// The series is first-differenced and then seasonally differenced at lag
/// [`SEASONAL_PERIOD`], and an AR model
///
/// ```text
/// w_t = phi * w_{t-1} + seasonal_phi * w_{t-m}
/// ```
///
/// is estimated on the stationary remainder by ordinary least squares.
/// Forecasts recurse on `w` and invert both differences back to the price
/// level, so a trend and a repeating seasonal pattern are both carried
/// forward. No residual-diagnostic validation of fit adequacy is done;
/// only structural errors are reported.
#[derive(Debug, Clone)]
pub struct FittedSeasonalAr {
    phi: f64,
    seasonal_phi: f64,
    /// First differences of the input, oldest first.
    diffs: Vec<f64>,
    /// Seasonally differenced first differences.
    seasonal_diffs: Vec<f64>,
    last_value: f64,
    residual_std: f64,
}

impl FittedSeasonalAr {
    /// Fits the model to closes in ascending date order.
    pub fn fit(values: &[f64]) -> Result<Self, SeasonalModelError> {
        let m = SEASONAL_PERIOD;
        let n = values.len();

        if n < MIN_OBSERVATIONS {
            return Err(SeasonalModelError::TooShort {
                needed: MIN_OBSERVATIONS,
                got: n,
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SeasonalModelError::NonFinite);
        }

        let diffs: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let seasonal_diffs: Vec<f64> = (m..diffs.len()).map(|t| diffs[t] - diffs[t - m]).collect();

        // Normal equations for w_t = phi * w_{t-1} + seasonal_phi * w_{t-m}
        let mut xx = 0.0; // sum of w_{t-1}^2
        let mut xy = 0.0; // sum of w_{t-1} * w_{t-m}
        let mut yy = 0.0; // sum of w_{t-m}^2
        let mut xt = 0.0; // sum of w_t * w_{t-1}
        let mut yt = 0.0; // sum of w_t * w_{t-m}

        for t in m..seasonal_diffs.len() {
            let lag1 = seasonal_diffs[t - 1];
            let lag_m = seasonal_diffs[t - m];
            let w = seasonal_diffs[t];

            xx += lag1 * lag1;
            xy += lag1 * lag_m;
            yy += lag_m * lag_m;
            xt += w * lag1;
            yt += w * lag_m;
        }

        let det = xx * yy - xy * xy;
        let (phi, seasonal_phi) = if det.abs() > 1e-10 {
            ((xt * yy - yt * xy) / det, (yt * xx - xt * xy) / det)
        } else if xx > 1e-10 {
            // Degenerate seasonal regressor: fall back to a plain AR(1)
            (xt / xx, 0.0)
        } else {
            // Differenced series is (near) zero: drift + season carry forward
            (0.0, 0.0)
        };

        let rows = seasonal_diffs.len() - m;
        let mut sum_squared_residuals = 0.0;
        for t in m..seasonal_diffs.len() {
            let predicted = phi * seasonal_diffs[t - 1] + seasonal_phi * seasonal_diffs[t - m];
            sum_squared_residuals += (seasonal_diffs[t] - predicted).powi(2);
        }
        let residual_std = (sum_squared_residuals / (rows - 2).max(1) as f64).sqrt();

        Ok(Self {
            phi,
            seasonal_phi,
            diffs,
            seasonal_diffs,
            last_value: values[n - 1],
            residual_std,
        })
    }

    /// Projects `steps` values beyond the last observation. Always returns
    /// exactly `steps` values.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let m = SEASONAL_PERIOD;
        let mut diffs = self.diffs.clone();
        let mut seasonal_diffs = self.seasonal_diffs.clone();
        let mut last = self.last_value;

        let mut out = Vec::with_capacity(steps);
        for _ in 0..steps {
            let w_next = self.phi * seasonal_diffs[seasonal_diffs.len() - 1]
                + self.seasonal_phi * seasonal_diffs[seasonal_diffs.len() - m];
            let z_next = w_next + diffs[diffs.len() - m];
            let y_next = last + z_next;

            seasonal_diffs.push(w_next);
            diffs.push(z_next);
            last = y_next;
            out.push(y_next);
        }
        out
    }

    /// In-sample residual standard deviation, for confidence bounds.
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }
}
