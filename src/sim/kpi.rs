//! Survival-based performance indicators.
//!
//! Converts recorded response times into the expected-survival objective
//! and a few diagnostic counts.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Objective (η) | (2·Σ s_cardiac + Σ s_catA) / max(1, 2·n_cardiac + n_catA) |
//! | Cardiac calls | Served cardiac calls in the measured window |
//! | Category A calls | Served category-A calls in the measured window |
//! | Served calls | All calls with a recorded response time |
//! | Waiting calls | Calls still queued when the window closed |
//! | Mean response | Mean response time over served calls (s) |
//!
//! # Survival Functions
//! - Cardiac: `1 / (1 + exp(-0.26 + 0.139·Tr))`, `Tr` in minutes
//! - Category A: 1 if response ≤ 8 minutes, else 0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Call, CallId, PatientCategory};

/// Response-time threshold (s) for category-A survival.
pub const CATEGORY_A_THRESHOLD_S: f64 = 8.0 * 60.0;

/// Expected survival of a cardiac arrest patient.
///
/// Strictly decreasing in response time, bounded in (0, 1).
pub fn cardiac_survival(response_time_s: f64) -> f64 {
    let minutes = response_time_s / 60.0;
    1.0 / (1.0 + (-0.26 + 0.139 * minutes).exp())
}

/// Expected survival of a category-A patient.
pub fn category_a_survival(response_time_s: f64) -> f64 {
    if response_time_s <= CATEGORY_A_THRESHOLD_S {
        1.0
    } else {
        0.0
    }
}

/// Survival for `category`, or `None` if the category is not tracked.
pub fn survival(category: PatientCategory, response_time_s: f64) -> Option<f64> {
    match category {
        PatientCategory::Cardiac => Some(cardiac_survival(response_time_s)),
        PatientCategory::CategoryA => Some(category_a_survival(response_time_s)),
        PatientCategory::CategoryC => None,
    }
}

/// Run performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalKpi {
    /// Weighted expected survival in [0, 1]. Higher is better.
    pub objective: f64,
    /// Served cardiac calls.
    pub cardiac_calls: usize,
    /// Served category-A calls.
    pub category_a_calls: usize,
    /// Calls with a recorded response time, any category.
    pub served_calls: usize,
    /// Calls still waiting for vehicles at the end of the run.
    pub waiting_calls: usize,
    /// Mean response time over served calls (s); 0 if none.
    pub mean_response_s: f64,
}

impl SurvivalKpi {
    /// Computes KPIs from recorded response times.
    ///
    /// # Arguments
    /// * `calls` - Calls of the run (categories are looked up here).
    /// * `response_times` - Call id → response time (s) for served calls.
    /// * `waiting_calls` - Size of the wait list at the end of the run.
    ///
    /// Calls without a recorded response time are ignored.
    pub fn calculate<'c, I>(
        calls: I,
        response_times: &BTreeMap<CallId, f64>,
        waiting_calls: usize,
    ) -> Self
    where
        I: IntoIterator<Item = &'c Call>,
    {
        let mut cardiac_calls = 0usize;
        let mut category_a_calls = 0usize;
        let mut cardiac_sum = 0.0;
        let mut category_a_sum = 0.0;
        let mut served_calls = 0usize;
        let mut total_response = 0.0;

        for call in calls {
            let Some(&response) = response_times.get(&call.id) else {
                continue;
            };
            served_calls += 1;
            total_response += response;

            match call.category {
                PatientCategory::Cardiac => {
                    cardiac_calls += 1;
                    cardiac_sum += cardiac_survival(response);
                }
                PatientCategory::CategoryA => {
                    category_a_calls += 1;
                    category_a_sum += category_a_survival(response);
                }
                PatientCategory::CategoryC => {}
            }
        }

        let numerator = 2.0 * cardiac_sum + category_a_sum;
        let weight = (2 * cardiac_calls + category_a_calls) as f64;
        let denominator = if weight > 0.0 { weight } else { 1.0 };

        let mean_response_s = if served_calls == 0 {
            0.0
        } else {
            total_response / served_calls as f64
        };

        Self {
            objective: numerator / denominator,
            cardiac_calls,
            category_a_calls,
            served_calls,
            waiting_calls,
            mean_response_s,
        }
    }
}
