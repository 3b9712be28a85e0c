use crate::core::insights::InsightReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Header names of the columns read from the dataset.
pub mod columns {
    pub const COURSE_NAME: &str = "Course name";
    pub const AGE_GROUP: &str = "Age Group";
    pub const FEATURES: &str = "Features";
    pub const DURATION: &str = "Duration";
    pub const REGISTRATION_FEE: &str = "Registration fee";
    pub const COURSE_FEE: &str = "Course fee";
    pub const PAYMENT_METHOD: &str = "Payment Method for course fee";
    pub const DELIVERY_METHOD: &str = "Delivery method";

    pub const REQUIRED: [&str; 8] = [
        COURSE_NAME,
        AGE_GROUP,
        FEATURES,
        DURATION,
        REGISTRATION_FEE,
        COURSE_FEE,
        PAYMENT_METHOD,
        DELIVERY_METHOD,
    ];
}

/// One raw row of the sheet, keyed by column header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> &serde_json::Value {
        self.data.get(column).unwrap_or(&serde_json::Value::Null)
    }
}

/// Target learner age bracket. `max` is `None` for open ranges such as `12+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl AgeRange {
    /// Upper bound, falling back to the lower bound for open ranges.
    pub fn effective_max(&self) -> u32 {
        self.max.unwrap_or(self.min)
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}-", self.min),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// 1-based position after outlier rows are removed.
    pub number: usize,
    pub name: String,
    pub age_group: Option<AgeRange>,
    pub features: Vec<String>,
    pub duration_hours: Option<f64>,
    pub registration_fee: Option<f64>,
    pub course_fee: Option<f64>,
    pub payment_method: Option<String>,
    pub delivery_method: Option<String>,
}

impl CourseRecord {
    pub fn min_age(&self) -> Option<f64> {
        self.age_group.map(|range| f64::from(range.min))
    }

    pub fn max_age(&self) -> Option<f64> {
        self.age_group.map(|range| f64::from(range.effective_max()))
    }

    /// Course fee per hour of tuition. Missing when either input is missing or
    /// the duration is zero.
    pub fn hourly_rate(&self) -> Option<f64> {
        hourly_rate(self.course_fee, self.duration_hours)
    }

    pub fn registration_fee_or_zero(&self) -> f64 {
        self.registration_fee.unwrap_or(0.0)
    }

    pub fn course_fee_or_zero(&self) -> f64 {
        self.course_fee.unwrap_or(0.0)
    }

    /// Hourly rate computed from the zero-filled course fee.
    pub fn filled_hourly_rate(&self) -> Option<f64> {
        hourly_rate(Some(self.course_fee_or_zero()), self.duration_hours)
    }
}

fn hourly_rate(fee: Option<f64>, duration: Option<f64>) -> Option<f64> {
    match (fee, duration) {
        (Some(fee), Some(duration)) if duration != 0.0 => Some(fee / duration),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub rows_loaded: usize,
    pub courses: Vec<CourseRecord>,
    pub report: InsightReport,
}
