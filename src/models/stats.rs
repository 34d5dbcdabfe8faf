use serde::Serialize;

/// Dashboard rollup over the three most recent calendar months.
///
/// The three vectors are parallel: index `i` of each refers to `months[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub months: Vec<String>,
    pub new_classes_per_month: Vec<i64>,
    pub income_per_month: Vec<f64>,
    pub pending_enrollments: i64,
}
