use crate::services::aggregation;

pub fn fmt_money(x: f64) -> String {
    format!("{x:.2}")
}

pub fn parse_amount(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

pub fn parse_date(s: &str) -> Option<String> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn parse_month(s: &str) -> Option<String> {
    let t = s.trim();
    aggregation::is_month_key(t).then(|| t.to_owned())
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
