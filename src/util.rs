use chrono::{DateTime, Utc};

/// 快照时间格式，秒级精度并以 Z 结尾
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// 四舍五入到两位小数（远离零方向）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 涨跌幅百分比，调用方需保证 previous_close > 0
pub fn change_pct(price: f64, previous_close: f64) -> f64 {
    (price - previous_close) / previous_close * 100.0
}

pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

// 日志中的可选数值
pub fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round2() {
        assert_eq!(round2(123.4567), 123.46);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_change_pct() {
        assert_eq!(round2(change_pct(105.0, 100.0)), 5.0);
        assert_eq!(round2(change_pct(90.0, 100.0)), -10.0);
    }

    #[test]
    fn test_format_timestamp() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 2, 9, 5, 7).unwrap();
        assert_eq!(format_timestamp(&instant), "2025-06-02T09:05:07Z");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(1.5)), "1.5");
        assert_eq!(format_optional(None), "None");
    }
}
