//! Display formatting for the report tables. Pure helpers; the thresholds
//! here are easy to get subtly wrong, so they carry their own tests.

/// Grouped number: large magnitudes render as integers, the rest with two
/// decimals. Missing and NaN render as "-".
pub fn fmt_num(x: Option<f64>) -> String {
    let v = match x {
        Some(v) if !v.is_nan() => v,
        _ => return "-".to_string(),
    };

    if v.abs() >= 10_000.0 {
        group_thousands(&format!("{v:.0}"))
    } else {
        group_thousands(&format!("{v:.2}"))
    }
}

/// Percentage with two decimals. Magnitudes at or below 1.5 are read as
/// fractions and scaled by 100; larger values are taken as already-percent.
pub fn fmt_pct(x: Option<f64>) -> String {
    let v = match x {
        Some(v) if !v.is_nan() => v,
        _ => return "-".to_string(),
    };

    let v = if v.abs() <= 1.5 { v * 100.0 } else { v };
    format!("{v:.2}%")
}

fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_vs_percent_boundary_sits_at_one_point_five() {
        assert_eq!(fmt_pct(Some(0.08)), "8.00%");
        assert_eq!(fmt_pct(Some(1.2)), "120.00%");
        assert_eq!(fmt_pct(Some(1.5)), "150.00%");
        assert_eq!(fmt_pct(Some(1.6)), "1.60%");
        assert_eq!(fmt_pct(Some(8.0)), "8.00%");
        assert_eq!(fmt_pct(Some(-0.5)), "-50.00%");
    }

    #[test]
    fn missing_and_nan_render_as_placeholder() {
        assert_eq!(fmt_pct(None), "-");
        assert_eq!(fmt_pct(Some(f64::NAN)), "-");
        assert_eq!(fmt_num(None), "-");
        assert_eq!(fmt_num(Some(f64::NAN)), "-");
    }

    #[test]
    fn large_magnitudes_drop_decimals() {
        assert_eq!(fmt_num(Some(12345.678)), "12,346");
        assert_eq!(fmt_num(Some(10_000.0)), "10,000");
        assert_eq!(fmt_num(Some(-1_234_567.0)), "-1,234,567");
    }

    #[test]
    fn small_magnitudes_keep_two_grouped_decimals() {
        assert_eq!(fmt_num(Some(1234.5)), "1,234.50");
        assert_eq!(fmt_num(Some(9999.994)), "9,999.99");
        assert_eq!(fmt_num(Some(0.0)), "0.00");
        assert_eq!(fmt_num(Some(-12.3)), "-12.30");
    }
}
