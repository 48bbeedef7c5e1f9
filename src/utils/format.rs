//! 顯示用格式化：千分位以空白分隔 (3150 -> "3 150")，與網站顯示一致。

/// Groups the integer digits of `value` by three with a space separator.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// 四捨五入後分組 (產量、節省、CO₂ 等)
pub fn format_rounded(value: f64) -> String {
    group_thousands(round_half_up(value))
}

/// 金額：整數時不顯示小數，否則保留兩位
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        group_thousands(value as i64)
    } else {
        let cents = (value.abs() * 100.0).round() as i64;
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, group_thousands(cents / 100), cents % 100)
    }
}

pub fn format_years(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
