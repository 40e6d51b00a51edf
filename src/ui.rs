use ratatui::{prelude::*, widgets::*};

use crate::models::{NoticeKind, Transaction};

/// Renders the section tab bar
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Color of the notice line
pub fn notice_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    }
}

/// One transaction rendered as a list line
pub fn transaction_line(t: &Transaction) -> String {
    format!(
        "{:>10.2} {:<4} {:<24} {}",
        t.amount,
        t.currency,
        t.merchant_id,
        t.created_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_transaction_line_layout() {
        let t = Transaction {
            amount: 12.5,
            currency: "USD".to_string(),
            merchant_id: "coffee-cart".to_string(),
            created_at: NaiveDate::from_ymd_opt(2026, 8, 5)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };
        let line = transaction_line(&t);
        assert!(line.contains("12.50"));
        assert!(line.contains("USD"));
        assert!(line.contains("coffee-cart"));
        assert!(line.contains("2026-08-05 09:30:00"));
    }
}
