//! Plain-text and JSON renderings of the budget and the feed.

use anyhow::Result;
use pennywise_core::{DailyBatch, DisplayTransaction, money};
use pennywise_finance::BudgetSession;
use serde_json::{Value, json};

pub fn render_budget(session: &BudgetSession) -> Result<String> {
    let summary = session.summary();
    let projection = session.recurring_projection()?;
    let budget = session.daily_budget()?;
    let currency = summary
        .currency
        .as_deref()
        .map(|c| format!(" {c}"))
        .unwrap_or_default();

    let mut s = String::new();
    s.push_str(&format!("Balance:            {}{currency}\n", summary.balance_display()));
    s.push_str(&format!("Spent today:        {}\n", summary.spend_today_display()));
    s.push_str(&format!("Days left:          {}\n", session.days_left_this_month()));
    s.push_str(&format!("Recurring (proj.):  {}\n", money::format_major(projection.total)));
    for m in projection.merchants.iter().filter(|m| m.contribution > 0.0) {
        s.push_str(&format!(
            "  {:<28} {:>8}  ({} over {} days)\n",
            m.merchant_id,
            money::format_major(m.contribution),
            money::format_major(m.total_spent),
            m.window_days
        ));
    }
    s.push_str(&format!("Daily budget:       {budget}{currency}\n"));
    Ok(s)
}

pub fn budget_json(session: &BudgetSession) -> Result<Value> {
    let summary = session.summary();
    let projection = session.recurring_projection()?;
    Ok(json!({
        "balance": summary.balance_display(),
        "spend_today": summary.spend_today_display(),
        "currency": summary.currency,
        "days_left": session.days_left_this_month(),
        "recurring_projection": money::format_major(projection.total),
        "recurring": projection.merchants,
        "daily_budget": session.daily_budget()?,
    }))
}

fn describe(txn: &DisplayTransaction) -> String {
    let name = txn
        .merchant
        .as_ref()
        .map(|m| m.name.clone().unwrap_or_else(|| m.id.clone()));
    match (name, txn.notes.trim()) {
        (Some(name), "") => name,
        (Some(name), notes) => format!("{name}  {notes}"),
        (None, "") => "(no merchant)".to_string(),
        (None, notes) => notes.to_string(),
    }
}

pub fn render_feed(batches: &[DailyBatch]) -> String {
    if batches.is_empty() {
        return "No transactions.\n".to_string();
    }
    let mut s = String::new();
    for batch in batches {
        s.push_str(&format!("{}  (spent {})\n", batch.date, batch.total_spent));
        for txn in &batch.transactions {
            s.push_str(&format!("  {:>10}  {}\n", txn.amount, describe(txn)));
        }
        s.push('\n');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pennywise_core::{AccountSummary, FixedClock, Merchant, RecurringMerchants, Transaction};
    use pennywise_finance::SessionOptions;

    fn session() -> BudgetSession {
        let mut summary = AccountSummary::new(93000, -1250);
        summary.currency = Some("GBP".to_string());
        let mut spotify = Merchant::new("merch_spotify");
        spotify.name = Some("Spotify".to_string());
        BudgetSession::new(
            summary,
            vec![
                Transaction::new("s1", -1000, "2026-09-05T00:00:00Z", Some(spotify.clone()), ""),
                Transaction::new("s2", -1000, "2026-10-05T00:00:00Z", Some(spotify), ""),
                Transaction::new("t1", -1250, "2026-10-18T09:00:00Z", None, "Coffee beans"),
            ],
            RecurringMerchants::new(["merch_spotify"]),
            Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())),
            SessionOptions::default(),
        )
    }

    #[test]
    fn test_render_budget() {
        // 930.00 / 14 = 66.43; spotify 20.00 / 30 days * 14 = 9.33
        let out = render_budget(&session()).unwrap();
        assert!(out.contains("Balance:            930.00 GBP\n"));
        assert!(out.contains("Spent today:        12.50\n"));
        assert!(out.contains("Days left:          14\n"));
        assert!(out.contains("Recurring (proj.):  9.33\n"));
        assert!(out.contains("merch_spotify"));
        assert!(out.contains("(20.00 over 30 days)"));
        assert!(out.ends_with("Daily budget:       57.10 GBP\n"));
    }

    #[test]
    fn test_budget_json() {
        let v = budget_json(&session()).unwrap();
        assert_eq!(v["daily_budget"], "57.10");
        assert_eq!(v["days_left"], 14);
        assert_eq!(v["recurring"][0]["window_days"], 30);
    }

    #[test]
    fn test_render_feed() {
        let mut s = session();
        let out = render_feed(&s.batched_transactions().unwrap());
        assert_eq!(out, "Today  (spent 12.50)\n       12.50  Coffee beans\n\n");
    }

    #[test]
    fn test_render_empty_feed() {
        assert_eq!(render_feed(&[]), "No transactions.\n");
    }
}
