//! Group trip settlement example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use settlement_core::utils::MemoryStorage;
use settlement_core::{
    patterns, Currency, ExpenseBuilder, ExpenseCategory, ExpenseTracker, Member,
    RecordSettlementParams,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧳 Settlement Core - Group Trip Example\n");

    let storage = MemoryStorage::new();
    let mut tracker = ExpenseTracker::new(storage);

    // 1. Create the group
    println!("👥 Creating group...");
    let group = tracker
        .create_group(
            "goa".to_string(),
            "Goa trip".to_string(),
            Currency::Inr,
            vec![
                Member::new("asha", "Asha"),
                Member::new("bilal", "Bilal"),
                Member::new("chen", "Chen"),
                Member::new("dara", "Dara").with_email("dara@example.com"),
            ],
        )
        .await?;

    for member in &group.members {
        println!("  ✓ {} ({})", member.name, member.id);
    }
    println!();

    // 2. Record expenses
    println!("💸 Recording expenses...\n");

    let villa = patterns::split_with_everyone(
        "villa".to_string(),
        &group,
        "Beach villa, two nights".to_string(),
        BigDecimal::from(12000),
        "asha".to_string(),
    )?;
    tracker.add_expense(villa).await?;
    println!("  ✓ Asha paid ₹12,000 for the villa, split four ways");

    let scooters = ExpenseBuilder::new(
        "scooters".to_string(),
        "goa".to_string(),
        "Scooter rental".to_string(),
        BigDecimal::from(1800),
        "bilal".to_string(),
    )
    .split_equally(["bilal", "chen", "dara"])
    .category(ExpenseCategory::Transport)
    .date(NaiveDate::from_ymd_opt(2024, 12, 27).unwrap())
    .build()?;
    tracker.add_expense(scooters).await?;
    println!("  ✓ Bilal paid ₹1,800 for scooters shared by three");

    let dinner = ExpenseBuilder::new(
        "dinner".to_string(),
        "goa".to_string(),
        "Seafood dinner".to_string(),
        BigDecimal::from(3200),
        "chen".to_string(),
    )
    .custom_share("asha", BigDecimal::from(700))
    .custom_share("bilal", BigDecimal::from(1100))
    .custom_share("chen", BigDecimal::from(600))
    .custom_share("dara", BigDecimal::from(800))
    .category(ExpenseCategory::Food)
    .notes("Bilal ordered the lobster".to_string())
    .build()?;
    tracker.add_expense(dinner).await?;
    println!("  ✓ Chen paid ₹3,200 for dinner with custom shares");

    let tickets = patterns::paid_on_behalf(
        "ferry".to_string(),
        "goa".to_string(),
        "Ferry ticket".to_string(),
        BigDecimal::from(450),
        "dara".to_string(),
        "asha".to_string(),
    )?;
    tracker.add_expense(tickets).await?;
    println!("  ✓ Dara paid ₹450 for Asha's ferry ticket\n");

    // 3. Net balances
    let report = tracker.compute_report("goa").await?;
    println!("📊 Net balances:");
    for entry in report.net_balance.iter() {
        println!("  {:>6}: {}", entry.member_id, entry.amount.round(2));
    }
    println!();

    // 4. Suggested transfers and per-member totals
    let summary = tracker.group_summary("goa").await?;
    println!(
        "🤝 {} expenses totalling {} {}, settled in {} transfers:",
        summary.total_expenses,
        summary.total_amount,
        summary.currency.code(),
        summary.settlements.len()
    );
    for settlement in &summary.settlements {
        println!(
            "  {} pays {} {}",
            settlement.from, settlement.to, settlement.amount
        );
    }
    println!();

    for balance in &summary.member_balances {
        println!(
            "  {:>6}: owes {}, receives {}, net {}",
            balance.member.name, balance.total_owed, balance.total_to_receive, balance.net_balance
        );
    }
    println!();

    // 5. Record the first transfer as paid
    if let Some(first) = summary.settlements.first() {
        let record = tracker
            .record_settlement(RecordSettlementParams {
                group_id: "goa".to_string(),
                from: first.from.clone(),
                to: first.to.clone(),
                amount: first.amount.clone(),
                settled_by: first.to.clone(),
                notes: Some("Paid over UPI".to_string()),
            })
            .await?;
        println!("✅ Recorded settlement {} ({:?})", record.id, record.status);
    }

    let history = tracker.settlement_history("goa", 1, 10).await?;
    println!("📜 Settlement history: {} record(s)", history.total);

    Ok(())
}
