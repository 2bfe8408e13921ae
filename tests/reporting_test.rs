mod common;

use anyhow::Result;
use common::{StandardExpenses, service_with_content, test_service};
use impensa::application::{CategoryTotal, MonthlyTotal};
use impensa::domain::Amount;

#[test]
fn test_total_of_empty_ledger_is_zero() -> Result<()> {
    let (service, _temp) = test_service()?;

    assert_eq!(service.total_amount()?, Amount::ZERO);
    let report = service.total_report()?;
    assert_eq!(report.total, Amount::ZERO);
    assert_eq!(report.record_count, 0);

    Ok(())
}

#[test]
fn test_total_skips_unparseable_amounts() -> Result<()> {
    let content = "Date,Category,Amount,Description\n\
                   2024-01-01,Food,10.00,Lunch\n\
                   2024-01-02,Food,ten,Dinner\n\
                   2024-01-03,Food,2.5,Tea\n";
    let (service, _temp) = service_with_content(content)?;

    assert_eq!(service.total_amount()?, Amount::new(125, 1));
    assert_eq!(service.total_report()?.record_count, 3);

    Ok(())
}

#[test]
fn test_total_keeps_sub_cent_and_exponent_amounts() -> Result<()> {
    let content = "Date,Category,Amount,Description\n\
                   2024-01-01,Food,1e3,Rent share\n\
                   2024-01-02,Food,2.0,Tea\n\
                   2024-01-03,Food,12.345,Snack\n";
    let (service, _temp) = service_with_content(content)?;

    assert_eq!(service.total_amount()?, Amount::new(1_014_345, 3));
    assert!(service.check_integrity()?.is_healthy());

    Ok(())
}

#[test]
fn test_total_of_large_amounts_is_exact() -> Result<()> {
    let (service, _temp) = test_service()?;
    service.add_expense("2024-01-01", "Savings", "50000000000000000", "First half")?;
    service.add_expense("2024-01-02", "Savings", "50000000000000000", "Second half")?;

    let expected = Amount::from(100_000_000_000_000_000_i64);
    assert_eq!(service.total_amount()?, expected);
    assert_eq!(service.monthly_summary()?[0].total, expected);
    assert_eq!(service.category_summary()?[0].total, expected);

    Ok(())
}

#[test]
fn test_monthly_summary_groups_by_month_in_order() -> Result<()> {
    let (service, _temp) = test_service()?;
    StandardExpenses::create(&service)?;

    assert_eq!(
        service.monthly_summary()?,
        vec![
            MonthlyTotal {
                month: "2024-01".into(),
                total: Amount::from(15),
            },
            MonthlyTotal {
                month: "2024-02".into(),
                total: Amount::from(3),
            },
        ]
    );

    Ok(())
}

#[test]
fn test_monthly_summary_skips_bad_rows_not_groups() -> Result<()> {
    let content = "Date,Category,Amount,Description\n\
                   2023-12-31,Food,1,Eve\n\
                   2024-01-05,Food,10,Lunch\n\
                   2024-01-06,Food,oops,Dinner\n\
                   2024-01\n";
    let (service, _temp) = service_with_content(content)?;

    let months: Vec<(String, Amount)> = service
        .monthly_summary()?
        .into_iter()
        .map(|m| (m.month, m.total))
        .collect();
    assert_eq!(
        months,
        vec![
            ("2023-12".to_string(), Amount::ONE),
            ("2024-01".to_string(), Amount::TEN)
        ]
    );

    Ok(())
}

#[test]
fn test_category_summary_folds_case() -> Result<()> {
    let (service, _temp) = test_service()?;
    StandardExpenses::create(&service)?;

    let summary = service.category_summary()?;
    assert_eq!(
        summary,
        vec![
            CategoryTotal {
                category: "food".into(),
                total: Amount::from(15),
            },
            CategoryTotal {
                category: "transport".into(),
                total: Amount::from(3),
            },
        ]
    );
    assert_eq!(summary[0].display_name(), "Food");

    // Stored text is untouched by the summary
    let categories: Vec<_> = service
        .list_expenses()?
        .into_iter()
        .map(|r| r.category)
        .collect();
    assert_eq!(categories, vec!["Food", "food", "Transport"]);

    Ok(())
}

#[test]
fn test_check_reports_malformed_rows() -> Result<()> {
    let content = "Date,Category,Amount,Description\n\
                   2024-01-01,Food,1.00,Lunch\n\
                   2024-02-30,Food,2.00,Bad date\n\
                   2024-01-03,Food,n/a,Bad amount\n\
                   2024-01-04,Food\n";
    let (service, _temp) = service_with_content(content)?;

    let report = service.check_integrity()?;
    assert!(!report.is_healthy());
    assert_eq!(report.row_count, 4);
    assert_eq!(report.valid_count, 1);

    let issues: Vec<String> = report.issues.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        issues,
        vec![
            "line 3: invalid date '2024-02-30'",
            "line 4: invalid amount 'n/a'",
            "line 5: expected 4 fields, found 2",
        ]
    );

    Ok(())
}

#[test]
fn test_check_healthy_ledger() -> Result<()> {
    let (service, _temp) = test_service()?;
    StandardExpenses::create(&service)?;

    let report = service.check_integrity()?;
    assert!(report.is_healthy());
    assert_eq!(report.row_count, 3);
    assert_eq!(report.valid_count, 3);

    Ok(())
}

#[test]
fn test_summaries_serialize_to_json() -> Result<()> {
    let (service, _temp) = test_service()?;
    StandardExpenses::create(&service)?;

    let json = serde_json::to_value(service.category_summary()?)?;
    assert_eq!(json[0]["category"], "food");
    // Totals serialize as decimal strings so no digit is lost
    assert_eq!(json[0]["total"], "15");

    Ok(())
}
