use std::collections::BTreeMap;

use tracing::warn;

use super::{Amount, ExpenseRecord, SearchField};

/// Sum of all parseable amounts. Rows whose amount does not parse, or that
/// would push the sum out of range, are skipped.
pub fn compute_total(records: &[ExpenseRecord]) -> Amount {
    records.iter().fold(Amount::ZERO, |total, record| {
        let Ok(amount) = record.parsed_amount() else {
            return total;
        };
        checked_add(total, amount, record)
    })
}

/// Totals grouped by the `YYYY-MM` prefix of the date, in ascending month order.
pub fn compute_monthly_totals(records: &[ExpenseRecord]) -> BTreeMap<String, Amount> {
    group_totals(records, ExpenseRecord::month)
}

/// Totals grouped by lowercased category, in ascending order.
pub fn compute_category_totals(records: &[ExpenseRecord]) -> BTreeMap<String, Amount> {
    group_totals(records, ExpenseRecord::category_key)
}

fn group_totals<F>(records: &[ExpenseRecord], key: F) -> BTreeMap<String, Amount>
where
    F: Fn(&ExpenseRecord) -> String,
{
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();

    for record in records {
        // A bad amount only drops its own row, never the group
        let Ok(amount) = record.parsed_amount() else {
            continue;
        };
        let total = totals.entry(key(record)).or_insert(Amount::ZERO);
        *total = checked_add(*total, amount, record);
    }

    totals
}

fn checked_add(total: Amount, amount: Amount, record: &ExpenseRecord) -> Amount {
    match total.checked_add(amount) {
        Some(sum) => sum,
        None => {
            warn!(date = %record.date, amount = %record.amount, "skipping amount that overflows the total");
            total
        }
    }
}

/// Records whose chosen field contains `keyword`, ignoring case.
/// An empty keyword matches everything.
pub fn filter_records<'a>(
    records: &'a [ExpenseRecord],
    field: SearchField,
    keyword: &str,
) -> Vec<&'a ExpenseRecord> {
    let keyword = keyword.to_lowercase();
    records
        .iter()
        .filter(|record| record.field(field).to_lowercase().contains(&keyword))
        .collect()
}
