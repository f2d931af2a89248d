use crate::db::{DbPool, ExecuteWithRetry};
use crate::models::Expense;
use crate::schema::{expenses, vendors};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Records an operating expense
///
/// ### Errors
///
/// Returns an error if a vendor is named but does not exist, or the insert
/// fails. Callers validate that the amount is positive.
#[instrument(skip(pool), fields(category = %category, amount_cents = %amount_cents))]
pub async fn create_expense(
    pool: &DbPool,
    vendor_id: Option<String>,
    category: &str,
    amount_cents: i64,
    incurred_on: NaiveDate,
    note: Option<String>,
) -> Result<Expense> {
    debug!("Recording expense");

    let conn = &mut pool.get()?;

    if let Some(ref vendor_id) = vendor_id {
        let exists: i64 = vendors::table
            .find(vendor_id)
            .count()
            .get_result(conn)?;
        if exists == 0 {
            return Err(anyhow!("Vendor not found"));
        }
    }

    let expense = Expense::new(
        vendor_id,
        category.to_string(),
        amount_cents,
        incurred_on,
        note,
    );

    diesel::insert_into(expenses::table)
        .values(expense.clone())
        .execute_with_retry(conn).await?;

    info!("Recorded expense with id: {}", expense.get_id());

    Ok(expense)
}

/// Lists expenses, optionally bounded by incurred-on date (both ends inclusive)
#[instrument(skip(pool))]
pub fn list_expenses(pool: &DbPool, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<Expense>> {
    let conn = &mut pool.get()?;

    let mut query = expenses::table
        .order_by(expenses::incurred_on.desc())
        .into_boxed();

    if let Some(from) = from {
        query = query.filter(expenses::incurred_on.ge(from));
    }
    if let Some(to) = to {
        query = query.filter(expenses::incurred_on.le(to));
    }

    let results = query.load::<Expense>(conn)?;

    Ok(results)
}
