use crate::db::{DbPool, ExecuteWithRetry};
use crate::models::Customer;
use crate::schema::customers;
use anyhow::{anyhow, Result};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new customer record
#[instrument(skip(pool), fields(name = %name))]
pub async fn create_customer(
    pool: &DbPool,
    name: &str,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
) -> Result<Customer> {
    debug!("Creating new customer");

    let new_customer = Customer::new(name.to_string(), phone, email, address);

    let conn = &mut pool.get()?;
    diesel::insert_into(customers::table)
        .values(new_customer.clone())
        .execute_with_retry(conn).await?;

    info!("Successfully created customer with id: {}", new_customer.get_id());

    Ok(new_customer)
}

/// Retrieves a customer by ID
#[instrument(skip(pool), fields(customer_id = %customer_id))]
pub fn get_customer(pool: &DbPool, customer_id: &str) -> Result<Option<Customer>> {
    let conn = &mut pool.get()?;

    let result = customers::table
        .find(customer_id)
        .first::<Customer>(conn)
        .optional()?;

    Ok(result)
}

/// Lists customers, optionally filtered by a name substring
#[instrument(skip(pool))]
pub fn list_customers(pool: &DbPool, search: Option<&str>) -> Result<Vec<Customer>> {
    let conn = &mut pool.get()?;

    let mut query = customers::table.order_by(customers::name.asc()).into_boxed();

    if let Some(search) = search {
        query = query.filter(customers::name.like(format!("%{}%", search)));
    }

    let results = query.load::<Customer>(conn)?;

    Ok(results)
}

/// Updates a customer record; fields left as None keep their current value
#[instrument(skip(pool), fields(customer_id = %customer_id))]
pub async fn update_customer(
    pool: &DbPool,
    customer_id: &str,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
) -> Result<Customer> {
    debug!("Updating customer");

    let customer = get_customer(pool, customer_id)?.ok_or_else(|| anyhow!("Customer not found"))?;

    let conn = &mut pool.get()?;
    diesel::update(customers::table.find(customer_id.to_string()))
        .set((
            customers::name.eq(name.unwrap_or_else(|| customer.get_name())),
            customers::phone.eq(phone.or_else(|| customer.get_phone())),
            customers::email.eq(email.or_else(|| customer.get_email())),
            customers::address.eq(address.or_else(|| customer.get_address())),
        ))
        .execute_with_retry(conn).await?;

    get_customer(pool, customer_id)?.ok_or_else(|| anyhow!("Customer not found"))
}
