use crate::db::{DbPool, ExecuteWithRetry};
use crate::models::Vendor;
use crate::schema::vendors;
use anyhow::{anyhow, Result};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new vendor record
#[instrument(skip(pool), fields(name = %name))]
pub async fn create_vendor(
    pool: &DbPool,
    name: &str,
    contact: Option<String>,
    phone: Option<String>,
) -> Result<Vendor> {
    debug!("Creating new vendor");

    let new_vendor = Vendor::new(name.to_string(), contact, phone);

    let conn = &mut pool.get()?;
    diesel::insert_into(vendors::table)
        .values(new_vendor.clone())
        .execute_with_retry(conn).await?;

    info!("Successfully created vendor with id: {}", new_vendor.get_id());

    Ok(new_vendor)
}

/// Retrieves a vendor by ID
#[instrument(skip(pool), fields(vendor_id = %vendor_id))]
pub fn get_vendor(pool: &DbPool, vendor_id: &str) -> Result<Option<Vendor>> {
    let conn = &mut pool.get()?;

    let result = vendors::table
        .find(vendor_id)
        .first::<Vendor>(conn)
        .optional()?;

    Ok(result)
}

/// Lists all vendors
pub fn list_vendors(pool: &DbPool) -> Result<Vec<Vendor>> {
    let conn = &mut pool.get()?;

    let results = vendors::table
        .order_by(vendors::name.asc())
        .load::<Vendor>(conn)?;

    Ok(results)
}

/// Updates a vendor record; fields left as None keep their current value
#[instrument(skip(pool), fields(vendor_id = %vendor_id))]
pub async fn update_vendor(
    pool: &DbPool,
    vendor_id: &str,
    name: Option<String>,
    contact: Option<String>,
    phone: Option<String>,
) -> Result<Vendor> {
    let vendor = get_vendor(pool, vendor_id)?.ok_or_else(|| anyhow!("Vendor not found"))?;

    let conn = &mut pool.get()?;
    diesel::update(vendors::table.find(vendor_id.to_string()))
        .set((
            vendors::name.eq(name.unwrap_or_else(|| vendor.get_name())),
            vendors::contact.eq(contact.or_else(|| vendor.get_contact())),
            vendors::phone.eq(phone.or_else(|| vendor.get_phone())),
        ))
        .execute_with_retry(conn).await?;

    get_vendor(pool, vendor_id)?.ok_or_else(|| anyhow!("Vendor not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::tests::setup_test_db;

    #[tokio::test]
    async fn test_create_list_and_update_vendor() {
        let pool = setup_test_db();

        let vendor = create_vendor(&pool, "City Laundry", None, Some("555-0199".to_string()))
            .await.unwrap();
        assert_eq!(list_vendors(&pool).unwrap().len(), 1);

        let updated = update_vendor(
            &pool,
            &vendor.get_id(),
            None,
            Some("Maria".to_string()),
            None,
        ).await.unwrap();

        assert_eq!(updated.get_name(), "City Laundry");
        assert_eq!(updated.get_contact(), Some("Maria".to_string()));
        assert_eq!(updated.get_phone(), Some("555-0199".to_string()));
    }
}
