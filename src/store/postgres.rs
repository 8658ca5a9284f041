//! `Store` over a `sqlx::PgPool`.

use super::Store;
use crate::error::AppError;
use crate::model::{Address, AddressChanges, NewAddress, NewPerson, Person, PersonChanges};
use async_trait::async_trait;
use sqlx::PgPool;

const PERSON_COLUMNS: &str = "id, created_at, updated_at, deleted_at, name, skills, email";
const ADDRESS_COLUMNS: &str = "id, created_at, updated_at, deleted_at, person_id, city, state, mobile";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_address<'e, E>(executor: E, address: &NewAddress) -> Result<Address, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO addresses (person_id, city, state, mobile) VALUES ($1, $2, $3, $4) RETURNING {}",
        ADDRESS_COLUMNS
    );
    tracing::debug!(sql = %sql, person_id = address.person_id, "query");
    let row = sqlx::query_as::<_, Address>(&sql)
        .bind(address.person_id)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.mobile)
        .fetch_one(executor)
        .await?;
    Ok(row)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn list_persons(&self) -> Result<Vec<Person>, AppError> {
        let sql = format!(
            "SELECT {} FROM people WHERE deleted_at IS NULL ORDER BY id",
            PERSON_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Person>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_person(&self, id: i64) -> Result<Option<Person>, AppError> {
        let sql = format!(
            "SELECT {} FROM people WHERE id = $1 AND deleted_at IS NULL",
            PERSON_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_person(&self, person: &NewPerson) -> Result<Person, AppError> {
        let sql = format!(
            "INSERT INTO people (name, skills, email) VALUES ($1, $2, $3) RETURNING {}",
            PERSON_COLUMNS
        );
        tracing::debug!(sql = %sql, addresses = person.addresses.len(), "query (tx)");
        let mut tx = self.pool.begin().await?;
        let mut created = sqlx::query_as::<_, Person>(&sql)
            .bind(&person.name)
            .bind(&person.skills)
            .bind(&person.email)
            .fetch_one(&mut *tx)
            .await?;
        for nested in &person.addresses {
            let address = nested.clone().owned_by(created.id);
            created.addresses.push(insert_address(&mut *tx, &address).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn update_person(&self, id: i64, changes: &PersonChanges) -> Result<Option<Person>, AppError> {
        let sql = format!(
            r#"
            UPDATE people SET
                name = COALESCE($2, name),
                skills = COALESCE($3, skills),
                email = COALESCE($4, email),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            PERSON_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.skills.as_deref())
            .bind(changes.email.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_person(&self, id: i64) -> Result<u64, AppError> {
        let sql = "UPDATE people SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL";
        tracing::debug!(sql = %sql, id, "query");
        let done = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, AppError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE deleted_at IS NULL ORDER BY id",
            ADDRESS_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Address>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn addresses_for_person(&self, person_id: i64) -> Result<Vec<Address>, AppError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE person_id = $1 AND deleted_at IS NULL ORDER BY id",
            ADDRESS_COLUMNS
        );
        tracing::debug!(sql = %sql, person_id, "query");
        let rows = sqlx::query_as::<_, Address>(&sql)
            .bind(person_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_address(&self, id: i64) -> Result<Option<Address>, AppError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE id = $1 AND deleted_at IS NULL",
            ADDRESS_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_address(&self, address: &NewAddress) -> Result<Address, AppError> {
        insert_address(&self.pool, address).await
    }

    async fn update_address(&self, id: i64, changes: &AddressChanges) -> Result<Option<Address>, AppError> {
        let sql = format!(
            r#"
            UPDATE addresses SET
                person_id = COALESCE($2, person_id),
                city = COALESCE($3, city),
                state = COALESCE($4, state),
                mobile = COALESCE($5, mobile),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .bind(changes.person_id)
            .bind(changes.city.as_deref())
            .bind(changes.state.as_deref())
            .bind(changes.mobile.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_address(&self, id: i64) -> Result<u64, AppError> {
        let sql = "UPDATE addresses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL";
        tracing::debug!(sql = %sql, id, "query");
        let done = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn delete_addresses_for_person(&self, person_id: i64) -> Result<u64, AppError> {
        let sql = "UPDATE addresses SET deleted_at = NOW() WHERE person_id = $1 AND deleted_at IS NULL";
        tracing::debug!(sql = %sql, person_id, "query");
        let done = sqlx::query(sql).bind(person_id).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}
