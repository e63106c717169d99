//! Postgres-backed storage.
//!
//! ## Atomic commits
//!
//! `commit()` runs one transaction. Every write is an
//! `UPDATE ... WHERE id = $1 AND version = $n` (or an `INSERT` for new
//! entities); a write that touches no row means another commit got there
//! first, and the whole transaction is rolled back with
//! `StoreError::VersionConflict`.
//!
//! ## Error Mapping
//!
//! | PostgreSQL error code | StoreError |
//! |---|---|
//! | `23505` on `items.unique_code` | `DuplicateKey(ItemCode)` |
//! | `23505` on `storage_locations.code` | `DuplicateKey(LocationCode)` |
//! | `23505` on the held-location index | `VersionConflict` |
//! | anything else | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use tracing::{Span, instrument};

use stowage_core::{CategoryId, DomainError, ExpectedVersion, ItemId, LocationId, MovementId, UserId, WarehouseId};
use stowage_inventory::{
    Category, Item, LocationCode, MovementRecord, StorageLocation, UniqueCode, Warehouse,
};

use super::query::{ItemFilter, LocationFilter, Page, Pagination};
use super::r#trait::{ChangeSet, Committed, InventoryStore, StoreError, UniqueKey};

const SCHEMA: &str = include_str!("../../migrations/0001_storage.sql");

#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    async fn write_location(
        tx: &mut Transaction<'_, Postgres>,
        location: &StorageLocation,
    ) -> Result<StorageLocation, StoreError> {
        let expected = ExpectedVersion::of(location.version);
        let next = expected.next();

        let result = match expected {
            ExpectedVersion::New => {
                sqlx::query(
                    r#"
                    INSERT INTO storage_locations (
                        id, code, name, section, shelf, cell, size, daily_rate, is_occupied,
                        status, reserved_until, is_active, warehouse_id, created_at, version
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                    "#,
                )
                .bind(location.id.as_uuid())
                .bind(location.code.as_str())
                .bind(&location.name)
                .bind(&location.section)
                .bind(&location.shelf)
                .bind(&location.cell)
                .bind(location.size.as_str())
                .bind(location.daily_rate)
                .bind(location.is_occupied)
                .bind(location.status.as_str())
                .bind(location.reserved_until)
                .bind(location.is_active)
                .bind(location.warehouse_id.as_uuid())
                .bind(location.created_at)
                .bind(next as i64)
                .execute(&mut **tx)
                .await
            }
            ExpectedVersion::Exact(current) => {
                sqlx::query(
                    r#"
                    UPDATE storage_locations
                    SET name = $2, size = $3, daily_rate = $4, is_occupied = $5, status = $6,
                        reserved_until = $7, is_active = $8, version = $9
                    WHERE id = $1 AND version = $10
                    "#,
                )
                .bind(location.id.as_uuid())
                .bind(&location.name)
                .bind(location.size.as_str())
                .bind(location.daily_rate)
                .bind(location.is_occupied)
                .bind(location.status.as_str())
                .bind(location.reserved_until)
                .bind(location.is_active)
                .bind(next as i64)
                .bind(current as i64)
                .execute(&mut **tx)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("write_location", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict(format!(
                "storage location {} changed since it was read",
                location.id
            )));
        }

        let mut written = location.clone();
        written.version = next;
        Ok(written)
    }

    async fn write_item(tx: &mut Transaction<'_, Postgres>, item: &Item) -> Result<Item, StoreError> {
        let expected = ExpectedVersion::of(item.version);
        let next = expected.next();

        let result = match expected {
            ExpectedVersion::New => {
                sqlx::query(
                    r#"
                    INSERT INTO items (
                        id, unique_code, name, description, condition, status, photo_url,
                        estimated_value, daily_storage_cost, intake_date, planned_release_date,
                        actual_release_date, notes, owner_id, category_id, warehouse_id,
                        storage_location_id, preferred_location_id, created_at, updated_at, version
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                            $17, $18, $19, $20, $21)
                    "#,
                )
                .bind(item.id.as_uuid())
                .bind(item.unique_code.as_str())
                .bind(&item.name)
                .bind(&item.description)
                .bind(item.condition.as_str())
                .bind(item.status.as_str())
                .bind(&item.photo_url)
                .bind(item.estimated_value)
                .bind(item.daily_storage_cost)
                .bind(item.intake_date)
                .bind(item.planned_release_date)
                .bind(item.actual_release_date)
                .bind(&item.notes)
                .bind(item.owner_id.as_uuid())
                .bind(item.category_id.as_uuid())
                .bind(item.warehouse_id.as_uuid())
                .bind(item.storage_location_id.map(uuid::Uuid::from))
                .bind(item.preferred_location_id.map(uuid::Uuid::from))
                .bind(item.created_at)
                .bind(item.updated_at)
                .bind(next as i64)
                .execute(&mut **tx)
                .await
            }
            ExpectedVersion::Exact(current) => {
                sqlx::query(
                    r#"
                    UPDATE items
                    SET name = $2, description = $3, condition = $4, status = $5, photo_url = $6,
                        estimated_value = $7, daily_storage_cost = $8, intake_date = $9,
                        planned_release_date = $10, actual_release_date = $11, notes = $12,
                        category_id = $13, storage_location_id = $14, updated_at = $15,
                        version = $16
                    WHERE id = $1 AND version = $17
                    "#,
                )
                .bind(item.id.as_uuid())
                .bind(&item.name)
                .bind(&item.description)
                .bind(item.condition.as_str())
                .bind(item.status.as_str())
                .bind(&item.photo_url)
                .bind(item.estimated_value)
                .bind(item.daily_storage_cost)
                .bind(item.intake_date)
                .bind(item.planned_release_date)
                .bind(item.actual_release_date)
                .bind(&item.notes)
                .bind(item.category_id.as_uuid())
                .bind(item.storage_location_id.map(uuid::Uuid::from))
                .bind(item.updated_at)
                .bind(next as i64)
                .bind(current as i64)
                .execute(&mut **tx)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("write_item", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict(format!(
                "item {} changed since it was read",
                item.id
            )));
        }

        let mut written = item.clone();
        written.version = next;
        Ok(written)
    }

    async fn append_movement(
        tx: &mut Transaction<'_, Postgres>,
        movement: &MovementRecord,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO item_movements (
                id, item_id, action_type, description, from_location_id, to_location_id,
                previous_condition, new_condition, previous_status, new_status, notes,
                performed_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(movement.id.as_uuid())
        .bind(movement.item_id.as_uuid())
        .bind(movement.action_type.as_str())
        .bind(&movement.description)
        .bind(movement.from_location_id.map(uuid::Uuid::from))
        .bind(movement.to_location_id.map(uuid::Uuid::from))
        .bind(movement.previous_condition.map(|c| c.as_str()))
        .bind(movement.new_condition.map(|c| c.as_str()))
        .bind(movement.previous_status.map(|s| s.as_str()))
        .bind(movement.new_status.map(|s| s.as_str()))
        .bind(&movement.notes)
        .bind(movement.performed_by.as_uuid())
        .bind(movement.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("append_movement", e))?;
        Ok(())
    }
}

const ITEM_COLUMNS: &str = "id, unique_code, name, description, condition, status, photo_url, \
    estimated_value, daily_storage_cost, intake_date, planned_release_date, actual_release_date, \
    notes, owner_id, category_id, warehouse_id, storage_location_id, preferred_location_id, \
    created_at, updated_at, version";

const LOCATION_COLUMNS: &str = "id, code, name, section, shelf, cell, size, daily_rate, \
    is_occupied, status, reserved_until, is_active, warehouse_id, created_at, version";

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("item", e))?;
        row.as_ref().map(item_from_row).transpose()
    }

    #[instrument(skip(self), fields(item_count = tracing::field::Empty), err)]
    async fn items(&self, filter: &ItemFilter, page: Pagination) -> Result<Page<Item>, StoreError> {
        let span = Span::current();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM items WHERE TRUE");
        push_item_filter(&mut count, filter);
        let total: i64 = count
            .build()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_items", e))?
            .try_get(0)
            .map_err(|e| map_sqlx_error("count_items", e))?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE TRUE"));
        push_item_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = select
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_items", e))?;
        let items = rows.iter().map(item_from_row).collect::<Result<Vec<_>, _>>()?;

        span.record("item_count", items.len());
        Ok(Page {
            items,
            total: total as u64,
            page: page.page,
            page_size: page.page_size,
        })
    }

    #[instrument(skip(self), fields(location_id = %location_id), err)]
    async fn item_held_at(&self, location_id: LocationId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE storage_location_id = $1"
        ))
        .bind(location_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("item_held_at", e))?;
        row.as_ref().map(item_from_row).transpose()
    }

    #[instrument(skip(self), fields(item_id = %item_id), err)]
    async fn movements(&self, item_id: ItemId) -> Result<Vec<MovementRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, item_id, action_type, description, from_location_id, to_location_id,
                   previous_condition, new_condition, previous_status, new_status, notes,
                   performed_by, created_at
            FROM item_movements
            WHERE item_id = $1
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(item_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("movements", e))?;
        rows.iter().map(movement_from_row).collect()
    }

    #[instrument(skip(self), fields(location_id = %id), err)]
    async fn location(&self, id: LocationId) -> Result<Option<StorageLocation>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {LOCATION_COLUMNS} FROM storage_locations WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("location", e))?;
        row.as_ref().map(location_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn locations(&self, filter: &LocationFilter) -> Result<Vec<StorageLocation>, StoreError> {
        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {LOCATION_COLUMNS} FROM storage_locations WHERE TRUE"));
        if let Some(warehouse_id) = filter.warehouse_id {
            select.push(" AND warehouse_id = ").push_bind(*warehouse_id.as_uuid());
        }
        if let Some(size) = filter.size {
            select.push(" AND size = ").push_bind(size.as_str());
        }
        select.push(" ORDER BY section, shelf, cell, code");

        let rows = select
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("locations", e))?;
        rows.iter().map(location_from_row).collect()
    }

    #[instrument(skip(self), fields(location_id = %id), err)]
    async fn delete_location(&self, id: LocationId, expected: ExpectedVersion) -> Result<(), StoreError> {
        let ExpectedVersion::Exact(version) = expected else {
            return Err(StoreError::VersionConflict(format!("storage location {id} was never stored")));
        };
        let result = sqlx::query("DELETE FROM storage_locations WHERE id = $1 AND version = $2")
            .bind(id.as_uuid())
            .bind(version as i64)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_location", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict(format!(
                "storage location {id} changed since it was read"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(warehouse_id = %id), err)]
    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError> {
        let row = sqlx::query("SELECT id, name, address, is_active, created_at FROM warehouses WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("warehouse", e))?;
        row.as_ref().map(warehouse_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn warehouses(&self) -> Result<Vec<Warehouse>, StoreError> {
        let rows = sqlx::query("SELECT id, name, address, is_active, created_at FROM warehouses ORDER BY name")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("warehouses", e))?;
        rows.iter().map(warehouse_from_row).collect()
    }

    #[instrument(skip(self, warehouse), fields(warehouse_id = %warehouse.id), err)]
    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO warehouses (id, name, address, is_active, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(warehouse.id.as_uuid())
            .bind(&warehouse.name)
            .bind(&warehouse.address)
            .bind(warehouse.is_active)
            .bind(warehouse.created_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_warehouse", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query("SELECT id, name, icon FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("category", e))?;
        row.as_ref().map(category_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name, icon FROM categories ORDER BY name")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("categories", e))?;
        rows.iter().map(category_from_row).collect()
    }

    #[instrument(skip(self, category), fields(category_id = %category.id), err)]
    async fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO categories (id, name, icon) VALUES ($1, $2, $3)")
            .bind(category.id.as_uuid())
            .bind(&category.name)
            .bind(&category.icon)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_category", e))?;
        Ok(())
    }

    #[instrument(
        skip(self, changes),
        fields(
            items = changes.items.len(),
            locations = changes.locations.len(),
            movements = changes.movements.len()
        ),
        err
    )]
    async fn commit(&self, changes: ChangeSet) -> Result<Committed, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Dropping `tx` on an early return rolls everything back.
        let mut committed = Committed::default();
        for location in &changes.locations {
            committed.locations.push(Self::write_location(&mut tx, location).await?);
        }
        for item in &changes.items {
            committed.items.push(Self::write_item(&mut tx, item).await?);
        }
        for movement in &changes.movements {
            Self::append_movement(&mut tx, movement).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(committed)
    }
}

fn push_item_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ItemFilter) {
    if let Some(owner_id) = filter.owner_id {
        query.push(" AND owner_id = ").push_bind(*owner_id.as_uuid());
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category_id) = filter.category_id {
        query.push(" AND category_id = ").push_bind(*category_id.as_uuid());
    }
    if let Some(warehouse_id) = filter.warehouse_id {
        query.push(" AND warehouse_id = ").push_bind(*warehouse_id.as_uuid());
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.replace('%', "\\%").replace('_', "\\_"));
        query
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR unique_code ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return match db_err.constraint() {
                Some("items_unique_code_key") => StoreError::DuplicateKey(UniqueKey::ItemCode),
                Some("storage_locations_code_key") => StoreError::DuplicateKey(UniqueKey::LocationCode),
                // A second item claiming an already-held location.
                _ => StoreError::VersionConflict(format!("{operation}: {}", db_err.message())),
            };
        }
        return StoreError::Backend(format!("database error in {operation}: {}", db_err.message()));
    }
    StoreError::Backend(format!("{operation}: {err}"))
}

fn corrupt(column: &str, err: DomainError) -> StoreError {
    StoreError::Backend(format!("invalid value in column {column}: {err}"))
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Backend(format!("failed to read column {column}: {e}")))
}

fn parse<T>(row: &PgRow, column: &str) -> Result<T, StoreError>
where
    T: core::str::FromStr<Err = DomainError>,
{
    get::<String>(row, column)?.parse().map_err(|e| corrupt(column, e))
}

fn parse_opt<T>(row: &PgRow, column: &str) -> Result<Option<T>, StoreError>
where
    T: core::str::FromStr<Err = DomainError>,
{
    get::<Option<String>>(row, column)?
        .map(|raw| raw.parse().map_err(|e| corrupt(column, e)))
        .transpose()
}

fn version(row: &PgRow) -> Result<u64, StoreError> {
    Ok(get::<i64>(row, "version")? as u64)
}

fn item_from_row(row: &PgRow) -> Result<Item, StoreError> {
    let code: String = get(row, "unique_code")?;
    Ok(Item {
        id: ItemId::from_uuid(get(row, "id")?),
        unique_code: UniqueCode::parse(&code).map_err(|e| corrupt("unique_code", e))?,
        name: get(row, "name")?,
        description: get(row, "description")?,
        condition: parse(row, "condition")?,
        status: parse(row, "status")?,
        photo_url: get(row, "photo_url")?,
        estimated_value: get(row, "estimated_value")?,
        daily_storage_cost: get(row, "daily_storage_cost")?,
        intake_date: get(row, "intake_date")?,
        planned_release_date: get(row, "planned_release_date")?,
        actual_release_date: get(row, "actual_release_date")?,
        notes: get(row, "notes")?,
        owner_id: UserId::from_uuid(get(row, "owner_id")?),
        category_id: CategoryId::from_uuid(get(row, "category_id")?),
        warehouse_id: WarehouseId::from_uuid(get(row, "warehouse_id")?),
        storage_location_id: get::<Option<uuid::Uuid>>(row, "storage_location_id")?.map(LocationId::from_uuid),
        preferred_location_id: get::<Option<uuid::Uuid>>(row, "preferred_location_id")?.map(LocationId::from_uuid),
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
        version: version(row)?,
    })
}

fn location_from_row(row: &PgRow) -> Result<StorageLocation, StoreError> {
    let code: String = get(row, "code")?;
    Ok(StorageLocation {
        id: LocationId::from_uuid(get(row, "id")?),
        code: LocationCode::parse(&code).map_err(|e| corrupt("code", e))?,
        name: get(row, "name")?,
        section: get(row, "section")?,
        shelf: get(row, "shelf")?,
        cell: get(row, "cell")?,
        size: parse(row, "size")?,
        daily_rate: get(row, "daily_rate")?,
        is_occupied: get(row, "is_occupied")?,
        status: parse(row, "status")?,
        reserved_until: get(row, "reserved_until")?,
        is_active: get(row, "is_active")?,
        warehouse_id: WarehouseId::from_uuid(get(row, "warehouse_id")?),
        created_at: get(row, "created_at")?,
        version: version(row)?,
    })
}

fn movement_from_row(row: &PgRow) -> Result<MovementRecord, StoreError> {
    Ok(MovementRecord {
        id: MovementId::from_uuid(get(row, "id")?),
        item_id: ItemId::from_uuid(get(row, "item_id")?),
        action_type: parse(row, "action_type")?,
        description: get(row, "description")?,
        from_location_id: get::<Option<uuid::Uuid>>(row, "from_location_id")?.map(LocationId::from_uuid),
        to_location_id: get::<Option<uuid::Uuid>>(row, "to_location_id")?.map(LocationId::from_uuid),
        previous_condition: parse_opt(row, "previous_condition")?,
        new_condition: parse_opt(row, "new_condition")?,
        previous_status: parse_opt(row, "previous_status")?,
        new_status: parse_opt(row, "new_status")?,
        notes: get(row, "notes")?,
        performed_by: UserId::from_uuid(get(row, "performed_by")?),
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
    })
}

fn warehouse_from_row(row: &PgRow) -> Result<Warehouse, StoreError> {
    Ok(Warehouse {
        id: WarehouseId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        address: get(row, "address")?,
        is_active: get(row, "is_active")?,
        created_at: get(row, "created_at")?,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    Ok(Category {
        id: CategoryId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        icon: get(row, "icon")?,
    })
}
