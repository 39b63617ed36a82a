use super::IItemRepo;
use medremind_domain::{Item, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresItemRepo {
    pool: PgPool,
}

impl PostgresItemRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ItemRaw {
    item_uid: Uuid,
    user_uid: Uuid,
    name: String,
    dose_size: f64,
    stock_remaining: f64,
    low_stock_threshold: Option<f64>,
    track_stock: bool,
    archived: bool,
}

impl From<ItemRaw> for Item {
    fn from(raw: ItemRaw) -> Self {
        Self {
            id: raw.item_uid.into(),
            user_id: raw.user_uid.into(),
            name: raw.name,
            dose_size: raw.dose_size,
            stock_remaining: raw.stock_remaining,
            low_stock_threshold: raw.low_stock_threshold,
            track_stock: raw.track_stock,
            archived: raw.archived,
        }
    }
}

#[async_trait::async_trait]
impl IItemRepo for PostgresItemRepo {
    async fn insert(&self, item: &Item) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items
            (item_uid, user_uid, name, dose_size, stock_remaining, low_stock_threshold, track_stock, archived)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.id.inner_ref())
        .bind(item.user_id.inner_ref())
        .bind(&item.name)
        .bind(item.dose_size)
        .bind(item.stock_remaining)
        .bind(item.low_stock_threshold)
        .bind(item.track_stock)
        .bind(item.archived)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert item: {:?}. DB returned error: {:?}", item, e);
            e
        })?;
        Ok(())
    }

    async fn save(&self, item: &Item) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE items
            SET name = $2,
            dose_size = $3,
            stock_remaining = $4,
            low_stock_threshold = $5,
            track_stock = $6,
            archived = $7
            WHERE item_uid = $1
            "#,
        )
        .bind(item.id.inner_ref())
        .bind(&item.name)
        .bind(item.dose_size)
        .bind(item.stock_remaining)
        .bind(item.low_stock_threshold)
        .bind(item.track_stock)
        .bind(item.archived)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save item: {:?}. DB returned error: {:?}", item, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, item_id: &ID) -> Option<Item> {
        sqlx::query_as::<_, ItemRaw>(
            r#"
            SELECT * FROM items AS i
            WHERE i.item_uid = $1
            "#,
        )
        .bind(item_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| error!("Unable to find item: {}. DB returned error: {:?}", item_id, e))
        .ok()
        .flatten()
        .map(|item| item.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Item> {
        sqlx::query_as::<_, ItemRaw>(
            r#"
            SELECT * FROM items AS i
            WHERE i.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to find items for user: {}. DB returned error: {:?}", user_id, e);
            vec![]
        })
        .into_iter()
        .map(|item| item.into())
        .collect()
    }

    async fn find_stock_tracked(&self) -> Vec<Item> {
        sqlx::query_as::<_, ItemRaw>(
            r#"
            SELECT * FROM items AS i
            WHERE i.track_stock AND NOT i.archived
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to find stock tracked items. DB returned error: {:?}", e);
            vec![]
        })
        .into_iter()
        .map(|item| item.into())
        .collect()
    }

    async fn consume_dose(&self, item_id: &ID) -> anyhow::Result<Option<Item>> {
        let item = sqlx::query_as::<_, ItemRaw>(
            r#"
            UPDATE items
            SET stock_remaining = GREATEST(stock_remaining - dose_size, 0)
            WHERE item_uid = $1
            RETURNING *
            "#,
        )
        .bind(item_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to consume dose of item: {}. DB returned error: {:?}", item_id, e);
            e
        })?;
        Ok(item.map(|item| item.into()))
    }

    async fn restock(&self, item_id: &ID, quantity: f64) -> anyhow::Result<Option<Item>> {
        let item = sqlx::query_as::<_, ItemRaw>(
            r#"
            UPDATE items
            SET stock_remaining = stock_remaining + $2
            WHERE item_uid = $1
            RETURNING *
            "#,
        )
        .bind(item_id.inner_ref())
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to restock item: {}. DB returned error: {:?}", item_id, e);
            e
        })?;
        Ok(item.map(|item| item.into()))
    }
}
