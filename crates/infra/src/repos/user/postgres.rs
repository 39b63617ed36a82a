use super::IUserRepo;
use chrono_tz::Tz;
use medremind_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::{error, warn};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    name: String,
    timezone: String,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        let timezone = raw.timezone.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "User: {} has an unknown timezone: {}, using UTC",
                raw.user_uid, raw.timezone
            );
            chrono_tz::UTC
        });
        Self {
            id: raw.user_uid.into(),
            name: raw.name,
            timezone,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, name, timezone)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(user.timezone.name())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert user: {:?}. DB returned error: {:?}", user, e);
            e
        })?;
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
            timezone = $3
            WHERE user_uid = $1
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(user.timezone.name())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save user: {:?}. DB returned error: {:?}", user, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| error!("Unable to find user: {}. DB returned error: {:?}", user_id, e))
        .ok()
        .flatten()
        .map(|user| user.into())
    }
}
