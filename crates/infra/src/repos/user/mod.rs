mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
use medremind_domain::{User, ID};
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
}

#[cfg(test)]
mod tests {
    use crate::MedContext;
    use medremind_domain::User;

    #[tokio::test]
    async fn it_saves_timezone_changes() {
        let ctx = MedContext::create_inmemory();

        let mut user = User::new("Anna".into());
        ctx.repos.users.insert(&user).await.expect("To insert user");
        assert_eq!(
            ctx.repos.users.find(&user.id).await.map(|u| u.timezone),
            Some(chrono_tz::UTC)
        );

        user.timezone = chrono_tz::Asia::Tomsk;
        ctx.repos.users.save(&user).await.expect("To save user");
        assert_eq!(
            ctx.repos.users.find(&user.id).await.map(|u| u.timezone),
            Some(chrono_tz::Asia::Tomsk)
        );
        assert!(ctx.repos.users.find(&Default::default()).await.is_none());
    }
}
