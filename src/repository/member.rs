//! Member repository

use std::sync::Arc;
use uuid::Uuid;

use crate::core::domain::Member;
use crate::core::error::ShopError;
use crate::core::store::ShopStore;

/// Data access for members.
#[derive(Clone)]
pub struct MemberRepository {
    store: Arc<dyn ShopStore>,
}

impl MemberRepository {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, member: Member) -> Result<Member, ShopError> {
        Ok(self.store.insert_member(member).await?)
    }

    /// Lookup by id; absence is `Ok(None)`, never an error here.
    pub async fn find_one(&self, id: &Uuid) -> Result<Option<Member>, ShopError> {
        Ok(self.store.find_member(id).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Member>, ShopError> {
        Ok(self.store.list_members().await?)
    }

    /// Members carrying exactly this name.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Member>, ShopError> {
        Ok(self.store.find_members_by_name(name).await?)
    }

    pub async fn update(&self, member: Member) -> Result<Member, ShopError> {
        Ok(self.store.update_member(member).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Address;
    use crate::storage::InMemoryShopStore;

    #[tokio::test]
    async fn test_save_and_find_member() {
        let repo = MemberRepository::new(Arc::new(InMemoryShopStore::new()));
        let member = repo
            .save(Member::new("userA", Address::new("Seoul", "1", "12345")))
            .await
            .unwrap();

        let found = repo.find_one(&member.id).await.unwrap().unwrap();
        assert_eq!(found.name, "userA");
    }

    #[tokio::test]
    async fn test_missing_member_is_none() {
        let repo = MemberRepository::new(Arc::new(InMemoryShopStore::new()));
        assert!(repo.find_one(&Uuid::new_v4()).await.unwrap().is_none());
    }
}
