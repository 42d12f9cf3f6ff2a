//! Member service: registration and explicit updates

use uuid::Uuid;

use crate::core::domain::{Address, Member};
use crate::core::error::{MemberError, ShopError};
use crate::repository::MemberRepository;

/// Business operations on members.
#[derive(Clone)]
pub struct MemberService {
    members: MemberRepository,
}

impl MemberService {
    pub fn new(members: MemberRepository) -> Self {
        Self { members }
    }

    /// Register a new member.
    ///
    /// The name must be unique. That rule is enforced with a pre-insert
    /// existence check, which is not atomic with the insert: two concurrent
    /// joins with the same name can both pass it. A unique index on the
    /// name column at the storage layer is the real fix; until then this
    /// check is a known-racy guard, kept as-is rather than papered over.
    pub async fn join(&self, name: &str, address: Address) -> Result<Uuid, ShopError> {
        self.validate_unique_name(name).await?;
        let member = self.members.save(Member::new(name, address)).await?;
        tracing::info!(member_id = %member.id, name = %member.name, "member joined");
        Ok(member.id)
    }

    async fn validate_unique_name(&self, name: &str) -> Result<(), ShopError> {
        let existing = self.members.find_by_name(name).await?;
        if !existing.is_empty() {
            return Err(MemberError::Duplicate {
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Rename a member: load, transform, save. No implicit diffing.
    pub async fn update_name(&self, id: &Uuid, name: &str) -> Result<(), ShopError> {
        let mut member = self
            .members
            .find_one(id)
            .await?
            .ok_or(MemberError::NotFound { id: *id })?;
        member.name = name.to_string();
        self.members.update(member).await?;
        Ok(())
    }

    pub async fn find_members(&self) -> Result<Vec<Member>, ShopError> {
        self.members.find_all().await
    }

    /// Lookup by id; here absence *is* an error.
    pub async fn find_one(&self, id: &Uuid) -> Result<Member, ShopError> {
        self.members
            .find_one(id)
            .await?
            .ok_or_else(|| MemberError::NotFound { id: *id }.into())
    }
}
