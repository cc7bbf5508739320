//! In-memory document store.
//!
//! Identities and posts live behind a tokio `RwLock` so that uniqueness
//! checks and inserts happen under one write guard. Help requests are kept in
//! a `DashMap`; each entry is updated under its shard lock.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;

use super::{DocumentStore, HelpRequestStore, IdentityStore, PostStore, StoreError};
use crate::models::auth::{Identity, Realm};
use crate::models::feed::Post;
use crate::models::help::{HelpRequest, RequestStatus};

/// Identities of one realm in insertion order, with id and email indexes.
#[derive(Debug, Default)]
struct RealmIdentities {
    rows: Vec<Identity>,
    by_id: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
}

/// Process-local store for all document collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    identities: RwLock<HashMap<Realm, RealmIdentities>>,
    requests: DashMap<String, HelpRequest>,
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn insert_identity(&self, identity: Identity) -> Result<Identity, StoreError> {
        let mut realms = self.identities.write().await;
        let realm = realms.entry(identity.realm).or_default();

        if realm.by_email.contains_key(&identity.email) {
            return Err(StoreError::Conflict(format!("email {}", identity.email)));
        }
        if realm.by_id.contains_key(&identity.id) {
            return Err(StoreError::Conflict(format!("identity {}", identity.id)));
        }

        let idx = realm.rows.len();
        realm.by_id.insert(identity.id.clone(), idx);
        realm.by_email.insert(identity.email.clone(), idx);
        realm.rows.push(identity.clone());
        Ok(identity)
    }

    async fn find_identity_by_email(
        &self,
        realm: Realm,
        email: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let realms = self.identities.read().await;
        Ok(realms
            .get(&realm)
            .and_then(|r| r.by_email.get(email).map(|&idx| r.rows[idx].clone())))
    }

    async fn find_identity_by_id(
        &self,
        realm: Realm,
        id: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let realms = self.identities.read().await;
        Ok(realms
            .get(&realm)
            .and_then(|r| r.by_id.get(id).map(|&idx| r.rows[idx].clone())))
    }

    async fn list_identities_by_role(
        &self,
        realm: Realm,
        role: &str,
    ) -> Result<Vec<Identity>, StoreError> {
        let realms = self.identities.read().await;
        Ok(realms
            .get(&realm)
            .map(|r| r.rows.iter().filter(|i| i.role == role).cloned().collect())
            .unwrap_or_default())
    }

    async fn add_reward(&self, realm: Realm, id: &str, amount: i64) -> Result<i64, StoreError> {
        let mut realms = self.identities.write().await;
        let not_found = || StoreError::NotFound(format!("identity {id}"));
        let rows = realms.get_mut(&realm).ok_or_else(not_found)?;
        let idx = *rows.by_id.get(id).ok_or_else(not_found)?;
        let row = &mut rows.rows[idx];
        row.reward += amount;
        Ok(row.reward)
    }
}

#[async_trait]
impl HelpRequestStore for MemoryStore {
    async fn insert_request(&self, request: HelpRequest) -> Result<HelpRequest, StoreError> {
        match self.requests.entry(request.id.clone()) {
            Entry::Occupied(_) => {
                Err(StoreError::Conflict(format!("help request {}", request.id)))
            }
            Entry::Vacant(slot) => {
                slot.insert(request.clone());
                Ok(request)
            }
        }
    }

    async fn get_request(&self, id: &str) -> Result<Option<HelpRequest>, StoreError> {
        Ok(self.requests.get(id).map(|r| r.value().clone()))
    }

    async fn list_requests(&self) -> Result<Vec<HelpRequest>, StoreError> {
        let mut all: Vec<HelpRequest> = self.requests.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn transition_request(
        &self,
        id: &str,
        from: &[RequestStatus],
        to: RequestStatus,
        helper_id: Option<&str>,
    ) -> Result<Option<HelpRequest>, StoreError> {
        let mut entry = self
            .requests
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("help request {id}")))?;

        if !from.contains(&entry.status) {
            return Ok(None);
        }
        entry.status = to;
        if let Some(helper_id) = helper_id {
            entry.helper_id = Some(helper_id.to_string());
        }
        Ok(Some(entry.value().clone()))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: Post) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(StoreError::Conflict(format!("post {}", post.id)));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.read().await.clone())
    }

    async fn list_posts_by_author(
        &self,
        user_id: &str,
        section: Option<&str>,
    ) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| section.is_none_or(|s| p.section == s))
            .cloned()
            .collect())
    }
}

impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::geo::GeoPoint;

    fn identity(realm: Realm, id: &str, email: &str, role: &str) -> Identity {
        Identity {
            id: id.into(),
            realm,
            name: id.into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: role.into(),
            location: None,
            reward: 0,
            created_at: Utc::now(),
        }
    }

    fn request(id: &str) -> HelpRequest {
        HelpRequest {
            id: id.into(),
            elder_id: "elder".into(),
            elder_location: GeoPoint::new(40.7128, -74.0060),
            title: "Help Request - 10:00".into(),
            audio_url: None,
            transcript: "groceries".into(),
            status: RequestStatus::Pending,
            helper_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_in_same_realm_conflicts() {
        let store = MemoryStore::new();
        store
            .insert_identity(identity(Realm::Feed, "a", "a@x.io", "member"))
            .await
            .unwrap();
        let err = store
            .insert_identity(identity(Realm::Feed, "b", "a@x.io", "member"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn realms_are_independent() {
        let store = MemoryStore::new();
        store
            .insert_identity(identity(Realm::Feed, "a", "a@x.io", "member"))
            .await
            .unwrap();
        store
            .insert_identity(identity(Realm::Neighbourhood, "a@x.io", "a@x.io", "helper"))
            .await
            .unwrap();

        let feed = store.find_identity_by_email(Realm::Feed, "a@x.io").await.unwrap();
        assert_eq!(feed.map(|i| i.id), Some("a".to_string()));
        assert!(
            store
                .find_identity_by_id(Realm::Feed, "a@x.io")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_by_role_keeps_insertion_order() {
        let store = MemoryStore::new();
        for (id, role) in [("h1", "helper"), ("e1", "elder"), ("h2", "helper")] {
            store
                .insert_identity(identity(Realm::Neighbourhood, id, &format!("{id}@x.io"), role))
                .await
                .unwrap();
        }
        let ids: Vec<_> = store
            .list_identities_by_role(Realm::Neighbourhood, "helper")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["h1", "h2"]);
    }

    #[tokio::test]
    async fn add_reward_accumulates() {
        let store = MemoryStore::new();
        store
            .insert_identity(identity(Realm::Neighbourhood, "h", "h@x.io", "helper"))
            .await
            .unwrap();
        assert_eq!(store.add_reward(Realm::Neighbourhood, "h", 10).await.unwrap(), 10);
        assert_eq!(store.add_reward(Realm::Neighbourhood, "h", 10).await.unwrap(), 20);
        assert!(matches!(
            store.add_reward(Realm::Neighbourhood, "missing", 10).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn transition_respects_allowed_states() {
        let store = MemoryStore::new();
        store.insert_request(request("r1")).await.unwrap();

        let rejected = store
            .transition_request("r1", &[RequestStatus::Assigned], RequestStatus::Confirmed, None)
            .await
            .unwrap();
        assert!(rejected.is_none());

        let assigned = store
            .transition_request("r1", &[RequestStatus::Pending], RequestStatus::Assigned, Some("h"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assigned.status, RequestStatus::Assigned);
        assert_eq!(assigned.helper_id.as_deref(), Some("h"));

        let confirmed = store
            .transition_request("r1", &[RequestStatus::Assigned], RequestStatus::Confirmed, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.helper_id.as_deref(), Some("h"));

        assert!(matches!(
            store
                .transition_request("nope", &[RequestStatus::Pending], RequestStatus::Assigned, None)
                .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn posts_filter_by_author_and_section() {
        let store = MemoryStore::new();
        for (id, user, section) in [("1", "u1", "art"), ("2", "u2", "art"), ("3", "u1", "news")] {
            store
                .insert_post(Post {
                    id: id.into(),
                    user_id: user.into(),
                    user_name: user.into(),
                    content: String::new(),
                    media_url: String::new(),
                    media_type: String::new(),
                    section: section.into(),
                    tags: Vec::new(),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let all_u1 = store.list_posts_by_author("u1", None).await.unwrap();
        assert_eq!(all_u1.len(), 2);
        let art_u1 = store.list_posts_by_author("u1", Some("art")).await.unwrap();
        assert_eq!(art_u1.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["1"]);
        let feed: Vec<_> = store.list_posts().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(feed, vec!["1", "2", "3"]);
    }
}
