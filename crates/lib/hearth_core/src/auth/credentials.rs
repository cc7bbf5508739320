//! Credential store — identity records for one realm.
//!
//! Owns the identity invariants: emails are normalized and unique within the
//! realm, plaintext passwords are hashed before storage and never kept.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::AuthError;
use super::password::{hash_password, verify_dummy, verify_password};
use crate::geo::{WithinRadius, filter_within_radius};
use crate::models::auth::{Identity, MEMBER_ROLE, NewIdentity, Realm, normalize_email};
use crate::models::geo::GeoPoint;
use crate::store::{IdentityStore, StoreError};
use crate::uuid::uuidv7;

/// Identity records of a single realm.
#[derive(Clone)]
pub struct CredentialStore {
    realm: Realm,
    store: Arc<dyn IdentityStore>,
}

impl CredentialStore {
    pub fn new(realm: Realm, store: Arc<dyn IdentityStore>) -> Self {
        Self { realm, store }
    }

    /// Validate, hash and insert a new identity.
    ///
    /// Fails with `Conflict` when the normalized email is already registered
    /// in this realm.
    pub async fn create(&self, new: NewIdentity) -> Result<Identity, AuthError> {
        let NewIdentity {
            name,
            email,
            password,
            role,
            location,
        } = new;

        let email = normalize_email(&email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::ValidationError("email/password required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::ValidationError("malformed email".into()));
        }
        let role = match (self.realm, role.trim()) {
            (Realm::Feed, "") => MEMBER_ROLE.to_string(),
            (Realm::Neighbourhood, "") => {
                return Err(AuthError::ValidationError("role required".into()));
            }
            (_, role) => role.to_string(),
        };
        if self.realm == Realm::Neighbourhood && name.trim().is_empty() {
            return Err(AuthError::ValidationError("name required".into()));
        }
        if let Some(loc) = location
            && !loc.is_valid()
        {
            return Err(AuthError::ValidationError("location out of range".into()));
        }

        let password_hash = hash_password(&password)?;
        drop(password);

        let id = match self.realm {
            Realm::Feed => uuidv7().to_string(),
            Realm::Neighbourhood => email.clone(),
        };

        let identity = Identity {
            id,
            realm: self.realm,
            name: name.trim().to_string(),
            email,
            password_hash,
            role,
            location,
            reward: 0,
            created_at: Utc::now(),
        };

        let created = self
            .store
            .insert_identity(identity)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::Conflict("user already exists".into()),
                other => AuthError::Store(other),
            })?;
        info!(realm = self.realm.as_str(), id = %created.id, role = %created.role, "identity created");
        Ok(created)
    }

    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password fail identically with
    /// `CredentialError`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        let Some(identity) = self.store.find_identity_by_email(self.realm, &email).await? else {
            verify_dummy(password);
            debug!(realm = self.realm.as_str(), "login for unknown email");
            return Err(AuthError::CredentialError);
        };
        if !verify_password(password, &identity.password_hash)? {
            debug!(realm = self.realm.as_str(), id = %identity.id, "login with wrong password");
            return Err(AuthError::CredentialError);
        }
        Ok(identity)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self.store.find_identity_by_id(self.realm, id).await?)
    }

    /// Identities holding `role` within `radius_meters` of `center`.
    ///
    /// The role subset is read once when called; the returned iterator
    /// filters that snapshot lazily and cannot be restarted.
    pub async fn find_by_role_near(
        &self,
        role: &str,
        center: GeoPoint,
        radius_meters: f64,
    ) -> Result<WithinRadius<std::vec::IntoIter<Identity>>, AuthError> {
        let snapshot = self.store.list_identities_by_role(self.realm, role).await?;
        Ok(filter_within_radius(center, snapshot, radius_meters))
    }

    /// Credit `amount` to the identity's reward balance, returning the new
    /// balance.
    pub async fn add_reward(&self, id: &str, amount: i64) -> Result<i64, AuthError> {
        Ok(self.store.add_reward(self.realm, id, amount).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::HELPER_RADIUS_METERS;
    use crate::models::auth::HELPER_ROLE;
    use crate::store::memory::MemoryStore;

    fn feed() -> CredentialStore {
        CredentialStore::new(Realm::Feed, Arc::new(MemoryStore::new()))
    }

    fn neighbourhood() -> CredentialStore {
        CredentialStore::new(Realm::Neighbourhood, Arc::new(MemoryStore::new()))
    }

    fn signup(email: &str, password: &str) -> NewIdentity {
        NewIdentity {
            name: "Ada".into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    fn helper(email: &str, at: Option<GeoPoint>) -> NewIdentity {
        NewIdentity {
            name: "Helper".into(),
            email: email.into(),
            password: "pw".into(),
            role: HELPER_ROLE.into(),
            location: at,
        }
    }

    #[tokio::test]
    async fn create_normalizes_email_and_hashes_password() {
        let store = feed();
        let created = store.create(signup("  Ada@Example.com ", "hunter2")).await.unwrap();
        assert_eq!(created.email, "ada@example.com");
        assert_eq!(created.role, MEMBER_ROLE);
        assert_ne!(created.password_hash, "hunter2");
        assert!(!created.id.is_empty());
    }

    #[tokio::test]
    async fn duplicate_normalized_email_conflicts() {
        let store = feed();
        store.create(signup("ada@example.com", "a")).await.unwrap();
        let err = store.create(signup(" ADA@example.com", "b")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let store = feed();
        assert!(matches!(
            store.create(signup("", "pw")).await,
            Err(AuthError::ValidationError(_))
        ));
        assert!(matches!(
            store.create(signup("ada@example.com", "")).await,
            Err(AuthError::ValidationError(_))
        ));
        assert!(matches!(
            neighbourhood().create(signup("ada@example.com", "pw")).await,
            Err(AuthError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn neighbourhood_identity_is_keyed_by_email() {
        let store = neighbourhood();
        let created = store
            .create(helper("Helper@Example.com", Some(GeoPoint::new(40.7128, -74.0045))))
            .await
            .unwrap();
        assert_eq!(created.id, "helper@example.com");
        assert_eq!(created.reward, 0);
    }

    #[tokio::test]
    async fn authenticate_does_not_distinguish_failures() {
        let store = feed();
        store.create(signup("ada@example.com", "right")).await.unwrap();

        let unknown = store.authenticate("nobody@example.com", "right").await.unwrap_err();
        let wrong = store.authenticate("ada@example.com", "wrong").await.unwrap_err();
        assert!(matches!(unknown, AuthError::CredentialError));
        assert!(matches!(wrong, AuthError::CredentialError));
        assert_eq!(unknown.to_string(), wrong.to_string());

        let ok = store.authenticate(" ADA@example.com ", "right").await.unwrap();
        assert_eq!(ok.email, "ada@example.com");
    }

    #[tokio::test]
    async fn unknown_email_never_matches_the_placeholder_hash() {
        let store = feed();
        let err = store
            .authenticate("nobody@example.com", "hearth-unknown-account")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CredentialError));
    }

    #[tokio::test]
    async fn find_by_role_near_filters_role_and_distance() {
        let store = neighbourhood();
        let center = GeoPoint::new(40.7128, -74.0060);
        store
            .create(helper("near@example.com", Some(GeoPoint::new(40.7128, -74.0045))))
            .await
            .unwrap();
        store
            .create(helper("far@example.com", Some(GeoPoint::new(40.80, -74.0060))))
            .await
            .unwrap();
        store.create(helper("nowhere@example.com", None)).await.unwrap();
        store
            .create(NewIdentity {
                role: "elder".into(),
                ..helper("elder@example.com", Some(center))
            })
            .await
            .unwrap();

        let near: Vec<_> = store
            .find_by_role_near(HELPER_ROLE, center, HELPER_RADIUS_METERS)
            .await
            .unwrap()
            .map(|i| i.id)
            .collect();
        assert_eq!(near, vec!["near@example.com"]);

        let tight = store
            .find_by_role_near(HELPER_ROLE, center, 100.0)
            .await
            .unwrap()
            .count();
        assert_eq!(tight, 0);
    }
}
