use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientError;
use crate::session::SessionStore;
use crate::{Listing, ListingInput, Session};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    user_id: Uuid,
}

pub struct LodgeClient {
    client: Client,
    base_url: String,
    store: SessionStore,
    session: Option<Session>,
}

impl LodgeClient {
    /// Client using the default session file in the working directory.
    pub fn connect(endpoint: &str) -> Result<Self, ClientError> {
        Self::with_session_store(endpoint, SessionStore::default())
    }

    pub fn with_session_store(endpoint: &str, store: SessionStore) -> Result<Self, ClientError> {
        let session = store.load()?;
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            store,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Uuid, ClientError> {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: RegisterResponse = read_json(resp).await?;
        Ok(body.user_id)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: Session = read_json(resp).await?;
        self.store.save(&session)?;
        self.session = Some(session.clone());
        debug!(user_id = %session.user_id, "session stored");
        Ok(session)
    }

    /// Forgets the session locally. Tokens are stateless, so the server is
    /// not contacted.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session = None;
        self.store.clear()
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>, ClientError> {
        let resp = self.client.get(self.url("/api/properties")).send().await?;
        read_json(resp).await
    }

    pub async fn get_listing(&self, id: Uuid) -> Result<Listing, ClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/properties/{id}")))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn my_listings(&self) -> Result<Vec<Listing>, ClientError> {
        let session = self.current_session()?;
        let req = self
            .client
            .get(self.url(&format!("/api/properties/owner/{}", session.user_id)));
        let resp = self.authorized(req)?.send().await?;
        read_json(resp).await
    }

    pub async fn create_listing(&self, input: &ListingInput) -> Result<Listing, ClientError> {
        let req = self.client.post(self.url("/api/properties")).json(input);
        let resp = self.authorized(req)?.send().await?;
        read_json(resp).await
    }

    pub async fn update_listing(
        &self,
        id: Uuid,
        input: &ListingInput,
    ) -> Result<Listing, ClientError> {
        let req = self
            .client
            .put(self.url(&format!("/api/properties/{id}")))
            .json(input);
        let resp = self.authorized(req)?.send().await?;
        read_json(resp).await
    }

    pub async fn delete_listing(&self, id: Uuid) -> Result<(), ClientError> {
        let req = self
            .client
            .delete(self.url(&format!("/api/properties/{id}")));
        let resp = self.authorized(req)?.send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn current_session(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::Unauthorized)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let session = self.current_session()?;
        Ok(req.bearer_auth(&session.token))
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    if resp.status().is_success() {
        Ok(resp.json().await?)
    } else {
        Err(ClientError::from_http_response(resp).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // nothing listens here; calls that need a session must fail before sending
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/";

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session"))
    }

    fn input() -> ListingInput {
        ListingInput {
            address: "1 Main St".into(),
            rent: 500,
            bedrooms: 2,
            image_url: None,
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let client = LodgeClient::with_session_store(DEAD_ENDPOINT, store_in(&dir)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn authenticated_calls_without_session_fail_locally() {
        let dir = tempfile::tempdir().unwrap();
        let client = LodgeClient::with_session_store(DEAD_ENDPOINT, store_in(&dir)).unwrap();

        assert!(matches!(client.my_listings().await, Err(ClientError::Unauthorized)));
        assert!(matches!(
            client.create_listing(&input()).await,
            Err(ClientError::Unauthorized)
        ));
        assert!(matches!(
            client.update_listing(Uuid::new_v4(), &input()).await,
            Err(ClientError::Unauthorized)
        ));
        assert!(matches!(
            client.delete_listing(Uuid::new_v4()).await,
            Err(ClientError::Unauthorized)
        ));
    }

    #[test]
    fn stored_session_is_picked_up_and_logout_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session {
            token: "abc.def.ghi".into(),
            user_id: Uuid::new_v4(),
        };
        store_in(&dir).save(&session).unwrap();

        let mut client = LodgeClient::with_session_store(DEAD_ENDPOINT, store_in(&dir)).unwrap();
        assert_eq!(client.session(), Some(&session));

        client.logout().unwrap();
        assert!(client.session().is_none());
        assert!(store_in(&dir).load().unwrap().is_none());
    }
}
