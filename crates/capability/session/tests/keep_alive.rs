use api_contract::GuiDescription;
use async_trait::async_trait;
use domain::{AuthToken, Credentials, InstallationTarget, Session, SessionId, ValueBatch};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wolf_session::{SessionError, SessionManager};
use wolf_vendor::{VendorApi, VendorError};

#[derive(Default)]
struct FakeVendor {
    reject_auth: bool,
    fail_create: bool,
    fail_refresh: bool,
    next_session: AtomicI64,
    refreshed: Mutex<Vec<i64>>,
}

impl FakeVendor {
    fn refreshed(&self) -> Vec<i64> {
        self.refreshed.lock().expect("lock").clone()
    }
}

#[async_trait]
impl VendorApi for FakeVendor {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken, VendorError> {
        if self.reject_auth {
            return Err(VendorError::Status {
                endpoint: "/connect/token2",
                status: 400,
            });
        }
        Ok(AuthToken {
            access_token: format!("token-{}", credentials.username),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            refresh_token: String::new(),
        })
    }

    async fn create_session(&self, _token: &AuthToken) -> Result<SessionId, VendorError> {
        if self.fail_create {
            return Err(VendorError::Status {
                endpoint: "/api/portal/CreateSession",
                status: 500,
            });
        }
        Ok(SessionId(self.next_session.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn update_session(&self, session: &Session) -> Result<(), VendorError> {
        self.refreshed.lock().expect("lock").push(session.id.0);
        if self.fail_refresh {
            return Err(VendorError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn system_list(
        &self,
        _token: &AuthToken,
    ) -> Result<Vec<InstallationTarget>, VendorError> {
        Ok(Vec::new())
    }

    async fn gui_description(
        &self,
        _token: &AuthToken,
        _target: &InstallationTarget,
    ) -> Result<GuiDescription, VendorError> {
        Ok(GuiDescription::default())
    }

    async fn parameter_values(
        &self,
        _session: &Session,
        _target: &InstallationTarget,
        _value_ids: &[i64],
        last_access: &str,
    ) -> Result<ValueBatch, VendorError> {
        Ok(ValueBatch {
            last_access: last_access.to_string(),
            values: Vec::new(),
        })
    }
}

fn credentials() -> Credentials {
    Credentials::new("user", "secret")
}

#[tokio::test]
async fn establish_returns_token_and_session() {
    let vendor = Arc::new(FakeVendor::default());
    let mut manager = SessionManager::new(vendor);
    let session = manager.establish(&credentials()).await.expect("session");
    assert_eq!(session.id, SessionId(1));
    assert_eq!(session.token.access_token, "token-user");
    assert!(!manager.keep_alive_running());
}

#[tokio::test]
async fn rejected_credentials_are_auth_errors() {
    let vendor = Arc::new(FakeVendor {
        reject_auth: true,
        ..FakeVendor::default()
    });
    let mut manager = SessionManager::new(vendor);
    let err = manager.establish(&credentials()).await.expect_err("rejected");
    assert!(matches!(err, SessionError::Auth(_)));
}

#[tokio::test]
async fn failed_creation_is_session_error() {
    let vendor = Arc::new(FakeVendor {
        fail_create: true,
        ..FakeVendor::default()
    });
    let mut manager = SessionManager::new(vendor);
    let err = manager.establish(&credentials()).await.expect_err("failed");
    assert!(matches!(err, SessionError::Create(_)));
}

#[tokio::test(start_paused = true)]
async fn keep_alive_refreshes_every_interval() {
    let vendor = Arc::new(FakeVendor::default());
    let mut manager = SessionManager::new(vendor.clone());
    let session = manager.establish(&credentials()).await.expect("session");
    manager.start_keep_alive(&session);
    assert!(manager.keep_alive_running());

    tokio::time::sleep(Duration::from_secs(185)).await;
    assert_eq!(vendor.refreshed(), vec![1, 1, 1]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_keep_alive_stops_refreshing() {
    let vendor = Arc::new(FakeVendor::default());
    let mut manager = SessionManager::new(vendor.clone());
    let session = manager.establish(&credentials()).await.expect("session");
    manager.start_keep_alive(&session);

    tokio::time::sleep(Duration::from_secs(65)).await;
    manager.cancel_keep_alive();
    assert!(!manager.keep_alive_running());

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(vendor.refreshed(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn restart_leaves_only_the_new_session_alive() {
    let vendor = Arc::new(FakeVendor::default());
    let mut manager = SessionManager::new(vendor.clone());
    let first = manager.establish(&credentials()).await.expect("first");
    manager.start_keep_alive(&first);
    tokio::time::sleep(Duration::from_secs(70)).await;

    let second = manager.establish(&credentials()).await.expect("second");
    assert!(!manager.keep_alive_running());
    manager.start_keep_alive(&second);
    assert_eq!(manager.keep_alive_session(), Some(SessionId(2)));

    tokio::time::sleep(Duration::from_secs(125)).await;
    assert_eq!(vendor.refreshed(), vec![1, 2, 2]);
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_is_retried_on_next_tick() {
    let vendor = Arc::new(FakeVendor {
        fail_refresh: true,
        ..FakeVendor::default()
    });
    let mut manager =
        SessionManager::new(vendor.clone()).with_keep_alive_interval(Duration::from_secs(10));
    let session = manager.establish(&credentials()).await.expect("session");
    manager.start_keep_alive(&session);

    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(vendor.refreshed().len(), 3);
    assert!(manager.keep_alive_running());
}
