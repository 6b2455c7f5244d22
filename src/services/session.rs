use parking_lot::RwLock;

use crate::models::UserInfo;

/// Source of the current auth token and user info
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> String;
    fn user_info(&self) -> UserInfo;
}

/// Session of the signed-in user, replaced whenever the desktop client refreshes its token
#[derive(Debug, Default)]
pub struct Session {
    info: RwLock<UserInfo>,
}

impl Session {
    pub fn new(info: UserInfo) -> Self {
        Self { info: RwLock::new(info) }
    }

    pub fn replace(&self, info: UserInfo) {
        *self.info.write() = info;
    }
}

impl TokenProvider for Session {
    fn token(&self) -> String {
        self.info.read().token.clone()
    }

    fn user_info(&self) -> UserInfo {
        self.info.read().clone()
    }
}
