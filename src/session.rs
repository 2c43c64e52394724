/// Per-login session context.
///
/// Created once after authentication and passed into the session and
/// controller constructors; discarded at logout. Token refresh is handled
/// by the auth layer before a context is built — everything in this crate
/// treats the bearer token as opaque and valid.
#[derive(Clone, Debug)]
pub struct SessionContext {
    api_base: String,
    bearer_token: String,
    user_name: Option<String>,
    user_avatar: Option<String>,
}

impl SessionContext {
    pub fn new(api_base: String, bearer_token: String) -> Self {
        Self {
            api_base,
            bearer_token,
            user_name: None,
            user_avatar: None,
        }
    }

    /// Attach display metadata for the signed-in user. Stamped onto user
    /// messages so the transcript can be rendered without a user lookup.
    pub fn with_user(mut self, name: Option<String>, avatar: Option<String>) -> Self {
        self.user_name = name;
        self.user_avatar = avatar;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn user_avatar(&self) -> Option<&str> {
        self.user_avatar.as_deref()
    }
}
