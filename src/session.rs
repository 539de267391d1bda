use tower_sessions::Session;

use crate::{AppResult, error::ChatError};

pub const USERNAME: &str = "username";

/// The username this session logged in with.
pub async fn username(session: &Session) -> AppResult<String> {
    let Some(username) = session.get::<String>(USERNAME).await? else {
        return Err(ChatError::Anonymous)?;
    };
    Ok(username)
}
