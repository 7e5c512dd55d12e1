//! Login and password commands.

use super::CommandError;
use crate::core_state::CoreState;

pub fn login(state: &mut CoreState, username: &str, password: &str) -> Result<(), CommandError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(CommandError::AuthFailure(
            "username and password are required".into(),
        ));
    }
    state.login(username.trim(), password)?;
    Ok(())
}

/// Change the operator's password. The session ends on success.
pub fn change_password(
    state: &mut CoreState,
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), CommandError> {
    Ok(state.change_password(old_password, new_password, confirm_password)?)
}
