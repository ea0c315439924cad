use crate::{
    libs::{messages::Message, session::SessionStore},
    msg_info, msg_success,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    if SessionStore::new()?.clear()? {
        msg_success!(Message::LoggedOut);
    } else {
        msg_info!(Message::NoActiveSession);
    }
    Ok(())
}
