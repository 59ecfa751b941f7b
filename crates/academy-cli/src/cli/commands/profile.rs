//! Profile command handlers.

use academy_core::api::Gateway;
use academy_core::profile::{ProfileForm, format_dob};
use academy_core::session::{SessionController, SessionError};
use anyhow::{Result, bail};

pub async fn complete(
    gateway: &Gateway,
    session: &SessionController,
    mut form: ProfileForm,
) -> Result<()> {
    // Accept "14031990" as well as "14/03/1990".
    form.dob = format_dob(&form.dob);

    match session.complete_profile(gateway, &form).await {
        Ok(_) => {
            println!("Profile completed. Welcome, {}.", form.name);
            Ok(())
        }
        Err(SessionError::NotAuthenticated) => bail!("Not logged in. Run `academy login`."),
        Err(SessionError::Invalid(e)) => bail!("{e}"),
        Err(SessionError::Api(e)) => bail!("{}", e.user_message()),
        Err(e) => Err(e.into()),
    }
}
