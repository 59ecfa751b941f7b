//! Student command handlers.

use academy_core::api::Gateway;
use academy_core::profile::format_dob;
use academy_core::session::SessionController;
use academy_core::students::{SaveError, StudentDetails};
use anyhow::{Result, bail};

pub async fn save(
    gateway: &Gateway,
    session: &SessionController,
    mut details: StudentDetails,
) -> Result<()> {
    if !session.has_token() {
        bail!("Not logged in. Run `academy login`.");
    }

    // Accept "14032012" as well as "14/03/2012".
    details.dob = format_dob(&details.dob);

    match academy_core::students::save(gateway, &details).await {
        Ok(()) => {
            println!("Student details saved successfully.");
            Ok(())
        }
        Err(SaveError::Invalid(e)) => bail!("{e}"),
        Err(SaveError::Api(e)) => bail!("{}", e.user_message()),
    }
}
