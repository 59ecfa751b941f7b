//! Dashboard command handler.

use academy_core::api::Gateway;
use academy_core::dashboard::{Dashboard, FetchState};
use academy_core::session::SessionController;
use anyhow::{Result, bail};

pub async fn show(gateway: &Gateway, session: &SessionController) -> Result<()> {
    if !session.has_token() {
        bail!("Not logged in. Run `academy login`.");
    }

    let mut dashboard = Dashboard::new();
    match dashboard.refresh(gateway).await {
        FetchState::Ready(data) => {
            if !data.name.is_empty() {
                println!("Welcome, {}.", data.name);
            }
            println!("students:          {}", data.total_students);
            println!("teachers:          {}", data.total_teachers);
            println!("attendance today:  {:.1}%", data.today_attendance);
            println!("pending fees:      {}", data.pending_fees);
            println!("upcoming exams:    {}", data.upcoming_exams);
            println!("recent admissions: {}", data.recent_admissions);
            Ok(())
        }
        FetchState::Error(message) => bail!("{message}"),
        // Unauthorized: the session was already torn down.
        FetchState::Idle | FetchState::Loading => {
            bail!("Session expired. Please login again.")
        }
    }
}
