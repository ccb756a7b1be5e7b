// libs/appointment-cell/src/services/lifecycle.rs
use tracing::debug;

use shared_models::auth::StaffRole;

use crate::models::{AppointmentError, AppointmentStatus, TransitionIntent};

/// The status workflow as a pure function, independently testable without a
/// database or HTTP context.
///
/// Advance walks requested → verified → queued → ongoing → completed;
/// Cancel is reachable from every non-terminal status. Completing an
/// ongoing visit is reserved for the doctor; every other transition is open
/// to both doctors and assistants. Terminal statuses reject everything.
pub fn next_status(
    current: AppointmentStatus,
    intent: TransitionIntent,
    actor: StaffRole,
) -> Result<AppointmentStatus, AppointmentError> {
    debug!("Resolving transition from {} with {:?} as {}", current, intent, actor);

    if current.is_terminal() {
        return Err(AppointmentError::InvalidStatus(current));
    }

    match intent {
        TransitionIntent::Cancel => Ok(AppointmentStatus::Cancelled),
        TransitionIntent::Advance => match current {
            AppointmentStatus::Requested => Ok(AppointmentStatus::Verified),
            AppointmentStatus::Verified => Ok(AppointmentStatus::Queued),
            AppointmentStatus::Queued => Ok(AppointmentStatus::Ongoing),
            AppointmentStatus::Ongoing => {
                if actor == StaffRole::Doctor {
                    Ok(AppointmentStatus::Completed)
                } else {
                    Err(AppointmentError::PermissionDenied(
                        "Only the attending doctor can complete an ongoing appointment"
                            .to_string(),
                    ))
                }
            }
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => {
                Err(AppointmentError::InvalidStatus(current))
            }
        },
    }
}
