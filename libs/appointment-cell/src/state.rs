use std::sync::Arc;

use notification_cell::{HttpMailerClient, Mailer};
use shared_config::AppConfig;
use shared_database::docstore::DocStoreClient;

use crate::repository::rest::{DocStoreAppointments, DocStoreChambers, DocStoreStaff};
use crate::repository::{AppointmentStore, ChamberStore, StaffStore};
use crate::services::booking::AppointmentBookingService;

/// Process-wide dependencies, wired once at startup and shared by every
/// handler. Repositories and the mailer are injected explicitly; nothing
/// initializes lazily behind a global.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking: AppointmentBookingService,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let docstore = Arc::new(DocStoreClient::new(&config));

        let appointments: Arc<dyn AppointmentStore> =
            Arc::new(DocStoreAppointments::new(Arc::clone(&docstore)));
        let chambers: Arc<dyn ChamberStore> =
            Arc::new(DocStoreChambers::new(Arc::clone(&docstore)));
        let staff: Arc<dyn StaffStore> = Arc::new(DocStoreStaff::new(docstore));
        let mailer: Arc<dyn Mailer> = Arc::new(HttpMailerClient::new(&config));

        Self::with_parts(config, appointments, chambers, staff, mailer)
    }

    /// Assembles the state from explicit parts; tests swap in in-memory
    /// stores and a recording mailer here.
    pub fn with_parts(
        config: Arc<AppConfig>,
        appointments: Arc<dyn AppointmentStore>,
        chambers: Arc<dyn ChamberStore>,
        staff: Arc<dyn StaffStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            booking: AppointmentBookingService::new(appointments, chambers, staff, mailer),
        }
    }
}
