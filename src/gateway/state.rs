use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::meals::MealCatalog;
use crate::notify::{LogNotifier, Notifier};
use crate::orders::{OrderService, OrderStore};
use crate::payments::PayDpiClient;
use crate::students::StudentDirectory;

/// Shared gateway state
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub students: Arc<StudentDirectory>,
    pub meals: Arc<MealCatalog>,
    pub orders: OrderService,
    pub paydpi: Arc<PayDpiClient>,
}

impl AppState {
    /// Wire all services from config, seeding the in-memory directories.
    pub fn from_config(config: &AppConfig) -> Self {
        let students = Arc::new(StudentDirectory::seeded());
        let meals = Arc::new(MealCatalog::seeded());
        let paydpi = Arc::new(PayDpiClient::new(config.paydpi.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let orders = OrderService::new(
            Arc::new(OrderStore::new()),
            meals.clone(),
            students.clone(),
            paydpi.clone(),
            notifier,
        );

        Self {
            auth: Arc::new(AuthService::new(
                config.auth.jwt_secret.clone(),
                config.auth.token_ttl_hours,
            )),
            students,
            meals,
            orders,
            paydpi,
        }
    }
}
