use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::{appointment_routes, booking_routes};
use appointment_cell::AppointmentCellState;
use assistant_cell::router::assistant_routes;
use assistant_cell::{AssistantCellState, ChatService, GeminiClient, SessionStore, ToolRouter};
use doctor_cell::router::doctor_routes;
use doctor_cell::DoctorCellState;
use notification_cell::{
    CalendarScheduler, ChannelNotifier, EmailNotifier, LoggingCalendarScheduler, LoggingChannelNotifier,
    LoggingEmailNotifier,
};
use shared_config::AppConfig;
use shared_database::ClinicStore;

pub fn create_router(config: Arc<AppConfig>, store: Arc<dyn ClinicStore>) -> Router {
    let calendar: Arc<dyn CalendarScheduler> = Arc::new(LoggingCalendarScheduler::new());
    let email: Arc<dyn EmailNotifier> = Arc::new(LoggingEmailNotifier);
    let channel: Arc<dyn ChannelNotifier> = Arc::new(LoggingChannelNotifier);

    let doctors = Arc::new(DoctorCellState::new(Arc::clone(&store)));
    let appointments = Arc::new(AppointmentCellState {
        store: Arc::clone(&store),
        calendar: Arc::clone(&calendar),
        email: Arc::clone(&email),
        channel: Arc::clone(&channel),
    });

    let tools = ToolRouter::new(store, calendar, email, channel);
    let chat = ChatService::new(
        Arc::new(GeminiClient::new(&config)),
        Arc::new(tools),
        Arc::new(SessionStore::from_config(&config)),
    );
    let assistant = Arc::new(AssistantCellState { chat });

    Router::new()
        .route("/", get(|| async { "Clinic assistant API is running!" }))
        .nest("/doctors", doctor_routes(doctors))
        .nest("/appointments", appointment_routes(appointments.clone()))
        .merge(booking_routes(appointments))
        .merge(assistant_routes(assistant))
}
