pub mod admin;

pub mod auth;

pub mod events;

pub mod frontend;

pub mod system;

pub mod tasks;

pub mod teachers;

pub mod timetable;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use events::configure_events_routes;
pub use frontend::configure_frontend_routes;
pub use system::configure_system_routes;
pub use tasks::configure_tasks_routes;
pub use teachers::configure_teachers_routes;
pub use timetable::configure_timetable_routes;
