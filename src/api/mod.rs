//! API Module
//!
//! REST surface of the development backend, serving the in-memory catalog.
//!
//! # Endpoints
//! - `GET /api/programs/search` - Filtered, sorted, paginated search
//! - `GET /api/programs/:id` - Program details
//! - `GET /api/programs/:id/similar` - Related programs
//! - `POST /api/auth/login`, `POST /api/auth/register`, `GET /api/auth/me`
//! - `PUT /api/users/profile` - Partial profile update
//! - `GET|POST /api/shortlist`, `PUT|DELETE /api/shortlist/:id`
//! - `POST /api/recommendations`, `POST /api/ai/chat`, `POST /api/leads`
//! - `GET /api/metadata/{countries,disciplines,universities}`
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
