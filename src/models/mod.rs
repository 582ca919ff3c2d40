// ============================================================================
// MODELS
// ============================================================================
//
// One module per PostgreSQL table (SeaORM entities):
//   - users     : accounts (email unique, password stored as PBKDF2 hash)
//   - devices   : IoT devices, each owned by exactly one user (unique api_key)
//   - telemetry : immutable sensor readings, one device per row
//   - health    : health check response type (no table)
//
// Relations: users 1:N devices 1:N telemetry. Cascade deletes are performed
// explicitly in the services inside a single transaction.
// ============================================================================

pub mod health;
pub mod users;
pub mod devices;
pub mod telemetry;
