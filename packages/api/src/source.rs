//! # Remote data source contract
//!
//! Everything the client core needs from the backend, split by concern:
//!
//! | Trait | Used by |
//! |-------|---------|
//! | [`AuthApi`] | the session store (login, register, logout) |
//! | [`ResourceApi`] | directory, catalog and profile fetches |
//! | [`DashboardApi`] | dashboard aggregates, fed to [`crate::normalize::to_chart_data`] |
//!
//! Resource and dashboard calls return the raw JSON payload. Shapes differ
//! between backends (enveloped or not, arrays or keyed objects), so decoding is
//! left to the normalizer and to the fetch primitive's typed state.
//!
//! [`crate::HttpDataSource`] is the REST implementation.

use std::future::Future;

use serde_json::Value;

use crate::error::ApiError;
use crate::models::{
    AuthResponse, Credentials, NewAssignment, ProficiencyUpdate, RecordId, RegisterRequest,
};

/// Authentication endpoints.
pub trait AuthApi {
    fn login(&self, credentials: &Credentials) -> impl Future<Output = Result<AuthResponse, ApiError>>;

    fn register(&self, request: &RegisterRequest) -> impl Future<Output = Result<AuthResponse, ApiError>>;

    /// Drop the local session (durable storage). Never fails.
    fn logout(&self) -> impl Future<Output = ()>;
}

/// Employee, skill and company resources.
///
/// List operations take an optional tenant scope (company id).
pub trait ResourceApi {
    fn employees(&self, scope: Option<&RecordId>) -> impl Future<Output = Result<Value, ApiError>>;
    fn employee(&self, id: &RecordId) -> impl Future<Output = Result<Value, ApiError>>;
    /// Profile of the signed-in user.
    fn me(&self) -> impl Future<Output = Result<Value, ApiError>>;
    fn create_employee(&self, body: &Value) -> impl Future<Output = Result<Value, ApiError>>;
    fn update_employee(&self, id: &RecordId, body: &Value) -> impl Future<Output = Result<Value, ApiError>>;
    fn delete_employee(&self, id: &RecordId) -> impl Future<Output = Result<Value, ApiError>>;

    fn employee_skills(&self, employee: &RecordId) -> impl Future<Output = Result<Value, ApiError>>;
    fn add_employee_skill(
        &self,
        employee: &RecordId,
        assignment: &NewAssignment,
    ) -> impl Future<Output = Result<Value, ApiError>>;
    fn update_employee_skill(
        &self,
        employee: &RecordId,
        skill: &RecordId,
        update: &ProficiencyUpdate,
    ) -> impl Future<Output = Result<Value, ApiError>>;
    fn delete_employee_skill(
        &self,
        employee: &RecordId,
        skill: &RecordId,
    ) -> impl Future<Output = Result<Value, ApiError>>;

    fn certificates(&self, employee: &RecordId) -> impl Future<Output = Result<Value, ApiError>>;
    fn add_certificate(&self, employee: &RecordId, body: &Value) -> impl Future<Output = Result<Value, ApiError>>;
    fn delete_certificate(
        &self,
        employee: &RecordId,
        certificate: &RecordId,
    ) -> impl Future<Output = Result<Value, ApiError>>;

    fn skills(&self, scope: Option<&RecordId>) -> impl Future<Output = Result<Value, ApiError>>;
    fn create_skill(&self, body: &Value) -> impl Future<Output = Result<Value, ApiError>>;
    fn update_skill(&self, id: &RecordId, body: &Value) -> impl Future<Output = Result<Value, ApiError>>;
    fn delete_skill(&self, id: &RecordId) -> impl Future<Output = Result<Value, ApiError>>;
    /// Employees holding a skill.
    fn users_by_skill(&self, skill: &RecordId) -> impl Future<Output = Result<Value, ApiError>>;

    fn companies(&self) -> impl Future<Output = Result<Value, ApiError>>;
}

/// Pre-aggregated dashboard series.
pub trait DashboardApi {
    fn skill_distribution(&self) -> impl Future<Output = Result<Value, ApiError>>;
    fn skills_by_department(&self) -> impl Future<Output = Result<Value, ApiError>>;
    fn recent_activities(&self) -> impl Future<Output = Result<Value, ApiError>>;
    fn top_skills(&self) -> impl Future<Output = Result<Value, ApiError>>;
}

/// Called by a data source when the server rejects the session token.
pub trait UnauthorizedHook: Send + Sync {
    fn on_unauthorized(&self);
}
