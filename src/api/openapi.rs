//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    accounts, applicants, health, managers, mechanics, requests, service_centers, transports,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Desk API",
        version = "1.0.0",
        description = "Vehicle service request tracking REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Accounts
        accounts::login,
        accounts::me,
        accounts::get_profile,
        accounts::update_photo,
        // Applicants
        applicants::list_applicants,
        applicants::get_applicant,
        applicants::create_applicant,
        applicants::update_applicant,
        applicants::delete_applicant,
        // Transports
        transports::list_transports,
        transports::get_transport,
        transports::create_transport,
        transports::update_transport,
        transports::delete_transport,
        // Mechanics
        mechanics::list_mechanics,
        mechanics::get_mechanic,
        mechanics::create_mechanic,
        mechanics::update_mechanic,
        mechanics::delete_mechanic,
        // Managers
        managers::list_managers,
        managers::get_manager,
        managers::create_manager,
        managers::update_manager,
        managers::delete_manager,
        // Service centers
        service_centers::list_service_centers,
        service_centers::get_service_center,
        service_centers::create_service_center,
        service_centers::update_service_center,
        service_centers::delete_service_center,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::update_request,
        requests::set_request_status,
        requests::delete_request,
    ),
    components(
        schemas(
            // Accounts
            crate::models::AccountKind,
            crate::models::account::LoginRequest,
            crate::models::account::LoginResponse,
            crate::models::account::UpdatePhoto,
            // Applicants
            crate::models::applicant::Applicant,
            crate::models::applicant::ApplicantDetails,
            crate::models::applicant::CreateApplicant,
            crate::models::applicant::UpdateApplicant,
            // Transports
            crate::models::transport::Transport,
            crate::models::transport::TransportDetails,
            crate::models::transport::CreateTransport,
            crate::models::transport::UpdateTransport,
            // Mechanics
            crate::models::mechanic::Mechanic,
            crate::models::mechanic::MechanicDetails,
            crate::models::mechanic::CreateMechanic,
            crate::models::mechanic::UpdateMechanic,
            // Managers
            crate::models::manager::Manager,
            crate::models::manager::ManagerDetails,
            crate::models::manager::CreateManager,
            crate::models::manager::UpdateManager,
            // Service centers
            crate::models::service_center::ServiceCenter,
            crate::models::service_center::ServiceCenterDetails,
            crate::models::service_center::CreateServiceCenter,
            crate::models::service_center::UpdateServiceCenter,
            crate::models::service_center::ServiceCenterDeleted,
            // Requests
            crate::models::request::Request,
            crate::models::request::RequestDetails,
            crate::models::request::CreateRequest,
            crate::models::request::UpdateRequest,
            // Common
            health::HealthResponse,
            crate::api::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sign-in and profiles"),
        (name = "applicants", description = "Applicant management"),
        (name = "transports", description = "Transport management"),
        (name = "mechanics", description = "Mechanic management"),
        (name = "managers", description = "Manager management"),
        (name = "services", description = "Service center management"),
        (name = "requests", description = "Repair requests and their status")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
