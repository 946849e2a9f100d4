use crate::models::*;
use crate::services::{DiscountService, WithdrawalService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/discount-instruments",
    tag = "admin",
    request_body = CreateInstrumentRequest,
    responses(
        (status = 200, description = "Instrument created", body = InstrumentResponse),
        (status = 400, description = "Invalid target, percentage or expiry")
    )
)]
pub async fn create_discount_instrument(
    discount_service: web::Data<DiscountService>,
    request: web::Json<CreateInstrumentRequest>,
) -> Result<HttpResponse> {
    match discount_service.create_instrument(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/withdrawals/{id}/status",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Withdrawal request id")
    ),
    request_body = WithdrawTransitionRequest,
    responses(
        (status = 200, description = "Withdrawal transitioned", body = WithdrawResponse),
        (status = 400, description = "Insufficient balance at completion"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn transition_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    path: web::Path<i64>,
    request: web::Json<WithdrawTransitionRequest>,
) -> Result<HttpResponse> {
    match withdrawal_service
        .transition(path.into_inner(), request.into_inner().status)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route(
                "/discount-instruments",
                web::post().to(create_discount_instrument),
            )
            .route(
                "/withdrawals/{id}/status",
                web::put().to(transition_withdrawal),
            ),
    );
}
