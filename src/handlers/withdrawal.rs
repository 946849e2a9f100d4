use crate::models::*;
use crate::services::WithdrawalService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/withdrawals",
    tag = "withdrawal",
    request_body = CreateWithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal request created", body = WithdrawResponse),
        (status = 400, description = "Insufficient balance, duplicate pending request or missing bank profile"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    request: web::Json<CreateWithdrawRequest>,
) -> Result<HttpResponse> {
    match withdrawal_service.create(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/withdrawals",
    tag = "withdrawal",
    params(
        ("user_id" = i64, Query, description = "User id"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Withdrawal history")
    )
)]
pub async fn list_withdrawals(
    withdrawal_service: web::Data<WithdrawalService>,
    query: web::Query<WithdrawQuery>,
) -> Result<HttpResponse> {
    match withdrawal_service.list_user_requests(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn withdrawal_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/withdrawals")
            .route("", web::post().to(create_withdrawal))
            .route("", web::get().to(list_withdrawals)),
    );
}
