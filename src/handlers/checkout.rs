use crate::models::*;
use crate::services::CheckoutService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/checkout",
    tag = "checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created", body = OrderDetailResponse),
        (status = 400, description = "Invalid cart or discount"),
        (status = 404, description = "Purchaser, item, affiliate or code not found"),
        (status = 409, description = "Discount usage limit reached"),
        (status = 410, description = "Discount code expired")
    )
)]
pub async fn checkout(
    checkout_service: web::Data<CheckoutService>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
    match checkout_service.checkout(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "checkout",
    params(
        ("id" = i64, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Order detail", body = OrderDetailResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    checkout_service: web::Data<CheckoutService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match checkout_service.get_order(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn checkout_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkout", web::post().to(checkout))
        .service(web::scope("/orders").route("/{id}", web::get().to(get_order)));
}
