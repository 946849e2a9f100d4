use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::checkout::checkout,
        handlers::checkout::get_order,
        handlers::withdrawal::create_withdrawal,
        handlers::withdrawal::list_withdrawals,
        handlers::admin::create_discount_instrument,
        handlers::admin::transition_withdrawal,
    ),
    components(
        schemas(
            ItemType,
            OrderStatus,
            CartLine,
            PaymentMeta,
            CheckoutRequest,
            OrderResponse,
            OrderItemResponse,
            OrderDetailResponse,
            InstrumentKind,
            CreateInstrumentRequest,
            InstrumentResponse,
            WithdrawChannel,
            WithdrawStatus,
            CreateWithdrawRequest,
            WithdrawTransitionRequest,
            WithdrawQuery,
            WithdrawResponse,
        )
    ),
    tags(
        (name = "checkout", description = "Cart checkout and order settlement"),
        (name = "withdrawal", description = "Balance withdrawal ledger"),
        (name = "admin", description = "Administrative operations")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
