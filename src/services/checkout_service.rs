use crate::entities::{
    order_co_author_entity as order_co_authors, order_entity as orders,
    order_item_entity as order_items,
};
use crate::error::{AppError, AppResult};
use crate::external::{CatalogService, NotificationKind, Notifier};
use crate::models::{
    CheckoutRequest, InstrumentKind, ItemType, OrderDetailResponse, OrderStatus,
};
use crate::services::settlement;
use crate::services::{AffiliateService, DiscountService, UserService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::json;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Frozen per-line pricing, computed once at checkout and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineTotals {
    base_price: i64,
    discount_amount: i64,
    final_price: i64,
}

/// base = unit price x quantity; both supplied instruments stack additively
/// against the base, never against each other's result.
fn price_line(
    unit_price: i64,
    quantity: i32,
    coupon_percent: Option<i32>,
    promo_percent: Option<i32>,
) -> AppResult<LineTotals> {
    let base_price = unit_price * quantity as i64;

    let discount_amount = coupon_percent
        .map(|p| settlement::line_discount(base_price, p))
        .unwrap_or(0)
        + promo_percent
            .map(|p| settlement::line_discount(base_price, p))
            .unwrap_or(0);

    // stacked percentages above 100 would mint money out of nothing
    if discount_amount > base_price {
        return Err(AppError::ValidationError(
            "Combined discounts exceed the item price".to_string(),
        ));
    }

    Ok(LineTotals {
        base_price,
        discount_amount,
        final_price: base_price - discount_amount,
    })
}

/// Order-level attribution: a single id only when every line agrees on it.
fn sole_id(ids: &HashSet<Option<i64>>) -> Option<i64> {
    if ids.len() == 1 {
        ids.iter().next().copied().flatten()
    } else {
        None
    }
}

fn reference_columns(
    item_type: ItemType,
    reference_id: i64,
) -> (Option<i64>, Option<i64>, Option<i64>, Option<i64>) {
    match item_type {
        ItemType::Book => (Some(reference_id), None, None, None),
        ItemType::Course => (None, Some(reference_id), None, None),
        ItemType::Bundle => (None, None, Some(reference_id), None),
        ItemType::Event => (None, None, None, Some(reference_id)),
    }
}

#[derive(Clone)]
pub struct CheckoutService {
    pool: DatabaseConnection,
    catalog: Arc<dyn CatalogService>,
    discount_service: DiscountService,
    affiliate_service: AffiliateService,
    user_service: UserService,
    notifier: Arc<dyn Notifier>,
}

impl CheckoutService {
    pub fn new(
        pool: DatabaseConnection,
        catalog: Arc<dyn CatalogService>,
        discount_service: DiscountService,
        affiliate_service: AffiliateService,
        user_service: UserService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pool,
            catalog,
            discount_service,
            affiliate_service,
            user_service,
            notifier,
        }
    }

    /// Turn a cart into a persisted, settled order.
    ///
    /// The whole sequence runs in one transaction: a failure on any line
    /// rolls everything back, discount consumption included, so a cart is
    /// always all lines or none.
    pub async fn checkout(&self, request: CheckoutRequest) -> AppResult<OrderDetailResponse> {
        if request.items.is_empty() {
            return Err(AppError::ValidationError("Cart is empty".to_string()));
        }

        let txn = self.pool.begin().await?;

        let purchaser = self.user_service.get_live_user(&txn, request.user_id).await?;

        // Existence check only, so once per order is enough however many
        // lines reference it.
        let affiliate = match request.affiliate_id {
            Some(id) => Some(self.affiliate_service.validate(id).await?),
            None => None,
        };

        let mut author_ids: HashSet<Option<i64>> = HashSet::new();
        let mut company_ids: HashSet<Option<i64>> = HashSet::new();
        let mut co_author_ids: BTreeSet<i64> = BTreeSet::new();
        let mut priced_lines = Vec::with_capacity(request.items.len());
        let mut gross_amount = 0i64;
        let mut total_discount = 0i64;
        let mut final_amount = 0i64;
        let mut co_author_share = 0i64;

        for line in &request.items {
            let quantity = line.quantity.unwrap_or(1);
            if quantity < 1 {
                return Err(AppError::ValidationError(
                    "Quantity must be at least 1".to_string(),
                ));
            }

            let entity = self.catalog.resolve(line.item_type, line.reference_id).await?;
            author_ids.insert(entity.author_id);
            company_ids.insert(entity.company_id);

            // Each supplied code is validated and consumed against every
            // line; a code that fails for one line aborts the whole cart.
            let coupon_percent = match &request.coupon_code {
                Some(code) => Some(
                    self.discount_service
                        .consume(&txn, InstrumentKind::Coupon, code, line.item_type, line.reference_id)
                        .await?,
                ),
                None => None,
            };
            let promo_percent = match &request.promo_code {
                Some(code) => Some(
                    self.discount_service
                        .consume(&txn, InstrumentKind::Promo, code, line.item_type, line.reference_id)
                        .await?,
                ),
                None => None,
            };

            let totals = price_line(entity.price, quantity, coupon_percent, promo_percent)?;

            if line.item_type == ItemType::Course {
                let course_co_authors =
                    self.catalog.course_co_authors(line.reference_id).await?;
                if !course_co_authors.is_empty() {
                    co_author_share += settlement::co_author_carve_out(totals.final_price);
                    co_author_ids.extend(course_co_authors);
                }
            }

            gross_amount += totals.base_price;
            total_discount += totals.discount_amount;
            final_amount += totals.final_price;
            priced_lines.push((line.clone(), quantity, totals));
        }

        let usage = settlement::InstrumentUsage {
            coupon: request.coupon_code.is_some(),
            promo: request.promo_code.is_some(),
            affiliate: affiliate.is_some(),
        };
        let shares = settlement::split_revenue(final_amount, usage);

        let order = orders::ActiveModel {
            order_no: Set(Uuid::new_v4().to_string()),
            user_id: Set(purchaser.id),
            author_id: Set(sole_id(&author_ids)),
            company_id: Set(sole_id(&company_ids)),
            gross_amount: Set(gross_amount),
            total_discount: Set(total_discount),
            final_amount: Set(final_amount),
            instructor_share: Set(shares.instructor_share),
            platform_share: Set(shares.platform_share),
            affiliate_share: Set(shares.affiliate_share),
            co_author_share: Set(co_author_share),
            affiliate_id: Set(request.affiliate_id),
            status: Set(OrderStatus::Pending),
            payment_method: Set(request.payment.as_ref().map(|p| p.method.clone())),
            transaction_id: Set(request
                .payment
                .as_ref()
                .and_then(|p| p.transaction_id.clone())),
            is_deleted: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(priced_lines.len());
        for (line, quantity, totals) in priced_lines {
            let (book_id, course_id, bundle_id, event_id) =
                reference_columns(line.item_type, line.reference_id);
            let item = order_items::ActiveModel {
                order_id: Set(order.id),
                item_type: Set(line.item_type),
                book_id: Set(book_id),
                course_id: Set(course_id),
                bundle_id: Set(bundle_id),
                event_id: Set(event_id),
                base_price: Set(totals.base_price),
                discount_amount: Set(totals.discount_amount),
                final_price: Set(totals.final_price),
                quantity: Set(quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        for co_author_user_id in &co_author_ids {
            order_co_authors::ActiveModel {
                order_id: Set(order.id),
                co_author_user_id: Set(*co_author_user_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        if let Err(e) = self
            .notifier
            .notify(
                purchaser.id,
                NotificationKind::OrderPlaced,
                json!({ "order_no": order.order_no.clone(), "final_amount": final_amount }),
            )
            .await
        {
            log::warn!(
                "Failed to notify user {} about order {}: {e:?}",
                purchaser.id,
                order.order_no
            );
        }

        Ok(OrderDetailResponse::new(
            order,
            items,
            co_author_ids.into_iter().collect(),
        ))
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<OrderDetailResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::IsDeleted.eq(false))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No order found with id {order_id}")))?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .order_by_asc(order_items::Column::Id)
            .all(&self.pool)
            .await?;

        let co_author_ids = order_co_authors::Entity::find()
            .filter(order_co_authors::Column::OrderId.eq(order.id))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|c| c.co_author_user_id)
            .collect();

        Ok(OrderDetailResponse::new(order, items, co_author_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user_entity as users;
    use crate::external::ResolvedEntity;
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase};

    struct UnreachableCatalog;

    #[async_trait]
    impl CatalogService for UnreachableCatalog {
        async fn resolve(&self, _item_type: ItemType, _id: i64) -> AppResult<ResolvedEntity> {
            panic!("catalog must not be hit in this test");
        }

        async fn course_co_authors(&self, _course_id: i64) -> AppResult<Vec<i64>> {
            panic!("catalog must not be hit in this test");
        }
    }

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(
            &self,
            _user_id: i64,
            _kind: NotificationKind,
            _context: serde_json::Value,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn service(pool: DatabaseConnection) -> CheckoutService {
        CheckoutService::new(
            pool.clone(),
            Arc::new(UnreachableCatalog),
            DiscountService::new(pool.clone()),
            AffiliateService::new(pool.clone()),
            UserService::new(pool),
            Arc::new(NullNotifier),
        )
    }

    fn cart(items: Vec<crate::models::CartLine>) -> CheckoutRequest {
        CheckoutRequest {
            user_id: 1,
            items,
            coupon_code: None,
            promo_code: None,
            affiliate_id: None,
            payment: None,
        }
    }

    #[test]
    fn test_price_line_defaults() {
        let totals = price_line(10000, 1, None, None).unwrap();
        assert_eq!(totals.base_price, 10000);
        assert_eq!(totals.discount_amount, 0);
        assert_eq!(totals.final_price, 10000);
    }

    #[test]
    fn test_price_line_applies_quantity_before_discount() {
        // unit 50.00 x 2, 10% coupon against the 100.00 base
        let totals = price_line(5000, 2, Some(10), None).unwrap();
        assert_eq!(totals.base_price, 10000);
        assert_eq!(totals.discount_amount, 1000);
        assert_eq!(totals.final_price, 9000);
    }

    #[test]
    fn test_price_line_stacks_instruments_against_the_base() {
        // 10% + 20% on a 100.00 base is 30.00 off, not 10% then 20% of 90.00
        let totals = price_line(10000, 1, Some(10), Some(20)).unwrap();
        assert_eq!(totals.discount_amount, 3000);
        assert_eq!(totals.final_price, 7000);
    }

    #[test]
    fn test_price_line_rejects_discounts_beyond_the_base() {
        let err = price_line(10000, 1, Some(60), Some(50)).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_sole_id_requires_agreement_across_lines() {
        let same: HashSet<Option<i64>> = [Some(7), Some(7)].into_iter().collect();
        assert_eq!(sole_id(&same), Some(7));

        let mixed: HashSet<Option<i64>> = [Some(7), Some(8)].into_iter().collect();
        assert_eq!(sole_id(&mixed), None);

        let partly_unowned: HashSet<Option<i64>> = [Some(7), None].into_iter().collect();
        assert_eq!(sole_id(&partly_unowned), None);

        let all_unowned: HashSet<Option<i64>> = [None].into_iter().collect();
        assert_eq!(sole_id(&all_unowned), None);
    }

    #[test]
    fn test_reference_columns_populate_exactly_one_slot() {
        assert_eq!(
            reference_columns(ItemType::Book, 3),
            (Some(3), None, None, None)
        );
        assert_eq!(
            reference_columns(ItemType::Bundle, 4),
            (None, None, Some(4), None)
        );
    }

    #[tokio::test]
    async fn test_checkout_rejects_an_empty_cart() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(pool).checkout(cart(vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_checkout_fails_fast_on_unknown_purchaser() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let err = service(pool)
            .checkout(cart(vec![crate::models::CartLine {
                item_type: ItemType::Course,
                reference_id: 42,
                quantity: None,
            }]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
