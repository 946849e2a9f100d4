use sea_orm_migration::prelude::*;
use sea_orm_migration::prelude::extension::postgres::Type;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Balance,
    IsActive,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BankProfiles {
    Table,
    Id,
    UserId,
    BankName,
    AccountName,
    AccountNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Affiliates {
    Table,
    Id,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DiscountInstruments {
    Table,
    Id,
    Kind,
    Code,
    IsActive,
    ItemType,
    BookId,
    CourseId,
    EventId,
    DiscountPercent,
    ExpiresAt,
    MaxUsage,
    UsedCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNo,
    UserId,
    AuthorId,
    CompanyId,
    GrossAmount,
    TotalDiscount,
    FinalAmount,
    InstructorShare,
    PlatformShare,
    AffiliateShare,
    CoAuthorShare,
    AffiliateId,
    Status,
    PaymentMethod,
    TransactionId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    ItemType,
    BookId,
    CourseId,
    BundleId,
    EventId,
    BasePrice,
    DiscountAmount,
    FinalPrice,
    Quantity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrderCoAuthors {
    Table,
    Id,
    OrderId,
    CoAuthorUserId,
}

#[derive(DeriveIden)]
enum WithdrawRequests {
    Table,
    Id,
    UserId,
    Amount,
    Channel,
    Status,
    TransferReference,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("instrument_kind"))
                    .values(vec![Alias::new("coupon"), Alias::new("promo")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("item_type"))
                    .values(vec![
                        Alias::new("book"),
                        Alias::new("course"),
                        Alias::new("bundle"),
                        Alias::new("event"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("order_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("paid"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("withdraw_channel"))
                    .values(vec![Alias::new("paypal"), Alias::new("bank_transfer")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("withdraw_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("completed"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(
                        ColumnDef::new(Users::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BankProfiles::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankProfiles::BankName).string().not_null())
                    .col(
                        ColumnDef::new(BankProfiles::AccountName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankProfiles::AccountNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_bank_profiles_user")
                    .table(BankProfiles::Table)
                    .col(BankProfiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Affiliates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Affiliates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Affiliates::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Affiliates::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscountInstruments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscountInstruments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::Kind)
                            .custom(Alias::new("instrument_kind"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiscountInstruments::Code).string().not_null())
                    .col(
                        ColumnDef::new(DiscountInstruments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::ItemType)
                            .custom(Alias::new("item_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiscountInstruments::BookId).big_integer().null())
                    .col(
                        ColumnDef::new(DiscountInstruments::CourseId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(DiscountInstruments::EventId).big_integer().null())
                    .col(
                        ColumnDef::new(DiscountInstruments::DiscountPercent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::MaxUsage)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::UsedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DiscountInstruments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_discount_instruments_kind_code")
                    .table(DiscountInstruments::Table)
                    .col(DiscountInstruments::Kind)
                    .col(DiscountInstruments::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::OrderNo).string().not_null())
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::AuthorId).big_integer().null())
                    .col(ColumnDef::new(Orders::CompanyId).big_integer().null())
                    .col(ColumnDef::new(Orders::GrossAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::TotalDiscount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::FinalAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::InstructorShare)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::PlatformShare)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::AffiliateShare)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CoAuthorShare)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::AffiliateId).big_integer().null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .custom(Alias::new("order_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::PaymentMethod).string().null())
                    .col(ColumnDef::new(Orders::TransactionId).string().null())
                    .col(
                        ColumnDef::new(Orders::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_orders_order_no")
                    .table(Orders::Table)
                    .col(Orders::OrderNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_user")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItems::OrderId).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::ItemType)
                            .custom(Alias::new("item_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderItems::BookId).big_integer().null())
                    .col(ColumnDef::new(OrderItems::CourseId).big_integer().null())
                    .col(ColumnDef::new(OrderItems::BundleId).big_integer().null())
                    .col(ColumnDef::new(OrderItems::EventId).big_integer().null())
                    .col(ColumnDef::new(OrderItems::BasePrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::DiscountAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::FinalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderCoAuthors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderCoAuthors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrderCoAuthors::OrderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderCoAuthors::CoAuthorUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_order_co_authors_order_user")
                    .table(OrderCoAuthors::Table)
                    .col(OrderCoAuthors::OrderId)
                    .col(OrderCoAuthors::CoAuthorUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WithdrawRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WithdrawRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::Channel)
                            .custom(Alias::new("withdraw_channel"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::Status)
                            .custom(Alias::new("withdraw_status"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::TransferReference)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_withdraw_requests_user")
                    .table(WithdrawRequests::Table)
                    .col(WithdrawRequests::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WithdrawRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderCoAuthors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiscountInstruments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Affiliates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
