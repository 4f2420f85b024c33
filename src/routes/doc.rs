use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        establishments::UpdateScheduleRequest,
        orders::{
            AddressRequest, CreateOrderRequest, DeliveryRequest, OrderCreated, OrderLineRequest,
            UpdateOrderStatusRequest,
        },
    },
    models::{
        Address, Delivery, Establishment, Ingredient, OrderLineView, OrderStatus, OrderView,
        Payment, Product, ScheduleSlot,
    },
    response::{ApiResponse, Meta},
    routes::{auth, establishments, health, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        establishments::get_profile,
        establishments::update_schedule,
        orders::create_order,
        orders::list_orders,
        orders::update_order_status,
        orders::cancel_order
    ),
    components(
        schemas(
            Establishment,
            ScheduleSlot,
            Product,
            Ingredient,
            Address,
            Delivery,
            Payment,
            OrderStatus,
            OrderView,
            OrderLineView,
            CreateOrderRequest,
            DeliveryRequest,
            AddressRequest,
            OrderLineRequest,
            OrderCreated,
            UpdateOrderStatusRequest,
            UpdateScheduleRequest,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            params::Pagination,
            Meta,
            ApiResponse<Establishment>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Establishment authentication"),
        (name = "Establishments", description = "Establishment profile and schedule"),
        (name = "Orders", description = "Order admission and lifecycle; new orders are also pushed on GET /ws?token=<JWT>"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
