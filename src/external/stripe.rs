use crate::config::StripeConfig;
use crate::domain::{ObservedPayment, to_minor_units};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus,
    CheckoutSessionStatus, Client, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    Currency, EventObject, Webhook,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub booking_id: Uuid,
    pub room_id: String,
    pub customer_email: String,
    /// Shown on the hosted checkout page
    pub description: String,
    pub amount: Decimal,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionInfo {
    pub session_id: String,
    pub url: Option<String>,
}

/// Provider view of a checkout session, reduced to what booking code needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub observed: ObservedPayment,
    pub amount_total: Option<i64>,
    pub booking_id: Option<Uuid>,
}

/// Seam between booking logic and the card processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSessionInfo>;

    async fn retrieve_session(&self, session_id: &str) -> AppResult<SessionSnapshot>;

    /// Verifies the signature and returns the checkout session carried by the
    /// event, or `None` for unrelated event types.
    fn parse_webhook(&self, payload: &str, signature: &str) -> AppResult<Option<SessionSnapshot>>;
}

#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(config.secret_key.clone()),
            config,
        }
    }

    fn currency(&self) -> Currency {
        serde_json::from_value(serde_json::Value::String(self.config.currency.to_lowercase()))
            .unwrap_or(Currency::EUR)
    }
}

pub fn observe_session(
    payment_status: CheckoutSessionPaymentStatus,
    status: Option<CheckoutSessionStatus>,
) -> ObservedPayment {
    match (payment_status, status) {
        (CheckoutSessionPaymentStatus::Paid, _)
        | (CheckoutSessionPaymentStatus::NoPaymentRequired, _) => ObservedPayment::Paid,
        (_, Some(CheckoutSessionStatus::Expired)) => ObservedPayment::Expired,
        _ => ObservedPayment::Open,
    }
}

fn snapshot(session: &CheckoutSession) -> SessionSnapshot {
    SessionSnapshot {
        session_id: session.id.to_string(),
        observed: observe_session(session.payment_status, session.status),
        amount_total: session.amount_total,
        booking_id: session
            .metadata
            .as_ref()
            .and_then(|m| m.get("booking_id"))
            .and_then(|v| Uuid::parse_str(v).ok()),
    }
}

#[async_trait]
impl PaymentGateway for StripeService {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSessionInfo> {
        let booking_id = request.booking_id.to_string();
        let mut metadata = HashMap::new();
        metadata.insert("booking_id".to_string(), booking_id.clone());
        metadata.insert("room_id".to_string(), request.room_id.clone());

        let mut params = CreateCheckoutSession::new();
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.customer_email = Some(&request.customer_email);
        params.client_reference_id = Some(&booking_id);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.metadata = Some(metadata);
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: self.currency(),
                unit_amount: Some(to_minor_units(request.amount)),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.description.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params).await?;
        log::info!(
            "Created checkout session {} for booking {}",
            session.id,
            request.booking_id
        );

        Ok(CheckoutSessionInfo {
            session_id: session.id.to_string(),
            url: session.url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<SessionSnapshot> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| AppError::ValidationError(format!("Invalid session id: {session_id}")))?;
        let session = CheckoutSession::retrieve(&self.client, &id, &[]).await?;
        Ok(snapshot(&session))
    }

    fn parse_webhook(&self, payload: &str, signature: &str) -> AppResult<Option<SessionSnapshot>> {
        let event = Webhook::construct_event(payload, signature, &self.config.webhook_secret)
            .map_err(|e| AppError::AuthError(format!("Invalid webhook signature: {e}")))?;

        log::info!("Received Stripe event {} ({})", event.type_, event.id);

        match event.data.object {
            EventObject::CheckoutSession(session) => Ok(Some(snapshot(&session))),
            _ => Ok(None),
        }
    }
}
