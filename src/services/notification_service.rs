//! Guest and owner emails. Delivery failures are logged and never bubble up.

use crate::entities::{booking_entity, contact_message_entity, room_entity, settings_entity};
use crate::external::{EmailMessage, Mailer};
use crate::services::settings_service::{default_settings, load_settings};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
    site_name: String,
    admin_recipient: Option<String>,
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn guest_confirmation_email(
    booking: &booking_entity::Model,
    room_name: &str,
    settings: &settings_entity::Model,
    site_name: &str,
) -> EmailMessage {
    let english = booking.language == "en";
    let nights = booking.nights();
    let (subject, greeting, intro, labels) = if english {
        (
            format!("Booking confirmed - {site_name}"),
            format!("Dear {},", escape_html(&booking.guest_name)),
            "thank you for your booking. Here are the details of your stay:",
            ["Room", "Check-in", "Check-out", "Nights", "Guests", "Total paid", "Booking code"],
        )
    } else {
        (
            format!("Prenotazione confermata - {site_name}"),
            format!("Gentile {},", escape_html(&booking.guest_name)),
            "grazie per la tua prenotazione. Ecco i dettagli del soggiorno:",
            ["Camera", "Arrivo", "Partenza", "Notti", "Ospiti", "Totale pagato", "Codice prenotazione"],
        )
    };
    let values = [
        escape_html(room_name),
        format!("{} ({} {})", format_date(booking.check_in), if english { "from" } else { "dalle" }, settings.check_in_time),
        format!("{} ({} {})", format_date(booking.check_out), if english { "by" } else { "entro le" }, settings.check_out_time),
        nights.to_string(),
        booking.num_guests.to_string(),
        format!("&euro; {:.2}", booking.total_price),
        booking.id.to_string(),
    ];
    let rows: String = labels
        .iter()
        .zip(values.iter())
        .map(|(label, value)| format!("<tr><td><strong>{label}</strong></td><td>{value}</td></tr>"))
        .collect();
    let closing = if english {
        "We look forward to welcoming you in Puglia."
    } else {
        "Ti aspettiamo in Puglia."
    };

    EmailMessage {
        to: booking.guest_email.clone(),
        subject,
        html: format!(
            "<p>{greeting}</p><p>{intro}</p><table>{rows}</table><p>{closing}</p><p>{}</p>",
            escape_html(site_name)
        ),
    }
}

pub fn owner_booking_email(
    booking: &booking_entity::Model,
    room_name: &str,
    recipient: &str,
) -> EmailMessage {
    EmailMessage {
        to: recipient.to_string(),
        subject: format!(
            "Nuova prenotazione: {} {} - {}",
            room_name,
            format_date(booking.check_in),
            format_date(booking.check_out)
        ),
        html: format!(
            "<p>Nuova prenotazione confermata.</p><ul>\
             <li>Ospite: {} ({})</li><li>Telefono: {}</li><li>Camera: {}</li>\
             <li>Date: {} - {} ({} notti)</li><li>Ospiti: {}</li><li>Totale: &euro; {:.2}</li>\
             <li>Coupon: {}</li><li>Motivo: {}</li><li>Note: {}</li></ul>",
            escape_html(&booking.guest_name),
            escape_html(&booking.guest_email),
            escape_html(booking.guest_phone.as_deref().unwrap_or("-")),
            escape_html(room_name),
            format_date(booking.check_in),
            format_date(booking.check_out),
            booking.nights(),
            booking.num_guests,
            booking.total_price,
            escape_html(booking.coupon_code.as_deref().unwrap_or("-")),
            escape_html(booking.stay_reason.as_deref().unwrap_or("-")),
            escape_html(booking.notes.as_deref().unwrap_or("-")),
        ),
    }
}

pub fn owner_contact_email(message: &contact_message_entity::Model, recipient: &str) -> EmailMessage {
    EmailMessage {
        to: recipient.to_string(),
        subject: format!("Nuovo messaggio da {}", message.name),
        html: format!(
            "<p><strong>{}</strong> ({}) ha scritto:</p><p>{}</p>",
            escape_html(&message.name),
            escape_html(&message.email),
            escape_html(&message.message).replace('\n', "<br>")
        ),
    }
}

impl NotificationService {
    pub fn new(
        pool: DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        site_name: String,
        admin_recipient: Option<String>,
    ) -> Self {
        Self {
            pool,
            mailer,
            site_name,
            admin_recipient,
        }
    }

    async fn deliver(&self, message: EmailMessage) -> bool {
        match self.mailer.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to send '{}' to {}: {e}", message.subject, message.to);
                false
            }
        }
    }

    /// Sends the guest confirmation and the owner notice.
    /// Returns whether the guest email went out.
    pub async fn booking_confirmed(&self, booking: &booking_entity::Model) -> bool {
        let room_name = match room_entity::Entity::find_by_id(booking.room_id.clone())
            .one(&self.pool)
            .await
        {
            Ok(Some(room)) if booking.language == "en" => room.name_en,
            Ok(Some(room)) => room.name_it,
            _ => booking.room_id.clone(),
        };
        let settings = match load_settings(&self.pool).await {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings for confirmation email: {e}");
                default_settings()
            }
        };

        let sent = self
            .deliver(guest_confirmation_email(
                booking,
                &room_name,
                &settings,
                &self.site_name,
            ))
            .await;
        if let Some(recipient) = &self.admin_recipient {
            self.deliver(owner_booking_email(booking, &room_name, recipient))
                .await;
        }
        sent
    }

    pub async fn contact_received(&self, message: &contact_message_entity::Model) {
        if let Some(recipient) = &self.admin_recipient {
            self.deliver(owner_contact_email(message, recipient)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{RecordingMailer, booking};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn settings() -> settings_entity::Model {
        settings_entity::Model {
            id: settings_entity::SETTINGS_ID.to_string(),
            min_nights: 1,
            check_in_time: "13:00".to_string(),
            check_out_time: "10:30".to_string(),
            contact_email: None,
            contact_phone: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_guest_email_language() {
        let mut b = booking("nonna", "2026-05-31", "2026-06-02");
        b.total_price = dec!(200);

        let it = guest_confirmation_email(&b, "Stanza della Nonna", &settings(), "Desideri di Puglia");
        assert_eq!(it.to, "ospite@example.it");
        assert!(it.subject.starts_with("Prenotazione confermata"));
        assert!(it.html.contains("31/05/2026"));
        assert!(it.html.contains("&euro; 200.00"));

        b.language = "en".to_string();
        let en = guest_confirmation_email(&b, "Grandmother's Room", &settings(), "Desideri di Puglia");
        assert!(en.subject.starts_with("Booking confirmed"));
        assert!(en.html.contains("Grandmother's Room"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let message = contact_message_entity::Model {
            id: uuid::Uuid::new_v4(),
            name: "<script>".to_string(),
            email: "a@b.it".to_string(),
            message: "ciao\n<b>".to_string(),
            language: "it".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        let email = owner_contact_email(&message, "owner@example.it");
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("ciao<br>&lt;b&gt;"));
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let service = NotificationService::new(
            db,
            mailer,
            "Desideri di Puglia".to_string(),
            Some("owner@example.it".to_string()),
        );
        let sent = service
            .booking_confirmed(&booking("nonna", "2026-07-01", "2026-07-03"))
            .await;
        assert!(!sent);
    }
}
