//! Broker contact shown on the listing detail page.

use crate::models::PropertyView;

/// Contact details derived from a listing's broker fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerContact {
    /// Phone formatted for display, `None` when the listing has no phone
    pub phone_display: Option<String>,
    /// WhatsApp chat link prefilled with a message about the listing
    pub whatsapp_link: Option<String>,
    /// Broker email, as stored
    pub email: Option<String>,
}

impl BrokerContact {
    /// Derives the contact block from the listing's broker fields.
    #[must_use]
    pub fn for_property(property: &PropertyView) -> Self {
        let phone = property.broker_phone.as_deref();
        Self {
            phone_display: phone.map(format_phone),
            whatsapp_link: phone.and_then(|p| whatsapp_link(p, &property.title)),
            email: property.broker_email.clone(),
        }
    }
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Formats an 11-digit Brazilian mobile number (area code included) as
/// `(XX) XXXXX-XXXX`. Anything else is returned unchanged.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    let digits = digits(phone);
    if digits.len() == 11 {
        format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..])
    } else {
        phone.to_string()
    }
}

/// `wa.me` link for the number with country code 55, or `None` if the
/// phone holds no digits.
#[must_use]
pub fn whatsapp_link(phone: &str, title: &str) -> Option<String> {
    let digits = digits(phone);
    if digits.is_empty() {
        return None;
    }
    let text = format!(
        "Olá! Vi seu anúncio do imóvel \"{title}\" e gostaria de mais informações."
    );
    Some(format!(
        "https://wa.me/55{digits}?text={}",
        urlencoding::encode(&text)
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::{PropertyFeatures, PropertyType};

    #[test]
    fn test_format_phone_eleven_digits() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("+11 98765 4321"), "(11) 98765-4321");
    }

    #[test]
    fn test_format_phone_other_lengths_unchanged() {
        assert_eq!(format_phone("3322-1100"), "3322-1100");
        assert_eq!(format_phone("5511987654321"), "5511987654321");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn test_whatsapp_link_uses_digits_and_title() {
        let link = whatsapp_link("(61) 99999-0000", "Casa no Lago").unwrap();
        let (base, query) = link.split_once("?text=").unwrap();
        assert_eq!(base, "https://wa.me/5561999990000");
        assert!(!query.contains(' '));
        assert_eq!(
            urlencoding::decode(query).unwrap(),
            "Olá! Vi seu anúncio do imóvel \"Casa no Lago\" e gostaria de mais informações."
        );

        assert!(whatsapp_link("sem telefone", "Casa").is_none());
    }

    #[test]
    fn test_contact_for_property() {
        let now = chrono::Utc::now();
        let mut property = PropertyView {
            id: "p1".to_string(),
            owner_id: "owner".to_string(),
            title: "Sobrado".to_string(),
            description: String::new(),
            price: 1.0,
            location: "Lago Norte".to_string(),
            property_type: PropertyType::Sale,
            bedrooms: 3,
            bathrooms: 2,
            area: 200.0,
            images: Vec::new(),
            features: PropertyFeatures::default(),
            is_featured: false,
            broker_phone: Some("61912345678".to_string()),
            broker_email: Some("corretor@example.com".to_string()),
            created_at: now,
            updated_at: now,
        };

        let contact = BrokerContact::for_property(&property);
        assert_eq!(contact.phone_display.as_deref(), Some("(61) 91234-5678"));
        assert!(
            contact
                .whatsapp_link
                .unwrap()
                .starts_with("https://wa.me/5561912345678?text=")
        );
        assert_eq!(contact.email.as_deref(), Some("corretor@example.com"));

        property.broker_phone = None;
        property.broker_email = None;
        assert_eq!(BrokerContact::for_property(&property), BrokerContact::default());
    }
}
