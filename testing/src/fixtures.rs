//! Ready-made domain values for tests.
//!
//! Fixtures use fixed identifiers so a test can install an offering in a
//! catalog and select it by calling the same fixture twice.

use studio_booking_core::types::{
    ContactInfo, Formation, FormationId, FormationLevel, Money, Service, ServiceId,
};
use uuid::Uuid;

/// A bridal make-up session: 250.00 €, two hours
#[must_use]
pub fn service() -> Service {
    Service {
        id: ServiceId::from_uuid(Uuid::from_u128(0x0001)),
        name: "Maquillage mariée".to_string(),
        description: "Mise en beauté complète, essai inclus".to_string(),
        price: Money::from_cents(25_000),
        duration_minutes: 120,
        is_active: true,
    }
}

/// A second service, distinct from [`service`]
#[must_use]
pub fn evening_service() -> Service {
    Service {
        id: ServiceId::from_uuid(Uuid::from_u128(0x0002)),
        name: "Maquillage soirée".to_string(),
        description: "Mise en beauté pour un événement".to_string(),
        price: Money::from_cents(8_000),
        duration_minutes: 60,
        is_active: true,
    }
}

/// A beginner self-make-up course: 450.00 €, three hours, six seats
#[must_use]
pub fn formation() -> Formation {
    Formation {
        id: FormationId::from_uuid(Uuid::from_u128(0x0101)),
        title: "Auto-maquillage".to_string(),
        description: "Les techniques de base pour se maquiller seule".to_string(),
        price: Money::from_cents(45_000),
        duration_hours: 3,
        level: FormationLevel::Beginner,
        max_students: 6,
        is_active: true,
    }
}

/// Complete, valid contact details
#[must_use]
pub fn contact() -> ContactInfo {
    ContactInfo {
        first_name: "Marie".to_string(),
        last_name: "Dupont".to_string(),
        email: "marie@example.com".to_string(),
        phone: "0612345678".to_string(),
        message: None,
    }
}
