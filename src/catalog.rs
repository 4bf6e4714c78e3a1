//! Fixed menu catalogs mapping numbered choices to domain labels.

use crate::models::PaymentMethod;

/// Problem types offered when fixing an appointment, in menu order.
pub const PROBLEM_TYPES: [&str; 8] = [
    "Dental",
    "Gynecological",
    "Scanning",
    "Heart",
    "Bones",
    "Skin",
    "Psychological",
    "Neurological",
];

/// Room types offered when booking a room, in menu order.
pub const ROOM_TYPES: [&str; 5] = ["General", "Semi Special", "Special", "Deluxe", "Super Deluxe"];

/// Payment methods offered at checkout, in menu order.
pub const PAYMENT_METHODS: [PaymentMethod; 4] = [
    PaymentMethod::Card,
    PaymentMethod::Cash,
    PaymentMethod::Upi,
    PaymentMethod::NetBanking,
];

/// Specialization used when a problem type is not recognised.
pub const FALLBACK_SPECIALIZATION: &str = "General Physician";

/// Maps a 1-based problem type choice to the doctor specialization handling it.
pub fn specialization_for(problem_type: i64) -> &'static str {
    match problem_type {
        1 => "Dentist",
        2 => "Gynecologist",
        3 => "Radiologist",
        4 => "Cardiologist",
        5 => "Orthopedic",
        6 => "Dermatologist",
        7 => "Psychologist",
        8 => "Neurologist",
        _ => FALLBACK_SPECIALIZATION,
    }
}

/// Maps a 1-based room choice to its room type label. Unknown choices fall back to "General".
pub fn room_type_for(choice: i64) -> &'static str {
    usize::try_from(choice)
        .ok()
        .and_then(|c| c.checked_sub(1))
        .and_then(|i| ROOM_TYPES.get(i))
        .copied()
        .unwrap_or(ROOM_TYPES[0])
}

/// Maps a 1-based payment choice to a method. Unknown choices fall back to cash.
pub fn payment_method_for(choice: i64) -> PaymentMethod {
    usize::try_from(choice)
        .ok()
        .and_then(|c| c.checked_sub(1))
        .and_then(|i| PAYMENT_METHODS.get(i))
        .copied()
        .unwrap_or(PaymentMethod::Cash)
}
