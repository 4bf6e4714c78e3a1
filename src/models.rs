//! Data models for the hospital desk.

use std::fmt;

/// A patient booked through the appointment desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    /// The patient's unique ID (0 until stored).
    pub id: i64,
    /// The patient's first name.
    pub first_name: String,
    /// The patient's last name.
    pub last_name: String,
    /// The patient's age in years.
    pub age: i64,
    /// The specialization of the doctor the patient is booked with.
    pub doctor: String,
    /// The appointment date, stored as `YYYY-MM-DD`.
    pub appointment_date: String,
}

/// A doctor on the hospital roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    /// The doctor's unique ID.
    pub id: i64,
    /// The doctor's name.
    pub name: String,
    /// Years of experience.
    pub experience: i64,
    /// The doctor's speciality.
    pub speciality: String,
}

/// A medicine held in the pharmacy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medicine {
    /// The medicine's unique ID.
    pub id: i64,
    /// The medicine's name, unique across the pharmacy.
    pub name: String,
    /// Price in whole currency units.
    pub price: i64,
    /// Stock counter.
    pub count: i64,
}

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Available,
    Occupied,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Occupied => "Occupied",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// The room's unique ID.
    pub id: i64,
    /// The number shown on the door.
    pub number: i64,
    /// The room type label, e.g. "Special".
    pub room_type: String,
    /// Current occupancy.
    pub status: RoomStatus,
}

/// Links an admitted patient to the room they occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub id: i64,
    pub patient_id: i64,
    pub room_id: i64,
}

/// How a payment was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    Cash,
    Upi,
    NetBanking,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::NetBanking => "Net Banking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A settled payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// How the payment was made.
    pub method: PaymentMethod,
    /// Free-text details, e.g. "Card ending with 4242".
    pub details: String,
    /// Amount in whole currency units.
    pub amount: i64,
}

/// A non-doctor staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    /// The staff member's unique ID.
    pub id: i64,
    /// The staff member's name.
    pub name: String,
    /// Free-text role, e.g. "Nurse".
    pub role: String,
    /// Ten-digit contact number.
    pub contact: String,
}
