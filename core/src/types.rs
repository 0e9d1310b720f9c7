//! Domain DTOs for the rentals API.
//!
//! # Design
//! Field names are camelCase because these types are decoded after the
//! inbound key conversion and encoded before the outbound one. Enum values
//! are data, not keys, so they keep the backend's spelling.

use serde::{Deserialize, Serialize};

use crate::routes::query_pairs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Landlord,
    Tenant,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Free,
    Basic,
    Premium,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandlordProfile {
    pub verification_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    pub kyc_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan_type: PlanType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// An account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord_profile: Option<LandlordProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_profile: Option<TenantProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Body for exchanging a Google identity token for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLogin {
    pub id_token: String,
}

/// Partial profile update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord_profile: Option<LandlordProfileUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_profile: Option<TenantProfileUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandlordProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bhk {
    #[serde(rename = "1RK")]
    OneRk,
    #[serde(rename = "1BHK")]
    One,
    #[serde(rename = "2BHK")]
    Two,
    #[serde(rename = "3BHK")]
    Three,
    #[serde(rename = "4BHK+")]
    FourPlus,
}

impl Bhk {
    pub fn as_str(self) -> &'static str {
        match self {
            Bhk::OneRk => "1RK",
            Bhk::One => "1BHK",
            Bhk::Two => "2BHK",
            Bhk::Three => "3BHK",
            Bhk::FourPlus => "4BHK+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Studio,
    Penthouse,
    Commercial,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnishingStatus {
    FullyFurnished,
    SemiFurnished,
    Unfurnished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Vacant,
    Occupied,
    Maintenance,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Vacant => "vacant",
            PropertyStatus::Occupied => "occupied",
            PropertyStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub society_name: Option<String>,
    pub street: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpecs {
    pub bhk: Bhk,
    pub property_type: PropertyType,
    pub bathrooms: u32,
    pub balconies: u32,
    pub furnishing_status: FurnishingStatus,
    pub size_sq_ft: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_floors: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_age_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMedia {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDetails {
    pub amount: f64,
    pub frequency: MaintenanceFrequency,
    pub included_in_rent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A rental listing owned by a landlord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub address: PropertyAddress,
    pub specs: PropertySpecs,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub media: Vec<PropertyMedia>,
    pub expected_rent: f64,
    pub expected_deposit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_details: Option<MaintenanceDetails>,
    pub status: PropertyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_agreement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesResponse {
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyResponse {
    pub property: Property,
}

/// Optional filters for listing properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilters {
    pub status: Option<PropertyStatus>,
    pub city: Option<String>,
    pub bhk: Option<Bhk>,
}

impl PropertyFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        query_pairs([
            ("status", self.status.map(|status| status.as_str().to_string())),
            ("city", self.city.clone()),
            ("bhk", self.bhk.map(|bhk| bhk.as_str().to_string())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::case::{to_camel, to_snake, Tree};

    fn wire_property() -> serde_json::Value {
        json!({
            "_id": "p1",
            "owner": "u1",
            "title": "Sunny 2BHK",
            "address": {"street": "MG Road", "city": "Pune", "state": "MH", "pincode": "411001", "map_link": "https://maps/x"},
            "specs": {
                "bhk": "2BHK",
                "property_type": "apartment",
                "bathrooms": 2,
                "balconies": 1,
                "furnishing_status": "semi_furnished",
                "size_sq_ft": 950
            },
            "amenities": ["lift"],
            "media": [{"url": "https://cdn/x.jpg", "type": "image", "uploaded_at": "2024-01-01"}],
            "expected_rent": 25000,
            "expected_deposit": 100000,
            "maintenance_details": {"amount": 1500, "frequency": "monthly", "included_in_rent": false},
            "status": "vacant",
            "created_at": "2024-01-01"
        })
    }

    #[test]
    fn property_decodes_after_camel_conversion() {
        let data = to_camel(&Tree::from(wire_property())).into_value();
        let property: Property = serde_json::from_value(data).unwrap();
        assert_eq!(property.id, "p1");
        assert_eq!(property.address.map_link.as_deref(), Some("https://maps/x"));
        assert_eq!(property.specs.bhk, Bhk::Two);
        assert_eq!(property.specs.furnishing_status, FurnishingStatus::SemiFurnished);
        assert_eq!(property.specs.size_sq_ft, 950.0);
        assert_eq!(property.media[0].kind, MediaType::Image);
        assert_eq!(property.status, PropertyStatus::Vacant);
        assert!(!property.maintenance_details.unwrap().included_in_rent);
    }

    #[test]
    fn user_encodes_to_wire_keys() {
        let user = User {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            roles: vec![Role::Landlord],
            image: None,
            landlord_profile: Some(LandlordProfile {
                verification_status: VerificationStatus::Pending,
                upi_id: Some("asha@upi".to_string()),
                pan_number: None,
                bank_details: None,
            }),
            tenant_profile: None,
            subscription: None,
            created_at: None,
            updated_at: None,
        };
        let wire = to_snake(&Tree::from_serialize(&user).unwrap()).into_value();
        assert_eq!(
            wire,
            json!({
                "_id": "u1",
                "name": "Asha",
                "email": "asha@example.com",
                "roles": ["landlord"],
                "landlord_profile": {"verification_status": "pending", "upi_id": "asha@upi"}
            })
        );
    }

    #[test]
    fn profile_update_sends_only_present_fields() {
        let update = ProfileUpdate {
            landlord_profile: Some(LandlordProfileUpdate {
                upi_id: Some("asha@upi".to_string()),
                ..LandlordProfileUpdate::default()
            }),
            ..ProfileUpdate::default()
        };
        let wire = to_snake(&Tree::from_serialize(&update).unwrap()).into_value();
        assert_eq!(wire, json!({"landlord_profile": {"upi_id": "asha@upi"}}));

        let google = GoogleLogin {
            id_token: "tok".to_string(),
        };
        let wire = to_snake(&Tree::from_serialize(&google).unwrap()).into_value();
        assert_eq!(wire, json!({"id_token": "tok"}));
    }

    #[test]
    fn filters_build_query() {
        let filters = PropertyFilters {
            status: Some(PropertyStatus::Occupied),
            city: None,
            bhk: Some(Bhk::FourPlus),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("status".to_string(), "occupied".to_string()),
                ("bhk".to_string(), "4BHK+".to_string())
            ]
        );
        assert!(PropertyFilters::default().to_query().is_empty());
    }
}
