use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eleven applicant fields accepted by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    GenderMale,
    GenderFemale,
    AgeLog,
    DrivingLicense,
    RegionCodeEncoding,
    PreviouslyInsured,
    VehicleAgeEncoding,
    VehicleDamageEncoding,
    AnnualPremium,
    PolicySalesChannelEncoding,
    Vintage,
}

impl Field {
    /// Schema order. The form is rendered and serialized in this order.
    pub const ALL: [Field; 11] = [
        Field::GenderMale,
        Field::GenderFemale,
        Field::AgeLog,
        Field::DrivingLicense,
        Field::RegionCodeEncoding,
        Field::PreviouslyInsured,
        Field::VehicleAgeEncoding,
        Field::VehicleDamageEncoding,
        Field::AnnualPremium,
        Field::PolicySalesChannelEncoding,
        Field::Vintage,
    ];

    /// Key used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Field::GenderMale => "Gender_Male",
            Field::GenderFemale => "Gender_Female",
            Field::AgeLog => "Age_log",
            Field::DrivingLicense => "Driving_License",
            Field::RegionCodeEncoding => "Region_Code_Encoding",
            Field::PreviouslyInsured => "Previously_Insured",
            Field::VehicleAgeEncoding => "Vehicle_Age_Encoding",
            Field::VehicleDamageEncoding => "Vehicle_Damage_Encoding",
            Field::AnnualPremium => "Annual_Premium",
            Field::PolicySalesChannelEncoding => "Policy_Sales_Channel_Encoding",
            Field::Vintage => "Vintage",
        }
    }

    /// Form label: the wire key with its first underscore turned into a space.
    pub fn label(self) -> String {
        self.name().replacen('_', " ", 1)
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applicant record submitted verbatim to `/predict`.
///
/// Values stay raw strings: nothing here parses or range-checks them, the
/// prediction service owns that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "Gender_Male")]
    pub gender_male: String,
    #[serde(rename = "Gender_Female")]
    pub gender_female: String,
    #[serde(rename = "Age_log")]
    pub age_log: String,
    #[serde(rename = "Driving_License")]
    pub driving_license: String,
    #[serde(rename = "Region_Code_Encoding")]
    pub region_code_encoding: String,
    #[serde(rename = "Previously_Insured")]
    pub previously_insured: String,
    #[serde(rename = "Vehicle_Age_Encoding")]
    pub vehicle_age_encoding: String,
    #[serde(rename = "Vehicle_Damage_Encoding")]
    pub vehicle_damage_encoding: String,
    #[serde(rename = "Annual_Premium")]
    pub annual_premium: String,
    #[serde(rename = "Policy_Sales_Channel_Encoding")]
    pub policy_sales_channel_encoding: String,
    #[serde(rename = "Vintage")]
    pub vintage: String,
}

/// Defaults for a profile a compatible model tends to score positive:
/// never insured before, damaged vehicle, one to two years old.
impl Default for FormInput {
    fn default() -> Self {
        Self {
            gender_male: "1".to_string(),
            gender_female: "0".to_string(),
            age_log: "3.9".to_string(),
            driving_license: "1".to_string(),
            region_code_encoding: "28".to_string(),
            previously_insured: "0".to_string(),
            vehicle_age_encoding: "1".to_string(),
            vehicle_damage_encoding: "1".to_string(),
            annual_premium: "40000".to_string(),
            policy_sales_channel_encoding: "152".to_string(),
            vintage: "30".to_string(),
        }
    }
}

impl FormInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::GenderMale => &self.gender_male,
            Field::GenderFemale => &self.gender_female,
            Field::AgeLog => &self.age_log,
            Field::DrivingLicense => &self.driving_license,
            Field::RegionCodeEncoding => &self.region_code_encoding,
            Field::PreviouslyInsured => &self.previously_insured,
            Field::VehicleAgeEncoding => &self.vehicle_age_encoding,
            Field::VehicleDamageEncoding => &self.vehicle_damage_encoding,
            Field::AnnualPremium => &self.annual_premium,
            Field::PolicySalesChannelEncoding => &self.policy_sales_channel_encoding,
            Field::Vintage => &self.vintage,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::GenderMale => &mut self.gender_male,
            Field::GenderFemale => &mut self.gender_female,
            Field::AgeLog => &mut self.age_log,
            Field::DrivingLicense => &mut self.driving_license,
            Field::RegionCodeEncoding => &mut self.region_code_encoding,
            Field::PreviouslyInsured => &mut self.previously_insured,
            Field::VehicleAgeEncoding => &mut self.vehicle_age_encoding,
            Field::VehicleDamageEncoding => &mut self.vehicle_damage_encoding,
            Field::AnnualPremium => &mut self.annual_premium,
            Field::PolicySalesChannelEncoding => &mut self.policy_sales_channel_encoding,
            Field::Vintage => &mut self.vintage,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Fields that would block a submission, in schema order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|field| !self.get(*field).is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}
