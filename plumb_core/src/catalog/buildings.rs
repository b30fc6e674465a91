//! Building Classes (I9-2022 demand coefficients)
//!
//! Each class selects a demand method and carries its coefficients as data:
//!
//! | class | method | a | b | v_min | E_min | k |
//! |---|---|---|---|---|---|---|
//! | Residential | B | 0.45 | 0.20 | 0.20 | 1.0 | 0.5 |
//! | Administrative | C | 0.55 | 0.25 | 0.30 | 1.5 | 0.5 |
//! | Hotel, en-suite | C | 0.60 | 0.27 | 0.36 | 1.8 | 0.7 |
//! | Education | C | 0.60 | 0.27 | 0.36 | 1.8 | 0.7 |
//! | Healthcare / catering | C | 0.67 | 0.30 | 0.44 | 2.2 | 0.7 |
//! | Hotel, shared facilities | C | 0.85 | 0.38 | 0.72 | 3.6 | 0.7 |
//! | Dormitory / public baths | C | 1.00 | 0.45 | 1.00 | 5.0 | 1.0 |
//! | Industrial changing rooms | C | 2.00 | 0.90 | 4.00 | 20.0 | 1.0 |
//!
//! The canalization frequency factor `k` follows the EN 12056-2 usage bands
//! (irregular 0.5, regular 0.7, frequent 1.0). It does not enter supply sizing.

use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::demand::DemandFormula;
use crate::errors::{CalcError, CalcResult};

/// Demand method tag of a building class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandMethod {
    /// Flow-sum method (residential)
    MethodB,
    /// Load-unit method (non-residential)
    MethodC,
}

impl DemandMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            DemandMethod::MethodB => "Method B",
            DemandMethod::MethodC => "Method C",
        }
    }
}

/// Building class catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum BuildingClass {
    #[default]
    Residential,
    Administrative,
    HotelEnSuite,
    Education,
    HealthcareCatering,
    HotelSharedFacilities,
    DormitoryPublicBaths,
    IndustrialChangingRooms,
}

impl BuildingClass {
    pub const ALL: [BuildingClass; 8] = [
        BuildingClass::Residential,
        BuildingClass::Administrative,
        BuildingClass::HotelEnSuite,
        BuildingClass::Education,
        BuildingClass::HealthcareCatering,
        BuildingClass::HotelSharedFacilities,
        BuildingClass::DormitoryPublicBaths,
        BuildingClass::IndustrialChangingRooms,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BuildingClass::Residential => "residential",
            BuildingClass::Administrative => "administrative",
            BuildingClass::HotelEnSuite => "hotel_en_suite",
            BuildingClass::Education => "education",
            BuildingClass::HealthcareCatering => "healthcare_catering",
            BuildingClass::HotelSharedFacilities => "hotel_shared_facilities",
            BuildingClass::DormitoryPublicBaths => "dormitory_public_baths",
            BuildingClass::IndustrialChangingRooms => "industrial_changing_rooms",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BuildingClass::Residential => "Residential buildings",
            BuildingClass::Administrative => "Administrative buildings",
            BuildingClass::HotelEnSuite => "Hotels with en-suite bathrooms",
            BuildingClass::Education => "Educational institutions",
            BuildingClass::HealthcareCatering => "Hospitals, canteens, restaurants",
            BuildingClass::HotelSharedFacilities => "Hotels with shared bathrooms",
            BuildingClass::DormitoryPublicBaths => "Dormitories, boarding schools, public baths",
            BuildingClass::IndustrialChangingRooms => "Workshop / production changing rooms",
        }
    }

    pub fn local_name(&self) -> &'static str {
        match self {
            BuildingClass::Residential => "Clădiri de locuit",
            BuildingClass::Administrative => "Clădiri administrative",
            BuildingClass::HotelEnSuite => "Hoteluri cu grup sanitar în cameră",
            BuildingClass::Education => "Instituții învățământ",
            BuildingClass::HealthcareCatering => "Spitale, cantine, restaurante",
            BuildingClass::HotelSharedFacilities => "Hoteluri cu grup sanitar comun",
            BuildingClass::DormitoryPublicBaths => "Cămine, internate, băi publice",
            BuildingClass::IndustrialChangingRooms => "Vestiare ateliere/producție",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key = normalize_key(s);
        BuildingClass::ALL
            .iter()
            .copied()
            .find(|b| {
                normalize_key(b.code()) == key
                    || normalize_key(b.display_name()) == key
                    || normalize_key(b.local_name()) == key
            })
            .ok_or_else(|| CalcError::building_class_not_found(s))
    }

    pub fn method(&self) -> DemandMethod {
        match self {
            BuildingClass::Residential => DemandMethod::MethodB,
            _ => DemandMethod::MethodC,
        }
    }

    /// (a, b, v_min, E_min)
    fn coefficients(&self) -> (f64, f64, f64, f64) {
        match self {
            BuildingClass::Residential => (0.45, 0.20, 0.20, 1.0),
            BuildingClass::Administrative => (0.55, 0.25, 0.30, 1.5),
            BuildingClass::HotelEnSuite | BuildingClass::Education => (0.60, 0.27, 0.36, 1.8),
            BuildingClass::HealthcareCatering => (0.67, 0.30, 0.44, 2.2),
            BuildingClass::HotelSharedFacilities => (0.85, 0.38, 0.72, 3.6),
            BuildingClass::DormitoryPublicBaths => (1.00, 0.45, 1.00, 5.0),
            BuildingClass::IndustrialChangingRooms => (2.00, 0.90, 4.00, 20.0),
        }
    }

    /// Cold-water square-root coefficient `a`
    pub fn coefficient_a(&self) -> f64 {
        self.coefficients().0
    }

    /// Hot-water square-root coefficient `b`
    pub fn coefficient_b(&self) -> f64 {
        self.coefficients().1
    }

    /// Method B threshold on Σq (L/s)
    pub fn v_min(&self) -> f64 {
        self.coefficients().2
    }

    /// Method C threshold on ΣE (load units)
    pub fn e_min(&self) -> f64 {
        self.coefficients().3
    }

    /// Canalization frequency factor k
    pub fn canalization_k(&self) -> f64 {
        match self {
            BuildingClass::Residential | BuildingClass::Administrative => 0.5,
            BuildingClass::HotelEnSuite
            | BuildingClass::Education
            | BuildingClass::HealthcareCatering
            | BuildingClass::HotelSharedFacilities => 0.7,
            BuildingClass::DormitoryPublicBaths | BuildingClass::IndustrialChangingRooms => 1.0,
        }
    }

    /// Normative velocity ceiling for distribution pipes (m/s)
    pub fn normative_velocity_limit(&self) -> f64 {
        match self {
            BuildingClass::Residential => 2.0,
            _ => 3.0,
        }
    }

    /// The demand formula this class's coefficients define
    pub fn demand_formula(&self) -> DemandFormula {
        match self.method() {
            DemandMethod::MethodB => DemandFormula::MethodB {
                a: self.coefficient_a(),
                v_min: self.v_min(),
            },
            DemandMethod::MethodC => DemandFormula::MethodC {
                a: self.coefficient_a(),
                b: self.coefficient_b(),
                e_min: self.e_min(),
            },
        }
    }
}

impl std::fmt::Display for BuildingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residential_is_method_b() {
        let class = BuildingClass::Residential;
        assert_eq!(class.method(), DemandMethod::MethodB);
        assert_eq!(
            class.demand_formula(),
            DemandFormula::MethodB { a: 0.45, v_min: 0.20 }
        );
    }

    #[test]
    fn test_other_classes_are_method_c() {
        for class in BuildingClass::ALL.iter().skip(1) {
            assert_eq!(class.method(), DemandMethod::MethodC);
            assert!(matches!(class.demand_formula(), DemandFormula::MethodC { .. }));
        }
    }

    #[test]
    fn test_coefficients() {
        let hospital = BuildingClass::HealthcareCatering;
        assert_eq!(hospital.coefficient_a(), 0.67);
        assert_eq!(hospital.coefficient_b(), 0.30);
        assert_eq!(hospital.e_min(), 2.2);
        assert_eq!(BuildingClass::IndustrialChangingRooms.v_min(), 4.0);
    }

    #[test]
    fn test_velocity_limits() {
        assert_eq!(BuildingClass::Residential.normative_velocity_limit(), 2.0);
        assert_eq!(BuildingClass::Education.normative_velocity_limit(), 3.0);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(BuildingClass::from_str_flexible("residential").unwrap(), BuildingClass::Residential);
        assert_eq!(
            BuildingClass::from_str_flexible("Clădiri administrative").unwrap(),
            BuildingClass::Administrative
        );
        let err = BuildingClass::from_str_flexible("Stadium").unwrap_err();
        assert_eq!(err.error_code(), "BUILDING_CLASS_NOT_FOUND");
    }
}
