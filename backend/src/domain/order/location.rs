//! Pickup and drop-off locations: geographic coordinates plus postal address.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Why a coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateValidationError {
    LatitudeOutOfRange,
    LongitudeOutOfRange,
}

impl fmt::Display for CoordinateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange => write!(f, "latitude must be between -90 and 90"),
            Self::LongitudeOutOfRange => write!(f, "longitude must be between -180 and 180"),
        }
    }
}

impl std::error::Error for CoordinateValidationError {}

/// WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    #[schema(example = 19.4326)]
    pub latitude: f64,
    #[schema(example = -99.1332)]
    pub longitude: f64,
}

impl Coordinates {
    /// Build a point without checking ranges.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check latitude, then longitude, against their valid ranges.
    ///
    /// `NaN` is never in range.
    pub fn validate(&self) -> Result<(), CoordinateValidationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoordinateValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoordinateValidationError::LongitudeOutOfRange);
        }
        Ok(())
    }
}

/// Why an address was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressValidationError {
    MissingStreetDetails,
    MissingRegion,
}

impl fmt::Display for AddressValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStreetDetails => {
                write!(f, "street, zip code and exterior number are required")
            }
            Self::MissingRegion => write!(f, "city, state and country are required"),
        }
    }
}

impl std::error::Error for AddressValidationError {}

/// Unvalidated address fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    pub street: String,
    pub zip_code: String,
    pub ext_num: String,
    pub int_num: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Postal address with every required field present.
///
/// ## Invariants
/// - All fields are trimmed; required ones are non-empty.
/// - `int_num` is `None` rather than an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    street: String,
    zip_code: String,
    ext_num: String,
    int_num: Option<String>,
    city: String,
    state: String,
    country: String,
}

impl Address {
    /// Validate and normalise raw address fields.
    ///
    /// # Examples
    /// ```
    /// use logistics_api::domain::{Address, AddressParts};
    ///
    /// let address = Address::try_new(AddressParts {
    ///     street: "Av. Reforma".into(),
    ///     zip_code: "06600".into(),
    ///     ext_num: "222".into(),
    ///     int_num: Some(" ".into()),
    ///     city: "Ciudad de México".into(),
    ///     state: "CDMX".into(),
    ///     country: "MX".into(),
    /// })
    /// .expect("valid address");
    /// assert_eq!(address.int_num(), None);
    /// ```
    pub fn try_new(parts: AddressParts) -> Result<Self, AddressValidationError> {
        let trim = |value: String| value.trim().to_owned();
        let street = trim(parts.street);
        let zip_code = trim(parts.zip_code);
        let ext_num = trim(parts.ext_num);
        if street.is_empty() || zip_code.is_empty() || ext_num.is_empty() {
            return Err(AddressValidationError::MissingStreetDetails);
        }
        let city = trim(parts.city);
        let state = trim(parts.state);
        let country = trim(parts.country);
        if city.is_empty() || state.is_empty() || country.is_empty() {
            return Err(AddressValidationError::MissingRegion);
        }
        let int_num = parts.int_num.map(trim).filter(|value| !value.is_empty());
        Ok(Self {
            street,
            zip_code,
            ext_num,
            int_num,
            city,
            state,
            country,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn ext_num(&self) -> &str {
        &self.ext_num
    }

    pub fn int_num(&self) -> Option<&str> {
        self.int_num.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl From<Address> for AddressParts {
    fn from(value: Address) -> Self {
        let Address {
            street,
            zip_code,
            ext_num,
            int_num,
            city,
            state,
            country,
        } = value;
        Self {
            street,
            zip_code,
            ext_num,
            int_num,
            city,
            state,
            country,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.street, self.ext_num)?;
        if let Some(int_num) = &self.int_num {
            write!(f, " Int. {int_num}")?;
        }
        write!(
            f,
            ", {} {}, {}, {}",
            self.zip_code, self.city, self.state, self.country
        )
    }
}
