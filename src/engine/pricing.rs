use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;
use crate::geo;
use crate::models::shipment::{GeoPoint, PackageInfo, ShipmentTier};

const HEAVY_THRESHOLD_KG: f64 = 10.0;
const HEAVY_MULTIPLIER: f64 = 1.5;
const EXPRESS_MULTIPLIER: f64 = 1.8;
const FRAGILE_MULTIPLIER: f64 = 1.3;
const INSURANCE_RATE: f64 = 0.02;

/// Pricing knobs. The rate, currency, and rounding precision come from
/// configuration; the surcharge multipliers are the published defaults
/// any real deployment would confirm against its billing backend.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub rate_per_km: f64,
    pub heavy_threshold_kg: f64,
    pub heavy_multiplier: f64,
    pub express_multiplier: f64,
    pub fragile_multiplier: f64,
    pub insurance_rate: f64,
    pub currency: String,
    pub currency_precision: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rate_per_km: 15.0,
            heavy_threshold_kg: HEAVY_THRESHOLD_KG,
            heavy_multiplier: HEAVY_MULTIPLIER,
            express_multiplier: EXPRESS_MULTIPLIER,
            fragile_multiplier: FRAGILE_MULTIPLIER,
            insurance_rate: INSURANCE_RATE,
            currency: "INR".to_string(),
            currency_precision: 0,
        }
    }
}

impl PricingConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rate_per_km: config.rate_per_km,
            currency: config.currency.clone(),
            currency_precision: config.currency_precision,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub amount: f64,
    pub currency: String,
}

pub fn validate_package(package: &PackageInfo) -> Result<(), AppError> {
    if !package.weight_kg.is_finite() || package.weight_kg < 0.0 {
        return Err(AppError::InvalidPackage(format!(
            "weight_kg must be >= 0, got {}",
            package.weight_kg
        )));
    }
    if !package.declared_value.is_finite() || package.declared_value < 0.0 {
        return Err(AppError::InvalidPackage(format!(
            "declared_value must be >= 0, got {}",
            package.declared_value
        )));
    }
    Ok(())
}

/// Distance-based quote, frozen on the shipment at creation. Recomputed
/// only through the explicit re-quote operation.
pub fn estimate(
    pricing: &PricingConfig,
    pickup: &GeoPoint,
    delivery: &GeoPoint,
    package: &PackageInfo,
) -> Result<Quote, AppError> {
    validate_package(package)?;

    let distance_km = geo::distance_km(pickup, delivery)?;
    let mut amount = distance_km * pricing.rate_per_km;

    if package.weight_kg > pricing.heavy_threshold_kg {
        amount *= pricing.heavy_multiplier;
    }

    amount *= match package.tier {
        ShipmentTier::Express => pricing.express_multiplier,
        ShipmentTier::Fragile => pricing.fragile_multiplier,
        ShipmentTier::Regular => 1.0,
    };

    amount += package.declared_value * pricing.insurance_rate;

    Ok(Quote {
        amount: round_to_precision(amount, pricing.currency_precision),
        currency: pricing.currency.clone(),
    })
}

fn round_to_precision(amount: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (amount * factor).round() / factor
}
