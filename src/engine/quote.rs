use crate::engine::pricing::{
    item_multiplier, traffic_multiplier, vehicle_profile, weather_multiplier, ACCESS_FEE,
    BASE_FARE, FREE_WEIGHT_LB, MAX_PRICE, MAX_SIZE_FACTOR, MIN_PRICE, MIN_SIZE_FACTOR,
    PER_EXTRA_LB, PER_MILE_RATE, REFERENCE_VOLUME_IN3, SIZE_EXPONENT, SURGE,
};
use crate::error::AppError;
use crate::geo::{geocode, haversine_km};
use crate::models::location::{GeoPoint, Location};
use crate::models::quote::{
    Dimensions, ItemType, QuoteInput, QuoteRequest, QuoteResult, Tier, Traffic, VehicleClass,
    Weather,
};

const KM_TO_MILES: f64 = 0.621371;
/// Straight-line distance understates what a road network actually drives.
const ROAD_INFLATION: f64 = 1.15;

const MIN_EFFECTIVE_SPEED_MPH: f64 = 3.0;
const SPEED_DERATE: f64 = 0.9;
const HANDLING_MINUTES: f64 = 5.0;
const MIN_ETA_MINUTES: u32 = 5;

/// Prices a delivery. Pure and deterministic: identical requests produce
/// bit-identical results.
pub fn estimate(req: &QuoteRequest) -> QuoteResult {
    let miles = round2(haversine_km(&req.pickup, &req.dropoff) * KM_TO_MILES * ROAD_INFLATION);

    let vehicle = vehicle_profile(req.vehicle);
    let base = BASE_FARE + miles * PER_MILE_RATE * vehicle.price_mult;

    let conditions = weather_multiplier(req.weather) * traffic_multiplier(req.traffic);

    let subtotal = base
        * size_factor(&req.dimensions)
        * item_multiplier(req.item_type)
        * conditions
        * SURGE
        + weight_fee(req.weight_lb)
        + ACCESS_FEE
        + vehicle.env_credit;

    let price = round2(subtotal).clamp(MIN_PRICE, MAX_PRICE);

    let effective_speed = (vehicle.speed_mph / conditions) * SPEED_DERATE;
    let minutes = (miles / effective_speed.max(MIN_EFFECTIVE_SPEED_MPH)) * 60.0 + HANDLING_MINUTES;
    let eta_minutes = (minutes.ceil() as u32).max(MIN_ETA_MINUTES);

    QuoteResult {
        price,
        eta_minutes,
        miles,
        tier: tier_for_price(price),
    }
}

pub fn size_factor(dims: &Dimensions) -> f64 {
    let volume = (dims.length_in * dims.width_in * dims.height_in).max(1.0);
    (volume / REFERENCE_VOLUME_IN3)
        .powf(SIZE_EXPONENT)
        .clamp(MIN_SIZE_FACTOR, MAX_SIZE_FACTOR)
}

pub fn weight_fee(weight_lb: f64) -> f64 {
    ((weight_lb.max(0.0) - FREE_WEIGHT_LB) * PER_EXTRA_LB).max(0.0)
}

/// Lower bounds inclusive, upper bounds exclusive.
pub fn tier_for_price(price: f64) -> Tier {
    if price < 12.0 {
        Tier::Saver
    } else if price < 30.0 {
        Tier::Standard
    } else if price < 80.0 {
        Tier::Priority
    } else {
        Tier::ProLoad
    }
}

/// Rounds half away from zero to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turns a wire payload into an engine request: geocodes addresses, applies
/// defaults for omitted fields and rejects out-of-range geometry.
pub fn resolve(input: QuoteInput) -> Result<QuoteRequest, AppError> {
    let pickup = resolve_location(&input.pickup, "pickup")?;
    let dropoff = resolve_location(&input.dropoff, "dropoff")?;

    let quantity = match input.quantity {
        None => 1,
        Some(q) if q >= 1 => u32::try_from(q)
            .map_err(|_| AppError::InvalidInput(format!("quantity {q} is too large")))?,
        Some(q) => {
            return Err(AppError::InvalidInput(format!(
                "quantity must be >= 1, got {q}"
            )));
        }
    };

    let weight_lb = input.weight_lb.unwrap_or(0.0);
    if !weight_lb.is_finite() || weight_lb < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "weight_lb must be >= 0, got {weight_lb}"
        )));
    }

    let defaults = Dimensions::default();
    let dimensions = Dimensions {
        length_in: positive(input.length_in, defaults.length_in, "length_in")?,
        width_in: positive(input.width_in, defaults.width_in, "width_in")?,
        height_in: positive(input.height_in, defaults.height_in, "height_in")?,
    };

    Ok(QuoteRequest {
        pickup,
        dropoff,
        vehicle: input
            .vehicle
            .as_deref()
            .map_or(VehicleClass::Car, VehicleClass::from_label),
        item_type: input
            .item_type
            .as_deref()
            .map_or(ItemType::General, ItemType::from_label),
        quantity,
        weight_lb,
        dimensions,
        weather: input
            .weather
            .as_deref()
            .map_or(Weather::Clear, Weather::from_label),
        traffic: input
            .traffic
            .as_deref()
            .map_or(Traffic::Med, Traffic::from_label),
    })
}

fn resolve_location(location: &Location, which: &str) -> Result<GeoPoint, AppError> {
    match location {
        Location::Point(point) if point.is_valid() => Ok(*point),
        Location::Point(point) => Err(AppError::InvalidInput(format!(
            "{which} coordinates out of range: ({}, {})",
            point.lat, point.lng
        ))),
        Location::Address(address) => geocode(address)
            .ok_or_else(|| AppError::Unavailable(format!("could not geocode {which} address"))),
    }
}

fn positive(value: Option<f64>, default: f64, field: &str) -> Result<f64, AppError> {
    match value {
        None => Ok(default),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(AppError::InvalidInput(format!(
            "{field} must be > 0, got {v}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: GeoPoint = GeoPoint {
        lat: 40.7128,
        lng: -74.0060,
    };
    const LA: GeoPoint = GeoPoint {
        lat: 34.0522,
        lng: -118.2437,
    };
    const BROOKLYN: GeoPoint = GeoPoint {
        lat: 40.6782,
        lng: -73.9442,
    };

    fn request(pickup: GeoPoint, dropoff: GeoPoint, vehicle: VehicleClass) -> QuoteRequest {
        QuoteRequest {
            pickup,
            dropoff,
            vehicle,
            item_type: ItemType::General,
            quantity: 1,
            weight_lb: 0.0,
            dimensions: Dimensions::default(),
            weather: Weather::Clear,
            traffic: Traffic::Med,
        }
    }

    fn input(pickup: Location, dropoff: Location) -> QuoteInput {
        QuoteInput {
            pickup,
            dropoff,
            vehicle: None,
            item_type: None,
            quantity: None,
            weight_lb: None,
            length_in: None,
            width_in: None,
            height_in: None,
            weather: None,
            traffic: None,
        }
    }

    #[test]
    fn cross_country_hits_price_ceiling() {
        let result = estimate(&request(NYC, LA, VehicleClass::Car));

        assert!(result.miles > 2700.0 && result.miles < 2950.0);
        assert_eq!(result.miles, 2812.39);
        assert_eq!(result.price, 999.0);
        assert_eq!(result.eta_minutes, 8990);
        assert_eq!(result.tier, Tier::ProLoad);
    }

    #[test]
    fn zero_distance_bike_pays_base_and_access() {
        // 3.5 * 1.15 * 1.075 + 1.25 - 0.35
        let result = estimate(&request(NYC, NYC, VehicleClass::Bike));

        assert_eq!(result.miles, 0.0);
        assert_eq!(result.price, 5.23);
        assert_eq!(result.eta_minutes, 5);
        assert_eq!(result.tier, Tier::Saver);
    }

    #[test]
    fn tiny_parcel_on_empty_roads_hits_price_floor() {
        let mut req = request(NYC, NYC, VehicleClass::Bike);
        req.dimensions = Dimensions {
            length_in: 1.0,
            width_in: 1.0,
            height_in: 1.0,
        };
        req.traffic = Traffic::Low;

        let result = estimate(&req);
        assert_eq!(result.price, 4.5);
        assert_eq!(result.tier, Tier::Saver);
    }

    #[test]
    fn short_city_trip_by_car() {
        let mut req = request(NYC, BROOKLYN, VehicleClass::Car);
        req.weight_lb = 10.0;

        let result = estimate(&req);
        assert_eq!(result.miles, 4.63);
        assert_eq!(result.price, 14.63);
        assert_eq!(result.eta_minutes, 20);
        assert_eq!(result.tier, Tier::Standard);
    }

    #[test]
    fn fragile_van_load_in_rain_and_heavy_traffic() {
        let req = QuoteRequest {
            item_type: ItemType::Fragile,
            weight_lb: 25.0,
            dimensions: Dimensions {
                length_in: 24.0,
                width_in: 16.0,
                height_in: 12.0,
            },
            weather: Weather::Rain,
            traffic: Traffic::High,
            ..request(NYC, BROOKLYN, VehicleClass::Van)
        };

        let result = estimate(&req);
        assert_eq!(result.miles, 4.63);
        assert_eq!(result.price, 50.06);
        assert_eq!(result.eta_minutes, 27);
        assert_eq!(result.tier, Tier::Priority);
    }

    #[test]
    fn e_bike_gets_environmental_credit() {
        let east_village = GeoPoint {
            lat: 40.7306,
            lng: -73.9352,
        };
        let mut req = request(NYC, east_village, VehicleClass::EBike);
        req.traffic = Traffic::Low;

        let result = estimate(&req);
        assert_eq!(result.miles, 4.49);
        assert_eq!(result.price, 11.36);
        assert_eq!(result.eta_minutes, 27);
        assert_eq!(result.tier, Tier::Saver);
    }

    #[test]
    fn unknown_categories_price_like_defaults() {
        let mut raw = input(Location::Point(NYC), Location::Point(BROOKLYN));
        raw.vehicle = Some("hoverboard".to_string());
        raw.item_type = Some("mystery".to_string());
        raw.weather = Some("tornado".to_string());
        raw.traffic = Some("gridlock".to_string());
        raw.weight_lb = Some(10.0);

        let resolved = resolve(raw).unwrap();
        let mut explicit = request(NYC, BROOKLYN, VehicleClass::Car);
        explicit.weight_lb = 10.0;

        assert_eq!(resolved, explicit);
        assert_eq!(estimate(&resolved), estimate(&explicit));
    }

    #[test]
    fn estimate_is_bit_identical_across_calls() {
        let req = request(NYC, BROOKLYN, VehicleClass::TruckBox);
        let a = estimate(&req);
        let b = estimate(&req);

        assert_eq!(a.price.to_bits(), b.price.to_bits());
        assert_eq!(a.miles.to_bits(), b.miles.to_bits());
        assert_eq!(a.eta_minutes, b.eta_minutes);
    }

    #[test]
    fn longer_trips_cost_more_and_take_longer() {
        let mut previous: Option<QuoteResult> = None;
        for step in 1..=20 {
            let dropoff = GeoPoint {
                lat: NYC.lat,
                lng: NYC.lng + 0.05 * step as f64,
            };
            let result = estimate(&request(NYC, dropoff, VehicleClass::Car));
            if let Some(prev) = previous {
                assert!(result.miles > prev.miles);
                assert!(result.price > prev.price, "step {step}");
                assert!(result.eta_minutes > prev.eta_minutes, "step {step}");
            }
            previous = Some(result);
        }
    }

    #[test]
    fn price_and_eta_stay_in_bounds_for_every_combination() {
        let weathers = [Weather::Clear, Weather::Rain, Weather::Snow, Weather::Extreme];
        let traffics = [Traffic::Low, Traffic::Med, Traffic::High];
        for vehicle in VehicleClass::ALL {
            for weather in weathers {
                for traffic in traffics {
                    for dropoff in [NYC, BROOKLYN, LA] {
                        let req = QuoteRequest {
                            weather,
                            traffic,
                            ..request(NYC, dropoff, vehicle)
                        };
                        let result = estimate(&req);
                        assert!((MIN_PRICE..=MAX_PRICE).contains(&result.price));
                        assert!(result.eta_minutes >= MIN_ETA_MINUTES);
                        assert_eq!(result.tier, tier_for_price(result.price));
                    }
                }
            }
        }
    }

    #[test]
    fn tier_thresholds_are_half_open() {
        assert_eq!(tier_for_price(4.5), Tier::Saver);
        assert_eq!(tier_for_price(11.99), Tier::Saver);
        assert_eq!(tier_for_price(12.0), Tier::Standard);
        assert_eq!(tier_for_price(29.99), Tier::Standard);
        assert_eq!(tier_for_price(30.0), Tier::Priority);
        assert_eq!(tier_for_price(79.99), Tier::Priority);
        assert_eq!(tier_for_price(80.0), Tier::ProLoad);
    }

    #[test]
    fn size_factor_is_clamped() {
        let reference = Dimensions::default();
        assert!((size_factor(&reference) - 1.0).abs() < 1e-12);

        let tiny = Dimensions {
            length_in: 0.1,
            width_in: 0.1,
            height_in: 0.1,
        };
        assert_eq!(size_factor(&tiny), MIN_SIZE_FACTOR);

        let huge = Dimensions {
            length_in: 120.0,
            width_in: 80.0,
            height_in: 60.0,
        };
        assert_eq!(size_factor(&huge), MAX_SIZE_FACTOR);
    }

    #[test]
    fn first_five_pounds_ship_free() {
        assert_eq!(weight_fee(0.0), 0.0);
        assert_eq!(weight_fee(5.0), 0.0);
        assert!((weight_fee(15.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn resolve_geocodes_addresses() {
        let raw = input(
            Location::Address("221B Baker Street".to_string()),
            Location::Address("10 Downing Street".to_string()),
        );

        let req = resolve(raw).unwrap();
        assert_eq!(req.pickup, geocode("221B Baker Street").unwrap());
        assert_eq!(req.dropoff, geocode("10 Downing Street").unwrap());
        assert_eq!(req.dimensions, Dimensions::default());
        assert_eq!(req.quantity, 1);
    }

    #[test]
    fn resolve_rejects_blank_address() {
        let raw = input(
            Location::Address("  ".to_string()),
            Location::Point(BROOKLYN),
        );

        let err = resolve(raw).unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[test]
    fn resolve_rejects_bad_geometry_and_counts() {
        let bad_point = input(
            Location::Point(GeoPoint {
                lat: 123.0,
                lng: 0.0,
            }),
            Location::Point(BROOKLYN),
        );
        assert!(matches!(resolve(bad_point), Err(AppError::InvalidInput(_))));

        let mut zero_qty = input(Location::Point(NYC), Location::Point(BROOKLYN));
        zero_qty.quantity = Some(0);
        assert!(matches!(resolve(zero_qty), Err(AppError::InvalidInput(_))));

        let mut negative_weight = input(Location::Point(NYC), Location::Point(BROOKLYN));
        negative_weight.weight_lb = Some(-1.0);
        assert!(matches!(
            resolve(negative_weight),
            Err(AppError::InvalidInput(_))
        ));

        let mut flat_box = input(Location::Point(NYC), Location::Point(BROOKLYN));
        flat_box.height_in = Some(0.0);
        assert!(matches!(resolve(flat_box), Err(AppError::InvalidInput(_))));
    }
}
