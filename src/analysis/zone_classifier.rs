//! Support / resistance placement around a reference price.
//!
//! Zones come from the per-timeframe policy table rather than from price
//! history: each timeframe contributes two resistances above the reference
//! and two supports below it, near zone first.

use crate::config::{ZoneOffset, policy_for};
use crate::domain::Timeframe;
use crate::models::{PriceZone, ZoneKind};
use crate::utils::maths_utils::round_to;

/// Zones are quoted to a tenth of a pip.
pub const ZONE_PRICE_DECIMALS: u32 = 5;

/// Zones of each kind produced per timeframe.
pub const ZONES_PER_KIND: usize = 2;

/// Classify the zones for `timeframe` around `reference_price`.
///
/// Returns `[resistance near, resistance far, support near, support far]`.
/// Panics if the price cannot hold the zone set (see `try_classify`); callers
/// validate the price before it gets here.
pub fn classify(timeframe: Timeframe, reference_price: f64) -> Vec<PriceZone> {
    try_classify(timeframe, reference_price).unwrap_or_else(|violation| {
        panic!("zone classifier broke its contract for {timeframe}: {violation}")
    })
}

/// Like `classify`, but reports a broken zone set instead of panicking.
/// Fails when a support would land at or below zero, or when the price is so
/// large that the offsets vanish in rounding.
pub fn try_classify(
    timeframe: Timeframe,
    reference_price: f64,
) -> Result<Vec<PriceZone>, String> {
    let policy = policy_for(timeframe);

    let place = |kind: ZoneKind, offset: &ZoneOffset| {
        let signed = match kind {
            ZoneKind::Resistance => offset.distance,
            ZoneKind::Support => -offset.distance,
        };
        PriceZone::new(
            kind,
            round_to(reference_price + signed, ZONE_PRICE_DECIMALS),
            offset.strength,
            offset.note,
            timeframe,
        )
    };

    let zones: Vec<PriceZone> = policy
        .resistances
        .iter()
        .map(|o| place(ZoneKind::Resistance, o))
        .chain(policy.supports.iter().map(|o| place(ZoneKind::Support, o)))
        .collect();

    verify_zone_set(&zones, reference_price)?;
    Ok(zones)
}

/// Nearest zone of `kind` computed for `timeframe`.
/// For supports that is the highest price, for resistances the lowest.
pub fn nearest_zone(
    zones: &[PriceZone],
    kind: ZoneKind,
    timeframe: Timeframe,
) -> Option<&PriceZone> {
    let candidates = zones
        .iter()
        .filter(|z| z.kind == kind && z.timeframe == timeframe);

    match kind {
        ZoneKind::Support => candidates.max_by(|a, b| a.price.total_cmp(&b.price)),
        ZoneKind::Resistance => candidates.min_by(|a, b| a.price.total_cmp(&b.price)),
    }
}

/// Check the classifier contract: exactly two zones per kind, on the correct
/// side of the reference, positive, and ordered near before far.
pub fn verify_zone_set(zones: &[PriceZone], reference_price: f64) -> Result<(), String> {
    for kind in [ZoneKind::Resistance, ZoneKind::Support] {
        let of_kind: Vec<&PriceZone> = zones.iter().filter(|z| z.kind == kind).collect();

        if of_kind.len() != ZONES_PER_KIND {
            return Err(format!(
                "expected {} {} zones, found {}",
                ZONES_PER_KIND,
                kind,
                of_kind.len()
            ));
        }

        for zone in &of_kind {
            let on_correct_side = match kind {
                ZoneKind::Resistance => zone.price > reference_price,
                ZoneKind::Support => zone.price < reference_price,
            };
            if !on_correct_side {
                return Err(format!(
                    "{} at {} is on the wrong side of {}",
                    kind, zone.price, reference_price
                ));
            }
            if zone.price <= 0.0 {
                return Err(format!("{} price {} is not positive", kind, zone.price));
            }
        }

        let ordered = of_kind
            .windows(2)
            .all(|w| w[0].distance_to(reference_price) < w[1].distance_to(reference_price));
        if !ordered {
            return Err(format!("{} zones are not ordered near to far", kind));
        }
    }
    Ok(())
}
