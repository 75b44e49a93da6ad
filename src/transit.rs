//! Transit-to-natal comparison.
//!
//! Every natal planet is paired with every transit planet and the angle
//! between their ecliptic longitudes is matched against the classical
//! aspects.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

/// Aspects kept in a comparison, tightest first.
const MAX_ASPECTS: usize = 20;

// == Aspect Kinds ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Major,
    Harmonious,
    Challenging,
}

#[derive(Debug, Clone, Copy)]
struct AspectKind {
    name: &'static str,
    angle: f64,
    orb: f64,
    kind: AspectType,
}

const ASPECT_KINDS: [AspectKind; 5] = [
    AspectKind {
        name: "conjunction",
        angle: 0.0,
        orb: 8.0,
        kind: AspectType::Major,
    },
    AspectKind {
        name: "sextile",
        angle: 60.0,
        orb: 6.0,
        kind: AspectType::Harmonious,
    },
    AspectKind {
        name: "square",
        angle: 90.0,
        orb: 8.0,
        kind: AspectType::Challenging,
    },
    AspectKind {
        name: "trine",
        angle: 120.0,
        orb: 8.0,
        kind: AspectType::Harmonious,
    },
    AspectKind {
        name: "opposition",
        angle: 180.0,
        orb: 8.0,
        kind: AspectType::Challenging,
    },
];

// == Comparison Result ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitAspect {
    pub natal_planet: String,
    pub transit_planet: String,
    pub aspect: &'static str,
    #[serde(rename = "type")]
    pub kind: AspectType,
    /// Degrees away from exact
    pub orb: f64,
    /// 100 when exact, 0 at the edge of the orb
    pub exactness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitSummary {
    pub harmonious: usize,
    pub challenging: usize,
    pub major: usize,
    pub interpretation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub total_aspects: usize,
    pub aspects: Vec<TransitAspect>,
    pub summary: TransitSummary,
}

// == Compare ==
/// Compares the `planets` objects of a natal and a transit chart.
///
/// Planets without a numeric `position.longitude` are treated as 0°.
pub fn compare(natal_chart: &Value, transit_chart: &Value) -> Comparison {
    let natal = planets(natal_chart);
    let transit = planets(transit_chart);

    let mut aspects = Vec::new();
    for (natal_name, natal_planet) in natal.iter().flat_map(|m| m.iter()) {
        let natal_long = longitude(natal_planet);

        for (transit_name, transit_planet) in transit.iter().flat_map(|m| m.iter()) {
            let separation = arc(natal_long, longitude(transit_planet));

            for kind in &ASPECT_KINDS {
                let deviation = (separation - kind.angle).abs();
                if deviation <= kind.orb {
                    aspects.push(TransitAspect {
                        natal_planet: natal_name.clone(),
                        transit_planet: transit_name.clone(),
                        aspect: kind.name,
                        kind: kind.kind,
                        orb: round_to(deviation, 2),
                        exactness: round_to((kind.orb - deviation) / kind.orb * 100.0, 1),
                    });
                }
            }
        }
    }

    aspects.sort_by(|a, b| a.orb.partial_cmp(&b.orb).unwrap_or(Ordering::Equal));

    let summary = summarize(&aspects);
    let total_aspects = aspects.len();
    aspects.truncate(MAX_ASPECTS);

    Comparison {
        total_aspects,
        aspects,
        summary,
    }
}

fn summarize(aspects: &[TransitAspect]) -> TransitSummary {
    let count = |kind: AspectType| aspects.iter().filter(|a| a.kind == kind).count();
    let harmonious = count(AspectType::Harmonious);
    let challenging = count(AspectType::Challenging);

    let interpretation = match harmonious.cmp(&challenging) {
        Ordering::Greater => "Harmonious influences dominate this period.",
        Ordering::Less => "Challenging influences call for attention in this period.",
        Ordering::Equal => "The energy of this period is balanced.",
    };

    TransitSummary {
        harmonious,
        challenging,
        major: count(AspectType::Major),
        interpretation,
    }
}

fn planets(chart: &Value) -> Option<&Map<String, Value>> {
    chart.get("planets").and_then(Value::as_object)
}

fn longitude(planet: &Value) -> f64 {
    planet
        .pointer("/position/longitude")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Shortest angular distance between two longitudes, in `[0, 180]`.
fn arc(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
