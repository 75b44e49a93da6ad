//! Builds the language model prompt for a chart interpretation.

use serde_json::{json, Map, Value};

/// Chart aspects included in the prompt.
const MAX_NATAL_ASPECTS: usize = 10;
/// Transit aspects included in the prompt.
const MAX_TRANSIT_ASPECTS: usize = 10;

const SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

const INSTRUCTIONS: &str = "Interpret the birth chart and transit data below.

Rules:
1. Do not use technical astrological terms (trine, square, conjunction, opposition, sextile, aspect).
2. Do not use the words 'planet' or 'zodiac sign'.
3. Write in plain everyday language, as a consultant speaking one to one.
4. Start with the birth chart: personality, relationships, career.
5. If transit data is present, follow with a detailed, event-oriented transit reading.
6. Write both readings as flowing paragraphs.
7. Stay strictly within what the calculations show and give no advice.";

/// Renders `chart` (and optionally a transit response carrying a
/// `comparison`) into the user prompt.
pub fn build_prompt(chart: &Value, transit: Option<&Value>) -> String {
    let natal = simplify_chart(chart);
    let natal = serde_json::to_string_pretty(&natal).unwrap_or_else(|_| natal.to_string());

    let mut prompt = format!("{}\n\nBIRTH CHART:\n{}\n", INSTRUCTIONS, natal);

    if let Some(section) = transit.and_then(transit_section) {
        prompt.push_str(&section);
    }

    prompt.push_str("\nNow interpret this person's chart and current transits following the rules above:");
    prompt
}

/// Reduces an engine chart to the fields worth spending tokens on.
fn simplify_chart(chart: &Value) -> Value {
    let mut planets = Map::new();
    if let Some(all) = chart.get("planets").and_then(Value::as_object) {
        for (key, planet) in all {
            let name = planet.get("name").and_then(Value::as_str).unwrap_or(key.as_str());
            planets.insert(
                name.to_string(),
                json!({
                    "sign": planet.get("signName").and_then(Value::as_str).unwrap_or("unknown"),
                    "degree": format_degree(planet.pointer("/position/longitude")),
                    "retrograde": planet.get("retrograde").and_then(Value::as_bool).unwrap_or(false),
                }),
            );
        }
    }

    let big_three = json!({
        "sun": chart.pointer("/planets/sun/signName").and_then(Value::as_str).unwrap_or("unknown"),
        "moon": chart.pointer("/planets/moon/signName").and_then(Value::as_str).unwrap_or("unknown"),
        "ascendant": sign_name(chart.pointer("/axes/asc/sign")),
    });

    let houses: Vec<Value> = chart
        .get("houses")
        .and_then(Value::as_array)
        .map(|houses| {
            houses
                .iter()
                .enumerate()
                .map(|(i, house)| {
                    json!({
                        "house": i + 1,
                        "sign": sign_name(house.get("sign")),
                        "degree": format_degree(house.pointer("/position/longitude")),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let mut aspects = Vec::new();
    if let Some(all) = chart.get("aspects").and_then(Value::as_object) {
        for (planet, planet_aspects) in all {
            for aspect in planet_aspects.as_array().into_iter().flatten() {
                let exists = aspect
                    .pointer("/second/exist")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                if exists {
                    aspects.push(json!({
                        "between": [planet, aspect.pointer("/second/name").cloned().unwrap_or(Value::Null)],
                        "aspect": aspect.get("name").cloned().unwrap_or(Value::Null),
                    }));
                }
            }
        }
    }
    aspects.truncate(MAX_NATAL_ASPECTS);

    let mut simplified = json!({
        "bigThree": big_three,
        "planets": planets,
        "houses": houses,
        "aspects": aspects,
    });

    if let Some(patterns) = chart.get("chartPatterns") {
        simplified["patterns"] = json!({
            "elementEmphasis": patterns.get("elementEmphasis"),
            "qualityEmphasis": patterns.get("qualityEmphasis"),
            "stelliums": patterns.get("stelliums"),
        });
    }

    simplified
}

fn transit_section(transit: &Value) -> Option<String> {
    let comparison = transit.get("comparison").filter(|c| c.is_object())?;
    let date = transit
        .get("transitDate")
        .and_then(Value::as_str)
        .unwrap_or("today");
    let count = |pointer: &str| comparison.pointer(pointer).and_then(Value::as_u64).unwrap_or(0);

    let mut section = format!(
        "\nTRANSIT ANALYSIS ({}):\n- Total aspects: {}\n- Harmonious: {}\n- Challenging: {}\n- Major: {}\n\nKey transit aspects:\n",
        date,
        count("/totalAspects"),
        count("/summary/harmonious"),
        count("/summary/challenging"),
        count("/summary/major"),
    );

    let aspects = comparison.get("aspects").and_then(Value::as_array);
    for aspect in aspects.into_iter().flatten().take(MAX_TRANSIT_ASPECTS) {
        let field = |name: &str| aspect.get(name).and_then(Value::as_str).unwrap_or("?");
        section.push_str(&format!(
            "- Transit {} -> Natal {} ({})\n",
            field("transitPlanet"),
            field("natalPlanet"),
            field("aspect"),
        ));
    }

    if let Some(reading) = comparison
        .pointer("/summary/interpretation")
        .and_then(Value::as_str)
    {
        section.push_str(&format!("\nTransit reading: {}\n", reading));
    }

    Some(section)
}

/// Name for a 1-based sign number.
fn sign_name(sign: Option<&Value>) -> &'static str {
    sign.and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| SIGNS.get(i).copied())
        .unwrap_or("unknown")
}

fn format_degree(longitude: Option<&Value>) -> String {
    longitude
        .and_then(Value::as_f64)
        .map(|l| format!("{:.1}", l))
        .unwrap_or_else(|| "?".to_string())
}
