//! Deterministic prompt builders for the text-generation upstream.
//!
//! Every builder is a pure function of its inputs: an identical snapshot
//! produces a byte-identical prompt. The offline generator dispatches on
//! the fixed marker phrases these builders emit, so changing a marker
//! means changing both sides.

use crate::domain::{ClimateReading, Identity, Season, SoilReading, WeatherReading};

/// Borrowed snapshot fields shared by the recommendation, chat and
/// summary prompts.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub identity: &'a Identity,
    pub season: Season,
    pub soil: &'a SoilReading,
    pub weather: &'a WeatherReading,
    pub climate: &'a ClimateReading,
}

pub fn soil_simulation(lat: f64, lon: f64) -> String {
    format!(
        "Act as a soil data simulation API. For the given Indian coordinates \
         (latitude: {lat:.6}, longitude: {lon:.6}), generate a plausible set of soil properties.\n\
         Your response MUST be a single, raw JSON object and nothing else.\n\
         The JSON object must have these exact keys and value types:\n\
         {{\n\
           \"ph\": number (5.5-8.5),\n\
           \"soilOrganicCarbon\": number (4-15),\n\
           \"cationExchangeCapacity\": number (5-25),\n\
           \"bulkDensity\": number (1.1-1.7),\n\
           \"soilType\": string,\n\
           \"nitrogen\": number, \"phosphorus\": number, \"potassium\": number,\n\
           \"electricalConductivity\": number, \"salinity\": number,\n\
           \"sandPercent\": number, \"siltPercent\": number, \"clayPercent\": number,\n\
           \"subsoilMoisture\": number, \"soilTemperature\": number\n\
         }}"
    )
}

pub fn crop_recommendation(ctx: &PromptContext<'_>) -> String {
    format!(
        "Task: Recommend the single best crop for the given Indian farm context.\n\
         Output: ONE line only -> <Crop name> \u{2014} <10-20 word reason>. No preface, no extra text.\n\
         \n{}",
        context_block(ctx)
    )
}

pub fn chat(ctx: &PromptContext<'_>, question: &str, language: &str) -> String {
    let language = if language.trim().is_empty() {
        "en"
    } else {
        language
    };
    format!(
        "Task: Answer the farmer's question briefly in the specified language.\n\
         Reply language: {language}\n\
         Constraints: max 2 sentences; be practical and specific to Indian farming.\n\
         Focus areas: crop choice for max efficiency, input use, pest control, irrigation, \
         soil health, cost-effectiveness. Avoid role-play/disclaimers.\n\
         \n{}\n\
         Farmer message: \"{question}\"",
        context_block(ctx)
    )
}

/// Summary prompt for everything except the crop bullet. The "Best crop"
/// line is constructed locally from the snapshot recommendation, so the
/// model is told to continue after it rather than to repeat it.
pub fn farmer_plan(ctx: &PromptContext<'_>, recommendation: &str) -> String {
    format!(
        "Create a very short, farmer-friendly plan in plain language (max 5 bullet points).\n\
         Language: English. No roleplay. Use simple words.\n\
         The crop is already fixed and announced separately; DO NOT output a crop bullet.\n\
         Crop recommendation for context: \"{recommendation}\"\n\
         Include: why it fits, pesticides/insecticides to prefer (generic names), irrigation need \
         (low/med/high and frequency), fertilizer timing (basal/top-dress), rough harvest window.\n\
         Output only the bullets, 1 line each.\n\
         \n{}",
        context_block(ctx)
    )
}

/// The offline generator echoes everything after the final `Text:` line,
/// which makes offline translation an identity function.
pub fn translation(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {target_language}. Reply with the translation only, \
         no preface and no quotes.\n\
         Text:\n{text}"
    )
}

fn context_block(ctx: &PromptContext<'_>) -> String {
    let soil = ctx.soil;
    format!(
        "Context:\n\
         - Location: {place}, {region}\n\
         - Season: {season}\n\
         - Soil: type={soil_type}, pH={ph:.1}, SOC={soc:.1}, CEC={cec:.1}, bulkDensity={bulk:.1}\n\
         \x20 N={n:.1} kg/ha, P={p:.1} kg/ha, K={k:.1} kg/ha, EC={ec:.2} dS/m, salinity={sal:.2} ppt\n\
         \x20 texture: sand={sand:.0}%, silt={silt:.0}%, clay={clay:.0}%\n\
         \x20 moisture(top)={top:.2}, moisture(sub)={sub:.2}, soilTemp={soil_temp:.1}\u{b0}C\n\
         - 7-day forecast: avgMaxTemp={avg_max:.1}\u{b0}C, totalRain={rain:.1} mm\n\
         - Climate normals: avgTemp={avg_temp:.1}\u{b0}C, annualRain={annual:.1} mm, class={class}",
        place = ctx.identity.place,
        region = ctx.identity.region,
        season = ctx.season.label(),
        soil_type = soil.soil_type,
        ph = soil.ph,
        soc = soil.organic_carbon,
        cec = soil.cation_exchange_capacity,
        bulk = soil.bulk_density,
        n = soil.nitrogen,
        p = soil.phosphorus,
        k = soil.potassium,
        ec = soil.electrical_conductivity,
        sal = soil.salinity,
        sand = soil.sand_percent,
        silt = soil.silt_percent,
        clay = soil.clay_percent,
        top = soil.topsoil_moisture,
        sub = soil.subsoil_moisture,
        soil_temp = soil.soil_temperature,
        avg_max = ctx.weather.avg_max_temp(),
        rain = ctx.weather.total_rain(),
        avg_temp = ctx.climate.average_temperature,
        annual = ctx.climate.annual_rainfall,
        class = ctx.climate.classification,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrentConditions, DailyForecast};

    fn sample_context() -> (Identity, SoilReading, WeatherReading, ClimateReading) {
        let identity = Identity::new("Karnataka", "Mysuru");
        let soil = SoilReading {
            ph: 6.8,
            organic_carbon: 7.2,
            cation_exchange_capacity: 14.0,
            bulk_density: 1.3,
            soil_type: String::from("Clay Loam"),
            nitrogen: 72.0,
            phosphorus: 18.0,
            potassium: 45.0,
            electrical_conductivity: 0.4,
            salinity: 0.1,
            sand_percent: 35.0,
            silt_percent: 30.0,
            clay_percent: 35.0,
            topsoil_moisture: 21.5,
            subsoil_moisture: 17.0,
            soil_temperature: 24.0,
        };
        let weather = WeatherReading {
            current: CurrentConditions::default(),
            forecast: vec![DailyForecast {
                date: String::from("2026-08-30"),
                max_temp: 31.0,
                min_temp: 21.0,
                precipitation_sum: 4.0,
                wind_max: 14.0,
                uv_max: 7.0,
            }],
        };
        let climate = ClimateReading {
            average_temperature: 24.8,
            annual_rainfall: 900.0,
            classification: String::from("Tropical savanna (Aw)"),
            hottest_month_max: 36.0,
            coldest_month_min: 14.0,
            driest_month_rain: 2.0,
        };
        (identity, soil, weather, climate)
    }

    #[test]
    fn identical_context_produces_identical_prompt() {
        let (identity, soil, weather, climate) = sample_context();
        let ctx = PromptContext {
            identity: &identity,
            season: Season::Kharif,
            soil: &soil,
            weather: &weather,
            climate: &climate,
        };

        assert_eq!(crop_recommendation(&ctx), crop_recommendation(&ctx));
        assert_eq!(
            chat(&ctx, "when to sow?", "en"),
            chat(&ctx, "when to sow?", "en")
        );
    }

    #[test]
    fn chat_language_defaults_to_english_when_blank() {
        let (identity, soil, weather, climate) = sample_context();
        let ctx = PromptContext {
            identity: &identity,
            season: Season::Rabi,
            soil: &soil,
            weather: &weather,
            climate: &climate,
        };

        let prompt = chat(&ctx, "which seed?", "  ");
        assert!(prompt.contains("Reply language: en"));
    }

    #[test]
    fn prompts_carry_their_dispatch_markers() {
        let (identity, soil, weather, climate) = sample_context();
        let ctx = PromptContext {
            identity: &identity,
            season: Season::Zaid,
            soil: &soil,
            weather: &weather,
            climate: &climate,
        };

        assert!(soil_simulation(12.9, 77.5).contains("soil data simulation"));
        assert!(crop_recommendation(&ctx).contains("Recommend the single best crop"));
        assert!(chat(&ctx, "q", "en").contains("Answer the farmer's question"));
        assert!(farmer_plan(&ctx, "Wheat").contains("farmer-friendly plan"));
        assert!(translation("hello", "hi").contains("Translate the following text"));
    }
}
